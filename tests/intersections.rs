use curvekit::{
    path_intersections, path_intersections_between, IntersectionQuery, Path, Vector,
};

fn v(x: f64, y: f64) -> Vector {
    Vector::new(x, y)
}

fn square(origin: Vector, size: f64) -> Path {
    Path::from_points(
        &[
            origin,
            v(origin.x + size, origin.y),
            v(origin.x + size, origin.y + size),
            v(origin.x, origin.y + size),
        ],
        true,
    )
}

#[test]
fn closed_square_does_not_intersect_itself() {
    let hits = path_intersections(&[square(v(0.0, 0.0), 10.0)], &IntersectionQuery::default());
    assert!(hits.is_empty(), "{:?}", hits);
}

#[test]
fn overlapping_squares_cross_twice() {
    let a = square(v(0.0, 0.0), 10.0);
    let b = square(v(5.0, 5.0), 10.0);
    let hits = path_intersections(&[a, b], &IntersectionQuery::default());
    assert_eq!(hits.len(), 2, "{:?}", hits);
    let mut positions: Vec<Vector> = hits.iter().map(|h| h.position).collect();
    positions.sort_by(|p, q| p.x.partial_cmp(&q.x).unwrap());
    assert!(positions[0].distance(v(5.0, 10.0)) < 1e-9);
    assert!(positions[1].distance(v(10.0, 5.0)) < 1e-9);
    for hit in &hits {
        assert_eq!(hit.path1, 0);
        assert_eq!(hit.path2, 1);
        assert_eq!(hit.distance, None);
    }
}

#[test]
fn line_through_circle_hits_both_sides() {
    let circle = Path::ellipse(v(0.0, 0.0), 10.0, 10.0);
    let chord = Path::from_points(&[v(-20.0, 3.0), v(20.0, 3.0)], false);
    let hits = path_intersections(&[circle, chord], &IntersectionQuery::default());
    assert_eq!(hits.len(), 2, "{:?}", hits);
    let expected_x = (100.0f64 - 9.0).sqrt();
    for hit in &hits {
        assert!((hit.position.y - 3.0).abs() < 1e-3);
        assert!((hit.position.x.abs() - expected_x).abs() < 1e-2);
        assert!(hit.time1.fract() > 0.0);
    }
}

#[test]
fn crossing_circles_meet_at_two_points() {
    let a = Path::ellipse(v(0.0, 0.0), 10.0, 10.0);
    let b = Path::ellipse(v(10.0, 0.0), 10.0, 10.0);
    let hits = path_intersections(&[a, b], &IntersectionQuery::default());
    assert_eq!(hits.len(), 2, "{:?}", hits);
    let expected_y = 75.0f64.sqrt();
    for hit in &hits {
        assert!((hit.position.x - 5.0).abs() < 0.05, "{:?}", hit.position);
        assert!(
            (hit.position.y.abs() - expected_y).abs() < 0.05,
            "{:?}",
            hit.position
        );
    }
}

#[test]
fn circle_alone_reports_nothing() {
    let hits = path_intersections(
        &[Path::ellipse(v(0.0, 0.0), 8.0, 5.0)],
        &IntersectionQuery::default(),
    );
    assert!(hits.is_empty(), "{:?}", hits);
}

#[test]
fn proximity_filter_on_crossing_circles() {
    let a = Path::ellipse(v(0.0, 0.0), 10.0, 10.0);
    let b = Path::ellipse(v(10.0, 0.0), 10.0, 10.0);
    let expected_y = 75.0f64.sqrt();
    let query = IntersectionQuery {
        max_distance: Some((v(5.0, expected_y), 1.0)),
    };
    let hits = path_intersections(&[a, b], &query);
    assert_eq!(hits.len(), 1, "{:?}", hits);
    assert!(hits[0].position.y > 0.0);
    assert!(hits[0].distance.unwrap() <= 1.0);
}

#[test]
fn results_ordered_by_path_then_time() {
    let paths = [
        square(v(0.0, 0.0), 10.0),
        Path::from_points(&[v(-5.0, 2.0), v(15.0, 2.0)], false),
        Path::from_points(&[v(-5.0, 7.0), v(15.0, 7.0)], false),
    ];
    let hits = path_intersections(&paths, &IntersectionQuery::default());
    assert_eq!(hits.len(), 4);
    for pair in hits.windows(2) {
        let a = (pair[0].path1, pair[0].path2);
        let b = (pair[1].path1, pair[1].path2);
        assert!(a < b || (a == b && pair[0].time1 <= pair[1].time1));
    }
    for hit in &hits {
        assert!(hit.path1 <= hit.path2);
    }
}

#[test]
fn two_list_query_separates_index_spaces() {
    let chords = [
        Path::from_points(&[v(-20.0, 0.0), v(20.0, 0.0)], false),
        Path::from_points(&[v(0.0, -20.0), v(0.0, 20.0)], false),
    ];
    let circles = [Path::ellipse(v(0.0, 0.0), 10.0, 10.0)];
    let hits = path_intersections_between(&chords, &circles, &IntersectionQuery::default());
    assert_eq!(hits.len(), 4, "{:?}", hits);
    for hit in &hits {
        assert!(hit.path1 < 2);
        assert_eq!(hit.path2, 0);
        assert!((hit.position.length() - 10.0).abs() < 1e-2);
    }
}

#[test]
fn s_curve_crosses_line_once_in_the_middle() {
    let mut s_curve = Path::from_points(&[v(0.0, 0.0), v(10.0, 10.0)], false);
    s_curve.anchors[0].handle_out = v(8.0, 0.0);
    s_curve.anchors[1].handle_in = v(-8.0, 0.0);
    let line = Path::from_points(&[v(-5.0, 5.0), v(15.0, 5.0)], false);
    let hits = path_intersections(&[s_curve, line], &IntersectionQuery::default());
    assert_eq!(hits.len(), 1);
    assert!((hits[0].time1 - 0.5).abs() < 1e-6);
    assert!(hits[0].position.distance(v(5.0, 5.0)) < 1e-6);
}

#[test]
fn rounded_rectangle_still_crossed_by_line() {
    let rect = Path::rectangle(v(0.0, 0.0), 20.0, 10.0, 3.0);
    let line = Path::from_points(&[v(-5.0, 5.0), v(25.0, 5.0)], false);
    let hits = path_intersections(&[rect, line], &IntersectionQuery::default());
    assert_eq!(hits.len(), 2, "{:?}", hits);
    for hit in &hits {
        assert!((hit.position.y - 5.0).abs() < 1e-6);
        assert!(hit.position.x.abs() < 1e-6 || (hit.position.x - 20.0).abs() < 1e-6);
    }
}
