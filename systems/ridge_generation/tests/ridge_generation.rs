use ridgeline_core::{Branching, BranchingSchedule, Depth, Point};
use ridgeline_system_ridge_generation::{
    generate_ridge, projected_point_count, RidgeGenerator, RidgeRequest,
};

fn request(branching: u32, depth: u32, seed: u64) -> RidgeRequest {
    RidgeRequest::new(
        Branching::new(branching).expect("non-zero branching"),
        Depth::new(depth),
        BranchingSchedule::Constant,
        seed,
    )
}

fn assert_well_formed(points: &[Point]) {
    let first = points.first().expect("ridge has a first point");
    let last = points.last().expect("ridge has a last point");
    assert_eq!(first.x, 0.0);
    assert_eq!(last.x, 1.0);

    for pair in points.windows(2) {
        assert!(
            pair[0].x < pair[1].x,
            "x must strictly increase: {:?} then {:?}",
            pair[0],
            pair[1]
        );
    }
    for point in points {
        assert!((0.0..=1.0).contains(&point.y), "y escaped unit range: {point:?}");
    }
}

#[test]
fn depth_zero_yields_straight_ridge() {
    let points = generate_ridge(request(1, 0, 42));

    assert_eq!(points.len(), 2);
    assert_eq!(points[0], Point::new(0.0, 0.7415648787718233));
    assert_eq!(points[1], Point::new(1.0, 0.1599103928769201));
}

#[test]
fn single_level_inserts_evenly_spaced_interior_points() {
    let points = generate_ridge(request(2, 1, 1));

    assert_eq!(points.len(), 4);
    let xs: Vec<f64> = points.iter().map(|point| point.x).collect();
    let expected = [0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0];
    for (actual, expected) in xs.iter().zip(expected) {
        assert!((actual - expected).abs() < 1e-12, "{actual} != {expected}");
    }

    assert_eq!(points[0].y, 0.5665615751722809);
    assert_eq!(points[1].y, 0.7405848654804059);
    assert_eq!(points[2].y, 0.6461997149665729);
    assert_eq!(points[3].y, 0.7457817572627011);
}

#[test]
fn interior_heights_stay_between_segment_endpoints() {
    let points = generate_ridge(request(1, 2, 7));

    assert_eq!(points.len(), 5);
    let expected_y = [
        0.3898297483912715,
        0.37438966935819,
        0.35280936840447724,
        0.16881830595654745,
        0.01678829452815611,
    ];
    for (point, expected) in points.iter().zip(expected_y) {
        assert_eq!(point.y, expected);
    }
    assert_eq!(points[2].x, 0.5);
}

#[test]
fn point_count_follows_closed_form() {
    for (branching, depth) in [(1, 0), (1, 1), (1, 2), (2, 2), (3, 2), (1, 7), (4, 3)] {
        let points = generate_ridge(request(branching, depth, 0xfeed));
        let expected = (u64::from(branching) + 1).pow(depth) + 1;
        assert_eq!(points.len() as u64, expected, "k={branching} d={depth}");
        assert_well_formed(&points);
    }
}

#[test]
fn tapered_schedule_matches_projection() {
    for (branching, depth) in [(2, 2), (3, 2), (3, 4), (8, 2)] {
        let tapered = RidgeRequest::new(
            Branching::new(branching).expect("non-zero branching"),
            Depth::new(depth),
            BranchingSchedule::Tapered,
            99,
        );
        let points = generate_ridge(tapered);

        assert_eq!(
            points.len() as u64,
            projected_point_count(tapered.branching(), tapered.depth(), tapered.schedule()),
            "k={branching} d={depth}"
        );
        assert_well_formed(&points);
    }
}

#[test]
fn identical_requests_produce_identical_ridges() {
    let first = generate_ridge(request(3, 4, 0x1234_5678_9abc_def0));
    let second = generate_ridge(request(3, 4, 0x1234_5678_9abc_def0));
    assert_eq!(first, second);

    let other = generate_ridge(request(3, 4, 0x1234_5678_9abc_def1));
    assert_ne!(first, other, "different seeds should diverge");
}

#[test]
fn reused_generator_matches_fresh_generation() {
    let mut generator = RidgeGenerator::new();
    let mut buffer = Vec::new();

    generator.generate(request(4, 3, 11), &mut buffer);
    generator.generate(request(2, 2, 5), &mut buffer);

    assert_eq!(buffer, generate_ridge(request(2, 2, 5)));
}

#[test]
fn zero_seed_generates_a_valid_ridge() {
    let points = generate_ridge(request(3, 2, 0));
    assert_eq!(points.len(), 17);
    assert_well_formed(&points);
}
