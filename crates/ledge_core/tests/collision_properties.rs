//! Property checks for rectangle and slope collision over a grid of placements
//! and over seeded random fractional placements

use ledge_core::{BoundingRectangle, Collidable, RightTriangle, SlopeOrientation, Vec2};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn placements() -> impl Iterator<Item = BoundingRectangle> {
    (-12..=12).flat_map(|dx| {
        (-12..=12).flat_map(move |dy| {
            [(4.0, 4.0), (10.0, 6.0), (6.0, 14.0)]
                .into_iter()
                .map(move |(w, h)| BoundingRectangle::new(dx as f32, dy as f32, w, h))
        })
    })
}

/// Rectangle with fractional corner and size near the origin
fn fractional_rect(rng: &mut SmallRng, reach: f32) -> BoundingRectangle {
    BoundingRectangle::new(
        rng.gen_range(-reach..reach),
        rng.gen_range(-reach..reach),
        rng.gen_range(0.05..reach),
        rng.gen_range(0.05..reach),
    )
}

#[test]
fn edge_touching_rectangles_never_intersect() {
    let tile = BoundingRectangle::new(0.0, 0.0, 10.0, 10.0);
    let touching = [
        BoundingRectangle::new(10.0, 3.0, 5.0, 5.0),
        BoundingRectangle::new(-5.0, 3.0, 5.0, 5.0),
        BoundingRectangle::new(3.0, 10.0, 5.0, 5.0),
        BoundingRectangle::new(3.0, -5.0, 5.0, 5.0),
        BoundingRectangle::new(10.0, 10.0, 5.0, 5.0),
        BoundingRectangle::new(-5.0, -5.0, 5.0, 5.0),
    ];

    for rect in touching {
        assert!(!tile.intersects(&rect), "{rect:?}");
        assert!(!rect.intersects(&tile), "{rect:?}");
        assert_eq!(tile.collision_resolution(&rect), Vec2::ZERO);
    }
}

#[test]
fn resolution_separates_overlapping_rectangles() {
    let tile = BoundingRectangle::new(0.0, 0.0, 10.0, 10.0);

    for rect in placements() {
        if !tile.intersects(&rect) {
            continue;
        }
        let resolution = tile.collision_resolution(&rect);
        assert!(
            resolution.x == 0.0 || resolution.y == 0.0,
            "resolution must be axis aligned: {resolution:?}"
        );
        let moved = rect.translated(resolution);
        assert!(
            !tile.intersects(&moved),
            "{rect:?} moved by {resolution:?} still overlaps"
        );
    }
}

#[test]
fn resolution_separates_fractional_rectangles() {
    let mut rng = SmallRng::seed_from_u64(0x1ed9e);
    let mut overlapping = 0;

    for _ in 0..20_000 {
        let tile = fractional_rect(&mut rng, 24.0);
        let rect = fractional_rect(&mut rng, 24.0);
        if !tile.intersects(&rect) {
            continue;
        }
        overlapping += 1;
        let resolution = tile.collision_resolution(&rect);
        assert!(
            resolution.x == 0.0 || resolution.y == 0.0,
            "resolution must be axis aligned: {resolution:?}"
        );
        assert_ne!(resolution, Vec2::ZERO, "{tile:?} {rect:?}");
        let moved = rect.translated(resolution);
        assert!(
            !tile.intersects(&moved),
            "{rect:?} moved by {resolution:?} still overlaps {tile:?}"
        );
    }
    assert!(overlapping > 500, "only {overlapping} overlapping pairs");
}

#[test]
fn fractional_slope_resolution_is_axis_aligned_and_non_zero() {
    let mut rng = SmallRng::seed_from_u64(0x510be);

    for _ in 0..20_000 {
        let bounds = fractional_rect(&mut rng, 24.0);
        let orientation = SlopeOrientation::ALL[rng.gen_range(0..SlopeOrientation::ALL.len())];
        let slope = RightTriangle::new(bounds, orientation);
        let rect = fractional_rect(&mut rng, 24.0);
        if !slope.intersects(&rect) {
            continue;
        }
        let resolution = slope.collision_resolution(&rect);
        assert_ne!(resolution, Vec2::ZERO, "{orientation:?} {bounds:?} {rect:?}");
        assert!(
            resolution.x == 0.0 || resolution.y == 0.0,
            "{orientation:?} {bounds:?} {rect:?} -> {resolution:?}"
        );
    }
}

#[test]
fn slope_resolution_is_axis_aligned_and_non_zero() {
    let bounds = BoundingRectangle::new(0.0, 0.0, 16.0, 16.0);

    for orientation in SlopeOrientation::ALL {
        let slope = RightTriangle::new(bounds, orientation);

        for rect in placements() {
            if !slope.intersects(&rect) {
                continue;
            }
            let resolution = slope.collision_resolution(&rect);
            assert_ne!(resolution, Vec2::ZERO, "{orientation:?} {rect:?}");
            assert!(
                resolution.x == 0.0 || resolution.y == 0.0,
                "{orientation:?} {rect:?} -> {resolution:?}"
            );
        }
    }
}

#[test]
fn slope_example_matches_reference() {
    let body = BoundingRectangle::new(0.0, 0.0, 100.0, 100.0);
    let slope = RightTriangle::new(
        BoundingRectangle::new(0.0, 48.0, 100.0, 100.0),
        SlopeOrientation::TopLeft,
    );
    let resolution = slope.collision_resolution(&body);
    assert!((resolution - Vec2::new(0.0, -2.0)).length() < 1e-3, "{resolution:?}");
}

#[test]
fn rectangle_example_matches_reference() {
    let a = BoundingRectangle::new(0.0, 0.0, 100.0, 100.0);
    let b = BoundingRectangle::new(98.0, 96.0, 100.0, 100.0);
    assert_eq!(b.collision_resolution(&a), Vec2::new(-2.0, 0.0));
}
