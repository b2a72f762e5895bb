//! Narrow-phase resolution of one hitbox against candidate tile shapes
//!
//! The resolver is stateless: it takes the moved hitbox and the shapes the
//! broad phase found around it, and reports how far the hitbox has to move
//! and which shapes pushed it. Applying the displacement and reacting to the
//! contacts (velocity, ground flags) is up to the caller.

use glam::Vec2;
use ledge_core::{least_penetration, BoundingRectangle, Collidable, GridCell, Shape, SolidSides};
use tracing::{trace, warn};

/// A solid shape near the body, found by the broad phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Index of the layer holding the tile
    pub layer: usize,
    pub cell: GridCell,
    pub shape: Shape,
    /// Sides a push may exit through
    pub sides: SolidSides,
    /// One-way tiles ignore bodies that were already inside them last step
    pub one_way: bool,
}

impl Candidate {
    /// Push that moves `hitbox` out of this candidate, or zero
    pub fn push(&self, hitbox: &BoundingRectangle) -> Vec2 {
        if !self.shape.intersects(hitbox) {
            return Vec2::ZERO;
        }
        least_penetration(self.sides.filter(self.shape.intersection_depth(hitbox)))
    }
}

/// One applied push
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub layer: usize,
    pub cell: GridCell,
    pub displacement: Vec2,
}

/// Outcome of resolving one hitbox
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Sum of every applied push
    pub displacement: Vec2,
    /// Pushes in the order they were applied
    pub contacts: Vec<Contact>,
    /// True when the pass limit ran out with overlap remaining
    pub exhausted: bool,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

/// Resolve `hitbox` against `candidates`.
///
/// Each pass applies the smallest non-zero push among the remaining
/// candidates, drops that candidate, and re-tests the rest against the moved
/// hitbox. One-way candidates that `previous` already overlapped are ignored.
///
/// # Panics
///
/// Panics if `hitbox` has no area.
pub fn resolve(
    hitbox: BoundingRectangle,
    previous: Option<BoundingRectangle>,
    candidates: &[Candidate],
    max_passes: u32,
) -> Resolution {
    assert!(
        !hitbox.is_degenerate(),
        "cannot resolve a hitbox without area: {hitbox:?}"
    );

    let mut remaining: Vec<Candidate> = candidates
        .iter()
        .filter(|candidate| {
            !(candidate.one_way
                && previous.is_some_and(|previous| candidate.shape.intersects(&previous)))
        })
        .copied()
        .collect();

    let mut current = hitbox;
    let mut resolution = Resolution::default();

    for _ in 0..max_passes {
        let Some((index, push)) = smallest_push(&remaining, &current) else {
            return resolution;
        };
        let candidate = remaining.swap_remove(index);
        trace!(cell = %candidate.cell, layer = candidate.layer, ?push, "resolved contact");

        current.translate(push);
        resolution.displacement += push;
        resolution.contacts.push(Contact {
            layer: candidate.layer,
            cell: candidate.cell,
            displacement: push,
        });
    }

    if smallest_push(&remaining, &current).is_some() {
        warn!(
            passes = max_passes,
            remaining = remaining.len(),
            "collision resolution ran out of passes with overlap remaining"
        );
        resolution.exhausted = true;
    }
    resolution
}

fn smallest_push(candidates: &[Candidate], hitbox: &BoundingRectangle) -> Option<(usize, Vec2)> {
    candidates
        .iter()
        .enumerate()
        .map(|(i, candidate)| (i, candidate.push(hitbox)))
        .filter(|(_, push)| *push != Vec2::ZERO)
        .min_by(|(_, a), (_, b)| a.length_squared().total_cmp(&b.length_squared()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledge_core::{RightTriangle, SlopeOrientation};

    fn block(cx: u32, cy: u32) -> Candidate {
        Candidate {
            layer: 0,
            cell: GridCell::new(cx, cy),
            shape: Shape::Rectangle(BoundingRectangle::new(
                cx as f32 * 16.0,
                cy as f32 * 16.0,
                16.0,
                16.0,
            )),
            sides: SolidSides::ALL,
            one_way: false,
        }
    }

    #[test]
    fn test_no_candidates() {
        let resolution = resolve(BoundingRectangle::new(0.0, 0.0, 8.0, 8.0), None, &[], 8);
        assert!(resolution.is_empty());
        assert_eq!(resolution.displacement, Vec2::ZERO);
        assert!(!resolution.exhausted);
    }

    #[test]
    fn test_lands_on_floor() {
        let hitbox = BoundingRectangle::new(4.0, 14.0, 8.0, 8.0);
        let resolution = resolve(hitbox, None, &[block(0, 0)], 8);

        assert_eq!(resolution.displacement, Vec2::new(0.0, 2.0));
        assert_eq!(resolution.contacts.len(), 1);
        assert_eq!(resolution.contacts[0].cell, GridCell::new(0, 0));
    }

    #[test]
    fn test_smallest_push_first_clears_the_rest() {
        // Standing across two floor blocks, slightly sunk in; one push lifts
        // the body off both.
        let hitbox = BoundingRectangle::new(12.0, 15.0, 8.0, 8.0);
        let resolution = resolve(hitbox, None, &[block(0, 0), block(1, 0)], 8);

        assert_eq!(resolution.displacement, Vec2::new(0.0, 1.0));
        assert_eq!(resolution.contacts.len(), 1);
    }

    #[test]
    fn test_corner_of_wall_and_floor() {
        // Sunk 1 into the floor and 3 into the wall to the right.
        let hitbox = BoundingRectangle::new(11.0, 15.0, 8.0, 8.0);
        let wall = block(1, 1);
        let floor = block(0, 0);
        let resolution = resolve(hitbox, None, &[wall, floor], 8);

        assert_eq!(resolution.displacement, Vec2::new(-3.0, 1.0));
        assert_eq!(resolution.contacts.len(), 2);
        assert_eq!(resolution.contacts[0].cell, floor.cell);
    }

    #[test]
    fn test_one_way_platform_from_above() {
        let mut platform = block(0, 0);
        platform.sides = SolidSides::TOP;
        platform.one_way = true;

        let previous = BoundingRectangle::new(4.0, 17.0, 8.0, 8.0);
        let hitbox = BoundingRectangle::new(4.0, 13.0, 8.0, 8.0);
        let resolution = resolve(hitbox, Some(previous), &[platform], 8);
        assert_eq!(resolution.displacement, Vec2::new(0.0, 3.0));
    }

    #[test]
    fn test_one_way_platform_passes_through_from_below() {
        let mut platform = block(0, 0);
        platform.sides = SolidSides::TOP;
        platform.one_way = true;

        // Jumping up into the platform: the downward exit is not solid.
        let hitbox = BoundingRectangle::new(4.0, -4.0, 8.0, 8.0);
        let resolution = resolve(hitbox, None, &[platform], 8);
        assert!(resolution.is_empty());

        // Already inside last step: ignored even though an upward exit exists.
        let previous = BoundingRectangle::new(4.0, 6.0, 8.0, 8.0);
        let hitbox = BoundingRectangle::new(4.0, 10.0, 8.0, 8.0);
        let resolution = resolve(hitbox, Some(previous), &[platform], 8);
        assert!(resolution.is_empty());
    }

    #[test]
    fn test_slope_candidate() {
        let slope = Candidate {
            layer: 1,
            cell: GridCell::new(0, 0),
            shape: Shape::Triangle(RightTriangle::new(
                BoundingRectangle::new(0.0, 0.0, 16.0, 16.0),
                SlopeOrientation::BottomLeft,
            )),
            sides: SolidSides::ALL,
            one_way: false,
        };
        let hitbox = BoundingRectangle::new(4.0, 9.0, 4.0, 8.0);
        let resolution = resolve(hitbox, None, &[slope], 8);

        assert!((resolution.displacement - Vec2::new(0.0, 1.0)).length() < 1e-3);
        assert_eq!(resolution.contacts[0].layer, 1);
    }

    #[test]
    fn test_fractional_hitboxes_end_clear_of_the_floor() {
        // A floor row with fractional edges.
        let blocks: Vec<Candidate> = [(0.1, 0.3), (10.8, 0.3)]
            .into_iter()
            .enumerate()
            .map(|(i, (x, y))| Candidate {
                cell: GridCell::new(i as u32, 0),
                shape: Shape::Rectangle(BoundingRectangle::new(x, y, 10.7, 9.9)),
                ..block(0, 0)
            })
            .collect();

        for i in 0..120 {
            for j in 0..60 {
                let hitbox = BoundingRectangle::new(
                    2.0 + i as f32 * 0.0731,
                    8.0 + j as f32 * 0.0677,
                    3.3,
                    4.1,
                );
                let resolution = resolve(hitbox, None, &blocks, 8);
                let mut moved = hitbox;
                for contact in &resolution.contacts {
                    moved.translate(contact.displacement);
                }
                for block in &blocks {
                    assert!(
                        !block.shape.intersects(&moved),
                        "{hitbox:?} -> {moved:?} still inside {:?}",
                        block.shape
                    );
                }
            }
        }
    }

    #[test]
    fn test_pass_limit_is_reported() {
        let hitbox = BoundingRectangle::new(11.0, 15.0, 8.0, 8.0);
        let resolution = resolve(hitbox, None, &[block(1, 1), block(0, 0)], 1);

        assert_eq!(resolution.contacts.len(), 1);
        assert!(resolution.exhausted);
    }

    #[test]
    #[should_panic(expected = "without area")]
    fn test_degenerate_hitbox_panics() {
        resolve(BoundingRectangle::new(0.0, 0.0, 0.0, 8.0), None, &[block(0, 0)], 8);
    }
}
