//! The collidable capability shared by rectangles and sloped triangles

use glam::Vec2;

use crate::{BoundingRectangle, RightTriangle};

/// Depth difference below which two axes count as equally deep.
///
/// Ties resolve vertically so floors and ceilings win over walls.
pub const RESOLUTION_EPSILON: f32 = 1e-4;

/// A static shape that moving hitboxes can be tested and resolved against
pub trait Collidable {
    /// Minimal enclosing axis-aligned rectangle
    fn bounds(&self) -> BoundingRectangle;

    /// True only if `rect` overlaps the interior; touching edges do not count
    fn intersects(&self, rect: &BoundingRectangle) -> bool;

    /// Signed displacement along each axis that moves `rect` out of the shape
    /// along that axis alone. Zero on an axis without overlap.
    fn intersection_depth(&self, rect: &BoundingRectangle) -> Vec2;

    /// Displacement to apply to `rect` to remove the interpenetration,
    /// along the axis of least penetration
    fn collision_resolution(&self, rect: &BoundingRectangle) -> Vec2 {
        if !self.intersects(rect) {
            return Vec2::ZERO;
        }
        least_penetration(self.intersection_depth(rect))
    }

    /// Point containment, optionally counting points on the boundary
    fn within(&self, point: Vec2, include_edges: bool) -> bool;
}

/// Keep the shallower axis of `depth` and zero the other.
///
/// A zero component means that axis offers no way out. Equal depths
/// (within [`RESOLUTION_EPSILON`]) resolve vertically.
pub fn least_penetration(depth: Vec2) -> Vec2 {
    match (depth.x != 0.0, depth.y != 0.0) {
        (true, true) if depth.x.abs() < depth.y.abs() - RESOLUTION_EPSILON => {
            Vec2::new(depth.x, 0.0)
        }
        (true, true) | (false, true) => Vec2::new(0.0, depth.y),
        (true, false) => Vec2::new(depth.x, 0.0),
        (false, false) => Vec2::ZERO,
    }
}

/// Concrete collision shape of a tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Rectangle(BoundingRectangle),
    Triangle(RightTriangle),
}

impl Shape {
    /// Get the display name of this shape type
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Rectangle(_) => "Rectangle",
            Shape::Triangle(_) => "Triangle",
        }
    }
}

impl Collidable for Shape {
    fn bounds(&self) -> BoundingRectangle {
        match self {
            Shape::Rectangle(rect) => rect.bounds(),
            Shape::Triangle(triangle) => triangle.bounds(),
        }
    }

    fn intersects(&self, rect: &BoundingRectangle) -> bool {
        match self {
            Shape::Rectangle(shape) => shape.intersects(rect),
            Shape::Triangle(shape) => shape.intersects(rect),
        }
    }

    fn intersection_depth(&self, rect: &BoundingRectangle) -> Vec2 {
        match self {
            Shape::Rectangle(shape) => shape.intersection_depth(rect),
            Shape::Triangle(shape) => shape.intersection_depth(rect),
        }
    }

    fn within(&self, point: Vec2, include_edges: bool) -> bool {
        match self {
            Shape::Rectangle(shape) => shape.within(point, include_edges),
            Shape::Triangle(shape) => shape.within(point, include_edges),
        }
    }
}

impl From<BoundingRectangle> for Shape {
    fn from(rect: BoundingRectangle) -> Self {
        Shape::Rectangle(rect)
    }
}

impl From<RightTriangle> for Shape {
    fn from(triangle: RightTriangle) -> Self {
        Shape::Triangle(triangle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_least_penetration_picks_shallow_axis() {
        assert_eq!(least_penetration(Vec2::new(-2.0, 5.0)), Vec2::new(-2.0, 0.0));
        assert_eq!(least_penetration(Vec2::new(6.0, -5.0)), Vec2::new(0.0, -5.0));
    }

    #[test]
    fn test_least_penetration_skips_closed_axis() {
        assert_eq!(least_penetration(Vec2::new(0.0, 5.0)), Vec2::new(0.0, 5.0));
        assert_eq!(least_penetration(Vec2::new(-3.0, 0.0)), Vec2::new(-3.0, 0.0));
        assert_eq!(least_penetration(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_least_penetration_tie_is_vertical() {
        assert_eq!(least_penetration(Vec2::new(2.0, -2.0)), Vec2::new(0.0, -2.0));
        assert_eq!(
            least_penetration(Vec2::new(2.0, -2.00001)),
            Vec2::new(0.0, -2.00001)
        );
    }

    #[test]
    fn test_shape_dispatch() {
        let shape = Shape::from(BoundingRectangle::new(0.0, 0.0, 10.0, 10.0));
        let body = BoundingRectangle::new(8.0, 2.0, 10.0, 6.0);

        assert_eq!(shape.name(), "Rectangle");
        assert!(shape.intersects(&body));
        assert_eq!(shape.collision_resolution(&body), Vec2::new(2.0, 0.0));
    }
}
