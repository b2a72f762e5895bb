//! Right-triangle collision shape for sloped tiles
//!
//! The triangle fills half of its bounding rectangle. Its two legs lie on
//! the bounds edges meeting at the right-angle corner; the hypotenuse runs
//! between the two neighbouring corners.
//!
//! Depth against the legs is plain axis-aligned clearance. Depth against the
//! hypotenuse is measured along the hypotenuse normal at a sample point on the
//! facing edge of the query rectangle, then converted into the axis-aligned
//! push that clears the same normal distance. The sample sits at the edge
//! midpoint so bodies rest on slopes by their center; when the midpoint is
//! clear but a corner pokes in, the deepest corner is used instead.

use glam::Vec2;

use crate::rect::exit_push;
use crate::shape::Collidable;
use crate::{BoundingRectangle, SlopeOrientation};

/// A right triangle inscribed in a bounding rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RightTriangle {
    bounds: BoundingRectangle,
    orientation: SlopeOrientation,
}

impl RightTriangle {
    /// Create a triangle filling half of `bounds`.
    ///
    /// # Panics
    ///
    /// Panics if `bounds` has no area; a flat slope has no hypotenuse.
    pub fn new(bounds: BoundingRectangle, orientation: SlopeOrientation) -> Self {
        assert!(
            !bounds.is_degenerate(),
            "sloped shape needs a non-degenerate bounding rectangle, got {bounds:?}"
        );
        Self {
            bounds,
            orientation,
        }
    }

    pub fn orientation(&self) -> SlopeOrientation {
        self.orientation
    }

    /// Corner holding the right angle
    pub fn right_angle_corner(&self) -> Vec2 {
        let b = &self.bounds;
        match self.orientation {
            SlopeOrientation::TopLeft => Vec2::new(b.left(), b.top()),
            SlopeOrientation::TopRight => Vec2::new(b.right(), b.top()),
            SlopeOrientation::BottomLeft => Vec2::new(b.left(), b.bottom()),
            SlopeOrientation::BottomRight => Vec2::new(b.right(), b.bottom()),
        }
    }

    /// Bounds corner cut away by the hypotenuse
    pub fn empty_corner(&self) -> Vec2 {
        let b = &self.bounds;
        match self.orientation {
            SlopeOrientation::TopLeft => Vec2::new(b.right(), b.bottom()),
            SlopeOrientation::TopRight => Vec2::new(b.left(), b.bottom()),
            SlopeOrientation::BottomLeft => Vec2::new(b.right(), b.top()),
            SlopeOrientation::BottomRight => Vec2::new(b.left(), b.top()),
        }
    }

    /// Endpoints of the hypotenuse, left endpoint first
    pub fn hypotenuse(&self) -> (Vec2, Vec2) {
        let b = &self.bounds;
        match self.orientation {
            SlopeOrientation::TopLeft | SlopeOrientation::BottomRight => (
                Vec2::new(b.left(), b.bottom()),
                Vec2::new(b.right(), b.top()),
            ),
            SlopeOrientation::TopRight | SlopeOrientation::BottomLeft => (
                Vec2::new(b.left(), b.top()),
                Vec2::new(b.right(), b.bottom()),
            ),
        }
    }

    pub fn vertices(&self) -> [Vec2; 3] {
        let (a, b) = self.hypotenuse();
        [self.right_angle_corner(), a, b]
    }

    /// Unit normal of the hypotenuse, pointing out of the solid half
    pub fn normal(&self) -> Vec2 {
        let (a, b) = self.hypotenuse();
        let edge = b - a;
        let normal = Vec2::new(edge.y, -edge.x).normalize();
        if normal.dot(self.empty_corner() - a) < 0.0 {
            -normal
        } else {
            normal
        }
    }

    /// Distance from the hypotenuse line; negative on the solid side
    pub fn signed_distance(&self, point: Vec2) -> f32 {
        let (a, _) = self.hypotenuse();
        (point - a).dot(self.normal())
    }

    /// Height of the hypotenuse at `x`, clamped to the bounds
    pub fn surface_y(&self, x: f32) -> f32 {
        let (a, b) = self.hypotenuse();
        let x = x.clamp(self.bounds.left(), self.bounds.right());
        a.y + (x - a.x) * (b.y - a.y) / (b.x - a.x)
    }

    /// Penetration of `point` into the solid half-plane, if any
    fn penetration(&self, point: Vec2) -> Option<f32> {
        let depth = -self.signed_distance(point);
        (depth > 0.0).then_some(depth)
    }

    /// Sample the midpoint first, then fall back to the deeper end
    fn sample_depth(&self, mid: Vec2, ends: [Vec2; 2]) -> Option<f32> {
        self.penetration(mid).or_else(|| {
            ends.into_iter()
                .filter_map(|p| self.penetration(p))
                .reduce(f32::max)
        })
    }

    /// Vertical push out through the hypotenuse
    fn hypotenuse_push_y(&self, rect: &BoundingRectangle) -> Option<f32> {
        let normal = self.normal();
        let edge_y = if normal.y > 0.0 {
            rect.bottom()
        } else {
            rect.top()
        };
        let clamp = |x: f32| x.clamp(self.bounds.left(), self.bounds.right());
        let mid = Vec2::new(clamp(rect.center().x), edge_y);
        let ends = [
            Vec2::new(clamp(rect.left()), edge_y),
            Vec2::new(clamp(rect.right()), edge_y),
        ];
        self.sample_depth(mid, ends).map(|depth| depth / normal.y)
    }

    /// Horizontal push out through the hypotenuse
    fn hypotenuse_push_x(&self, rect: &BoundingRectangle) -> Option<f32> {
        let normal = self.normal();
        let edge_x = if normal.x > 0.0 {
            rect.left()
        } else {
            rect.right()
        };
        let clamp = |y: f32| y.clamp(self.bounds.bottom(), self.bounds.top());
        let mid = Vec2::new(edge_x, clamp(rect.center().y));
        let ends = [
            Vec2::new(edge_x, clamp(rect.bottom())),
            Vec2::new(edge_x, clamp(rect.top())),
        ];
        self.sample_depth(mid, ends).map(|depth| depth / normal.x)
    }
}

/// Pick whichever exit is shorter
fn closest_exit(leg: f32, hypotenuse: Option<f32>) -> f32 {
    match hypotenuse {
        Some(push) if push.abs() < leg.abs() => push,
        _ => leg,
    }
}

impl Collidable for RightTriangle {
    fn bounds(&self) -> BoundingRectangle {
        self.bounds
    }

    fn intersects(&self, rect: &BoundingRectangle) -> bool {
        if !self.bounds.intersects(rect) {
            return false;
        }
        // Separating axis along the hypotenuse normal; the bounds test above
        // already covers both legs.
        rect.corners()
            .into_iter()
            .map(|corner| self.signed_distance(corner))
            .fold(f32::INFINITY, f32::min)
            < 0.0
    }

    fn intersection_depth(&self, rect: &BoundingRectangle) -> Vec2 {
        if !self.intersects(rect) {
            return Vec2::ZERO;
        }
        let b = &self.bounds;

        let leg_y = if self.orientation.is_floor() {
            exit_push(rect.y(), rect.height(), b.bottom())
        } else {
            exit_push(rect.y(), 0.0, b.top())
        };
        let leg_x = if self.orientation.is_left() {
            exit_push(rect.x(), rect.width(), b.left())
        } else {
            exit_push(rect.x(), 0.0, b.right())
        };

        Vec2::new(
            closest_exit(leg_x, self.hypotenuse_push_x(rect)),
            closest_exit(leg_y, self.hypotenuse_push_y(rect)),
        )
    }

    fn within(&self, point: Vec2, include_edges: bool) -> bool {
        if !self.bounds.within(point, include_edges) {
            return false;
        }
        let distance = self.signed_distance(point);
        if include_edges {
            distance <= 0.0
        } else {
            distance < 0.0
        }
    }
}
