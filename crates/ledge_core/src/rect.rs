//! Axis-aligned bounding rectangle
//!
//! World space is y-up: `(x, y)` is the bottom-left corner and
//! `top() == y + height`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::shape::Collidable;

/// Axis-aligned rectangle used for hitboxes and tile bounds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingRectangle {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl BoundingRectangle {
    /// Create a rectangle from its bottom-left corner and size.
    ///
    /// # Panics
    ///
    /// Panics if the size is negative or any component is not finite.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        assert!(
            x.is_finite() && y.is_finite() && width.is_finite() && height.is_finite(),
            "rectangle components must be finite: ({x}, {y}, {width}, {height})"
        );
        assert!(
            width >= 0.0 && height >= 0.0,
            "rectangle size must be non-negative: {width}x{height}"
        );
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from its minimum corner and size
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self::new(min.x, min.y, size.x, size.y)
    }

    /// Create the rectangle spanned by two arbitrary corners
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::from_min_size(min, max - min)
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.right(), self.top())
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn half_size(&self) -> Vec2 {
        self.size() * 0.5
    }

    pub fn center(&self) -> Vec2 {
        self.min() + self.half_size()
    }

    /// True if the rectangle has no area
    pub fn is_degenerate(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Move the bottom-left corner to `position`
    pub fn set_position(&mut self, position: Vec2) {
        self.x = position.x;
        self.y = position.y;
    }

    /// Move the rectangle in place
    pub fn translate(&mut self, offset: Vec2) {
        self.x += offset.x;
        self.y += offset.y;
    }

    /// Return a moved copy of this rectangle
    pub fn translated(mut self, offset: Vec2) -> Self {
        self.translate(offset);
        self
    }

    /// Grow the rectangle by `margin` on every side.
    ///
    /// A negative margin shrinks it, never below zero size.
    pub fn inflated(&self, margin: f32) -> Self {
        let width = (self.width + margin * 2.0).max(0.0);
        let height = (self.height + margin * 2.0).max(0.0);
        let center = self.center();
        Self::new(
            center.x - width * 0.5,
            center.y - height * 0.5,
            width,
            height,
        )
    }

    /// Smallest rectangle containing both rectangles
    pub fn union(&self, other: &BoundingRectangle) -> Self {
        Self::from_corners(self.min().min(other.min()), self.max().max(other.max()))
    }

    /// True if `other` lies entirely inside this rectangle (edges included)
    pub fn contains_rect(&self, other: &BoundingRectangle) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.bottom() >= self.bottom()
            && other.top() <= self.top()
    }

    /// Strict overlap of the x extents
    pub fn overlaps_x(&self, other: &BoundingRectangle) -> bool {
        self.left() < other.right() && other.left() < self.right()
    }

    /// Strict overlap of the y extents
    pub fn overlaps_y(&self, other: &BoundingRectangle) -> bool {
        self.bottom() < other.top() && other.bottom() < self.top()
    }

    /// The four corners, counter-clockwise from bottom-left
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.left(), self.bottom()),
            Vec2::new(self.right(), self.bottom()),
            Vec2::new(self.right(), self.top()),
            Vec2::new(self.left(), self.top()),
        ]
    }
}

impl Collidable for BoundingRectangle {
    fn bounds(&self) -> BoundingRectangle {
        *self
    }

    fn intersects(&self, rect: &BoundingRectangle) -> bool {
        self.overlaps_x(rect) && self.overlaps_y(rect)
    }

    fn intersection_depth(&self, rect: &BoundingRectangle) -> Vec2 {
        let distance = rect.center() - self.center();

        let depth_x = if !self.overlaps_x(rect) {
            0.0
        } else if distance.x > 0.0 {
            exit_push(rect.x, 0.0, self.right())
        } else {
            exit_push(rect.x, rect.width, self.left())
        };
        let depth_y = if !self.overlaps_y(rect) {
            0.0
        } else if distance.y > 0.0 {
            exit_push(rect.y, 0.0, self.top())
        } else {
            exit_push(rect.y, rect.height, self.bottom())
        };
        Vec2::new(depth_x, depth_y)
    }

    fn within(&self, point: Vec2, include_edges: bool) -> bool {
        if include_edges {
            point.x >= self.left()
                && point.x <= self.right()
                && point.y >= self.bottom()
                && point.y <= self.top()
        } else {
            point.x > self.left()
                && point.x < self.right()
                && point.y > self.bottom()
                && point.y < self.top()
        }
    }
}

/// Signed push that moves the edge at `start + extent` onto `target`.
///
/// Translation moves `start` and recomputes the edge from it, and rounding
/// can leave that edge a few ulps short of `target`. The push grows until
/// the moved edge lands on or past it, so translating by the result always
/// separates. Pass `extent = 0.0` for a minimum edge.
pub(crate) fn exit_push(start: f32, extent: f32, target: f32) -> f32 {
    let mut push = target - (start + extent);
    if push == 0.0 {
        return push;
    }
    let short = |push: f32| {
        let moved = (start + push) + extent;
        if push > 0.0 {
            moved < target
        } else {
            moved > target
        }
    };
    while short(push) {
        // Next float away from zero.
        push = f32::from_bits(push.to_bits() + 1);
    }
    push
}

impl TryFrom<[f32; 4]> for BoundingRectangle {
    type Error = String;

    fn try_from([x, y, width, height]: [f32; 4]) -> Result<Self, Self::Error> {
        if !(x.is_finite() && y.is_finite() && width.is_finite() && height.is_finite()) {
            return Err(format!(
                "rectangle components must be finite: [{x}, {y}, {width}, {height}]"
            ));
        }
        if width < 0.0 || height < 0.0 {
            return Err(format!("rectangle size must be non-negative: {width}x{height}"));
        }
        Ok(Self::new(x, y, width, height))
    }
}

impl From<BoundingRectangle> for [f32; 4] {
    fn from(rect: BoundingRectangle) -> Self {
        [rect.x, rect.y, rect.width, rect.height]
    }
}
