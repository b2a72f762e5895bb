//! Collision configuration for tiles
//!
//! - `CollisionType` - Passable, Impassable or a sloped right triangle
//! - `SlopeOrientation` - Which corner of a sloped tile holds the right angle
//! - `SolidSides` - Which sides of a tile push bodies out (one-way platforms)

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{BoundingRectangle, RightTriangle, Shape};

/// Collision behavior of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "orientation")]
pub enum CollisionType {
    /// No collision; bodies pass through
    Passable,
    /// Full tile bounding box
    #[default]
    Impassable,
    /// Right triangle filling half the tile
    Slope(SlopeOrientation),
}

impl CollisionType {
    /// Check if this type has collision
    pub fn is_solid(&self) -> bool {
        !matches!(self, CollisionType::Passable)
    }

    /// Build the collision shape for a tile occupying `bounds`.
    ///
    /// # Panics
    ///
    /// Panics if a solid type is given bounds without area.
    pub fn shape(&self, bounds: BoundingRectangle) -> Option<Shape> {
        match self {
            CollisionType::Passable => None,
            CollisionType::Impassable => {
                assert!(
                    !bounds.is_degenerate(),
                    "solid shape needs a non-degenerate bounding rectangle, got {bounds:?}"
                );
                Some(Shape::Rectangle(bounds))
            }
            CollisionType::Slope(orientation) => {
                Some(Shape::Triangle(RightTriangle::new(bounds, *orientation)))
            }
        }
    }

    /// Get the display name of this collision type
    pub fn name(&self) -> &'static str {
        match self {
            CollisionType::Passable => "Passable",
            CollisionType::Impassable => "Impassable",
            CollisionType::Slope(_) => "Slope",
        }
    }
}

/// Corner of a sloped tile that holds the right angle.
///
/// `Bottom*` slopes are floors (the hypotenuse faces up), `Top*` slopes are
/// ceilings (the hypotenuse faces down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlopeOrientation {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl SlopeOrientation {
    pub const ALL: [SlopeOrientation; 4] = [
        SlopeOrientation::TopLeft,
        SlopeOrientation::TopRight,
        SlopeOrientation::BottomLeft,
        SlopeOrientation::BottomRight,
    ];

    /// True if the solid half lies below the hypotenuse
    pub fn is_floor(&self) -> bool {
        matches!(
            self,
            SlopeOrientation::BottomLeft | SlopeOrientation::BottomRight
        )
    }

    /// True if the right angle sits on the left edge of the bounds
    pub fn is_left(&self) -> bool {
        matches!(self, SlopeOrientation::TopLeft | SlopeOrientation::BottomLeft)
    }

    /// Get the display name of this orientation
    pub fn name(&self) -> &'static str {
        match self {
            SlopeOrientation::TopLeft => "Top Left",
            SlopeOrientation::TopRight => "Top Right",
            SlopeOrientation::BottomLeft => "Bottom Left",
            SlopeOrientation::BottomRight => "Bottom Right",
        }
    }
}

/// Sides of a tile that resolve collisions.
///
/// A side is the face a body gets pushed out through: a top-only tile is a
/// one-way platform that can be jumped through from below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SolidSides {
    #[serde(default = "default_true")]
    pub top: bool,
    #[serde(default = "default_true")]
    pub bottom: bool,
    #[serde(default = "default_true")]
    pub left: bool,
    #[serde(default = "default_true")]
    pub right: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SolidSides {
    fn default() -> Self {
        SolidSides::ALL
    }
}

impl SolidSides {
    /// Solid from every direction
    pub const ALL: SolidSides = SolidSides {
        top: true,
        bottom: true,
        left: true,
        right: true,
    };

    /// Solid from no direction
    pub const NONE: SolidSides = SolidSides {
        top: false,
        bottom: false,
        left: false,
        right: false,
    };

    /// Standard one-way platform: land on it, jump through it from below
    pub const TOP: SolidSides = SolidSides {
        top: true,
        bottom: false,
        left: false,
        right: false,
    };

    /// Check if every side is solid
    pub fn is_all(&self) -> bool {
        *self == SolidSides::ALL
    }

    /// Check if this is a one-way (partially solid) tile
    pub fn is_one_way(&self) -> bool {
        !self.is_all() && *self != SolidSides::NONE
    }

    /// Set the top side
    pub fn with_top(mut self, top: bool) -> Self {
        self.top = top;
        self
    }

    /// Set the bottom side
    pub fn with_bottom(mut self, bottom: bool) -> Self {
        self.bottom = bottom;
        self
    }

    /// Set the left side
    pub fn with_left(mut self, left: bool) -> Self {
        self.left = left;
        self
    }

    /// Set the right side
    pub fn with_right(mut self, right: bool) -> Self {
        self.right = right;
        self
    }

    /// Zero every component of a per-axis push that would leave the tile
    /// through a non-solid side
    pub fn filter(&self, depth: Vec2) -> Vec2 {
        let x = match depth.x {
            x if x > 0.0 && self.right => x,
            x if x < 0.0 && self.left => x,
            _ => 0.0,
        };
        let y = match depth.y {
            y if y > 0.0 && self.top => y,
            y if y < 0.0 && self.bottom => y,
            _ => 0.0,
        };
        Vec2::new(x, y)
    }
}
