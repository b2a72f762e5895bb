//! Core data structures for ledge
//!
//! This crate provides the fundamental types of a tile-based platformer world:
//! - `BoundingRectangle` / `RightTriangle` - Collision geometry (y-up world space)
//! - `Collidable` / `Shape` - The shape contract used by the resolver
//! - `SizedGrid` - Dense cell grid holding level objects
//! - `Tile` / `Sprite` - Placed tiles and moving bodies with pluggable behavior
//! - `CollisionType` / `SolidSides` - Per-tile collision configuration
//! - `Value` - Structurally comparable custom-data payload

mod collision;
mod grid;
mod rect;
mod shape;
mod sprite;
mod tile;
mod triangle;
mod value;

pub use collision::{CollisionType, SlopeOrientation, SolidSides};
pub use grid::{Direction, GridCell, GridError, Positioned, SizedGrid, MAX_CELLS};
pub use rect::BoundingRectangle;
pub use shape::{least_penetration, Collidable, Shape, RESOLUTION_EPSILON};
pub use sprite::{CloneSpriteBehavior, Contacts, Sprite, SpriteBehavior};
pub use tile::{BasicTile, CloneTileBehavior, Tile, TileBehavior};
pub use triangle::RightTriangle;
pub use value::{CustomDataError, Value};

pub use glam::Vec2;
