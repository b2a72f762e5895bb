//! ledge - tile-based 2D platformer core
//!
//! Re-exports the workspace crates under one name:
//! - [`ledge_core`] - Shapes, the spatial grid, tiles, sprites and custom data
//! - [`ledge_physics`] - Collision resolution and the section step
//! - `ledge_level` - Level documents, save data and the type registry (`level` feature)
//!
//! ```rust,ignore
//! use ledge::prelude::*;
//!
//! let mut registry = TypeRegistry::new();
//! registry.register_tile::<BasicTile>();
//!
//! let mut loaded = load_level_from_path(
//!     "levels/1-1.json",
//!     &registry,
//!     PhysicsConfig::load("physics.toml")?,
//!     LoadPolicy::default(),
//! )?;
//! loaded.section.step(1.0 / 60.0);
//! ```

pub use ledge_core;
pub use ledge_physics;

#[cfg(feature = "level")]
pub use ledge_level;

/// Commonly used types
pub mod prelude {
    pub use ledge_core::{
        BasicTile, BoundingRectangle, Collidable, CollisionType, CustomDataError, Direction,
        GridCell, Positioned, RightTriangle, Shape, SizedGrid, SlopeOrientation, SolidSides,
        Sprite, SpriteBehavior, Tile, TileBehavior, Value, Vec2,
    };
    pub use ledge_physics::{PhysicsConfig, Section, StepReport, TileLayer};

    #[cfg(feature = "level")]
    pub use ledge_level::{
        load_level, load_level_from_path, load_level_from_str, save_level, save_level_to_path,
        LevelDocument, LevelError, LoadPolicy, LoadedLevel, TypeRegistry,
    };
}
