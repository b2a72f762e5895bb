//! Level persistence for ledge
//!
//! This crate turns a [`Section`](ledge_physics::Section) into a JSON level
//! document and back:
//! - `LayerTileSaveData` - Deduplicated tile signatures with position clouds
//! - `SpriteSaveData` - Per-sprite records
//! - `LevelDocument` - The on-disk schema (current and legacy)
//! - `TypeRegistry` - Name-to-factory lookup for tile and sprite types
//! - `load_level*` / `save_level*` - Whole-level entry points

mod document;
mod error;
mod loader;
mod registry;
mod save_data;
mod sprite_data;

pub use document::{
    CloudDocument, GridSpec, LayerDocument, LevelDocument, LEGACY_POSITION_TOLERANCE,
    LEVEL_FORMAT_VERSION,
};
pub use error::LevelError;
pub use loader::{
    load_level, load_level_from_bytes, load_level_from_path, load_level_from_str, save_level,
    save_level_to_path, save_level_to_string, LoadPolicy, LoadedLevel,
};
pub use registry::TypeRegistry;
pub use save_data::{LayerTileSaveData, TileDescriptor, TilePositionCloud, TileSaveData};
pub use sprite_data::SpriteSaveData;
