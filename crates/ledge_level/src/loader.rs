//! Loading and saving whole levels
//!
//! # Example
//!
//! ```rust,ignore
//! use ledge_level::{load_level_from_path, LoadPolicy, TypeRegistry};
//! use ledge_physics::PhysicsConfig;
//!
//! let mut registry = TypeRegistry::new();
//! registry.register_tile::<BasicTile>().register_sprite::<Walker>();
//!
//! let loaded = load_level_from_path(
//!     "levels/1-1.json",
//!     &registry,
//!     PhysicsConfig::default(),
//!     LoadPolicy::default(),
//! )?;
//! for (layer, err) in &loaded.failed_layers {
//!     eprintln!("layer {layer} skipped: {err}");
//! }
//! ```

use std::path::Path;

use ledge_physics::{PhysicsConfig, Section};
use tracing::{debug, info, warn};

use crate::{LevelDocument, LevelError, TypeRegistry};

/// What to do when one layer or sprite of a level fails to load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Drop the failing layer or sprite, log it, and keep going
    #[default]
    SkipFailedLayers,
    /// Fail the whole load on the first error
    AbortOnError,
}

/// A loaded section plus whatever had to be left out
#[derive(Debug)]
pub struct LoadedLevel {
    pub name: String,
    pub section: Section,
    /// Name and cause of every skipped layer
    pub failed_layers: Vec<(String, LevelError)>,
    /// Index into the saved sprite list and cause of every skipped sprite
    pub failed_sprites: Vec<(usize, LevelError)>,
}

impl LoadedLevel {
    /// True if every layer and sprite loaded
    pub fn is_complete(&self) -> bool {
        self.failed_layers.is_empty() && self.failed_sprites.is_empty()
    }
}

/// Save a section into a level document
pub fn save_level(section: &Section, name: &str) -> LevelDocument {
    let document = LevelDocument::capture(section, name);
    debug!(
        level = name,
        layers = document.layers.len(),
        sprites = document.sprites.len(),
        "captured level"
    );
    document
}

/// Save a section as pretty-printed JSON
pub fn save_level_to_string(section: &Section, name: &str) -> Result<String, LevelError> {
    save_level(section, name).to_json_string()
}

/// Save a section to a JSON file
pub fn save_level_to_path(
    section: &Section,
    name: &str,
    path: impl AsRef<Path>,
) -> Result<(), LevelError> {
    let path = path.as_ref();
    std::fs::write(path, save_level_to_string(section, name)?)?;
    info!(level = name, path = %path.display(), "saved level");
    Ok(())
}

/// Build a section from a parsed level document
pub fn load_level(
    document: &LevelDocument,
    registry: &TypeRegistry,
    config: PhysicsConfig,
    policy: LoadPolicy,
) -> Result<LoadedLevel, LevelError> {
    let mut loaded = LoadedLevel {
        name: document.name.clone(),
        section: Section::new(config),
        failed_layers: Vec::new(),
        failed_sprites: Vec::new(),
    };

    for layer in &document.layers {
        match layer.restore(registry) {
            Ok(restored) => {
                debug!(layer = %layer.name, tiles = restored.grid.len(), "loaded layer");
                loaded.section.add_layer(restored);
            }
            Err(err) if policy == LoadPolicy::SkipFailedLayers => {
                warn!(layer = %layer.name, error = %err, "skipping layer that failed to load");
                loaded.failed_layers.push((layer.name.clone(), err));
            }
            Err(err) => return Err(err),
        }
    }

    for (index, saved) in document.sprites.iter().enumerate() {
        match saved.restore(registry) {
            Ok(sprite) => {
                loaded.section.add_sprite(sprite);
            }
            Err(err) if policy == LoadPolicy::SkipFailedLayers => {
                warn!(
                    sprite = index,
                    type_name = %saved.type_name,
                    error = %err,
                    "skipping sprite that failed to load"
                );
                loaded.failed_sprites.push((index, err));
            }
            Err(err) => return Err(err),
        }
    }

    info!(
        level = %loaded.name,
        layers = loaded.section.layers().len(),
        sprites = loaded.section.sprites().len(),
        failed_layers = loaded.failed_layers.len(),
        failed_sprites = loaded.failed_sprites.len(),
        "loaded level"
    );
    Ok(loaded)
}

/// Load a level from JSON text
pub fn load_level_from_str(
    json: &str,
    registry: &TypeRegistry,
    config: PhysicsConfig,
    policy: LoadPolicy,
) -> Result<LoadedLevel, LevelError> {
    let document = LevelDocument::from_json_str(json)?;
    load_level(&document, registry, config, policy)
}

/// Load a level from raw JSON bytes
pub fn load_level_from_bytes(
    bytes: &[u8],
    registry: &TypeRegistry,
    config: PhysicsConfig,
    policy: LoadPolicy,
) -> Result<LoadedLevel, LevelError> {
    let document = LevelDocument::from_json_bytes(bytes)?;
    load_level(&document, registry, config, policy)
}

/// Load a level file
pub fn load_level_from_path(
    path: impl AsRef<Path>,
    registry: &TypeRegistry,
    config: PhysicsConfig,
    policy: LoadPolicy,
) -> Result<LoadedLevel, LevelError> {
    let bytes = std::fs::read(path.as_ref())?;
    load_level_from_bytes(&bytes, registry, config, policy)
}
