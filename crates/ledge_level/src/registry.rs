//! Factories for tile and sprite types, keyed by type name
//!
//! Level files refer to tile and sprite types by name. A host registers
//! every type it can load up front; the loader then asks the registry for
//! a fresh instance per saved signature.
//!
//! ```rust,ignore
//! let mut registry = TypeRegistry::new();
//! registry
//!     .register_tile::<BasicTile>()
//!     .register_tile::<Spikes>()
//!     .register_sprite::<Walker>();
//! ```

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use ledge_core::{Sprite, SpriteBehavior, Tile, TileBehavior};

use crate::LevelError;

trait TileFactory: Send + Sync {
    fn create(&self) -> Box<dyn TileBehavior>;
}

trait SpriteFactory: Send + Sync {
    fn create(&self) -> Box<dyn SpriteBehavior>;
}

/// Factory creating default instances of one tile type
struct TypedTileFactory<T> {
    _marker: PhantomData<T>,
}

impl<T: TileBehavior + Default> TileFactory for TypedTileFactory<T> {
    fn create(&self) -> Box<dyn TileBehavior> {
        Box::new(T::default())
    }
}

struct TypedSpriteFactory<T> {
    _marker: PhantomData<T>,
}

impl<T: SpriteBehavior + Default> SpriteFactory for TypedSpriteFactory<T> {
    fn create(&self) -> Box<dyn SpriteBehavior> {
        Box::new(T::default())
    }
}

/// Registry of constructible tile and sprite types
#[derive(Default)]
pub struct TypeRegistry {
    tiles: HashMap<String, Box<dyn TileFactory>>,
    sprites: HashMap<String, Box<dyn SpriteFactory>>,
}

impl TypeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tile type under the name its default instance reports
    pub fn register_tile<T: TileBehavior + Default>(&mut self) -> &mut Self {
        let name = T::default().type_name().to_string();
        self.tiles.insert(
            name,
            Box::new(TypedTileFactory::<T> {
                _marker: PhantomData,
            }),
        );
        self
    }

    /// Register a sprite type under the name its default instance reports
    pub fn register_sprite<T: SpriteBehavior + Default>(&mut self) -> &mut Self {
        let name = T::default().type_name().to_string();
        self.sprites.insert(
            name,
            Box::new(TypedSpriteFactory::<T> {
                _marker: PhantomData,
            }),
        );
        self
    }

    pub fn is_tile_registered(&self, type_name: &str) -> bool {
        self.tiles.contains_key(type_name)
    }

    pub fn is_sprite_registered(&self, type_name: &str) -> bool {
        self.sprites.contains_key(type_name)
    }

    /// Registered tile type names, sorted
    pub fn tile_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered sprite type names, sorted
    pub fn sprite_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sprites.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get the number of registered types
    pub fn len(&self) -> usize {
        self.tiles.len() + self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty() && self.sprites.is_empty()
    }

    /// Create a default tile of the named type
    pub fn create_tile(&self, type_name: &str) -> Result<Tile, LevelError> {
        self.tiles
            .get(type_name)
            .map(|factory| Tile::from_boxed(factory.create()))
            .ok_or_else(|| LevelError::UnknownType {
                kind: "tile",
                name: type_name.to_string(),
            })
    }

    /// Create a default sprite of the named type
    pub fn create_sprite(&self, type_name: &str) -> Result<Sprite, LevelError> {
        self.sprites
            .get(type_name)
            .map(|factory| Sprite::from_boxed(factory.create()))
            .ok_or_else(|| LevelError::UnknownType {
                kind: "sprite",
                name: type_name.to_string(),
            })
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("tiles", &self.tile_types())
            .field("sprites", &self.sprite_types())
            .finish()
    }
}
