use glam::Vec2;
use ledge_core::{Sprite, Value};
use serde::{Deserialize, Serialize};

use crate::{LevelError, TypeRegistry};

/// Saved form of one sprite; sprites are stored individually
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteSaveData {
    pub type_name: String,
    /// Bottom-left corner of the hitbox
    pub position: Vec2,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub custom_data: Value,
}

impl SpriteSaveData {
    pub fn capture(sprite: &Sprite) -> Self {
        Self {
            type_name: sprite.type_name().to_string(),
            position: sprite.hitbox.min(),
            state: sprite.state.clone(),
            custom_data: sprite.behavior().custom_serializable_objects(),
        }
    }

    /// Recreate the sprite through the registry
    pub fn restore(&self, registry: &TypeRegistry) -> Result<Sprite, LevelError> {
        let mut sprite = registry.create_sprite(&self.type_name)?;
        sprite
            .behavior_mut()
            .deserialize_custom_objects(&self.custom_data)?;
        Ok(sprite
            .with_position(self.position)
            .with_state(self.state.clone()))
    }
}
