//! Physics tuning loaded from TOML

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a [`PhysicsConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Simulation constants shared by every body in a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Acceleration applied to bodies with gravity enabled (world units/s², y-up)
    pub gravity: [f32; 2],
    /// Largest downward speed a falling body may reach
    pub max_fall_speed: f32,
    /// Extra distance around a hitbox searched for candidate tiles
    pub broadphase_margin: f32,
    /// Upper bound on resolution passes per body per step
    pub max_resolution_passes: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -980.0],
            max_fall_speed: 600.0,
            broadphase_margin: 2.0,
            max_resolution_passes: 8,
        }
    }
}

impl PhysicsConfig {
    pub fn gravity(&self) -> Vec2 {
        Vec2::from(self.gravity)
    }

    /// Parse a config from TOML text; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
