//! Collision resolution and simulation stepping for ledge
//!
//! A [`Section`] owns tile layers and sprites. Each [`Section::step`]
//! integrates sprite motion, gathers nearby solid tiles through the grid
//! broad phase, and pushes every hitbox back out with [`resolve`].
//!
//! # Example
//!
//! ```rust,ignore
//! use ledge_physics::{PhysicsConfig, Section, TileLayer};
//!
//! let mut section = Section::new(PhysicsConfig::load("physics.toml")?);
//! section.add_layer(TileLayer::new("main", grid));
//! let report = section.step(1.0 / 60.0);
//! ```

mod body;
mod config;
mod resolver;
mod section;

pub use body::{apply_resolution, integrate};
pub use config::{ConfigError, PhysicsConfig};
pub use resolver::{resolve, Candidate, Contact, Resolution};
pub use section::{BodyStep, Section, StepReport, TileLayer};
