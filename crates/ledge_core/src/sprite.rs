//! Dynamic sprites: moving bodies with a hitbox

use std::fmt;

use glam::Vec2;
use uuid::Uuid;

use crate::{BoundingRectangle, CustomDataError, Positioned, Value};

/// Per-type sprite behavior; the sprite counterpart of [`TileBehavior`](crate::TileBehavior)
pub trait SpriteBehavior: CloneSpriteBehavior + fmt::Debug + Send + Sync + 'static {
    /// Registered name of this sprite type
    fn type_name(&self) -> &'static str;

    /// Default hitbox size for freshly created sprites of this type
    fn hitbox_size(&self) -> Vec2 {
        Vec2::new(16.0, 16.0)
    }

    /// Snapshot of the type-specific state to persist
    fn custom_serializable_objects(&self) -> Value {
        Value::Null
    }

    /// Restore type-specific state from a saved payload
    fn deserialize_custom_objects(&mut self, payload: &Value) -> Result<(), CustomDataError> {
        if payload.is_null() {
            Ok(())
        } else {
            Err(CustomDataError::UnexpectedShape {
                type_name: self.type_name().to_string(),
                expected: "null".to_string(),
                found: payload.kind().to_string(),
            })
        }
    }
}

/// Object-safe cloning for boxed sprite behaviors
pub trait CloneSpriteBehavior {
    fn clone_box(&self) -> Box<dyn SpriteBehavior>;
}

impl<T: SpriteBehavior + Clone> CloneSpriteBehavior for T {
    fn clone_box(&self) -> Box<dyn SpriteBehavior> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn SpriteBehavior> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Which surfaces a sprite touched during the last step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    pub ground: bool,
    pub ceiling: bool,
    pub wall_left: bool,
    pub wall_right: bool,
}

impl Contacts {
    pub fn any(&self) -> bool {
        self.ground || self.ceiling || self.wall_left || self.wall_right
    }
}

/// A moving object in the world
#[derive(Debug, Clone)]
pub struct Sprite {
    /// Identifier for this instance. A clone keeps the id until it is added
    /// to a section that already holds the original.
    pub id: Uuid,
    pub hitbox: BoundingRectangle,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub state: String,
    /// Whether the section's gravity applies to this sprite
    pub gravity: bool,
    /// Surfaces touched during the last simulation step
    pub contacts: Contacts,
    behavior: Box<dyn SpriteBehavior>,
}

impl Sprite {
    /// Create a sprite at the origin, sized by its behavior
    pub fn new(behavior: impl SpriteBehavior) -> Self {
        Self::from_boxed(Box::new(behavior))
    }

    /// Create a sprite from an already boxed behavior
    pub fn from_boxed(behavior: Box<dyn SpriteBehavior>) -> Self {
        Self {
            id: Uuid::new_v4(),
            hitbox: BoundingRectangle::from_min_size(Vec2::ZERO, behavior.hitbox_size()),
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            state: String::new(),
            gravity: true,
            contacts: Contacts::default(),
            behavior,
        }
    }

    /// Registered type name of the sprite's behavior
    pub fn type_name(&self) -> &'static str {
        self.behavior.type_name()
    }

    pub fn behavior(&self) -> &dyn SpriteBehavior {
        self.behavior.as_ref()
    }

    pub fn behavior_mut(&mut self) -> &mut dyn SpriteBehavior {
        self.behavior.as_mut()
    }

    /// Set the position
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.hitbox.set_position(position);
        self
    }

    /// Set the velocity
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set whether gravity applies
    pub fn with_gravity(mut self, gravity: bool) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the state
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }
}

impl Positioned for Sprite {
    fn position(&self) -> Vec2 {
        self.hitbox.min()
    }

    fn set_position(&mut self, position: Vec2) {
        self.hitbox.set_position(position);
    }
}
