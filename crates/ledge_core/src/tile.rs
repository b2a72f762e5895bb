//! Tile instances placed in a level grid

use std::fmt;

use glam::Vec2;

use crate::{
    BoundingRectangle, CollisionType, CustomDataError, Positioned, Shape, SolidSides, Value,
};

/// Per-type tile behavior.
///
/// Each tile type (brick, spikes, conveyor, ...) implements this trait and
/// is registered under its [`type_name`](TileBehavior::type_name). The
/// custom-data pair is the type's only persistence hook: whatever
/// `custom_serializable_objects` returns is written to the level file and
/// handed back to `deserialize_custom_objects` on load.
pub trait TileBehavior: CloneTileBehavior + fmt::Debug + Send + Sync + 'static {
    /// Registered name of this tile type
    fn type_name(&self) -> &'static str;

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

/// Object-safe cloning for boxed tile behaviors
pub trait CloneTileBehavior {
    fn clone_box(&self) -> Box<dyn TileBehavior>;
}

impl<T: TileBehavior + Clone> CloneTileBehavior for T {
    fn clone_box(&self) -> Box<dyn TileBehavior> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn TileBehavior> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Plain tile with no custom data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BasicTile;

impl BasicTile {
    pub const TYPE_NAME: &'static str = "ledge::BasicTile";
}

impl TileBehavior for BasicTile {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }
}

/// A tile in the world
#[derive(Debug, Clone)]
pub struct Tile {
    /// Bottom-left corner in world coordinates
    pub position: Vec2,
    pub size: Vec2,
    pub collision: CollisionType,
    pub solid_sides: SolidSides,
    /// Graphics resource used by the renderer (e.g. "tiles/brick")
    pub graphics_resource_name: String,
    /// Current state name; the saved value becomes the initial state on load
    pub state: String,
    behavior: Box<dyn TileBehavior>,
}

impl Tile {
    /// Create a solid tile at the origin with the given behavior
    pub fn new(behavior: impl TileBehavior) -> Self {
        Self::from_boxed(Box::new(behavior))
    }

    /// Create a tile from an already boxed behavior
    pub fn from_boxed(behavior: Box<dyn TileBehavior>) -> Self {
        Self {
            position: Vec2::ZERO,
            size: Vec2::ONE,
            collision: CollisionType::Impassable,
            solid_sides: SolidSides::ALL,
            graphics_resource_name: String::new(),
            state: String::new(),
            behavior,
        }
    }

    /// Registered type name of the tile's behavior
    pub fn type_name(&self) -> &'static str {
        self.behavior.type_name()
    }

    pub fn behavior(&self) -> &dyn TileBehavior {
        self.behavior.as_ref()
    }

    pub fn behavior_mut(&mut self) -> &mut dyn TileBehavior {
        self.behavior.as_mut()
    }

    /// World rectangle occupied by the tile
    pub fn bounds(&self) -> BoundingRectangle {
        BoundingRectangle::from_min_size(self.position, self.size)
    }

    /// Collision shape, or `None` for passable tiles.
    ///
    /// # Panics
    ///
    /// Panics if a solid tile has zero width or height.
    pub fn collision_shape(&self) -> Option<Shape> {
        self.collision.shape(self.bounds())
    }

    /// Set the position
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Set the size
    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    /// Set the collision type
    pub fn with_collision(mut self, collision: CollisionType) -> Self {
        self.collision = collision;
        self
    }

    /// Set the solid sides
    pub fn with_solid_sides(mut self, solid_sides: SolidSides) -> Self {
        self.solid_sides = solid_sides;
        self
    }

    /// Set the graphics resource name
    pub fn with_graphics(mut self, name: impl Into<String>) -> Self {
        self.graphics_resource_name = name.into();
        self
    }

    /// Set the state
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }
}

impl Positioned for Tile {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SlopeOrientation;

    #[derive(Debug, Clone, Default)]
    struct Counter {
        hits: i64,
    }

    impl TileBehavior for Counter {
        fn type_name(&self) -> &'static str {
            "test::Counter"
        }

        fn custom_serializable_objects(&self) -> Value {
            [("hits".to_string(), self.hits)].into_iter().collect()
        }

        fn deserialize_custom_objects(&mut self, payload: &Value) -> Result<(), CustomDataError> {
            self.hits = payload.require_int(self.type_name(), "hits")?;
            Ok(())
        }
    }

    #[test]
    fn test_new_tile_defaults() {
        let tile = Tile::new(BasicTile);
        assert_eq!(tile.type_name(), BasicTile::TYPE_NAME);
        assert_eq!(tile.collision, CollisionType::Impassable);
        assert!(tile.solid_sides.is_all());
        assert!(tile.behavior().custom_serializable_objects().is_null());
    }

    #[test]
    fn test_basic_tile_rejects_payload() {
        let mut tile = Tile::new(BasicTile);
        assert!(tile
            .behavior_mut()
            .deserialize_custom_objects(&Value::Int(1))
            .is_err());
    }

    #[test]
    fn test_clone_copies_behavior_state() {
        let mut tile = Tile::new(Counter::default()).with_state("idle");
        tile.behavior_mut()
            .deserialize_custom_objects(&[("hits".to_string(), 4)].into_iter().collect())
            .unwrap();

        let copy = tile.clone().with_position(Vec2::new(16.0, 0.0));
        assert_eq!(copy.state, "idle");
        assert_eq!(
            copy.behavior().custom_serializable_objects(),
            tile.behavior().custom_serializable_objects()
        );
    }

    #[test]
    fn test_collision_shape() {
        let tile = Tile::new(BasicTile)
            .with_position(Vec2::new(16.0, 32.0))
            .with_size(Vec2::splat(16.0));
        assert_eq!(
            tile.collision_shape(),
            Some(Shape::Rectangle(BoundingRectangle::new(16.0, 32.0, 16.0, 16.0)))
        );

        let passable = tile.clone().with_collision(CollisionType::Passable);
        assert!(passable.collision_shape().is_none());

        let slope = tile.with_collision(CollisionType::Slope(SlopeOrientation::BottomRight));
        assert!(matches!(slope.collision_shape(), Some(Shape::Triangle(_))));
    }

    #[test]
    #[should_panic(expected = "non-degenerate")]
    fn test_zero_size_solid_tile_has_no_valid_shape() {
        let tile = Tile::new(BasicTile).with_size(Vec2::ZERO);
        tile.collision_shape();
    }
}
