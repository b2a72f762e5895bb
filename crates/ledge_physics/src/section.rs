//! A playable region: tile layers, sprites, and the per-frame step

use glam::Vec2;
use ledge_core::{
    BoundingRectangle, Collidable, CollisionType, Direction, GridCell, SizedGrid, SolidSides,
    Sprite, Tile,
};
use tracing::debug;
use uuid::Uuid;

use crate::body::{apply_resolution, integrate};
use crate::resolver::{resolve, Candidate, Resolution};
use crate::PhysicsConfig;

/// A named grid of tiles
#[derive(Debug, Clone)]
pub struct TileLayer {
    pub name: String,
    pub grid: SizedGrid<Tile>,
}

impl TileLayer {
    pub fn new(name: impl Into<String>, grid: SizedGrid<Tile>) -> Self {
        Self {
            name: name.into(),
            grid,
        }
    }

    /// Solid candidates from this layer under `rect`
    fn candidates(
        &self,
        layer: usize,
        rect: &BoundingRectangle,
    ) -> impl Iterator<Item = Candidate> + '_ {
        self.grid.cells_overlapping(rect).filter_map(move |cell| {
            let tile = self.grid.get(cell)?;
            let shape = tile.collision_shape()?;
            Some(Candidate {
                layer,
                cell,
                shape,
                sides: self.exposed_sides(cell, tile),
                one_way: tile.solid_sides.is_one_way(),
            })
        })
    }

    /// Solid sides of a block minus the faces buried against a neighbour,
    /// so bodies slide along rows of tiles and off slopes without catching
    /// on seams
    fn exposed_sides(&self, cell: GridCell, tile: &Tile) -> SolidSides {
        let mut sides = tile.solid_sides;
        if !is_full_block(tile) {
            return sides;
        }
        for direction in Direction::ALL {
            let buried = self
                .grid
                .neighbor(cell, direction)
                .is_some_and(|neighbor| covers_edge(neighbor, direction.opposite()));
            if !buried {
                continue;
            }
            match direction {
                Direction::Up => sides.top = false,
                Direction::Down => sides.bottom = false,
                Direction::Left => sides.left = false,
                Direction::Right => sides.right = false,
            }
        }
        sides
    }
}

fn is_full_block(tile: &Tile) -> bool {
    tile.collision == CollisionType::Impassable && tile.solid_sides.is_all()
}

/// True if `tile` is solid along the whole of its edge facing `edge`
fn covers_edge(tile: &Tile, edge: Direction) -> bool {
    if !tile.solid_sides.is_all() {
        return false;
    }
    match tile.collision {
        CollisionType::Impassable => true,
        CollisionType::Passable => false,
        // A slope's legs are the two edges meeting at its right angle.
        CollisionType::Slope(orientation) => match edge {
            Direction::Up => !orientation.is_floor(),
            Direction::Down => orientation.is_floor(),
            Direction::Left => orientation.is_left(),
            Direction::Right => !orientation.is_left(),
        },
    }
}

/// Result of resolving one sprite during a step
#[derive(Debug, Clone, PartialEq)]
pub struct BodyStep {
    pub id: Uuid,
    pub resolution: Resolution,
}

/// Everything that happened during one [`Section::step`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub bodies: Vec<BodyStep>,
}

impl StepReport {
    /// Resolution of a given sprite, if it took part in the step
    pub fn get(&self, id: Uuid) -> Option<&Resolution> {
        self.bodies
            .iter()
            .find(|body| body.id == id)
            .map(|body| &body.resolution)
    }

    /// Total number of pushes applied
    pub fn contact_count(&self) -> usize {
        self.bodies.iter().map(|b| b.resolution.contacts.len()).sum()
    }
}

/// Exclusive owner of a region's tile layers and sprites
#[derive(Debug, Clone, Default)]
pub struct Section {
    pub config: PhysicsConfig,
    layers: Vec<TileLayer>,
    sprites: Vec<Sprite>,
}

impl Section {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            layers: Vec::new(),
            sprites: Vec::new(),
        }
    }

    /// Append a layer, returning its index
    pub fn add_layer(&mut self, layer: TileLayer) -> usize {
        self.layers.push(layer);
        self.layers.len() - 1
    }

    pub fn layer(&self, index: usize) -> Option<&TileLayer> {
        self.layers.get(index)
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut TileLayer> {
        self.layers.get_mut(index)
    }

    /// Find a layer by name
    pub fn layer_by_name(&self, name: &str) -> Option<&TileLayer> {
        self.layers.iter().find(|layer| layer.name == name)
    }

    pub fn layers(&self) -> &[TileLayer] {
        &self.layers
    }

    /// Add a sprite, returning its id.
    ///
    /// A sprite whose id is already in the section (a clone of one that was
    /// added, say) is given a fresh id first, so ids stay unique here.
    pub fn add_sprite(&mut self, mut sprite: Sprite) -> Uuid {
        if self.sprite(sprite.id).is_some() {
            let id = Uuid::new_v4();
            debug!(old = %sprite.id, new = %id, "sprite id already in section, reassigned");
            sprite.id = id;
        }
        let id = sprite.id;
        self.sprites.push(sprite);
        id
    }

    /// Remove a sprite by id
    pub fn remove_sprite(&mut self, id: Uuid) -> Option<Sprite> {
        let index = self.sprites.iter().position(|s| s.id == id)?;
        Some(self.sprites.remove(index))
    }

    pub fn sprite(&self, id: Uuid) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.id == id)
    }

    pub fn sprite_mut(&mut self, id: Uuid) -> Option<&mut Sprite> {
        self.sprites.iter_mut().find(|s| s.id == id)
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn sprites_mut(&mut self) -> &mut [Sprite] {
        &mut self.sprites
    }

    /// Solid tiles of every layer whose cells overlap `rect`
    pub fn solid_candidates(&self, rect: &BoundingRectangle) -> Vec<Candidate> {
        collect_candidates(&self.layers, rect)
    }

    /// Advance every sprite by `dt` seconds and resolve it against the tiles.
    ///
    /// # Panics
    ///
    /// Panics if `dt` is negative or not finite.
    pub fn step(&mut self, dt: f32) -> StepReport {
        assert!(
            dt.is_finite() && dt >= 0.0,
            "step duration must be finite and non-negative, got {dt}"
        );

        let margin = self.config.broadphase_margin;
        let mut report = StepReport::default();

        for sprite in &mut self.sprites {
            let previous = sprite.hitbox;
            integrate(sprite, &self.config, dt);

            let candidates = collect_candidates(&self.layers, &sprite.hitbox.inflated(margin));
            let resolution = resolve(
                sprite.hitbox,
                Some(previous),
                &candidates,
                self.config.max_resolution_passes,
            );
            apply_resolution(sprite, &resolution);

            report.bodies.push(BodyStep {
                id: sprite.id,
                resolution,
            });
        }

        debug!(
            sprites = self.sprites.len(),
            contacts = report.contact_count(),
            "section step"
        );
        report
    }

    /// Drop every layer and sprite
    pub fn clear(&mut self) {
        self.layers.clear();
        self.sprites.clear();
    }

    /// Combined bounds of every layer grid
    pub fn bounds(&self) -> Option<BoundingRectangle> {
        self.layers
            .iter()
            .map(|layer| layer.grid.bounds())
            .reduce(|a, b| a.union(&b))
    }

    /// True if `point` lies inside any solid tile
    pub fn is_solid_at(&self, point: Vec2) -> bool {
        self.layers.iter().any(|layer| {
            layer
                .grid
                .cell_at(point)
                .and_then(|cell| layer.grid.get(cell))
                .and_then(Tile::collision_shape)
                .is_some_and(|shape| shape.within(point, false))
        })
    }
}

fn collect_candidates(layers: &[TileLayer], rect: &BoundingRectangle) -> Vec<Candidate> {
    layers
        .iter()
        .enumerate()
        .flat_map(|(index, layer)| layer.candidates(index, rect))
        .collect()
}
