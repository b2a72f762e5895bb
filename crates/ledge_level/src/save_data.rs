//! Deduplicated tile save data
//!
//! Every distinct tile configuration in a layer (its *signature*) is stored
//! once and paired with the cloud of cells that use it. Signatures get
//! sequential IDs in the order they are first met while walking the grid,
//! so a save of the same grid is always byte-identical.

use std::collections::HashMap;

use ledge_core::{CollisionType, GridCell, SizedGrid, SolidSides, Tile, Value};
use serde::{Deserialize, Serialize};

use crate::{LevelError, TypeRegistry};

/// Everything needed to recreate one tile, apart from where it sits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSaveData {
    pub type_name: String,
    #[serde(default)]
    pub collision_type: CollisionType,
    #[serde(default)]
    pub solid_sides: SolidSides,
    #[serde(default)]
    pub graphics_resource_name: String,
    #[serde(default)]
    pub initial_state: String,
    #[serde(default)]
    pub custom_data: Value,
}

impl TileSaveData {
    /// Signature of a placed tile; its current state becomes the initial state
    pub fn capture(tile: &Tile) -> Self {
        Self {
            type_name: tile.type_name().to_string(),
            collision_type: tile.collision,
            solid_sides: tile.solid_sides,
            graphics_resource_name: tile.graphics_resource_name.clone(),
            initial_state: tile.state.clone(),
            custom_data: tile.behavior().custom_serializable_objects(),
        }
    }

    /// Build the template tile this signature describes
    pub fn instantiate(&self, registry: &TypeRegistry) -> Result<Tile, LevelError> {
        let mut tile = registry.create_tile(&self.type_name)?;
        tile.behavior_mut()
            .deserialize_custom_objects(&self.custom_data)?;
        tile.collision = self.collision_type;
        tile.solid_sides = self.solid_sides;
        tile.graphics_resource_name = self.graphics_resource_name.clone();
        tile.state = self.initial_state.clone();
        Ok(tile)
    }
}

/// A signature with its ID, as written to the level file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileDescriptor {
    #[serde(rename = "tileSaveID")]
    pub tile_save_id: u32,
    #[serde(flatten)]
    pub data: TileSaveData,
}

/// The cells that use one tile signature
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TilePositionCloud {
    pub tile_save_id: u32,
    pub cells: Vec<GridCell>,
}

impl TilePositionCloud {
    pub fn new(tile_save_id: u32) -> Self {
        Self {
            tile_save_id,
            cells: Vec::new(),
        }
    }
}

/// All tile signatures of one layer, each with its position cloud
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerTileSaveData {
    entries: HashMap<TileSaveData, TilePositionCloud>,
}

impl LayerTileSaveData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture every tile in a grid.
    ///
    /// # Panics
    ///
    /// Panics if a tile is stored in a cell other than the one under its
    /// own position.
    pub fn capture(grid: &SizedGrid<Tile>) -> Self {
        let mut save = Self::new();
        for (cx, cy, tile) in grid.enumerate_items_with_grid_cells() {
            grid.assert_cell_invariant(cx, cy, tile);
            save.record(TileSaveData::capture(tile), GridCell::new(cx, cy));
        }
        save
    }

    /// Add one occupied cell, returning the ID of its signature
    pub fn record(&mut self, data: TileSaveData, cell: GridCell) -> u32 {
        let next_id = self.entries.len() as u32;
        let cloud = self
            .entries
            .entry(data)
            .or_insert_with(|| TilePositionCloud::new(next_id));
        cloud.cells.push(cell);
        cloud.tile_save_id
    }

    /// Number of distinct signatures
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of occupied cells across every cloud
    pub fn tile_count(&self) -> usize {
        self.entries.values().map(|cloud| cloud.cells.len()).sum()
    }

    pub fn get(&self, data: &TileSaveData) -> Option<&TilePositionCloud> {
        self.entries.get(data)
    }

    /// Signatures with their clouds, in ID order
    pub fn entries_by_id(&self) -> Vec<(&TileSaveData, &TilePositionCloud)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by_key(|(_, cloud)| cloud.tile_save_id);
        entries
    }

    /// Split into the two lists written to a level file, both in ID order
    pub fn to_parts(&self) -> (Vec<TileDescriptor>, Vec<TilePositionCloud>) {
        self.entries_by_id()
            .into_iter()
            .map(|(data, cloud)| {
                (
                    TileDescriptor {
                        tile_save_id: cloud.tile_save_id,
                        data: data.clone(),
                    },
                    cloud.clone(),
                )
            })
            .unzip()
    }

    /// Pair descriptors with clouds by ID.
    ///
    /// Both lists are sorted independently first, so their order in the
    /// file does not matter. Every ID must appear exactly once in each.
    pub fn merge(
        mut descriptors: Vec<TileDescriptor>,
        mut clouds: Vec<TilePositionCloud>,
    ) -> Result<Self, LevelError> {
        if descriptors.len() != clouds.len() {
            return Err(LevelError::MismatchedSaveIds(format!(
                "{} tile descriptors but {} position clouds",
                descriptors.len(),
                clouds.len()
            )));
        }
        descriptors.sort_by_key(|d| d.tile_save_id);
        clouds.sort_by_key(|c| c.tile_save_id);

        let mut save = Self::new();
        let mut previous_id = None;
        for (descriptor, cloud) in descriptors.into_iter().zip(clouds) {
            if descriptor.tile_save_id != cloud.tile_save_id {
                return Err(LevelError::MismatchedSaveIds(format!(
                    "descriptor {} has no matching position cloud (found {})",
                    descriptor.tile_save_id, cloud.tile_save_id
                )));
            }
            if previous_id == Some(descriptor.tile_save_id) {
                return Err(LevelError::MismatchedSaveIds(format!(
                    "duplicate tileSaveID {}",
                    descriptor.tile_save_id
                )));
            }
            previous_id = Some(descriptor.tile_save_id);

            if save.entries.insert(descriptor.data, cloud).is_some() {
                return Err(LevelError::Format(format!(
                    "tileSaveID {} repeats an earlier tile signature",
                    descriptor.tile_save_id
                )));
            }
        }
        Ok(save)
    }

    /// Recreate every tile into `grid`, returning how many were placed.
    ///
    /// Each signature is instantiated once through the registry and then
    /// cloned per cell, positioned at the cell origin and sized to the cell.
    /// On error the grid may hold the tiles placed so far.
    pub fn restore_into(
        &self,
        grid: &mut SizedGrid<Tile>,
        registry: &TypeRegistry,
    ) -> Result<usize, LevelError> {
        let mut placed = 0;
        for (data, cloud) in self.entries_by_id() {
            let template = data.instantiate(registry)?.with_size(grid.cell_size());
            for &cell in &cloud.cells {
                if !grid.contains_cell(cell) {
                    return Err(LevelError::CellOutOfBounds {
                        cell,
                        columns: grid.columns(),
                        rows: grid.rows(),
                    });
                }
                if grid.get(cell).is_some() {
                    return Err(LevelError::Format(format!(
                        "cell {cell} is claimed by more than one tile"
                    )));
                }
                let tile = template.clone().with_position(grid.cell_position(cell));
                grid.insert(cell, tile)
                    .map_err(|err| LevelError::Format(err.to_string()))?;
                placed += 1;
            }
        }
        Ok(placed)
    }
}
