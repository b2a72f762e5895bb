//! On-disk JSON form of a level
//!
//! Writers always produce the current schema: version 2, with position
//! clouds listing grid cells. Readers also accept the legacy schema, whose
//! clouds list world positions of cell origins instead.

use glam::Vec2;
use ledge_core::{GridCell, SizedGrid, Tile};
use ledge_physics::{Section, TileLayer};
use serde::{Deserialize, Serialize};

use crate::{
    LayerTileSaveData, LevelError, SpriteSaveData, TileDescriptor, TilePositionCloud, TypeRegistry,
};

/// Schema version written by this crate
pub const LEVEL_FORMAT_VERSION: u32 = 2;

/// Largest distance a legacy position may sit from its cell origin
pub const LEGACY_POSITION_TOLERANCE: f32 = 0.01;

fn legacy_version() -> u32 {
    1
}

/// Complete level file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDocument {
    #[serde(default = "legacy_version")]
    pub version: u32,
    #[serde(default)]
    pub name: String,
    pub layers: Vec<LayerDocument>,
    #[serde(default)]
    pub sprites: Vec<SpriteSaveData>,
}

/// Placement of a layer grid in the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSpec {
    pub origin: Vec2,
    pub cell_size: Vec2,
    pub columns: u32,
    pub rows: u32,
}

/// One tile layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDocument {
    pub name: String,
    pub grid: GridSpec,
    #[serde(default)]
    pub tiles: Vec<TileDescriptor>,
    #[serde(default)]
    pub position_clouds: Vec<CloudDocument>,
}

/// A position cloud in either schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudDocument {
    #[serde(rename = "tileSaveID")]
    pub tile_save_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cells: Option<Vec<GridCell>>,
    /// Legacy schema: world positions of cell origins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions: Option<Vec<Vec2>>,
}

impl GridSpec {
    pub fn of<T>(grid: &SizedGrid<T>) -> Self {
        Self {
            origin: grid.origin(),
            cell_size: grid.cell_size(),
            columns: grid.columns(),
            rows: grid.rows(),
        }
    }

    /// Build an empty grid, rejecting sizes that cannot describe one
    pub fn to_grid<T>(&self) -> Result<SizedGrid<T>, LevelError> {
        if !self.origin.is_finite() {
            return Err(LevelError::Format(format!(
                "invalid grid: origin {}",
                self.origin
            )));
        }
        SizedGrid::try_new(self.origin, self.cell_size, self.columns, self.rows)
            .map_err(|e| LevelError::Format(format!("invalid grid: {e}")))
    }

    /// Cell whose origin is `position`, for legacy clouds
    fn cell_from_position(&self, position: Vec2) -> Result<GridCell, LevelError> {
        let relative = ((position - self.origin) / self.cell_size).round();
        let snapped = self.origin + relative * self.cell_size;
        if (position - snapped).abs().max_element() > LEGACY_POSITION_TOLERANCE {
            return Err(LevelError::Format(format!(
                "legacy position {position} is not aligned to a cell origin"
            )));
        }
        if relative.x < 0.0 || relative.y < 0.0 {
            return Err(LevelError::Format(format!(
                "legacy position {position} lies before the grid origin"
            )));
        }
        Ok(GridCell::new(relative.x as u32, relative.y as u32))
    }
}

impl CloudDocument {
    fn from_cloud(cloud: TilePositionCloud) -> Self {
        Self {
            tile_save_id: cloud.tile_save_id,
            cells: Some(cloud.cells),
            positions: None,
        }
    }

    /// Resolve to grid cells, converting legacy positions
    pub fn to_cloud(&self, grid: &GridSpec) -> Result<TilePositionCloud, LevelError> {
        let cells = match (&self.cells, &self.positions) {
            (Some(cells), _) => cells.clone(),
            (None, Some(positions)) => positions
                .iter()
                .map(|&p| grid.cell_from_position(p))
                .collect::<Result<_, _>>()?,
            (None, None) => {
                return Err(LevelError::Format(format!(
                    "position cloud {} has neither cells nor positions",
                    self.tile_save_id
                )))
            }
        };
        Ok(TilePositionCloud {
            tile_save_id: self.tile_save_id,
            cells,
        })
    }
}

impl LayerDocument {
    /// Save one layer.
    ///
    /// # Panics
    ///
    /// Panics if a tile is stored in a cell other than the one under its
    /// own position.
    pub fn capture(layer: &TileLayer) -> Self {
        let (tiles, clouds) = LayerTileSaveData::capture(&layer.grid).to_parts();
        Self {
            name: layer.name.clone(),
            grid: GridSpec::of(&layer.grid),
            tiles,
            position_clouds: clouds.into_iter().map(CloudDocument::from_cloud).collect(),
        }
    }

    /// Pair the saved signatures with their cells
    pub fn save_data(&self) -> Result<LayerTileSaveData, LevelError> {
        let clouds = self
            .position_clouds
            .iter()
            .map(|cloud| cloud.to_cloud(&self.grid))
            .collect::<Result<Vec<_>, _>>()?;
        LayerTileSaveData::merge(self.tiles.clone(), clouds)
    }

    /// Rebuild the layer; any failure abandons the whole layer
    pub fn restore(&self, registry: &TypeRegistry) -> Result<TileLayer, LevelError> {
        let mut grid: SizedGrid<Tile> = self.grid.to_grid()?;
        self.save_data()?.restore_into(&mut grid, registry)?;
        Ok(TileLayer::new(self.name.clone(), grid))
    }
}

impl LevelDocument {
    /// Save every layer and sprite of a section
    pub fn capture(section: &Section, name: impl Into<String>) -> Self {
        Self {
            version: LEVEL_FORMAT_VERSION,
            name: name.into(),
            layers: section.layers().iter().map(LayerDocument::capture).collect(),
            sprites: section.sprites().iter().map(SpriteSaveData::capture).collect(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, LevelError> {
        let document: Self = serde_json::from_str(json)?;
        document.check_version()?;
        Ok(document)
    }

    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, LevelError> {
        let document: Self = serde_json::from_slice(bytes)?;
        document.check_version()?;
        Ok(document)
    }

    pub fn to_json_string(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn check_version(&self) -> Result<(), LevelError> {
        if self.version == 0 || self.version > LEVEL_FORMAT_VERSION {
            return Err(LevelError::Format(format!(
                "unsupported level version {}",
                self.version
            )));
        }
        Ok(())
    }
}
