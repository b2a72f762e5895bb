use ledge_core::{CustomDataError, GridCell};
use thiserror::Error;

/// Error type for level save and load failures
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid level format: {0}")]
    Format(String),
    #[error("Invalid custom data: {0}")]
    CustomData(#[from] CustomDataError),
    #[error("Unknown {kind} type '{name}'")]
    UnknownType { kind: &'static str, name: String },
    #[error("Cell {cell} is outside the {columns}x{rows} grid")]
    CellOutOfBounds {
        cell: GridCell,
        columns: u32,
        rows: u32,
    },
    #[error("Tile save IDs do not pair up: {0}")]
    MismatchedSaveIds(String),
}
