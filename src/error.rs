//! Error types
//!
//! Build failures abort entry into a new environment; save failures are
//! reported to the caller. Everything else degrades silently.

use thiserror::Error;

use crate::world::{Rect, WorldKind};

/// A world build that could not complete
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid grid size {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("room '{name}' at {rect:?} lies outside the {width}x{height} grid")]
    RoomOutOfBounds {
        name: String,
        rect: Rect,
        width: i32,
        height: i32,
    },

    #[error("floorplan '{name}' did not fit the grid after {retries} origin shifts")]
    FloorplanRetriesExhausted { name: String, retries: u32 },

    #[error("floorplan '{0}' has no rows")]
    EmptyFloorplan(String),

    #[error("floorplan '{name}' row {row} is {found} wide, expected {expected}")]
    RaggedFloorplan {
        name: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("floorplan '{name}' has unknown symbol '{symbol}' at ({x}, {y})")]
    UnknownSymbol {
        name: String,
        symbol: char,
        x: usize,
        y: usize,
    },

    #[error("no floorplan named '{0}'")]
    MissingFloorplan(String),

    #[error("{kind:?} build failed after {attempts} attempts")]
    AttemptsExhausted {
        kind: WorldKind,
        attempts: u32,
        #[source]
        source: Box<BuildError>,
    },
}

/// Save or load failure
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("invalid save data: {0}")]
    InvalidData(String),
}

/// Data file export failure
#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),
}
