use thiserror::Error;

use crate::types::ShapeKind;

/// Configuration errors: surfaced to the caller, not recoverable locally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("duplicate animation key {0:?}")]
    DuplicateAnimation(String),
    #[error("no animation named {0:?}")]
    UnknownAnimation(String),
    #[error("animation frame size must be positive, got {width}x{height}")]
    InvalidFrameSize { width: i32, height: i32 },
    #[error("animation {key:?} needs at least one frame")]
    EmptyAnimation { key: String },
    #[error("animation {key:?} frame {frame} lies outside the addressable sheet")]
    FrameOutOfRange { key: String, frame: u64 },
    #[error("no spawn point with role {0:?}")]
    MissingSpawn(String),
    #[error("tile map {width}x{height} expects {expected} cells, got {actual}")]
    CellCount {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("tile size must be positive, got {width}x{height}")]
    InvalidTileSize { width: i32, height: i32 },
}

/// A declared tile shape that was dropped from the collision geometry.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("unsupported {kind:?} collision shape ({width}x{height}) on tile {tile_id} at cell {cell}")]
pub struct GeometryWarning {
    pub cell: usize,
    /// Tile-set local identifier (`gid - 1`).
    pub tile_id: u32,
    pub kind: ShapeKind,
    pub width: f32,
    pub height: f32,
}
