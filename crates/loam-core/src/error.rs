use thiserror::Error;

use crate::types::{ChunkCoord, LayerId, ValueKind};

/// Errors raised by the chunk/layer data model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("chunk {0} already exists")]
    ChunkAlreadyExists(ChunkCoord),

    #[error("chunk {0} is not loaded")]
    ChunkNotLoaded(ChunkCoord),

    #[error("unknown layer {0}")]
    UnknownLayer(LayerId),

    #[error("layer {layer} holds {layer_kind:?} values, got {requested:?}")]
    LayerTypeMismatch {
        layer: LayerId,
        requested: ValueKind,
        layer_kind: ValueKind,
    },

    #[error("layer '{0}' is already defined")]
    DuplicateLayer(String),

    #[error("invalid chunk size {width}x{height}")]
    InvalidChunkSize { width: u32, height: u32 },

    #[error("cell index {index} out of bounds for buffer of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Errors raised when packing a tile state id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TileStateError {
    #[error("meta value {0} does not fit in 8 bits")]
    InvalidMeta(u32),

    #[error("tile type {0} does not fit in 24 bits")]
    InvalidTileType(u32),
}

/// Errors raised while loading the engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse engine config RON: {0}")]
    ParseError(String),

    #[error("Invalid engine config: {0}")]
    Invalid(String),
}
