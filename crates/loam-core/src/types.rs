use std::fmt;

use glam::{IVec2, UVec2};
use serde::{Deserialize, Serialize};

use crate::constants::{EMPTY_TILE_TYPE, MAX_TILE_TYPES, META_BITS, META_MASK};
use crate::error::TileStateError;

/// Chunk coordinate in chunk-space (each unit = one chunk).
pub type ChunkCoord = IVec2;

/// Grid coordinate in cell-space.
pub type GridCoord = IVec2;

/// Cell offset inside a chunk, always within `[0, chunk_size)`.
pub type LocalCoord = UVec2;

/// Index of a layer in a `LayerSchema`. Stable once assigned, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u32);

impl LayerId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of whoever started breaking a tile (player, NPC, tool).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ActorId(pub u64);

/// Value kind stored by a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Bool,
    Byte,
    UInt16,
    UInt32,
    Float,
}

/// A single cell value of any layer kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue {
    Bool(bool),
    Byte(u8),
    UInt16(u16),
    UInt32(u32),
    Float(f32),
}

impl CellValue {
    /// The zero/false value returned for cells of unloaded chunks.
    pub fn default_for(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Bool => CellValue::Bool(false),
            ValueKind::Byte => CellValue::Byte(0),
            ValueKind::UInt16 => CellValue::UInt16(0),
            ValueKind::UInt32 => CellValue::UInt32(0),
            ValueKind::Float => CellValue::Float(0.0),
        }
    }

    pub fn kind(self) -> ValueKind {
        match self {
            CellValue::Bool(_) => ValueKind::Bool,
            CellValue::Byte(_) => ValueKind::Byte,
            CellValue::UInt16(_) => ValueKind::UInt16,
            CellValue::UInt32(_) => ValueKind::UInt32,
            CellValue::Float(_) => ValueKind::Float,
        }
    }

    /// Widen an integer value to u32. None for Bool and Float.
    pub fn as_u32(self) -> Option<u32> {
        match self {
            CellValue::Byte(v) => Some(v as u32),
            CellValue::UInt16(v) => Some(v as u32),
            CellValue::UInt32(v) => Some(v),
            CellValue::Bool(_) | CellValue::Float(_) => None,
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            CellValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f32(self) -> Option<f32> {
        match self {
            CellValue::Float(v) => Some(v),
            _ => None,
        }
    }
}

/// Packed tile state: `(tile_type << 8) | meta`.
///
/// The raw value is private; `tile_type()` and `meta()` are the only way to
/// read the parts back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TileStateId(u32);

impl TileStateId {
    /// The empty tile (type 0, meta 0).
    pub const EMPTY: TileStateId = TileStateId(EMPTY_TILE_TYPE);

    /// Pack a tile type and meta value. Rejects meta >= 256 and types that
    /// overflow the upper 24 bits.
    pub fn new(tile_type: u32, meta: u32) -> Result<Self, TileStateError> {
        if meta > META_MASK {
            return Err(TileStateError::InvalidMeta(meta));
        }
        if tile_type >= MAX_TILE_TYPES {
            return Err(TileStateError::InvalidTileType(tile_type));
        }
        Ok(TileStateId((tile_type << META_BITS) | meta))
    }

    /// Reinterpret a raw value read from a tile layer.
    pub const fn from_raw(raw: u32) -> Self {
        TileStateId(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn tile_type(self) -> u32 {
        self.0 >> META_BITS
    }

    pub const fn meta(self) -> u8 {
        (self.0 & META_MASK) as u8
    }

    pub const fn is_empty(self) -> bool {
        self.tile_type() == EMPTY_TILE_TYPE
    }
}
