//! Single source of truth for shared constants.
//! Values here are the defaults; `EngineConfig` can override the tunable ones.

/// Default side length of a chunk in cells.
pub const CHUNK_SIZE: u32 = 32;

/// Number of low bits of a packed tile state id holding the meta value.
pub const META_BITS: u32 = 8;

/// Mask selecting the meta bits of a packed tile state id.
pub const META_MASK: u32 = (1 << META_BITS) - 1;

/// Exclusive upper bound for tile type ids (24 bits above the meta byte).
pub const MAX_TILE_TYPES: u32 = 1 << (32 - META_BITS);

/// Tile type 0 = empty cell.
pub const EMPTY_TILE_TYPE: u32 = 0;

/// Health a tile starts with when a break action begins.
pub const DEFAULT_TILE_HEALTH: i32 = 100;

/// Health removed from a breaking tile on every tick it is being worked on.
pub const DEFAULT_BREAK_DAMAGE_PER_TICK: i32 = 10;

/// Ticks a breaking record survives without being touched.
pub const DEFAULT_BREAK_LIVENESS_TICKS: u64 = 10;

/// Base depth of the tile layer mesh.
pub const DEFAULT_LAYER_Z: f32 = 0.0;

/// Depth offset per unit of tile z-priority. Higher priority moves toward the
/// camera (smaller z).
pub const Z_PRIORITY_STEP: f32 = 0.001;

/// Width of a border strip and side of a corner piece, in cells.
pub const BLEND_EXTENT: f32 = 0.5;

/// Standard layer names used by `LayerSchema::standard`.
pub const LAYER_SOLID: &str = "solid";
pub const LAYER_FOREGROUND: &str = "foreground";
pub const LAYER_BACKGROUND: &str = "background";
pub const LAYER_DEBUG: &str = "debug";
