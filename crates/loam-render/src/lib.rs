//! Render-side tile data: the tile render table loaded from RON, the
//! adjacency mesh builder and the per-chunk mesh cache. Output is plain
//! geometry; uploading and drawing it is up to the caller.

pub mod cache;
pub mod loader;
pub mod mesh;
pub mod tile_data;
pub mod validator;

pub use cache::MeshCache;
pub use loader::{load_all_tiles, load_tiles_from_str, LoadError};
pub use mesh::{ChunkMesh, MeshData, PieceKind, TileMeshBuilder, TilePiece, TileVertex};
pub use tile_data::{TileLook, TileRenderData, TileRenderTable, UvRect};
pub use validator::{validate_tiles, ValidationError};
