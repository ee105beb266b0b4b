//! Collision rectangles for solid cells, one set per chunk.

pub mod cache;
pub mod collider;

pub use cache::ColliderCache;
pub use collider::{generate_chunk_rects, generate_rects, ColliderRect};
