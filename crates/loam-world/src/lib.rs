//! Chunked, layered cell storage plus the gameplay-side systems that write
//! to it: tile breaking and the lifecycle scheduler.

pub mod breaking;
pub mod buffer;
pub mod chunk;
pub mod grid;
pub mod schedule;
pub mod schema;

pub use breaking::{BreakEvent, BreakState, TileBreaking, TileBreakingTracker};
pub use buffer::{CellScalar, LayerBuffer, TypedBuffer};
pub use chunk::Chunk;
pub use grid::Grid;
pub use schedule::{FrameContext, Hook, Scheduler, SystemId, Viewport};
pub use schema::{LayerDef, LayerSchema};
