//! Frame driver for the Loam tile engine. A `World` owns the grid and the
//! derived mesh and collider caches; an `Engine` pairs it with the scheduler
//! and runs one frame at a time in write-then-rebuild order.

pub mod engine;
pub mod error;
pub mod world;

pub use engine::{Engine, FrameReport};
pub use error::EngineError;
pub use world::World;
