//! CPU benchmarks for chunk mesh and collider rebuilds.

pub mod report;
pub mod runner;
pub mod scenes;
