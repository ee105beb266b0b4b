use std::time::Instant;

use loam_core::types::TileStateId;
use loam_engine::{Engine, EngineError, World};
use loam_world::{FrameContext, Hook};

use crate::scenes::{dig_position, populate, SceneConfig};

const ENGINE_RON: &str = include_str!("../../../data/engine.ron");
const TILES_RON: &str = include_str!("../../../data/tiles.ron");

/// Timing data for a single benchmark run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub tile_count: u64,
    pub chunk_count: u32,
    pub tick_count: u32,
    /// First frame, which builds every mesh and collider set from scratch.
    pub initial_build_ms: f64,
    pub mean_meshes_rebuilt: f64,
    pub mean_colliders_replaced: f64,
    pub timings: TimingSeries,
}

/// Runs scenes through full engine frames on the CPU.
pub struct BenchmarkRunner {
    tick_count: u32,
}

impl BenchmarkRunner {
    pub fn new(tick_count: u32) -> Self {
        Self { tick_count }
    }

    /// Run a single benchmark scene and return timing results.
    pub fn run_scene(&self, config: &SceneConfig) -> Result<BenchmarkResult, EngineError> {
        log::info!(
            "Running scene '{}' ({}x{} chunks)...",
            config.name,
            config.chunks_x,
            config.chunks_y
        );

        let mut world = World::from_ron(ENGINE_RON, TILES_RON)?;
        let tile_count = populate(&mut world, config)?;
        let chunk_count = world.grid().chunk_count() as u32;
        log::info!("  Populated {tile_count} tiles across {chunk_count} chunks");

        let extent = config.extent(world.grid().chunk_size().as_ivec2());
        let mut engine = Engine::new(world);

        let build_start = Instant::now();
        engine.step(&FrameContext::new(0))?;
        let initial_build_ms = build_start.elapsed().as_secs_f64() * 1000.0;

        let digs = config.digs_per_tick;
        let digger = engine
            .add_system("digger")
            .on(Hook::Tick, move |world, ctx| {
                for i in 0..digs {
                    let position = dig_position(extent, ctx.tick, i);
                    world.set_tile(position, TileStateId::EMPTY, false, ctx.tick)?;
                }
                Ok(())
            })
            .id();
        engine.enable(digger, &FrameContext::new(1))?;

        let mut frame_times = Vec::with_capacity(self.tick_count as usize);
        let mut meshes_rebuilt = 0usize;
        let mut colliders_replaced = 0usize;
        for tick in 1..=u64::from(self.tick_count) {
            let ctx = FrameContext::new(tick);
            let frame_start = Instant::now();
            let report = engine.step(&ctx)?;
            frame_times.push(frame_start.elapsed().as_secs_f64() * 1000.0);
            meshes_rebuilt += report.meshes_rebuilt.len();
            colliders_replaced += report.colliders_replaced.len();
        }

        let timings = compute_timings(&frame_times);
        let ticks = f64::from(self.tick_count.max(1));
        log::info!(
            "  Done: build={:.2}ms, mean={:.2}ms, p95={:.2}ms, p99={:.2}ms",
            initial_build_ms,
            timings.mean_ms,
            timings.p95_ms,
            timings.p99_ms
        );

        Ok(BenchmarkResult {
            scene_name: config.name.to_string(),
            tile_count,
            chunk_count,
            tick_count: self.tick_count,
            initial_build_ms,
            mean_meshes_rebuilt: meshes_rebuilt as f64 / ticks,
            mean_colliders_replaced: colliders_replaced as f64 / ticks,
            timings,
        })
    }
}

/// Compute timing statistics from a list of frame times in milliseconds.
fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_timings() {
        let t = compute_timings(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(t.min_ms, 1.0);
        assert_eq!(t.max_ms, 4.0);
        assert_eq!(t.median_ms, 2.5);
        assert_eq!(t.mean_ms, 2.5);
        assert_eq!(compute_timings(&[]).max_ms, 0.0);
    }

    #[test]
    fn test_small_scene_runs() {
        let scene = SceneConfig {
            name: "tiny",
            chunks_x: 2,
            chunks_y: 2,
            digs_per_tick: 2,
        };
        let result = BenchmarkRunner::new(3).run_scene(&scene).expect("scene runs");
        assert_eq!(result.chunk_count, 4);
        assert_eq!(result.tick_count, 3);
        assert!(result.tile_count > 0);
        assert!(result.mean_colliders_replaced > 0.0);
    }
}
