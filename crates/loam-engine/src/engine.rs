use loam_core::types::ChunkCoord;
use loam_world::schedule::SystemBuilder;
use loam_world::{BreakEvent, FrameContext, Hook, Scheduler, SystemId};

use crate::error::EngineError;
use crate::world::World;

/// What one frame changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub tick: u64,
    pub break_events: Vec<BreakEvent>,
    pub colliders_replaced: Vec<ChunkCoord>,
    pub meshes_rebuilt: Vec<ChunkCoord>,
}

/// A world plus the systems that run against it.
pub struct Engine {
    world: World,
    scheduler: Scheduler<World, EngineError>,
}

impl Engine {
    pub fn new(world: World) -> Self {
        Self {
            world,
            scheduler: Scheduler::new(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Register a disabled system; attach hooks on the returned builder.
    /// Hooks return `EngineError`, so grid writes can use `?`.
    pub fn add_system(&mut self, name: &str) -> SystemBuilder<'_, World, EngineError> {
        self.scheduler.add_system(name)
    }

    pub fn enable(&mut self, id: SystemId, ctx: &FrameContext) -> Result<bool, EngineError> {
        self.scheduler.enable(id, &mut self.world, ctx)
    }

    pub fn disable(&mut self, id: SystemId, ctx: &FrameContext) -> Result<bool, EngineError> {
        self.scheduler.disable(id, &mut self.world, ctx)
    }

    /// Run one frame: gameplay writes first, then the derived caches catch up.
    ///
    /// Tick hooks, breaking, Update hooks, colliders, meshes, end of frame.
    /// A failing hook aborts the frame before the caches are refreshed; the
    /// writes it already made are picked up by the next successful frame.
    pub fn step(&mut self, ctx: &FrameContext) -> Result<FrameReport, EngineError> {
        self.scheduler.run(Hook::Tick, &mut self.world, ctx)?;
        self.world.tick_breaking(ctx.tick)?;
        self.scheduler.run(Hook::Update, &mut self.world, ctx)?;

        let colliders_replaced = self.world.refresh_colliders()?;
        let meshes_rebuilt = self.world.refresh_meshes(ctx)?;
        self.world.end_frame();

        Ok(FrameReport {
            tick: ctx.tick,
            break_events: self.world.break_events().to_vec(),
            colliders_replaced,
            meshes_rebuilt,
        })
    }
}
