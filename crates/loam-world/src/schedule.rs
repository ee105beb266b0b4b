//! Lifecycle hooks and the per-frame context handed to them.

use glam::Vec2;

/// Lifecycle point a system callback can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    Enable,
    Disable,
    Tick,
    Update,
}

/// Axis-aligned world-space rectangle in cell units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub min: Vec2,
    pub max: Vec2,
}

impl Viewport {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// True if the rectangle `[min, max)` overlaps this viewport.
    pub fn overlaps(&self, min: Vec2, max: Vec2) -> bool {
        min.x < self.max.x && max.x > self.min.x && min.y < self.max.y && max.y > self.min.y
    }
}

/// Everything a system may read about the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Monotonic frame tick, also used for every modification stamp.
    pub tick: u64,
    pub delta_seconds: f32,
    /// When set, only chunks overlapping it are rebuilt this frame.
    pub viewport: Option<Viewport>,
    pub camera: Vec2,
}

impl FrameContext {
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            delta_seconds: 1.0 / 60.0,
            viewport: None,
            camera: Vec2::ZERO,
        }
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn with_camera(mut self, camera: Vec2) -> Self {
        self.camera = camera;
        self
    }
}

/// Handle returned when a system is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemId(pub usize);

pub type SystemFn<S, E> = Box<dyn FnMut(&mut S, &FrameContext) -> Result<(), E>>;

struct System<S, E> {
    name: String,
    enabled: bool,
    hooks: Vec<(Hook, SystemFn<S, E>)>,
}

/// Central registry of tagged lifecycle callbacks over a shared state `S`.
///
/// Systems start disabled. Enabling runs their `Enable` hooks once; `run`
/// calls the matching hooks of every enabled system in registration order.
/// The first hook to fail stops the pass and its error is returned.
pub struct Scheduler<S, E> {
    systems: Vec<System<S, E>>,
}

impl<S, E> Default for Scheduler<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, E> Scheduler<S, E> {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
        }
    }

    /// Register a new, disabled system and return a builder to attach hooks.
    pub fn add_system(&mut self, name: &str) -> SystemBuilder<'_, S, E> {
        let id = SystemId(self.systems.len());
        self.systems.push(System {
            name: name.to_string(),
            enabled: false,
            hooks: Vec::new(),
        });
        SystemBuilder {
            scheduler: self,
            id,
        }
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn name(&self, id: SystemId) -> Option<&str> {
        self.systems.get(id.0).map(|s| s.name.as_str())
    }

    pub fn is_enabled(&self, id: SystemId) -> bool {
        self.systems.get(id.0).is_some_and(|s| s.enabled)
    }

    /// Enable a system, running its `Enable` hooks. Returns false if it was
    /// already enabled or the id is unknown. The system stays enabled even
    /// if one of those hooks fails.
    pub fn enable(&mut self, id: SystemId, state: &mut S, ctx: &FrameContext) -> Result<bool, E> {
        self.set_enabled(id, true, state, ctx)
    }

    /// Disable a system, running its `Disable` hooks.
    pub fn disable(&mut self, id: SystemId, state: &mut S, ctx: &FrameContext) -> Result<bool, E> {
        self.set_enabled(id, false, state, ctx)
    }

    fn set_enabled(
        &mut self,
        id: SystemId,
        enabled: bool,
        state: &mut S,
        ctx: &FrameContext,
    ) -> Result<bool, E> {
        let Some(system) = self.systems.get_mut(id.0) else {
            log::warn!("Unknown system id {}", id.0);
            return Ok(false);
        };
        if system.enabled == enabled {
            return Ok(false);
        }
        system.enabled = enabled;
        let hook = if enabled { Hook::Enable } else { Hook::Disable };
        log::info!("System '{}' {}", system.name, if enabled { "enabled" } else { "disabled" });
        for (h, f) in system.hooks.iter_mut() {
            if *h == hook {
                f(state, ctx)?;
            }
        }
        Ok(true)
    }

    /// Run every `hook` callback of the enabled systems, stopping at the
    /// first error.
    pub fn run(&mut self, hook: Hook, state: &mut S, ctx: &FrameContext) -> Result<(), E> {
        for system in self.systems.iter_mut().filter(|s| s.enabled) {
            for (h, f) in system.hooks.iter_mut() {
                if *h != hook {
                    continue;
                }
                if let Err(e) = f(state, ctx) {
                    log::warn!("System '{}' failed in {hook:?} at tick {}", system.name, ctx.tick);
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}

pub struct SystemBuilder<'a, S, E> {
    scheduler: &'a mut Scheduler<S, E>,
    id: SystemId,
}

impl<S, E> SystemBuilder<'_, S, E> {
    /// Attach a callback to `hook`. A system may have several per hook.
    pub fn on(
        self,
        hook: Hook,
        f: impl FnMut(&mut S, &FrameContext) -> Result<(), E> + 'static,
    ) -> Self {
        if let Some(system) = self.scheduler.systems.get_mut(self.id.0) {
            system.hooks.push((hook, Box::new(f)));
        }
        self
    }

    pub fn id(self) -> SystemId {
        self.id
    }
}
