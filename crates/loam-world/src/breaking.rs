//! Progressive tile destruction.
//!
//! Each cell being worked on carries one `TileBreaking` record. Records lose
//! health once per tick while they keep being touched; at zero health the
//! tile is cleared, and a record nobody touched within the liveness window is
//! dropped without changing the tile.

use std::collections::HashMap;

use loam_core::config::BreakingConfig;
use loam_core::error::GridError;
use loam_core::types::{ActorId, CellValue, GridCoord, LayerId, TileStateId, ValueKind};

use crate::grid::Grid;

/// Observable state of a cell with respect to breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakState {
    NotBreaking,
    Breaking,
}

/// Ephemeral per-cell breaking record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileBreaking {
    pub owner: ActorId,
    pub health: i32,
    pub damage_per_tick: i32,
    pub last_touched: u64,
}

/// Outcome reported by `TileBreakingTracker::tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakEvent {
    /// Health reached zero; the tile and solid cells were cleared.
    Broken { position: GridCoord, owner: ActorId },
    /// Nobody touched the cell within the liveness window.
    Abandoned { position: GridCoord, owner: ActorId },
}

impl BreakEvent {
    pub fn position(&self) -> GridCoord {
        match self {
            BreakEvent::Broken { position, .. } | BreakEvent::Abandoned { position, .. } => {
                *position
            }
        }
    }
}

pub struct TileBreakingTracker {
    config: BreakingConfig,
    tile_layer: LayerId,
    solid_layer: LayerId,
    records: HashMap<GridCoord, TileBreaking>,
}

impl TileBreakingTracker {
    pub fn new(config: BreakingConfig, tile_layer: LayerId, solid_layer: LayerId) -> Self {
        Self {
            config,
            tile_layer,
            solid_layer,
            records: HashMap::new(),
        }
    }

    pub fn config(&self) -> &BreakingConfig {
        &self.config
    }

    /// Start or continue breaking the tile at `position`.
    ///
    /// The first touch creates the record with full health and makes `actor`
    /// its owner. Later touches only refresh the touched stamp. Empty cells are
    /// never tracked.
    pub fn touch(
        &mut self,
        grid: &Grid,
        actor: ActorId,
        position: GridCoord,
        tick: u64,
    ) -> Result<BreakState, GridError> {
        if let Some(record) = self.records.get_mut(&position) {
            record.last_touched = tick;
            return Ok(BreakState::Breaking);
        }

        let chunk = grid.grid_to_chunk(position);
        if !grid.contains_chunk(chunk) {
            return Err(GridError::ChunkNotLoaded(chunk));
        }
        let value = grid.get_cell_value(position, self.tile_layer)?;
        let raw = value.as_u32().ok_or(GridError::LayerTypeMismatch {
            layer: self.tile_layer,
            requested: ValueKind::UInt32,
            layer_kind: value.kind(),
        })?;
        if TileStateId::from_raw(raw).is_empty() {
            return Ok(BreakState::NotBreaking);
        }

        log::debug!("Actor {} started breaking tile at {position}", actor.0);
        self.records.insert(
            position,
            TileBreaking {
                owner: actor,
                health: self.config.initial_health,
                damage_per_tick: self.config.damage_per_tick,
                last_touched: tick,
            },
        );
        Ok(BreakState::Breaking)
    }

    /// Advance every record by one tick, appending outcomes to `events`.
    ///
    /// Records are visited in row order so the events are deterministic. A
    /// record is removed before its cells are cleared. A failed clear reports
    /// no event; the pass still visits every record and the first error is
    /// returned after it.
    pub fn tick(
        &mut self,
        grid: &mut Grid,
        now: u64,
        events: &mut Vec<BreakEvent>,
    ) -> Result<(), GridError> {
        let mut positions: Vec<GridCoord> = self.records.keys().copied().collect();
        positions.sort_by_key(|p| (p.y, p.x));

        let mut first_error = None;
        for position in positions {
            let Some(record) = self.records.get_mut(&position) else {
                continue;
            };

            if now.saturating_sub(record.last_touched) > self.config.liveness_ticks {
                let owner = record.owner;
                self.records.remove(&position);
                events.push(BreakEvent::Abandoned { position, owner });
                continue;
            }

            record.health -= record.damage_per_tick;
            if record.health > 0 {
                continue;
            }

            let owner = record.owner;
            self.records.remove(&position);
            if let Err(e) = self.clear_cell(grid, position, now) {
                log::warn!("Failed to clear broken tile at {position}: {e}");
                first_error.get_or_insert(e);
                continue;
            }
            log::debug!("Tile at {position} broken by actor {}", owner.0);
            events.push(BreakEvent::Broken { position, owner });
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Checks both layers and the chunk before writing, so a failure leaves
    /// the cell untouched.
    fn clear_cell(&self, grid: &mut Grid, position: GridCoord, now: u64) -> Result<(), GridError> {
        let tile_kind = grid.schema().kind(self.tile_layer)?;
        grid.schema().kind(self.solid_layer)?;
        let chunk = grid.grid_to_chunk(position);
        if !grid.contains_chunk(chunk) {
            return Err(GridError::ChunkNotLoaded(chunk));
        }
        grid.set_cell_value(position, self.tile_layer, CellValue::default_for(tile_kind))?;
        grid.set_cell_value(position, self.solid_layer, CellValue::Bool(false))?;
        grid.mark_cell_modified(position, self.tile_layer, now)?;
        grid.mark_cell_modified(position, self.solid_layer, now)
    }

    pub fn state(&self, position: GridCoord) -> BreakState {
        if self.records.contains_key(&position) {
            BreakState::Breaking
        } else {
            BreakState::NotBreaking
        }
    }

    pub fn get(&self, position: GridCoord) -> Option<&TileBreaking> {
        self.records.get(&position)
    }

    /// Fraction of the initial health already removed, in `[0, 1]`.
    pub fn progress(&self, position: GridCoord) -> Option<f32> {
        let record = self.records.get(&position)?;
        let initial = self.config.initial_health.max(1) as f32;
        Some((1.0 - record.health as f32 / initial).clamp(0.0, 1.0))
    }

    pub fn active_count(&self) -> usize {
        self.records.len()
    }
}
