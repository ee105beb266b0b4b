use loam_core::config::EngineConfig;
use loam_core::constants::{LAYER_FOREGROUND, LAYER_SOLID};
use loam_core::error::GridError;
use loam_core::types::{ActorId, CellValue, ChunkCoord, GridCoord, LayerId, TileStateId, ValueKind};
use loam_physics::ColliderCache;
use loam_render::{load_tiles_from_str, validate_tiles, MeshCache, TileMeshBuilder, TileRenderTable};
use loam_world::{BreakEvent, BreakState, Chunk, FrameContext, Grid, LayerSchema, TileBreakingTracker};

use crate::error::EngineError;

/// Owns the grid and everything derived from it.
pub struct World {
    config: EngineConfig,
    grid: Grid,
    tiles: TileRenderTable,
    tile_layer: LayerId,
    solid_layer: LayerId,
    breaking: TileBreakingTracker,
    meshes: MeshCache,
    colliders: ColliderCache,
    /// Break events produced by this frame's breaking tick.
    break_events: Vec<BreakEvent>,
}

impl World {
    /// World over the standard schema, meshing the foreground layer.
    pub fn new(config: EngineConfig, tiles: TileRenderTable) -> Result<Self, EngineError> {
        Self::with_schema(config, tiles, LayerSchema::standard(), LAYER_FOREGROUND, LAYER_SOLID)
    }

    /// World over a custom schema. `tile_layer` must hold integers and
    /// `solid_layer` booleans.
    pub fn with_schema(
        config: EngineConfig,
        tiles: TileRenderTable,
        schema: LayerSchema,
        tile_layer: &str,
        solid_layer: &str,
    ) -> Result<Self, EngineError> {
        let tile_id = schema
            .find(tile_layer)
            .ok_or_else(|| EngineError::MissingLayer(tile_layer.to_string()))?;
        let solid_id = schema
            .find(solid_layer)
            .ok_or_else(|| EngineError::MissingLayer(solid_layer.to_string()))?;

        let tile_kind = schema.kind(tile_id)?;
        if matches!(tile_kind, ValueKind::Bool | ValueKind::Float) {
            return Err(GridError::LayerTypeMismatch {
                layer: tile_id,
                requested: ValueKind::UInt32,
                layer_kind: tile_kind,
            }
            .into());
        }
        let solid_kind = schema.kind(solid_id)?;
        if solid_kind != ValueKind::Bool {
            return Err(GridError::LayerTypeMismatch {
                layer: solid_id,
                requested: ValueKind::Bool,
                layer_kind: solid_kind,
            }
            .into());
        }

        let grid = Grid::from_config(schema, &config)?;
        log::info!(
            "World created: {}x{} chunks, {} tile types",
            config.chunk_width,
            config.chunk_height,
            tiles.len()
        );
        Ok(Self {
            breaking: TileBreakingTracker::new(config.breaking, tile_id, solid_id),
            meshes: MeshCache::new(tile_id),
            colliders: ColliderCache::new(solid_id),
            config,
            grid,
            tiles,
            tile_layer: tile_id,
            solid_layer: solid_id,
            break_events: Vec::new(),
        })
    }

    /// Parse and validate both data files, then build a standard world.
    pub fn from_ron(engine_ron: &str, tiles_ron: &str) -> Result<Self, EngineError> {
        let config = EngineConfig::from_ron_str(engine_ron)?;
        let tiles = load_tiles_from_str(tiles_ron)?;
        if let Err(errors) = validate_tiles(&tiles) {
            for e in &errors {
                log::error!("Tile validation error: {e}");
            }
            return Err(EngineError::TileValidation(errors));
        }
        Self::new(config, tiles)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Direct grid access for world generation. Writers mark what they touch.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn tiles(&self) -> &TileRenderTable {
        &self.tiles
    }

    pub fn tile_layer(&self) -> LayerId {
        self.tile_layer
    }

    pub fn solid_layer(&self) -> LayerId {
        self.solid_layer
    }

    pub fn breaking(&self) -> &TileBreakingTracker {
        &self.breaking
    }

    pub fn meshes(&self) -> &MeshCache {
        &self.meshes
    }

    pub fn colliders(&self) -> &ColliderCache {
        &self.colliders
    }

    pub fn break_events(&self) -> &[BreakEvent] {
        &self.break_events
    }

    pub fn create_chunk(&mut self, coord: ChunkCoord) -> Result<&mut Chunk, GridError> {
        self.grid.create_chunk(coord)
    }

    pub fn tile_at(&self, position: GridCoord) -> Result<TileStateId, GridError> {
        let value = self.grid.get_cell_value(position, self.tile_layer)?;
        value
            .as_u32()
            .map(TileStateId::from_raw)
            .ok_or(GridError::LayerTypeMismatch {
                layer: self.tile_layer,
                requested: ValueKind::UInt32,
                layer_kind: value.kind(),
            })
    }

    /// Write a tile and its solid flag, marking both layers modified at `tick`.
    pub fn set_tile(
        &mut self,
        position: GridCoord,
        tile: TileStateId,
        solid: bool,
        tick: u64,
    ) -> Result<(), GridError> {
        let kind = self.grid.schema().kind(self.tile_layer)?;
        let value = tile_value(kind, tile.raw()).ok_or(GridError::LayerTypeMismatch {
            layer: self.tile_layer,
            requested: ValueKind::UInt32,
            layer_kind: kind,
        })?;
        self.grid.set_cell_value(position, self.tile_layer, value)?;
        self.grid.set_cell(position, self.solid_layer, solid)?;
        self.grid.mark_cell_modified(position, self.tile_layer, tick)?;
        self.grid.mark_cell_modified(position, self.solid_layer, tick)
    }

    /// Start or keep breaking the tile at `position`.
    pub fn touch(
        &mut self,
        actor: ActorId,
        position: GridCoord,
        tick: u64,
    ) -> Result<BreakState, GridError> {
        self.breaking.touch(&self.grid, actor, position, tick)
    }

    pub(crate) fn tick_breaking(&mut self, now: u64) -> Result<(), GridError> {
        self.break_events.clear();
        self.breaking
            .tick(&mut self.grid, now, &mut self.break_events)
    }

    pub(crate) fn refresh_colliders(&mut self) -> Result<Vec<ChunkCoord>, GridError> {
        self.colliders.refresh(&self.grid)
    }

    pub(crate) fn refresh_meshes(&mut self, ctx: &FrameContext) -> Result<Vec<ChunkCoord>, GridError> {
        let builder = TileMeshBuilder::new(&self.tiles, self.config.mesh);
        self.meshes
            .refresh(&self.grid, &builder, ctx.viewport.as_ref(), ctx.tick)
    }

    pub(crate) fn end_frame(&mut self) {
        self.grid.end_frame();
    }
}

/// Narrow a packed tile state to the tile layer's integer kind.
fn tile_value(kind: ValueKind, raw: u32) -> Option<CellValue> {
    match kind {
        ValueKind::UInt32 => Some(CellValue::UInt32(raw)),
        ValueKind::UInt16 => u16::try_from(raw).ok().map(CellValue::UInt16),
        ValueKind::Byte => u8::try_from(raw).ok().map(CellValue::Byte),
        ValueKind::Bool | ValueKind::Float => None,
    }
}
