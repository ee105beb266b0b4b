use std::collections::HashMap;

use glam::UVec2;
use loam_core::config::EngineConfig;
use loam_core::direction::NEIGHBOR_OFFSETS;
use loam_core::error::GridError;
use loam_core::math;
use loam_core::types::{CellValue, ChunkCoord, GridCoord, LayerId, LocalCoord};

use crate::buffer::{CellScalar, LayerBuffer};
use crate::chunk::Chunk;
use crate::schema::LayerSchema;

/// Sparse map of chunk coordinate to chunk, sharing one frozen schema.
pub struct Grid {
    schema: LayerSchema,
    chunk_size: UVec2,
    chunks: HashMap<ChunkCoord, Chunk>,
    /// Chunks created since the last `end_frame`, in creation order.
    recently_created: Vec<ChunkCoord>,
}

impl Grid {
    /// Create an empty grid. The schema is frozen from here on.
    pub fn new(schema: LayerSchema, chunk_width: u32, chunk_height: u32) -> Result<Self, GridError> {
        if chunk_width == 0 || chunk_height == 0 {
            return Err(GridError::InvalidChunkSize {
                width: chunk_width,
                height: chunk_height,
            });
        }
        Ok(Self {
            schema,
            chunk_size: UVec2::new(chunk_width, chunk_height),
            chunks: HashMap::new(),
            recently_created: Vec::new(),
        })
    }

    pub fn from_config(schema: LayerSchema, config: &EngineConfig) -> Result<Self, GridError> {
        Self::new(schema, config.chunk_width, config.chunk_height)
    }

    pub fn schema(&self) -> &LayerSchema {
        &self.schema
    }

    pub fn chunk_size(&self) -> UVec2 {
        self.chunk_size
    }

    pub fn chunk_width(&self) -> u32 {
        self.chunk_size.x
    }

    pub fn chunk_height(&self) -> u32 {
        self.chunk_size.y
    }

    pub fn grid_to_chunk(&self, grid: GridCoord) -> ChunkCoord {
        math::grid_to_chunk(grid, self.chunk_size)
    }

    pub fn grid_to_local(&self, grid: GridCoord) -> LocalCoord {
        math::grid_to_local(grid, self.chunk_size)
    }

    pub fn chunk_origin(&self, chunk: ChunkCoord) -> GridCoord {
        math::chunk_origin(chunk, self.chunk_size)
    }

    /// Allocate a chunk at `coord`. Fails if one already exists.
    pub fn create_chunk(&mut self, coord: ChunkCoord) -> Result<&mut Chunk, GridError> {
        if self.chunks.contains_key(&coord) {
            return Err(GridError::ChunkAlreadyExists(coord));
        }
        log::debug!("Creating chunk {coord}");
        self.recently_created.push(coord);
        let chunk = Chunk::new(coord, &self.schema, self.chunk_size);
        Ok(self.chunks.entry(coord).or_insert(chunk))
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    pub fn contains_chunk(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Iterator over all chunks (unordered).
    pub fn chunks(&self) -> impl Iterator<Item = (&ChunkCoord, &Chunk)> {
        self.chunks.iter()
    }

    /// All chunk coordinates sorted row by row, for deterministic walks.
    pub fn chunk_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        coords.sort_by_key(|c| (c.y, c.x));
        coords
    }

    /// Chunks created since the last `end_frame`.
    pub fn recently_created(&self) -> &[ChunkCoord] {
        &self.recently_created
    }

    /// Forget this frame's creations.
    pub fn end_frame(&mut self) {
        self.recently_created.clear();
    }

    /// The 8 chunk coordinates around `coord`.
    pub fn neighbor_coords(coord: ChunkCoord) -> [ChunkCoord; 8] {
        NEIGHBOR_OFFSETS.map(|offset| coord + offset)
    }

    /// Latest modification stamp of a chunk and its loaded neighbors.
    pub fn last_modified_around(&self, coord: ChunkCoord) -> u64 {
        let own = self.chunk(coord).map_or(0, Chunk::last_modified);
        Self::neighbor_coords(coord)
            .iter()
            .filter_map(|c| self.chunk(*c))
            .map(Chunk::last_modified)
            .fold(own, u64::max)
    }

    pub fn buffer(&self, chunk: ChunkCoord, layer: LayerId) -> Result<&LayerBuffer, GridError> {
        self.schema.get(layer)?;
        self.chunk(chunk)
            .ok_or(GridError::ChunkNotLoaded(chunk))?
            .buffer(layer)
    }

    pub fn buffer_mut(
        &mut self,
        chunk: ChunkCoord,
        layer: LayerId,
    ) -> Result<&mut LayerBuffer, GridError> {
        self.schema.get(layer)?;
        self.chunks
            .get_mut(&chunk)
            .ok_or(GridError::ChunkNotLoaded(chunk))?
            .buffer_mut(layer)
    }

    /// Read a cell. Cells of unloaded chunks read as the layer's default
    /// (0 / false) so border sampling never fails near unloaded regions.
    pub fn get_cell_value(&self, grid: GridCoord, layer: LayerId) -> Result<CellValue, GridError> {
        let kind = self.schema.kind(layer)?;
        match self.chunk(self.grid_to_chunk(grid)) {
            Some(chunk) => chunk.get_value(layer, self.grid_to_local(grid)),
            None => Ok(CellValue::default_for(kind)),
        }
    }

    /// Write a cell. The chunk must exist.
    pub fn set_cell_value(
        &mut self,
        grid: GridCoord,
        layer: LayerId,
        value: CellValue,
    ) -> Result<(), GridError> {
        self.schema.get(layer)?;
        let coord = self.grid_to_chunk(grid);
        let local = self.grid_to_local(grid);
        self.chunks
            .get_mut(&coord)
            .ok_or(GridError::ChunkNotLoaded(coord))?
            .set_value(layer, local, value)
    }

    /// Typed variant of `get_cell_value`.
    pub fn get_cell<T: CellScalar>(&self, grid: GridCoord, layer: LayerId) -> Result<T, GridError> {
        let value = self.get_cell_value(grid, layer)?;
        T::from_value(value).ok_or(GridError::LayerTypeMismatch {
            layer,
            requested: T::KIND,
            layer_kind: value.kind(),
        })
    }

    /// Typed variant of `set_cell_value`.
    pub fn set_cell<T: CellScalar>(
        &mut self,
        grid: GridCoord,
        layer: LayerId,
        value: T,
    ) -> Result<(), GridError> {
        self.set_cell_value(grid, layer, value.into_value())
    }

    /// Mark the layer of the chunk containing `grid` as modified at `tick`.
    pub fn mark_cell_modified(
        &mut self,
        grid: GridCoord,
        layer: LayerId,
        tick: u64,
    ) -> Result<(), GridError> {
        let coord = self.grid_to_chunk(grid);
        self.buffer_mut(coord, layer)?.mark_modified(tick);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use loam_core::types::ValueKind;

    fn test_grid() -> (Grid, LayerId, LayerId) {
        let (schema, solid) = LayerSchema::new()
            .with_layer("solid", ValueKind::Bool)
            .expect("new");
        let (schema, tile) = schema.with_layer("tile", ValueKind::UInt16).expect("new");
        (Grid::new(schema, 4, 4).expect("valid size"), solid, tile)
    }

    #[test]
    fn test_create_chunk_and_duplicate() {
        let (mut grid, _, _) = test_grid();
        let coord = IVec2::new(-1, 2);
        grid.create_chunk(coord).expect("first create");
        assert!(grid.contains_chunk(coord));
        assert_eq!(grid.chunk_count(), 1);
        assert!(matches!(
            grid.create_chunk(coord),
            Err(GridError::ChunkAlreadyExists(c)) if c == coord
        ));
        assert_eq!(grid.chunk_count(), 1);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert!(matches!(
            Grid::new(LayerSchema::standard(), 0, 4),
            Err(GridError::InvalidChunkSize { width: 0, height: 4 })
        ));
    }

    #[test]
    fn test_recently_created_cleared_at_end_of_frame() {
        let (mut grid, _, _) = test_grid();
        grid.create_chunk(IVec2::new(0, 0)).expect("create");
        grid.create_chunk(IVec2::new(1, 0)).expect("create");
        assert_eq!(
            grid.recently_created(),
            &[IVec2::new(0, 0), IVec2::new(1, 0)]
        );
        grid.end_frame();
        assert!(grid.recently_created().is_empty());
        assert_eq!(grid.chunk_count(), 2);
    }

    #[test]
    fn test_cross_chunk_cell_access() {
        let (mut grid, solid, tile) = test_grid();
        grid.create_chunk(IVec2::new(-1, -1)).expect("create");

        let g = IVec2::new(-1, -3);
        grid.set_cell::<u16>(g, tile, 77).expect("write");
        grid.set_cell(g, solid, true).expect("write");
        assert_eq!(grid.get_cell::<u16>(g, tile), Ok(77));
        assert_eq!(grid.get_cell::<bool>(g, solid), Ok(true));

        // Local (3, 1) in chunk (-1, -1) -> index 1 * 4 + 3.
        let chunk = grid.chunk(IVec2::new(-1, -1)).expect("chunk");
        assert_eq!(chunk.typed::<u16>(tile).expect("tile").as_slice()[7], 77);
    }

    #[test]
    fn test_unloaded_reads_default_writes_fail() {
        let (mut grid, solid, tile) = test_grid();
        let g = IVec2::new(100, 100);
        assert_eq!(grid.get_cell_value(g, tile), Ok(CellValue::UInt16(0)));
        assert_eq!(grid.get_cell_value(g, solid), Ok(CellValue::Bool(false)));
        assert_eq!(
            grid.set_cell_value(g, tile, CellValue::UInt16(1)),
            Err(GridError::ChunkNotLoaded(IVec2::new(25, 25)))
        );
    }

    #[test]
    fn test_unknown_layer_is_an_error_even_when_unloaded() {
        let (mut grid, _, _) = test_grid();
        let bogus = LayerId(9);
        assert_eq!(
            grid.get_cell_value(IVec2::ZERO, bogus),
            Err(GridError::UnknownLayer(bogus))
        );
        grid.create_chunk(IVec2::ZERO).expect("create");
        assert!(matches!(
            grid.buffer(IVec2::ZERO, bogus),
            Err(GridError::UnknownLayer(_))
        ));
    }

    #[test]
    fn test_writes_do_not_mark_modified() {
        let (mut grid, _, tile) = test_grid();
        grid.create_chunk(IVec2::ZERO).expect("create");
        grid.set_cell::<u16>(IVec2::new(1, 1), tile, 3).expect("write");
        assert_eq!(grid.chunk(IVec2::ZERO).expect("chunk").last_modified(), 0);

        grid.mark_cell_modified(IVec2::new(1, 1), tile, 4).expect("mark");
        assert_eq!(grid.chunk(IVec2::ZERO).expect("chunk").last_modified(), 4);
    }

    #[test]
    fn test_last_modified_around_includes_neighbors() {
        let (mut grid, _, tile) = test_grid();
        grid.create_chunk(IVec2::ZERO).expect("create");
        grid.create_chunk(IVec2::new(1, 1)).expect("create");
        grid.create_chunk(IVec2::new(3, 0)).expect("create");
        grid.mark_cell_modified(IVec2::new(5, 5), tile, 8).expect("mark");
        grid.mark_cell_modified(IVec2::new(12, 0), tile, 20).expect("mark");

        assert_eq!(grid.last_modified_around(IVec2::ZERO), 8);
        assert_eq!(grid.last_modified_around(IVec2::new(-5, -5)), 0);
    }

    #[test]
    fn test_chunk_coords_sorted() {
        let (mut grid, _, _) = test_grid();
        for c in [IVec2::new(1, 1), IVec2::new(0, 1), IVec2::new(5, -2)] {
            grid.create_chunk(c).expect("create");
        }
        assert_eq!(
            grid.chunk_coords(),
            vec![IVec2::new(5, -2), IVec2::new(0, 1), IVec2::new(1, 1)]
        );
        assert_eq!(Grid::neighbor_coords(IVec2::ZERO).len(), 8);
    }
}
