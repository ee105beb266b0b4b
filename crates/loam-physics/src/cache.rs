use std::collections::HashMap;

use loam_core::error::GridError;
use loam_core::types::{ChunkCoord, GridCoord, LayerId};
use loam_world::Grid;

use crate::collider::{generate_chunk_rects, ColliderRect};

#[derive(Debug, Clone, PartialEq)]
struct ColliderEntry {
    /// Solid layer stamp the rects were built from.
    stamp: u64,
    rects: Vec<ColliderRect>,
}

/// Per-chunk collider rectangles, rebuilt when the solid layer's stamp moves.
pub struct ColliderCache {
    solid_layer: LayerId,
    entries: HashMap<ChunkCoord, ColliderEntry>,
}

impl ColliderCache {
    pub fn new(solid_layer: LayerId) -> Self {
        Self {
            solid_layer,
            entries: HashMap::new(),
        }
    }

    pub fn solid_layer(&self) -> LayerId {
        self.solid_layer
    }

    /// Regenerate every chunk whose solid layer changed since its last build.
    /// Old shapes are replaced wholesale; the replaced chunks are returned in
    /// row order so the physics side can swap its bodies.
    pub fn refresh(&mut self, grid: &Grid) -> Result<Vec<ChunkCoord>, GridError> {
        let mut replaced = Vec::new();
        for coord in grid.chunk_coords() {
            let chunk = grid.chunk(coord).ok_or(GridError::ChunkNotLoaded(coord))?;
            let stamp = chunk.layer_last_modified(self.solid_layer)?;
            let fresh = self
                .entries
                .get(&coord)
                .is_some_and(|entry| entry.stamp >= stamp);
            if fresh {
                continue;
            }
            let rects = generate_chunk_rects(chunk, self.solid_layer)?;
            log::debug!("Chunk {coord}: {} collider rects", rects.len());
            self.entries.insert(coord, ColliderEntry { stamp, rects });
            replaced.push(coord);
        }
        Ok(replaced)
    }

    /// Chunk-local rectangles of a chunk, if built.
    pub fn rects(&self, coord: ChunkCoord) -> Option<&[ColliderRect]> {
        self.entries.get(&coord).map(|e| e.rects.as_slice())
    }

    /// Rectangles of a chunk as grid-space `(min, max)` pairs.
    pub fn grid_rects(&self, grid: &Grid, coord: ChunkCoord) -> Vec<(GridCoord, GridCoord)> {
        let origin = grid.chunk_origin(coord);
        self.rects(coord)
            .unwrap_or_default()
            .iter()
            .map(|r| (r.grid_min(origin), r.grid_max(origin)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_rects(&self) -> usize {
        self.entries.values().map(|e| e.rects.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use loam_core::types::ValueKind;
    use loam_world::LayerSchema;

    fn setup() -> (Grid, LayerId) {
        let (schema, solid) = LayerSchema::new()
            .with_layer("solid", ValueKind::Bool)
            .expect("new");
        let mut grid = Grid::new(schema, 4, 4).expect("valid size");
        grid.create_chunk(IVec2::new(0, 0)).expect("create");
        grid.create_chunk(IVec2::new(-1, 0))
            .expect("create")
            .typed_mut::<bool>(solid)
            .expect("bool layer")
            .fill(true);
        (grid, solid)
    }

    #[test]
    fn test_first_refresh_builds_everything() {
        let (grid, solid) = setup();
        let mut cache = ColliderCache::new(solid);
        let replaced = cache.refresh(&grid).expect("refresh");
        assert_eq!(replaced, vec![IVec2::new(-1, 0), IVec2::new(0, 0)]);
        assert_eq!(cache.rects(IVec2::new(0, 0)), Some(&[][..]));
        assert_eq!(cache.rects(IVec2::new(-1, 0)).map(<[_]>::len), Some(1));
        assert_eq!(
            cache.grid_rects(&grid, IVec2::new(-1, 0)),
            vec![(IVec2::new(-4, 0), IVec2::new(0, 4))]
        );
        assert!(cache.refresh(&grid).expect("refresh").is_empty());
    }

    #[test]
    fn test_only_marked_chunks_rebuild() {
        let (mut grid, solid) = setup();
        let mut cache = ColliderCache::new(solid);
        cache.refresh(&grid).expect("refresh");

        grid.set_cell(IVec2::new(1, 1), solid, true).expect("write");
        assert!(cache.refresh(&grid).expect("refresh").is_empty());

        grid.mark_cell_modified(IVec2::new(1, 1), solid, 3).expect("mark");
        let replaced = cache.refresh(&grid).expect("refresh");
        assert_eq!(replaced, vec![IVec2::new(0, 0)]);
        assert_eq!(cache.total_rects(), 2);
        assert!(cache.refresh(&grid).expect("refresh").is_empty());
    }

    #[test]
    fn test_unrelated_layer_does_not_rebuild() {
        let (schema, solid) = LayerSchema::new()
            .with_layer("solid", ValueKind::Bool)
            .expect("new");
        let (schema, tile) = schema.with_layer("tile", ValueKind::UInt16).expect("new");
        let mut grid = Grid::new(schema, 4, 4).expect("valid size");
        grid.create_chunk(IVec2::ZERO).expect("create");
        let mut cache = ColliderCache::new(solid);
        cache.refresh(&grid).expect("refresh");

        grid.mark_cell_modified(IVec2::ZERO, tile, 5).expect("mark");
        assert!(cache.refresh(&grid).expect("refresh").is_empty());
    }
}
