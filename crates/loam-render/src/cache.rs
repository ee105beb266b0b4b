use std::collections::{HashMap, HashSet};

use loam_core::error::GridError;
use loam_core::types::{ChunkCoord, LayerId};
use loam_world::{Grid, Viewport};

use crate::mesh::{ChunkMesh, TileMeshBuilder};

/// Per-chunk meshes of one tile layer, rebuilt only when stale.
pub struct MeshCache {
    layer: LayerId,
    entries: HashMap<ChunkCoord, ChunkMesh>,
    /// Culled chunks that saw a neighbor created and still need a rebuild.
    pending: HashSet<ChunkCoord>,
}

impl MeshCache {
    pub fn new(layer: LayerId) -> Self {
        Self {
            layer,
            entries: HashMap::new(),
            pending: HashSet::new(),
        }
    }

    pub fn layer(&self) -> LayerId {
        self.layer
    }

    /// A mesh is stale when missing, when the chunk or one of its neighbors
    /// was modified after it was built, or when a neighbor was created since
    /// the last build.
    pub fn is_stale(&self, grid: &Grid, coord: ChunkCoord) -> bool {
        let Some(entry) = self.entries.get(&coord) else {
            return true;
        };
        grid.last_modified_around(coord) > entry.built_at
            || self.pending.contains(&coord)
            || created_near(grid, coord)
    }

    /// Rebuild every stale chunk, skipping chunks outside `viewport` when one
    /// is given. Returns the rebuilt coordinates in row order.
    pub fn refresh(
        &mut self,
        grid: &Grid,
        builder: &TileMeshBuilder<'_>,
        viewport: Option<&Viewport>,
        tick: u64,
    ) -> Result<Vec<ChunkCoord>, GridError> {
        let mut rebuilt = Vec::new();
        for coord in grid.chunk_coords() {
            if let Some(view) = viewport {
                let min = grid.chunk_origin(coord).as_vec2();
                let max = min + grid.chunk_size().as_vec2();
                if !view.overlaps(min, max) {
                    // Creation is only visible until end_frame; remember it.
                    if created_near(grid, coord) {
                        self.pending.insert(coord);
                    }
                    continue;
                }
            }
            if !self.is_stale(grid, coord) {
                continue;
            }
            let mut mesh = builder.build(grid, self.layer, coord)?;
            mesh.built_at = tick;
            self.entries.insert(coord, mesh);
            self.pending.remove(&coord);
            rebuilt.push(coord);
        }
        if !rebuilt.is_empty() {
            log::debug!("Rebuilt {} chunk meshes at tick {tick}", rebuilt.len());
        }
        Ok(rebuilt)
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<&ChunkMesh> {
        self.entries.get(&coord)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChunkCoord, &ChunkMesh)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// True if `coord` or one of its eight neighbors was created this frame.
fn created_near(grid: &Grid, coord: ChunkCoord) -> bool {
    let neighbors = Grid::neighbor_coords(coord);
    grid.recently_created()
        .iter()
        .any(|c| *c == coord || neighbors.contains(c))
}
