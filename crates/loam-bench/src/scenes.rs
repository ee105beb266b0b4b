use glam::IVec2;
use loam_core::error::GridError;
use loam_core::hash::cell_hash;
use loam_core::types::TileStateId;
use loam_engine::World;

/// Configuration for a single benchmark scene.
pub struct SceneConfig {
    pub name: &'static str,
    /// Loaded chunks along x and y, starting at chunk (0, 0).
    pub chunks_x: i32,
    pub chunks_y: i32,
    /// Tiles cleared per tick, forcing collider and mesh rebuilds.
    pub digs_per_tick: u32,
}

impl SceneConfig {
    /// Scene size in cells.
    pub fn extent(&self, chunk_size: IVec2) -> IVec2 {
        IVec2::new(self.chunks_x, self.chunks_y) * chunk_size
    }
}

/// Return the standard suite of benchmark scenes (16 to 1024 chunks).
pub fn standard_scenes() -> Vec<SceneConfig> {
    vec![
        SceneConfig {
            name: "4x4",
            chunks_x: 4,
            chunks_y: 4,
            digs_per_tick: 1,
        },
        SceneConfig {
            name: "8x8",
            chunks_x: 8,
            chunks_y: 8,
            digs_per_tick: 4,
        },
        SceneConfig {
            name: "16x16",
            chunks_x: 16,
            chunks_y: 16,
            digs_per_tick: 8,
        },
        SceneConfig {
            name: "32x32",
            chunks_x: 32,
            chunks_y: 32,
            digs_per_tick: 16,
        },
    ]
}

/// Deterministic terrain: air above a hashed surface line, then a mix of
/// grass, dirt, sand and stone getting rockier with depth.
pub fn terrain_tile(x: i32, y: i32, height: i32) -> (TileStateId, bool) {
    let surface = height * 3 / 4 + (cell_hash(x / 8, 0) % 5) as i32;
    if y >= surface {
        return (TileStateId::EMPTY, false);
    }
    let depth = surface - y;
    let roll = cell_hash(x, y) % 100;
    let tile_type = match (depth, roll) {
        (1, _) => 3,          // Grass
        (2..=6, 0..=14) => 4, // Sand
        (2..=6, _) => 1,      // Dirt
        (_, 0..=59) => 2,     // Stone
        _ => 1,
    };
    let meta = cell_hash(y, x) % 4;
    match TileStateId::new(tile_type, meta) {
        Ok(id) => (id, true),
        Err(_) => (TileStateId::EMPTY, false),
    }
}

/// Create every scene chunk and fill it with terrain. Returns the number of
/// non-empty tiles placed.
pub fn populate(world: &mut World, config: &SceneConfig) -> Result<u64, GridError> {
    let width = world.grid().chunk_width() as i32;
    let height = world.grid().chunk_height() as i32;
    let world_height = config.chunks_y * height;

    let mut placed = 0u64;
    for cy in 0..config.chunks_y {
        for cx in 0..config.chunks_x {
            world.create_chunk(IVec2::new(cx, cy))?;
            for ly in 0..height {
                for lx in 0..width {
                    let position = IVec2::new(cx * width + lx, cy * height + ly);
                    let (tile, solid) = terrain_tile(position.x, position.y, world_height);
                    if tile.is_empty() {
                        continue;
                    }
                    world.set_tile(position, tile, solid, 0)?;
                    placed += 1;
                }
            }
        }
    }
    Ok(placed)
}

/// Grid position of the `index`-th dig on `tick`, inside `extent` cells.
pub fn dig_position(extent: IVec2, tick: u64, index: u32) -> IVec2 {
    let h = cell_hash(tick as i32, index as i32);
    IVec2::new(
        (h % extent.x.max(1) as u32) as i32,
        ((h >> 16) % extent.y.max(1) as u32) as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terrain_is_deterministic() {
        for (x, y) in [(0, 0), (17, 40), (300, 2)] {
            assert_eq!(terrain_tile(x, y, 128), terrain_tile(x, y, 128));
        }
    }

    #[test]
    fn test_terrain_has_sky_and_ground() {
        let (top, solid) = terrain_tile(5, 127, 128);
        assert!(top.is_empty());
        assert!(!solid);
        let (bottom, solid) = terrain_tile(5, 0, 128);
        assert!(!bottom.is_empty());
        assert!(solid);
    }

    #[test]
    fn test_dig_positions_stay_in_scene() {
        let config = &standard_scenes()[0];
        let extent = config.extent(IVec2::splat(32));
        assert_eq!(extent, IVec2::splat(128));
        for tick in 0..50 {
            let p = dig_position(extent, tick, 0);
            assert!(p.x >= 0 && p.x < 128 && p.y >= 0 && p.y < 128, "{p}");
        }
    }
}
