use crate::types::{ChunkCoord, GridCoord, LocalCoord};
use glam::{IVec2, UVec2};

/// Convert a grid-space cell coordinate to its containing chunk coordinate.
/// Floor division: negative coordinates round toward negative infinity.
pub fn grid_to_chunk(grid: GridCoord, chunk_size: UVec2) -> ChunkCoord {
    let cs = chunk_size.as_ivec2();
    IVec2::new(grid.x.div_euclid(cs.x), grid.y.div_euclid(cs.y))
}

/// Convert a grid-space cell coordinate to its local offset within a chunk.
pub fn grid_to_local(grid: GridCoord, chunk_size: UVec2) -> LocalCoord {
    let cs = chunk_size.as_ivec2();
    UVec2::new(
        grid.x.rem_euclid(cs.x) as u32,
        grid.y.rem_euclid(cs.y) as u32,
    )
}

/// Grid-space coordinate of a chunk's (0, 0) cell.
pub fn chunk_origin(chunk: ChunkCoord, chunk_size: UVec2) -> GridCoord {
    chunk * chunk_size.as_ivec2()
}

/// Convert a chunk coordinate and local offset back to grid-space.
pub fn chunk_local_to_grid(chunk: ChunkCoord, local: LocalCoord, chunk_size: UVec2) -> GridCoord {
    chunk_origin(chunk, chunk_size) + local.as_ivec2()
}

/// Row-major buffer index of a local cell: `y * width + x`.
pub fn local_index(local: LocalCoord, chunk_width: u32) -> usize {
    (local.y * chunk_width + local.x) as usize
}

/// Inverse of `local_index`.
pub fn index_to_local(index: usize, chunk_width: u32) -> LocalCoord {
    let i = index as u32;
    UVec2::new(i % chunk_width, i / chunk_width)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CS: UVec2 = UVec2::new(32, 32);

    #[test]
    fn test_grid_to_chunk_positive() {
        assert_eq!(grid_to_chunk(IVec2::new(0, 0), CS), IVec2::ZERO);
        assert_eq!(grid_to_chunk(IVec2::new(31, 31), CS), IVec2::ZERO);
        assert_eq!(grid_to_chunk(IVec2::new(32, 0), CS), IVec2::new(1, 0));
    }

    #[test]
    fn test_grid_to_chunk_negative() {
        assert_eq!(grid_to_chunk(IVec2::new(-1, 0), CS), IVec2::new(-1, 0));
        assert_eq!(grid_to_chunk(IVec2::new(-32, 0), CS), IVec2::new(-1, 0));
        assert_eq!(grid_to_chunk(IVec2::new(-33, -1), CS), IVec2::new(-2, -1));
    }

    #[test]
    fn test_grid_to_local_negative() {
        assert_eq!(grid_to_local(IVec2::new(-1, 0), CS), UVec2::new(31, 0));
        assert_eq!(grid_to_local(IVec2::new(-32, -33), CS), UVec2::new(0, 31));
    }

    #[test]
    fn test_roundtrip_all_sizes() {
        for size in [
            UVec2::new(1, 1),
            UVec2::new(3, 5),
            UVec2::new(4, 4),
            UVec2::new(16, 8),
            UVec2::new(32, 32),
        ] {
            for x in -70..70 {
                for y in [-65, -17, -1, 0, 1, 31, 64] {
                    let g = IVec2::new(x, y);
                    let chunk = grid_to_chunk(g, size);
                    let local = grid_to_local(g, size);
                    assert!(local.x < size.x && local.y < size.y);
                    assert_eq!(chunk * size.as_ivec2() + local.as_ivec2(), g);
                    assert_eq!(chunk_local_to_grid(chunk, local, size), g);
                }
            }
        }
    }

    #[test]
    fn test_local_index_row_major() {
        assert_eq!(local_index(UVec2::new(0, 0), 4), 0);
        assert_eq!(local_index(UVec2::new(3, 0), 4), 3);
        assert_eq!(local_index(UVec2::new(1, 2), 4), 9);
        for i in 0..16 {
            assert_eq!(local_index(index_to_local(i, 4), 4), i);
        }
    }
}
