//! Deterministic per-cell hash.
//!
//! Pure function of integer grid coordinates: no state, no seed, so texture
//! variant choice is identical on every rebuild and in every call order.

/// Hash a grid cell position into a well-distributed u32 (PCG-style mixing).
pub fn cell_hash(x: i32, y: i32) -> u32 {
    let mut state = (x as u32)
        .wrapping_mul(0x9E3779B9)
        .wrapping_add((y as u32).wrapping_mul(0x517CC1B7));

    state = state ^ (state >> 16);
    state = state.wrapping_mul(0x45D9F3B);
    state = state ^ (state >> 16);
    state = state.wrapping_mul(0x45D9F3B);
    state = state ^ (state >> 16);

    state
}

/// Pick one of `count` texture variants for the cell at (x, y).
/// Returns 0 when `count` is 0 so callers never divide by zero.
pub fn pick_variant(x: i32, y: i32, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    cell_hash(x, y) as usize % count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let inputs = [(0, 0), (-1, -1), (i32::MAX, i32::MIN), (100, 200)];
        for &(x, y) in &inputs {
            assert_eq!(cell_hash(x, y), cell_hash(x, y), "({x},{y})");
        }
    }

    #[test]
    fn test_call_order_independent() {
        let forward: Vec<u32> = (0..64).map(|i| cell_hash(i, -i)).collect();
        let backward: Vec<u32> = (0..64).rev().map(|i| cell_hash(i, -i)).collect();
        let reversed: Vec<u32> = backward.into_iter().rev().collect();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_symmetry_broken() {
        assert_ne!(cell_hash(1, 2), cell_hash(2, 1));
        assert_ne!(cell_hash(0, 1), cell_hash(1, 0));
    }

    #[test]
    fn test_variant_distribution() {
        let mut counts = [0u32; 4];
        for x in -50..50 {
            for y in -50..50 {
                counts[pick_variant(x, y, 4)] += 1;
            }
        }
        // 10_000 samples over 4 buckets; expect each near 2500.
        for (i, &c) in counts.iter().enumerate() {
            assert!(c > 2000 && c < 3000, "variant {i} picked {c} times");
        }
    }

    #[test]
    fn test_variant_in_range() {
        for x in 0..200 {
            assert!(pick_variant(x, 7, 3) < 3);
            assert_eq!(pick_variant(x, 7, 1), 0);
            assert_eq!(pick_variant(x, 7, 0), 0);
        }
    }
}
