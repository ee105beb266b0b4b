use std::collections::HashMap;

use glam::Vec2;
use loam_core::constants::EMPTY_TILE_TYPE;
use serde::{Deserialize, Serialize};

/// Rectangle in atlas UV space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UvRect {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl UvRect {
    /// The whole texture. Used when a drawn type has no variants.
    pub const FULL: UvRect = UvRect {
        min: [0.0, 0.0],
        max: [1.0, 1.0],
    };

    pub fn new(min: [f32; 2], max: [f32; 2]) -> Self {
        Self { min, max }
    }

    /// Map a position inside a unit cell to atlas UV.
    pub fn sample(&self, t: Vec2) -> [f32; 2] {
        [
            self.min[0] + (self.max[0] - self.min[0]) * t.x,
            self.min[1] + (self.max[1] - self.min[1]) * t.y,
        ]
    }

    pub fn is_inverted(&self) -> bool {
        self.max[0] < self.min[0] || self.max[1] < self.min[1]
    }
}

/// How one tile type takes part in batched adjacency rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRenderData {
    /// Tile type id (upper 24 bits of a tile state id).
    pub id: u32,
    pub name: String,
    /// False for air and for tiles rendered by something else.
    #[serde(default)]
    pub draw: bool,
    /// Higher priority wins shared borders and sits nearer the camera.
    #[serde(default)]
    pub z_priority: i32,
    #[serde(default)]
    pub variants: Vec<UvRect>,
}

/// Render data for a tile type as the mesh builder sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileLook<'a> {
    pub draw: bool,
    pub priority: i32,
    pub variants: &'a [UvRect],
}

const HIDDEN: TileLook<'static> = TileLook {
    draw: false,
    priority: 0,
    variants: &[],
};

impl TileLook<'_> {
    /// UV rectangle of the variant picked for a cell.
    pub fn variant(&self, index: usize) -> UvRect {
        self.variants.get(index).copied().unwrap_or(UvRect::FULL)
    }
}

/// Complete collection of tile render data, indexed by tile type id.
#[derive(Debug, Clone, Default)]
pub struct TileRenderTable {
    pub tiles: Vec<TileRenderData>,
    index: HashMap<u32, usize>,
}

impl TileRenderTable {
    /// Build the lookup index. The first entry wins for duplicate ids; the
    /// validator reports them.
    pub fn new(tiles: Vec<TileRenderData>) -> Self {
        let mut index = HashMap::with_capacity(tiles.len());
        for (i, tile) in tiles.iter().enumerate() {
            index.entry(tile.id).or_insert(i);
        }
        Self { tiles, index }
    }

    pub fn get(&self, tile_type: u32) -> Option<&TileRenderData> {
        self.index.get(&tile_type).map(|&i| &self.tiles[i])
    }

    pub fn contains(&self, tile_type: u32) -> bool {
        self.index.contains_key(&tile_type)
    }

    /// Look up a type. Unknown types are not drawn and have priority 0.
    pub fn look(&self, tile_type: u32) -> TileLook<'_> {
        match self.get(tile_type) {
            Some(tile) => TileLook {
                draw: tile.draw,
                priority: tile.z_priority,
                variants: &tile.variants,
            },
            None => HIDDEN,
        }
    }

    /// True for types the table does not know, other than the empty tile.
    pub fn is_unknown(&self, tile_type: u32) -> bool {
        tile_type != EMPTY_TILE_TYPE && !self.contains(tile_type)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(id: u32, draw: bool, z_priority: i32) -> TileRenderData {
        TileRenderData {
            id,
            name: format!("tile{id}"),
            draw,
            z_priority,
            variants: vec![UvRect::new([0.0, 0.0], [0.5, 0.5])],
        }
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        let table = TileRenderTable::new(vec![tile(1, true, 5), tile(2, false, 9)]);
        let look = table.look(1);
        assert!(look.draw);
        assert_eq!(look.priority, 5);
        assert_eq!(look.variants.len(), 1);

        let missing = table.look(77);
        assert!(!missing.draw);
        assert_eq!(missing.priority, 0);
        assert!(table.is_unknown(77));
        assert!(!table.is_unknown(EMPTY_TILE_TYPE));
    }

    #[test]
    fn test_first_duplicate_wins() {
        let table = TileRenderTable::new(vec![tile(3, true, 1), tile(3, true, 8)]);
        assert_eq!(table.look(3).priority, 1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_uv_sample() {
        let rect = UvRect::new([0.25, 0.5], [0.5, 1.0]);
        assert_eq!(rect.sample(Vec2::ZERO), [0.25, 0.5]);
        assert_eq!(rect.sample(Vec2::ONE), [0.5, 1.0]);
        assert_eq!(rect.sample(Vec2::new(0.5, 0.5)), [0.375, 0.75]);
        assert!(!rect.is_inverted());
        assert!(UvRect::new([1.0, 0.0], [0.0, 1.0]).is_inverted());
    }

    #[test]
    fn test_missing_variant_falls_back_to_full() {
        let table = TileRenderTable::new(vec![TileRenderData {
            variants: Vec::new(),
            ..tile(4, true, 0)
        }]);
        assert_eq!(table.look(4).variant(0), UvRect::FULL);
    }
}
