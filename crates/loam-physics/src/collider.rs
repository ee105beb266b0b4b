use glam::{IVec2, UVec2};
use loam_core::error::GridError;
use loam_core::types::{GridCoord, LayerId};
use loam_world::Chunk;

/// Axis-aligned rectangle of solid cells in chunk-local cell units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ColliderRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> u32 {
        self.width * self.height
    }

    pub fn contains(&self, local: UVec2) -> bool {
        local.x >= self.x
            && local.x < self.x + self.width
            && local.y >= self.y
            && local.y < self.y + self.height
    }

    /// Grid-space minimum corner, given the owning chunk's origin.
    pub fn grid_min(&self, chunk_origin: GridCoord) -> GridCoord {
        chunk_origin + IVec2::new(self.x as i32, self.y as i32)
    }

    /// Grid-space exclusive maximum corner.
    pub fn grid_max(&self, chunk_origin: GridCoord) -> GridCoord {
        self.grid_min(chunk_origin) + IVec2::new(self.width as i32, self.height as i32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Empty,
    Solid,
    Partial,
}

struct Quadtree<'a> {
    solid: &'a [bool],
    size: UVec2,
    rects: Vec<ColliderRect>,
}

impl Quadtree<'_> {
    /// Cells outside the buffer (power-of-two padding) are empty.
    fn is_solid(&self, x: u32, y: u32) -> bool {
        x < self.size.x
            && y < self.size.y
            && self
                .solid
                .get((y * self.size.x + x) as usize)
                .copied()
                .unwrap_or(false)
    }

    /// Classify the square at (x, y) with side `side`. Solid squares are left
    /// for the caller to emit so they can merge with a sibling.
    fn visit(&mut self, x: u32, y: u32, side: u32) -> Region {
        if side == 1 {
            return if self.is_solid(x, y) {
                Region::Solid
            } else {
                Region::Empty
            };
        }

        let half = side / 2;
        // A = bottom-left, B = bottom-right, C = top-left, D = top-right
        let origins = [(x, y), (x + half, y), (x, y + half), (x + half, y + half)];
        let [a, b, c, d] = origins.map(|(cx, cy)| self.visit(cx, cy, half));

        let children = [a, b, c, d];
        if children.iter().all(|r| *r == Region::Solid) {
            return Region::Solid;
        }
        if children.iter().all(|r| *r == Region::Empty) {
            return Region::Empty;
        }

        let mut emitted = [false; 4];
        let merges = [
            ([0, 1], ColliderRect::new(x, y, side, half)),
            ([2, 3], ColliderRect::new(x, y + half, side, half)),
            ([0, 2], ColliderRect::new(x, y, half, side)),
            ([1, 3], ColliderRect::new(x + half, y, half, side)),
        ];
        if let Some((pair, rect)) = merges
            .iter()
            .find(|(pair, _)| pair.iter().all(|&i| children[i] == Region::Solid))
        {
            self.rects.push(*rect);
            for &i in pair {
                emitted[i] = true;
            }
        }

        for (i, (cx, cy)) in origins.into_iter().enumerate() {
            if children[i] == Region::Solid && !emitted[i] {
                self.rects.push(ColliderRect::new(cx, cy, half, half));
            }
        }
        Region::Partial
    }
}

/// Cover the solid cells of a `size.x * size.y` row-major buffer with
/// non-overlapping rectangles via a region quadtree.
///
/// Regions that are not square powers of two are padded with empty cells up
/// to the next power of two.
pub fn generate_rects(solid: &[bool], size: UVec2) -> Vec<ColliderRect> {
    if size.x == 0 || size.y == 0 {
        return Vec::new();
    }
    let side = size.x.max(size.y).next_power_of_two();
    let mut tree = Quadtree {
        solid,
        size,
        rects: Vec::new(),
    };
    if tree.visit(0, 0, side) == Region::Solid {
        tree.rects.push(ColliderRect::new(0, 0, side, side));
    }
    tree.rects
}

/// Collider rectangles for a chunk's solid layer.
pub fn generate_chunk_rects(
    chunk: &Chunk,
    solid_layer: LayerId,
) -> Result<Vec<ColliderRect>, GridError> {
    let buffer = chunk.typed::<bool>(solid_layer)?;
    Ok(generate_rects(buffer.as_slice(), chunk.size()))
}
