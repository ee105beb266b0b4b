//! Tile adjacency meshing.
//!
//! Every drawn cell gets a full middle quad. Where two tile types meet, the
//! higher-priority type overlaps the lower one by half a cell: border strips
//! along straight edges, quarter pieces at convex corners, and triangles in
//! the lower cell where the higher type wraps around a concave corner.

use std::collections::BTreeSet;

use glam::{IVec2, UVec2, Vec2};
use loam_core::config::MeshConfig;
use loam_core::constants::BLEND_EXTENT;
use loam_core::direction::{Corner, Edge, ALL_CORNERS, ALL_EDGES};
use loam_core::error::GridError;
use loam_core::hash::pick_variant;
use loam_core::math::local_index;
use loam_core::types::{ChunkCoord, GridCoord, LayerId, TileStateId, ValueKind};
use loam_world::{Chunk, Grid};

use crate::tile_data::{TileRenderTable, UvRect};

/// Every tile face points at the camera, which looks toward -z.
pub const TILE_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];

/// Interleaved vertex ready for GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TileVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
}

/// Which part of a tile a piece draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    /// The full cell.
    Middle,
    /// Half-cell strip pushed across the source cell's edge.
    Border(Edge),
    /// Quarter cell pushed into the diagonal at the source cell's corner.
    OuterCorner(Corner),
    /// Triangle inside the host cell's `corner` quarter, on the half that
    /// touches the host's `side` edge (where the source cell lies).
    InnerTriangle { corner: Corner, side: Edge },
}

/// One emitted piece of tile geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePiece {
    pub kind: PieceKind,
    /// Cell the geometry lies in.
    pub host: GridCoord,
    /// Cell whose tile type is drawn.
    pub source: GridCoord,
    pub tile_type: u32,
    pub variant: usize,
    pub z: f32,
}

/// Flat geometry lists for one chunk, positions in chunk-local cell units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub triangles: Vec<u32>,
}

impl MeshData {
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Interleave the lists into upload-ready vertices.
    pub fn to_vertices(&self) -> Vec<TileVertex> {
        self.vertices
            .iter()
            .zip(&self.uvs)
            .zip(&self.normals)
            .map(|((&position, &uv), &normal)| TileVertex {
                position,
                uv,
                normal,
            })
            .collect()
    }

    fn push_vertex(&mut self, origin: Vec2, t: Vec2, z: f32, uv: &UvRect) {
        let p = origin + t;
        self.vertices.push([p.x, p.y, z]);
        self.uvs.push(uv.sample(t));
        self.normals.push(TILE_NORMAL);
    }

    /// Axis-aligned rectangle `[lo, hi]` inside the unit cell at `origin`.
    fn push_rect(&mut self, origin: Vec2, lo: Vec2, hi: Vec2, z: f32, uv: &UvRect) {
        let base = self.vertices.len() as u32;
        for t in [lo, Vec2::new(hi.x, lo.y), hi, Vec2::new(lo.x, hi.y)] {
            self.push_vertex(origin, t, z, uv);
        }
        self.triangles
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Triangle inside the unit cell at `origin`, wound counter-clockwise.
    fn push_triangle(&mut self, origin: Vec2, mut pts: [Vec2; 3], z: f32, uv: &UvRect) {
        if (pts[1] - pts[0]).perp_dot(pts[2] - pts[0]) < 0.0 {
            pts.swap(1, 2);
        }
        let base = self.vertices.len() as u32;
        for t in pts {
            self.push_vertex(origin, t, z, uv);
        }
        self.triangles.extend_from_slice(&[base, base + 1, base + 2]);
    }
}

/// Output of one chunk rebuild.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMesh {
    pub coord: ChunkCoord,
    /// Tick the mesh was built at; set by the cache.
    pub built_at: u64,
    pub pieces: Vec<TilePiece>,
    pub mesh: MeshData,
}

/// Tile types of a chunk plus a one-cell ring read from its neighbors.
/// Halo (1, 1) is the chunk's local (0, 0).
struct Halo {
    stride: i32,
    types: Vec<u32>,
}

impl Halo {
    fn sample(grid: &Grid, chunk: &Chunk, layer: LayerId) -> Result<Self, GridError> {
        let size = chunk.size();
        let (w, h) = (size.x as i32, size.y as i32);
        let buffer = chunk.buffer(layer)?;
        let origin = grid.chunk_origin(chunk.coord());
        let stride = w + 2;
        let mut types = Vec::with_capacity((stride * (h + 2)) as usize);

        for hy in 0..h + 2 {
            for hx in 0..stride {
                let (lx, ly) = (hx - 1, hy - 1);
                let raw = if (0..w).contains(&lx) && (0..h).contains(&ly) {
                    buffer.get_u32(local_index(UVec2::new(lx as u32, ly as u32), size.x))?
                } else {
                    let value = grid.get_cell_value(origin + IVec2::new(lx, ly), layer)?;
                    value.as_u32().ok_or(GridError::LayerTypeMismatch {
                        layer,
                        requested: ValueKind::UInt32,
                        layer_kind: value.kind(),
                    })?
                };
                types.push(TileStateId::from_raw(raw).tile_type());
            }
        }
        Ok(Self { stride, types })
    }

    fn at(&self, p: IVec2) -> u32 {
        self.types[(p.y * self.stride + p.x) as usize]
    }
}

/// Builds chunk meshes from a tile-state layer.
pub struct TileMeshBuilder<'a> {
    table: &'a TileRenderTable,
    config: MeshConfig,
}

impl<'a> TileMeshBuilder<'a> {
    pub fn new(table: &'a TileRenderTable, config: MeshConfig) -> Self {
        Self { table, config }
    }

    /// Depth of a tile type. Higher priority is nearer the camera.
    pub fn z_for(&self, tile_type: u32) -> f32 {
        let priority = self.table.look(tile_type).priority;
        self.config.layer_z + priority as f32 * self.config.z_priority_step
    }

    /// Mesh the chunk at `coord`. Cells of unloaded neighbors read as empty.
    pub fn build(
        &self,
        grid: &Grid,
        layer: LayerId,
        coord: ChunkCoord,
    ) -> Result<ChunkMesh, GridError> {
        let chunk = grid.chunk(coord).ok_or(GridError::ChunkNotLoaded(coord))?;
        let halo = Halo::sample(grid, chunk, layer)?;
        let origin = grid.chunk_origin(coord);
        let pieces = self.classify(&halo, origin, chunk.size());
        let mesh = self.tessellate(&pieces, origin);
        log::debug!(
            "Meshed chunk {coord}: {} pieces, {} triangles",
            pieces.len(),
            mesh.triangle_count()
        );
        Ok(ChunkMesh {
            coord,
            built_at: 0,
            pieces,
            mesh,
        })
    }

    fn classify(&self, halo: &Halo, origin: GridCoord, size: UVec2) -> Vec<TilePiece> {
        let mut pieces = Vec::new();
        let mut unknown = BTreeSet::new();

        for ly in 0..size.y as i32 {
            for lx in 0..size.x as i32 {
                let p = IVec2::new(lx + 1, ly + 1);
                let cell = origin + IVec2::new(lx, ly);
                let cur = halo.at(p);
                if self.table.is_unknown(cur) {
                    unknown.insert(cur);
                }
                let look = self.table.look(cur);
                let at = |offset: IVec2| halo.at(p + offset);
                let priority_of = |t: u32| self.table.look(t).priority;

                if look.draw {
                    let variant = pick_variant(cell.x, cell.y, look.variants.len());
                    pieces.push(self.piece(PieceKind::Middle, cell, cell, cur, variant));

                    for edge in ALL_EDGES {
                        let neighbor = at(edge.offset());
                        let [a, b] = edge.corners();
                        if neighbor != cur
                            && at(a.offset()) != cur
                            && at(b.offset()) != cur
                            && look.priority > priority_of(neighbor)
                        {
                            let host = cell + edge.offset();
                            pieces.push(self.piece(PieceKind::Border(edge), host, cell, cur, variant));
                        }
                    }

                    for corner in ALL_CORNERS {
                        let (h, v) = corner.edges();
                        let diagonal = at(corner.offset());
                        if at(h.offset()) != cur
                            && at(v.offset()) != cur
                            && diagonal != cur
                            && look.priority > priority_of(diagonal)
                        {
                            let host = cell + corner.offset();
                            pieces.push(self.piece(
                                PieceKind::OuterCorner(corner),
                                host,
                                cell,
                                cur,
                                variant,
                            ));
                        }
                    }
                }

                // Concave corners: the neighbor's own border onto this cell is
                // suppressed exactly when it forms an L with another cell of its
                // type, so this cell fills the gap with triangles.
                for corner in ALL_CORNERS {
                    let (h_edge, v_edge) = corner.edges();
                    let h = at(h_edge.offset());
                    let v = at(v_edge.offset());
                    let beyond_h = at(v_edge.opposite().offset());
                    let beyond_v = at(h_edge.opposite().offset());

                    for (side, neighbor, l_shape) in [
                        (h_edge, h, v == h || beyond_h == h),
                        (v_edge, v, h == v || beyond_v == v),
                    ] {
                        if !l_shape || neighbor == cur {
                            continue;
                        }
                        let n_look = self.table.look(neighbor);
                        if !n_look.draw || n_look.priority <= look.priority {
                            continue;
                        }
                        let source = cell + side.offset();
                        let variant = pick_variant(source.x, source.y, n_look.variants.len());
                        pieces.push(self.piece(
                            PieceKind::InnerTriangle { corner, side },
                            cell,
                            source,
                            neighbor,
                            variant,
                        ));
                    }
                }
            }
        }

        if !unknown.is_empty() {
            log::warn!("Unknown tile types {unknown:?} treated as hidden");
        }
        pieces
    }

    fn piece(
        &self,
        kind: PieceKind,
        host: GridCoord,
        source: GridCoord,
        tile_type: u32,
        variant: usize,
    ) -> TilePiece {
        TilePiece {
            kind,
            host,
            source,
            tile_type,
            variant,
            z: self.z_for(tile_type),
        }
    }

    fn tessellate(&self, pieces: &[TilePiece], origin: GridCoord) -> MeshData {
        let mut mesh = MeshData::default();
        for piece in pieces {
            let uv = self.table.look(piece.tile_type).variant(piece.variant);
            let host = (piece.host - origin).as_vec2();
            match piece.kind {
                PieceKind::Middle => mesh.push_rect(host, Vec2::ZERO, Vec2::ONE, piece.z, &uv),
                PieceKind::Border(edge) => {
                    let (lo, hi) = half_rect(edge.opposite());
                    mesh.push_rect(host, lo, hi, piece.z, &uv);
                }
                PieceKind::OuterCorner(corner) => {
                    let (lo, hi) = quarter_rect(-corner.offset());
                    mesh.push_rect(host, lo, hi, piece.z, &uv);
                }
                PieceKind::InnerTriangle { corner, side } => {
                    let tip = (corner.offset().as_vec2() + Vec2::ONE) * 0.5;
                    let center = Vec2::splat(BLEND_EXTENT);
                    let foot = if side.is_horizontal() {
                        Vec2::new(tip.x, BLEND_EXTENT)
                    } else {
                        Vec2::new(BLEND_EXTENT, tip.y)
                    };
                    mesh.push_triangle(host, [tip, center, foot], piece.z, &uv);
                }
            }
        }
        mesh
    }
}

/// The half of a unit cell that touches `edge`.
fn half_rect(edge: Edge) -> (Vec2, Vec2) {
    match edge {
        Edge::Right => (Vec2::new(BLEND_EXTENT, 0.0), Vec2::ONE),
        Edge::Left => (Vec2::ZERO, Vec2::new(BLEND_EXTENT, 1.0)),
        Edge::Top => (Vec2::new(0.0, BLEND_EXTENT), Vec2::ONE),
        Edge::Bottom => (Vec2::ZERO, Vec2::new(1.0, BLEND_EXTENT)),
    }
}

/// The quarter of a unit cell in the direction of `offset` (components ±1).
fn quarter_rect(offset: IVec2) -> (Vec2, Vec2) {
    let lo = Vec2::new(
        if offset.x > 0 { BLEND_EXTENT } else { 0.0 },
        if offset.y > 0 { BLEND_EXTENT } else { 0.0 },
    );
    (lo, lo + Vec2::splat(BLEND_EXTENT))
}
