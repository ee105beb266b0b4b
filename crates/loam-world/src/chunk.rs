use glam::UVec2;
use loam_core::error::GridError;
use loam_core::math::local_index;
use loam_core::types::{CellValue, ChunkCoord, LayerId, LocalCoord};

use crate::buffer::{CellScalar, LayerBuffer, TypedBuffer};
use crate::schema::LayerSchema;

/// Fixed-size block of cells holding one buffer per schema layer.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Chunk coordinate in chunk-space.
    coord: ChunkCoord,
    /// Cells per row / column.
    size: UVec2,
    /// One buffer per layer, indexed by `LayerId`.
    layers: Vec<LayerBuffer>,
    /// Explicit chunk-level stamp set by writers.
    stamp: u64,
}

impl Chunk {
    /// Allocate a chunk with one default-valued buffer per schema layer.
    pub fn new(coord: ChunkCoord, schema: &LayerSchema, size: UVec2) -> Self {
        let len = (size.x * size.y) as usize;
        let layers = schema
            .iter()
            .map(|def| LayerBuffer::new(def.id, def.kind, len))
            .collect();
        Self {
            coord,
            size,
            layers,
            stamp: 0,
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.x
    }

    pub fn height(&self) -> u32 {
        self.size.y
    }

    pub fn cell_count(&self) -> usize {
        (self.size.x * self.size.y) as usize
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn buffer(&self, layer: LayerId) -> Result<&LayerBuffer, GridError> {
        self.layers
            .get(layer.index())
            .ok_or(GridError::UnknownLayer(layer))
    }

    pub fn buffer_mut(&mut self, layer: LayerId) -> Result<&mut LayerBuffer, GridError> {
        self.layers
            .get_mut(layer.index())
            .ok_or(GridError::UnknownLayer(layer))
    }

    /// Borrow a layer as its concrete buffer type.
    pub fn typed<T: CellScalar>(&self, layer: LayerId) -> Result<&TypedBuffer<T>, GridError> {
        self.buffer(layer)?.typed::<T>()
    }

    pub fn typed_mut<T: CellScalar>(
        &mut self,
        layer: LayerId,
    ) -> Result<&mut TypedBuffer<T>, GridError> {
        self.buffer_mut(layer)?.typed_mut::<T>()
    }

    fn index_of(&self, local: LocalCoord) -> Result<usize, GridError> {
        if local.x >= self.size.x || local.y >= self.size.y {
            return Err(GridError::IndexOutOfBounds {
                index: local_index(local, self.size.x),
                len: self.cell_count(),
            });
        }
        Ok(local_index(local, self.size.x))
    }

    pub fn get_value(&self, layer: LayerId, local: LocalCoord) -> Result<CellValue, GridError> {
        let index = self.index_of(local)?;
        self.buffer(layer)?.get_value(index)
    }

    /// Write one cell. The caller marks the layer modified after its batch.
    pub fn set_value(
        &mut self,
        layer: LayerId,
        local: LocalCoord,
        value: CellValue,
    ) -> Result<(), GridError> {
        let index = self.index_of(local)?;
        self.buffer_mut(layer)?.set_value(index, value)
    }

    /// Latest of the explicit chunk stamp and every layer stamp.
    pub fn last_modified(&self) -> u64 {
        self.layers
            .iter()
            .map(LayerBuffer::last_modified)
            .fold(self.stamp, u64::max)
    }

    pub fn layer_last_modified(&self, layer: LayerId) -> Result<u64, GridError> {
        Ok(self.buffer(layer)?.last_modified())
    }

    /// Set the explicit chunk-level stamp.
    pub fn mark_modified(&mut self, tick: u64) {
        self.stamp = self.stamp.max(tick);
    }

    pub fn mark_layer_modified(&mut self, layer: LayerId, tick: u64) -> Result<(), GridError> {
        self.buffer_mut(layer)?.mark_modified(tick);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use loam_core::types::ValueKind;

    fn schema() -> (LayerSchema, LayerId, LayerId) {
        let (s, solid) = LayerSchema::new()
            .with_layer("solid", ValueKind::Bool)
            .expect("new");
        let (s, tile) = s.with_layer("tile", ValueKind::UInt16).expect("new");
        (s, solid, tile)
    }

    #[test]
    fn test_one_buffer_per_layer() {
        let (schema, solid, tile) = schema();
        let chunk = Chunk::new(IVec2::new(1, -2), &schema, UVec2::new(4, 4));
        assert_eq!(chunk.layer_count(), 2);
        assert_eq!(chunk.buffer(solid).expect("solid").len(), 16);
        assert_eq!(chunk.buffer(tile).expect("tile").len(), 16);
        assert_eq!(chunk.buffer(LayerId(2)), Err(GridError::UnknownLayer(LayerId(2))));
    }

    #[test]
    fn test_local_writes_use_row_major_index() {
        let (schema, _, tile) = schema();
        let mut chunk = Chunk::new(IVec2::ZERO, &schema, UVec2::new(4, 2));
        chunk
            .set_value(tile, UVec2::new(1, 1), CellValue::UInt16(7))
            .expect("in bounds");
        assert_eq!(chunk.typed::<u16>(tile).expect("tile").as_slice()[5], 7);
        assert_eq!(
            chunk.get_value(tile, UVec2::new(1, 1)),
            Ok(CellValue::UInt16(7))
        );
        assert!(chunk
            .set_value(tile, UVec2::new(4, 0), CellValue::UInt16(1))
            .is_err());
    }

    #[test]
    fn test_last_modified_is_max_of_layers_and_stamp() {
        let (schema, solid, tile) = schema();
        let mut chunk = Chunk::new(IVec2::ZERO, &schema, UVec2::new(2, 2));
        assert_eq!(chunk.last_modified(), 0);

        chunk.mark_layer_modified(solid, 5).expect("solid");
        assert_eq!(chunk.last_modified(), 5);
        assert_eq!(chunk.layer_last_modified(tile), Ok(0));

        chunk.mark_modified(9);
        assert_eq!(chunk.last_modified(), 9);

        chunk.mark_layer_modified(tile, 12).expect("tile");
        assert_eq!(chunk.last_modified(), 12);
    }
}
