//! Fixed-length typed cell buffers.
//!
//! Writes never touch the modification stamp. Callers batch their writes and
//! then call `mark_modified` once; caches compare stamps to decide whether to
//! rebuild.

use loam_core::error::GridError;
use loam_core::types::{CellValue, LayerId, ValueKind};

/// Scalar types a layer can hold.
pub trait CellScalar: Copy + Default + PartialEq + std::fmt::Debug + 'static {
    const KIND: ValueKind;

    fn into_value(self) -> CellValue;
    fn from_value(value: CellValue) -> Option<Self>;
    fn view(buffer: &LayerBuffer) -> Option<&TypedBuffer<Self>>;
    fn view_mut(buffer: &mut LayerBuffer) -> Option<&mut TypedBuffer<Self>>;
}

macro_rules! impl_cell_scalar {
    ($ty:ty, $variant:ident) => {
        impl CellScalar for $ty {
            const KIND: ValueKind = ValueKind::$variant;

            fn into_value(self) -> CellValue {
                CellValue::$variant(self)
            }

            fn from_value(value: CellValue) -> Option<Self> {
                match value {
                    CellValue::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn view(buffer: &LayerBuffer) -> Option<&TypedBuffer<Self>> {
                match &buffer.storage {
                    Storage::$variant(b) => Some(b),
                    _ => None,
                }
            }

            fn view_mut(buffer: &mut LayerBuffer) -> Option<&mut TypedBuffer<Self>> {
                match &mut buffer.storage {
                    Storage::$variant(b) => Some(b),
                    _ => None,
                }
            }
        }
    };
}

impl_cell_scalar!(bool, Bool);
impl_cell_scalar!(u8, Byte);
impl_cell_scalar!(u16, UInt16);
impl_cell_scalar!(u32, UInt32);
impl_cell_scalar!(f32, Float);

/// Homogeneous fixed-length array with a last-modified tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedBuffer<T> {
    data: Box<[T]>,
    last_modified: u64,
}

impl<T: CellScalar> TypedBuffer<T> {
    /// Allocate `len` default-valued cells with stamp 0.
    pub fn new(len: usize) -> Self {
        Self {
            data: vec![T::default(); len].into_boxed_slice(),
            last_modified: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<T, GridError> {
        self.data
            .get(index)
            .copied()
            .ok_or(GridError::IndexOutOfBounds {
                index,
                len: self.data.len(),
            })
    }

    /// Store a value. Does not bump `last_modified`.
    pub fn set(&mut self, index: usize, value: T) -> Result<(), GridError> {
        let len = self.data.len();
        let slot = self
            .data
            .get_mut(index)
            .ok_or(GridError::IndexOutOfBounds { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Set every cell to `value`. Does not bump `last_modified`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Raw write access for bulk generation fills.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn last_modified(&self) -> u64 {
        self.last_modified
    }

    /// Record a modification at `tick`. Stamps never move backwards.
    pub fn mark_modified(&mut self, tick: u64) {
        self.last_modified = self.last_modified.max(tick);
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Storage {
    Bool(TypedBuffer<bool>),
    Byte(TypedBuffer<u8>),
    UInt16(TypedBuffer<u16>),
    UInt32(TypedBuffer<u32>),
    Float(TypedBuffer<f32>),
}

/// A layer's buffer with its value kind erased.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerBuffer {
    layer: LayerId,
    storage: Storage,
}

impl LayerBuffer {
    pub fn new(layer: LayerId, kind: ValueKind, len: usize) -> Self {
        let storage = match kind {
            ValueKind::Bool => Storage::Bool(TypedBuffer::new(len)),
            ValueKind::Byte => Storage::Byte(TypedBuffer::new(len)),
            ValueKind::UInt16 => Storage::UInt16(TypedBuffer::new(len)),
            ValueKind::UInt32 => Storage::UInt32(TypedBuffer::new(len)),
            ValueKind::Float => Storage::Float(TypedBuffer::new(len)),
        };
        Self { layer, storage }
    }

    pub fn layer(&self) -> LayerId {
        self.layer
    }

    pub fn kind(&self) -> ValueKind {
        match &self.storage {
            Storage::Bool(_) => ValueKind::Bool,
            Storage::Byte(_) => ValueKind::Byte,
            Storage::UInt16(_) => ValueKind::UInt16,
            Storage::UInt32(_) => ValueKind::UInt32,
            Storage::Float(_) => ValueKind::Float,
        }
    }

    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Bool(b) => b.len(),
            Storage::Byte(b) => b.len(),
            Storage::UInt16(b) => b.len(),
            Storage::UInt32(b) => b.len(),
            Storage::Float(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last_modified(&self) -> u64 {
        match &self.storage {
            Storage::Bool(b) => b.last_modified(),
            Storage::Byte(b) => b.last_modified(),
            Storage::UInt16(b) => b.last_modified(),
            Storage::UInt32(b) => b.last_modified(),
            Storage::Float(b) => b.last_modified(),
        }
    }

    pub fn mark_modified(&mut self, tick: u64) {
        match &mut self.storage {
            Storage::Bool(b) => b.mark_modified(tick),
            Storage::Byte(b) => b.mark_modified(tick),
            Storage::UInt16(b) => b.mark_modified(tick),
            Storage::UInt32(b) => b.mark_modified(tick),
            Storage::Float(b) => b.mark_modified(tick),
        }
    }

    pub fn get_value(&self, index: usize) -> Result<CellValue, GridError> {
        match &self.storage {
            Storage::Bool(b) => b.get(index).map(CellValue::Bool),
            Storage::Byte(b) => b.get(index).map(CellValue::Byte),
            Storage::UInt16(b) => b.get(index).map(CellValue::UInt16),
            Storage::UInt32(b) => b.get(index).map(CellValue::UInt32),
            Storage::Float(b) => b.get(index).map(CellValue::Float),
        }
    }

    /// Store a value of this layer's kind. Does not bump `last_modified`.
    pub fn set_value(&mut self, index: usize, value: CellValue) -> Result<(), GridError> {
        let mismatch = GridError::LayerTypeMismatch {
            layer: self.layer,
            requested: value.kind(),
            layer_kind: self.kind(),
        };
        match (&mut self.storage, value) {
            (Storage::Bool(b), CellValue::Bool(v)) => b.set(index, v),
            (Storage::Byte(b), CellValue::Byte(v)) => b.set(index, v),
            (Storage::UInt16(b), CellValue::UInt16(v)) => b.set(index, v),
            (Storage::UInt32(b), CellValue::UInt32(v)) => b.set(index, v),
            (Storage::Float(b), CellValue::Float(v)) => b.set(index, v),
            _ => Err(mismatch),
        }
    }

    /// Read an integer layer (Byte/UInt16/UInt32) widened to u32, as tile
    /// id layers are stored.
    pub fn get_u32(&self, index: usize) -> Result<u32, GridError> {
        let value = self.get_value(index)?;
        value.as_u32().ok_or(GridError::LayerTypeMismatch {
            layer: self.layer,
            requested: ValueKind::UInt32,
            layer_kind: self.kind(),
        })
    }

    /// Borrow the buffer as its concrete type.
    pub fn typed<T: CellScalar>(&self) -> Result<&TypedBuffer<T>, GridError> {
        let layer_kind = self.kind();
        let layer = self.layer;
        T::view(self).ok_or(GridError::LayerTypeMismatch {
            layer,
            requested: T::KIND,
            layer_kind,
        })
    }

    pub fn typed_mut<T: CellScalar>(&mut self) -> Result<&mut TypedBuffer<T>, GridError> {
        let layer_kind = self.kind();
        let layer = self.layer;
        T::view_mut(self).ok_or(GridError::LayerTypeMismatch {
            layer,
            requested: T::KIND,
            layer_kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let mut buf = TypedBuffer::<u16>::new(16);
        buf.set(3, 42).expect("in bounds");
        assert_eq!(buf.get(3), Ok(42));
        assert_eq!(buf.get(0), Ok(0));
        assert_eq!(buf.len(), 16);
    }

    #[test]
    fn test_set_does_not_bump_stamp() {
        let mut buf = TypedBuffer::<bool>::new(4);
        buf.set(0, true).expect("in bounds");
        buf.fill(true);
        buf.as_mut_slice()[1] = false;
        assert_eq!(buf.last_modified(), 0);

        buf.mark_modified(7);
        assert_eq!(buf.last_modified(), 7);
        buf.set(2, false).expect("in bounds");
        assert_eq!(buf.last_modified(), 7);
    }

    #[test]
    fn test_stamp_never_moves_backwards() {
        let mut buf = TypedBuffer::<f32>::new(1);
        buf.mark_modified(10);
        buf.mark_modified(4);
        assert_eq!(buf.last_modified(), 10);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut buf = TypedBuffer::<u8>::new(4);
        assert_eq!(
            buf.get(4),
            Err(GridError::IndexOutOfBounds { index: 4, len: 4 })
        );
        assert!(buf.set(9, 1).is_err());
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn test_layer_buffer_roundtrip_each_kind() {
        let cases = [
            CellValue::Bool(true),
            CellValue::Byte(200),
            CellValue::UInt16(60_000),
            CellValue::UInt32(0xDEAD_BEEF),
            CellValue::Float(-2.5),
        ];
        for (i, value) in cases.into_iter().enumerate() {
            let mut buf = LayerBuffer::new(LayerId(i as u32), value.kind(), 8);
            assert_eq!(buf.kind(), value.kind());
            buf.set_value(5, value).expect("kind matches");
            assert_eq!(buf.get_value(5), Ok(value));
            assert_eq!(buf.get_value(4), Ok(CellValue::default_for(value.kind())));
        }
    }

    #[test]
    fn test_layer_buffer_kind_mismatch() {
        let mut buf = LayerBuffer::new(LayerId(2), ValueKind::UInt16, 4);
        let err = buf.set_value(0, CellValue::Bool(true));
        assert_eq!(
            err,
            Err(GridError::LayerTypeMismatch {
                layer: LayerId(2),
                requested: ValueKind::Bool,
                layer_kind: ValueKind::UInt16,
            })
        );
        assert_eq!(
            err.unwrap_err().to_string(),
            "layer #2 holds UInt16 values, got Bool"
        );
        assert!(buf.typed::<bool>().is_err());
        assert!(buf.typed::<u16>().is_ok());
    }

    #[test]
    fn test_get_u32_widens_integer_layers() {
        let mut buf = LayerBuffer::new(LayerId(0), ValueKind::Byte, 2);
        buf.typed_mut::<u8>().expect("byte layer").set(1, 9).expect("in bounds");
        assert_eq!(buf.get_u32(1), Ok(9));

        let floats = LayerBuffer::new(LayerId(1), ValueKind::Float, 2);
        assert!(floats.get_u32(0).is_err());
    }
}
