use loam_core::constants::{LAYER_BACKGROUND, LAYER_DEBUG, LAYER_FOREGROUND, LAYER_SOLID};
use loam_core::error::GridError;
use loam_core::types::{LayerId, ValueKind};

/// One named, typed per-cell data channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerDef {
    pub id: LayerId,
    pub name: String,
    pub kind: ValueKind,
}

/// Ordered, append-only list of layer definitions shared by every chunk of a
/// grid. Adding a layer produces a new schema; existing ids never change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerSchema {
    layers: Vec<LayerDef>,
}

impl LayerSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Solid flags, foreground and background tile ids, and a debug scalar.
    pub fn standard() -> Self {
        let mut layers = Vec::with_capacity(4);
        for (name, kind) in [
            (LAYER_SOLID, ValueKind::Bool),
            (LAYER_FOREGROUND, ValueKind::UInt32),
            (LAYER_BACKGROUND, ValueKind::UInt32),
            (LAYER_DEBUG, ValueKind::Float),
        ] {
            layers.push(LayerDef {
                id: LayerId(layers.len() as u32),
                name: name.to_string(),
                kind,
            });
        }
        Self { layers }
    }

    /// Return a new schema with `name` appended, plus the new layer's id.
    pub fn with_layer(&self, name: &str, kind: ValueKind) -> Result<(Self, LayerId), GridError> {
        if self.find(name).is_some() {
            return Err(GridError::DuplicateLayer(name.to_string()));
        }
        let id = LayerId(self.layers.len() as u32);
        let mut layers = self.layers.clone();
        layers.push(LayerDef {
            id,
            name: name.to_string(),
            kind,
        });
        Ok((Self { layers }, id))
    }

    pub fn get(&self, id: LayerId) -> Result<&LayerDef, GridError> {
        self.layers.get(id.index()).ok_or(GridError::UnknownLayer(id))
    }

    pub fn kind(&self, id: LayerId) -> Result<ValueKind, GridError> {
        self.get(id).map(|def| def.kind)
    }

    /// Look up a layer id by name.
    pub fn find(&self, name: &str) -> Option<LayerId> {
        self.layers.iter().find(|l| l.name == name).map(|l| l.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayerDef> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_returns_dense_ids() {
        let schema = LayerSchema::new();
        let (schema, solid) = schema.with_layer("solid", ValueKind::Bool).expect("new");
        let (schema, tile) = schema.with_layer("tile", ValueKind::UInt16).expect("new");
        assert_eq!(solid, LayerId(0));
        assert_eq!(tile, LayerId(1));
        assert_eq!(schema.len(), 2);
        for (i, def) in schema.iter().enumerate() {
            assert_eq!(def.id.index(), i);
        }
    }

    #[test]
    fn test_append_is_functional() {
        let base = LayerSchema::new();
        let (one, _) = base.with_layer("a", ValueKind::Byte).expect("new");
        let (two, b) = one.with_layer("b", ValueKind::Float).expect("new");
        assert!(base.is_empty());
        assert_eq!(one.len(), 1);
        assert_eq!(two.len(), 2);
        // Earlier layers keep their index.
        assert_eq!(two.find("a"), one.find("a"));
        assert_eq!(two.kind(b), Ok(ValueKind::Float));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (schema, _) = LayerSchema::new()
            .with_layer("solid", ValueKind::Bool)
            .expect("new");
        assert_eq!(
            schema.with_layer("solid", ValueKind::Byte),
            Err(GridError::DuplicateLayer("solid".into()))
        );
    }

    #[test]
    fn test_unknown_layer() {
        let schema = LayerSchema::standard();
        assert!(schema.get(LayerId(3)).is_ok());
        assert_eq!(schema.get(LayerId(4)), Err(GridError::UnknownLayer(LayerId(4))));
    }

    #[test]
    fn test_standard_layers() {
        let schema = LayerSchema::standard();
        let solid = schema.find(LAYER_SOLID).expect("solid layer");
        let fg = schema.find(LAYER_FOREGROUND).expect("foreground layer");
        assert_eq!(schema.kind(solid), Ok(ValueKind::Bool));
        assert_eq!(schema.kind(fg), Ok(ValueKind::UInt32));
        assert!(schema.find(LAYER_DEBUG).is_some());
    }
}
