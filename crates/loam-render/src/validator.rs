use std::collections::HashSet;

use loam_core::constants::MAX_TILE_TYPES;
use thiserror::Error;

use crate::tile_data::TileRenderTable;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Duplicate tile type ID {0}")]
    DuplicateTileId(u32),
    #[error("Tile '{name}' (id {id}) is drawn but has no texture variants")]
    NoVariants { name: String, id: u32 },
    #[error("Tile '{name}' variant {variant} has an inverted UV rectangle")]
    InvertedUv { name: String, variant: usize },
    #[error("Tile '{name}' id {id} does not fit in 24 bits")]
    TileIdOutOfRange { name: String, id: u32 },
}

/// Check a tile render table once at startup.
pub fn validate_tiles(table: &TileRenderTable) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen_ids = HashSet::new();
    for tile in &table.tiles {
        if !seen_ids.insert(tile.id) {
            errors.push(ValidationError::DuplicateTileId(tile.id));
        }
    }

    for tile in &table.tiles {
        if tile.id >= MAX_TILE_TYPES {
            errors.push(ValidationError::TileIdOutOfRange {
                name: tile.name.clone(),
                id: tile.id,
            });
        }
        if tile.draw && tile.variants.is_empty() {
            errors.push(ValidationError::NoVariants {
                name: tile.name.clone(),
                id: tile.id,
            });
        }
        for (variant, rect) in tile.variants.iter().enumerate() {
            if rect.is_inverted() {
                errors.push(ValidationError::InvertedUv {
                    name: tile.name.clone(),
                    variant,
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
