use thiserror::Error;

use crate::tile_data::{TileRenderData, TileRenderTable};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to parse tile render RON: {0}")]
    TileParseError(String),
}

/// Parse a single tile render RON string.
pub fn load_tiles_from_str(ron_str: &str) -> Result<TileRenderTable, LoadError> {
    let options = ron::Options::default();
    let tiles: Vec<TileRenderData> = options
        .from_str(ron_str)
        .map_err(|e| LoadError::TileParseError(e.to_string()))?;
    Ok(TileRenderTable::new(tiles))
}

/// Load and merge several tile sources (base game first, then add-ons).
pub fn load_all_tiles(sources: &[&str]) -> Result<TileRenderTable, LoadError> {
    let mut all_tiles = Vec::new();
    for source in sources {
        let table = load_tiles_from_str(source)?;
        all_tiles.extend(table.tiles);
    }
    Ok(TileRenderTable::new(all_tiles))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_single_tile() {
        let ron = r#"[
            (
                id: 1,
                name: "Dirt",
                draw: true,
                z_priority: 10,
                variants: [(min: (0.0, 0.0), max: (0.25, 0.25))],
            ),
        ]"#;
        let table = load_tiles_from_str(ron).expect("should parse");
        assert_eq!(table.len(), 1);
        assert_eq!(table.tiles[0].name, "Dirt");
        assert_eq!(table.look(1).priority, 10);
    }

    #[test]
    fn test_optional_fields_default() {
        let ron = r#"[(id: 0, name: "Air")]"#;
        let table = load_tiles_from_str(ron).expect("should parse");
        let air = table.get(0).expect("air");
        assert!(!air.draw);
        assert_eq!(air.z_priority, 0);
        assert!(air.variants.is_empty());
    }

    #[test]
    fn test_malformed_ron_rejected() {
        let result = load_tiles_from_str(r#"[this is not valid RON {"#);
        assert!(matches!(result, Err(LoadError::TileParseError(_))));
    }

    #[test]
    fn test_load_all_merges() {
        let base = r#"[(id: 0, name: "Air")]"#;
        let extra = r#"[(id: 9, name: "Moss", draw: true, variants: [(min: (0.0, 0.0), max: (1.0, 1.0))])]"#;
        let table = load_all_tiles(&[base, extra]).expect("should merge");
        assert_eq!(table.len(), 2);
        assert!(table.look(9).draw);
    }

    #[test]
    fn test_shipped_tiles_load() {
        let ron = include_str!("../../../data/tiles.ron");
        let table = load_tiles_from_str(ron).expect("shipped tiles should parse");
        assert!(table.len() >= 4);
        assert!(!table.look(0).draw, "air must not be drawn");
    }
}
