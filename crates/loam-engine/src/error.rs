use loam_core::error::{ConfigError, GridError};
use loam_render::{LoadError, ValidationError};

/// Errors that can occur while building or stepping a world.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("grid error: {0}")]
    Grid(GridError),

    #[error("engine config error: {0}")]
    Config(ConfigError),

    #[error("tile data error: {0}")]
    TileLoad(LoadError),

    #[error("tile render table failed validation with {} errors", .0.len())]
    TileValidation(Vec<ValidationError>),

    #[error("schema has no layer named '{0}'")]
    MissingLayer(String),
}

impl From<GridError> for EngineError {
    fn from(e: GridError) -> Self {
        EngineError::Grid(e)
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        EngineError::Config(e)
    }
}

impl From<LoadError> for EngineError {
    fn from(e: LoadError) -> Self {
        EngineError::TileLoad(e)
    }
}
