//! Synthesis errors.

use condapipe_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] condapipe_core::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SynthResult<T> = std::result::Result<T, SynthError>;
