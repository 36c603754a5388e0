//! Error types for condapipe-core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("duplicate logical id: {0}")]
    DuplicateLogicalId(String),
}

pub type Result<T> = std::result::Result<T, Error>;
