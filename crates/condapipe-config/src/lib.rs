//! KDL configuration parsing for condapipe.
//!
//! This crate handles parsing of the resource-names mapping (condapipe.kdl)
//! that a stack definition is constructed from.

pub mod error;
pub mod resource_names;

pub use error::{ConfigError, ConfigResult};
pub use resource_names::{REQUIRED_KEYS, ResourceNames};
