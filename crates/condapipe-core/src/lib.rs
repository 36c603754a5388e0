//! Core domain types for condapipe stack descriptions.
//!
//! This crate contains:
//! - The template model (resources, logical IDs, intrinsic references)
//! - Pipeline, stage, action, and artifact constructs
//! - Build project environment types
//! - Bucket references and permission grants
//! - Deploy-time secret and parameter references
//!
//! Everything here is pure data. Constructing these types builds an
//! in-memory description graph; actual resource creation happens later,
//! out of process, when the synthesized description is submitted to the
//! external deployment tool.

pub mod build;
pub mod error;
pub mod pipeline;
pub mod secret;
pub mod storage;
pub mod template;

pub use error::{Error, Result};
