//! Stack synthesis: from a resource-names mapping to a cloud assembly.
//!
//! This crate holds the stack definition itself. `PipelineStack::from_names`
//! assembles the description graph (source stage, build project, pipeline,
//! bucket grant) from a [`ResourceNames`](condapipe_config::ResourceNames)
//! mapping; `synth` renders it into a template plus an asset manifest, the
//! cloud assembly handed to the external deployment tool.

pub mod assembly;
pub mod assets;
pub mod error;
pub mod stack;

pub use assembly::CloudAssembly;
pub use error::{SynthError, SynthResult};
pub use stack::PipelineStack;
