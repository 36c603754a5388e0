//! Pipeline, stage, action, and artifact constructs.

use serde::{Deserialize, Serialize};

use crate::secret::SecretRef;

/// An opaque data bundle handed from one pipeline stage to the next.
///
/// The artifact has no internal structure here; it is a named token wired
/// between a source action's output and a build action's input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    name: String,
}

impl Artifact {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Conventional output artifact for a source action.
    pub fn source_output(action_name: &str) -> Self {
        Self {
            name: format!("{action_name}SourceOutput"),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A single action inside a pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Action {
    /// Pull one branch of a hosted GitHub repository, authenticated via a
    /// secret resolved by the provider at deploy time.
    GitHubSource {
        action_name: String,
        owner: String,
        repo: String,
        branch: String,
        oauth_token: SecretRef,
        output: Artifact,
    },
    /// Run a build project against an input artifact.
    CodeBuild {
        action_name: String,
        project_name: String,
        input: Artifact,
    },
}

impl Action {
    pub fn name(&self) -> &str {
        match self {
            Action::GitHubSource { action_name, .. } => action_name,
            Action::CodeBuild { action_name, .. } => action_name,
        }
    }

    /// Artifact this action produces, if any.
    pub fn output_artifact(&self) -> Option<&Artifact> {
        match self {
            Action::GitHubSource { output, .. } => Some(output),
            Action::CodeBuild { .. } => None,
        }
    }

    /// Artifact this action consumes, if any.
    pub fn input_artifact(&self) -> Option<&Artifact> {
        match self {
            Action::GitHubSource { .. } => None,
            Action::CodeBuild { input, .. } => Some(input),
        }
    }
}

/// A named phase of a pipeline containing one or more actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    pub actions: Vec<Action>,
}

impl Stage {
    pub fn new(name: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            name: name.into(),
            actions,
        }
    }
}

/// An ordered execution graph of stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    pub name: String,
    pub stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    pub fn add_stage(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name.as_str()).collect()
    }

    /// Output artifact of the first source action, if any.
    pub fn source_output(&self) -> Option<&Artifact> {
        self.stages
            .iter()
            .flat_map(|s| s.actions.iter())
            .find_map(|a| a.output_artifact())
    }

    /// Input artifact of the first build action, if any.
    pub fn build_input(&self) -> Option<&Artifact> {
        self.stages
            .iter()
            .flat_map(|s| s.actions.iter())
            .find_map(|a| a.input_artifact())
    }
}
