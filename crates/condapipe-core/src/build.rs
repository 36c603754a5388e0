//! Build project constructs: environment, image, and variables.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::secret::ParameterRef;

/// Container image a build project runs in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildImage {
    /// Image built from a local Dockerfile; the asset is materialized by the
    /// external builder, not by this code.
    FromAsset { directory: String, dockerfile: String },
    /// Pre-built image referenced by URI.
    Reference(String),
}

/// Compute fleet size for a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComputeType {
    #[default]
    #[serde(rename = "BUILD_GENERAL1_SMALL")]
    Small,
    #[serde(rename = "BUILD_GENERAL1_MEDIUM")]
    Medium,
    #[serde(rename = "BUILD_GENERAL1_LARGE")]
    Large,
}

impl ComputeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComputeType::Small => "BUILD_GENERAL1_SMALL",
            ComputeType::Medium => "BUILD_GENERAL1_MEDIUM",
            ComputeType::Large => "BUILD_GENERAL1_LARGE",
        }
    }
}

/// Execution environment for a build project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildEnvironment {
    pub image: BuildImage,
    /// Required for builds that run Docker themselves.
    pub privileged: bool,
    pub compute_type: ComputeType,
}

impl BuildEnvironment {
    pub fn new(image: BuildImage) -> Self {
        Self {
            image,
            privileged: false,
            compute_type: ComputeType::default(),
        }
    }

    pub fn privileged(mut self) -> Self {
        self.privileged = true;
        self
    }
}

/// Where an environment variable's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvironmentVariableKind {
    /// Value is embedded in the description as-is.
    #[serde(rename = "PLAINTEXT")]
    Plaintext,
    /// Value names a parameter fetched from the parameter store at build
    /// time; only the name appears in the description.
    #[serde(rename = "PARAMETER_STORE")]
    ParameterStore,
}

impl EnvironmentVariableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentVariableKind::Plaintext => "PLAINTEXT",
            EnvironmentVariableKind::ParameterStore => "PARAMETER_STORE",
        }
    }
}

/// A build-time environment variable: a value and its source kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub value: String,
    pub kind: EnvironmentVariableKind,
}

impl EnvironmentVariable {
    pub fn plaintext(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: EnvironmentVariableKind::Plaintext,
        }
    }

    pub fn parameter_store(parameter: ParameterRef) -> Self {
        Self {
            value: parameter.into_name(),
            kind: EnvironmentVariableKind::ParameterStore,
        }
    }
}

/// Configuration describing how to execute a containerized build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildProject {
    pub name: String,
    pub environment: BuildEnvironment,
    /// Declaration order is preserved into the emitted description.
    pub environment_variables: IndexMap<String, EnvironmentVariable>,
}

impl BuildProject {
    pub fn new(name: impl Into<String>, environment: BuildEnvironment) -> Self {
        Self {
            name: name.into(),
            environment,
            environment_variables: IndexMap::new(),
        }
    }

    pub fn with_variable(
        mut self,
        name: impl Into<String>,
        variable: EnvironmentVariable,
    ) -> Self {
        self.environment_variables.insert(name.into(), variable);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_kinds() {
        let plain = EnvironmentVariable::plaintext("my-bucket");
        assert_eq!(plain.kind, EnvironmentVariableKind::Plaintext);
        assert_eq!(plain.value, "my-bucket");

        let stored = EnvironmentVariable::parameter_store(ParameterRef::new("github_id_rsa"));
        assert_eq!(stored.kind, EnvironmentVariableKind::ParameterStore);
        assert_eq!(stored.value, "github_id_rsa");
    }

    #[test]
    fn test_variable_kind_wire_names() {
        assert_eq!(
            serde_json::to_value(EnvironmentVariableKind::Plaintext).unwrap(),
            "PLAINTEXT"
        );
        assert_eq!(
            serde_json::to_value(EnvironmentVariableKind::ParameterStore).unwrap(),
            "PARAMETER_STORE"
        );
    }

    #[test]
    fn test_project_preserves_variable_order() {
        let project = BuildProject::new(
            "Build1",
            BuildEnvironment::new(BuildImage::Reference("alpine".to_string())).privileged(),
        )
        .with_variable("ssh_key", EnvironmentVariable::parameter_store(ParameterRef::new("k")))
        .with_variable("conda_channel_name", EnvironmentVariable::plaintext("main"));

        let names: Vec<&str> = project
            .environment_variables
            .keys()
            .map(|k| k.as_str())
            .collect();
        assert_eq!(names, vec!["ssh_key", "conda_channel_name"]);
        assert!(project.environment.privileged);
    }
}
