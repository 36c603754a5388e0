//! Deploy-time secret and parameter references.
//!
//! References carry only a name. Resolution happens in the external
//! provider when the description is deployed (secrets) or when the build
//! runs (parameters), never in this code.

use serde::{Deserialize, Serialize};

/// Reference to a secret held in the provider's secret store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRef {
    secret_name: String,
}

impl SecretRef {
    pub fn secrets_manager(name: impl Into<String>) -> Self {
        Self {
            secret_name: name.into(),
        }
    }

    pub fn secret_name(&self) -> &str {
        &self.secret_name
    }

    /// Dynamic reference string the provider substitutes at deploy time.
    pub fn resolve_expression(&self) -> String {
        format!("{{{{resolve:secretsmanager:{}}}}}", self.secret_name)
    }
}

/// Reference to a parameter-store entry by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterRef {
    parameter_name: String,
}

impl ParameterRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            parameter_name: name.into(),
        }
    }

    pub fn parameter_name(&self) -> &str {
        &self.parameter_name
    }

    pub fn into_name(self) -> String {
        self.parameter_name
    }
}
