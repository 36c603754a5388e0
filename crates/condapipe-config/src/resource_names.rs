//! Resource-names mapping parsing.

use crate::{ConfigError, ConfigResult};
use indexmap::IndexMap;
use kdl::{KdlDocument, KdlNode};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Keys a stack definition reads from the mapping.
pub const REQUIRED_KEYS: &[&str] = &[
    "repo_owner",
    "repo_name",
    "repo_branch",
    "project_name",
    "dockerfile_name",
    "conda_channel_bucket",
    "conda_channel_name",
];

/// A mapping of configuration keys to string values, supplied wholesale at
/// stack-construction time and immutable thereafter.
///
/// Values are not validated here. A missing key fails the lookup that
/// needs it; a malformed value flows into the emitted description and is
/// only reported by the external deployment tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceNames {
    names: IndexMap<String, String>,
}

impl ResourceNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parse a mapping from KDL text.
    ///
    /// Expected form: a top-level `stack` node whose children are
    /// `key "value"` entries. Other top-level nodes are ignored.
    pub fn from_kdl(kdl: &str) -> ConfigResult<Self> {
        let doc: KdlDocument = kdl.parse()?;

        let stack = doc
            .nodes()
            .iter()
            .find(|node| node.name().value() == "stack")
            .ok_or_else(|| ConfigError::MissingField("stack block".to_string()))?;

        let mut names = IndexMap::new();
        if let Some(children) = stack.children() {
            for child in children.nodes() {
                let key = child.name().value().to_string();
                let value =
                    get_first_string_arg(child).ok_or_else(|| ConfigError::InvalidValue {
                        field: key.clone(),
                        message: "expected a string value".to_string(),
                    })?;
                if names.insert(key.clone(), value).is_some() {
                    return Err(ConfigError::Duplicate(key));
                }
            }
        }

        Ok(Self { names })
    }

    /// Read and parse a mapping from a KDL file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_kdl(&content)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.names.insert(key.into(), value.into());
    }

    /// Look up a key, failing fast when it is absent.
    pub fn get(&self, key: &str) -> ConfigResult<&str> {
        self.names
            .get(key)
            .map(|v| v.as_str())
            .ok_or_else(|| ConfigError::MissingField(key.to_string()))
    }

    pub fn get_opt(&self, key: &str) -> Option<&str> {
        self.names.get(key).map(|v| v.as_str())
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Required keys absent from this mapping. Used for up-front reporting
    /// in the CLI; stack construction itself fails on first lookup instead.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| !self.names.contains_key(*key))
            .collect()
    }
}

fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"
        stack {
            repo_owner "acme"
            repo_name "pkg"
            repo_branch "main"
            project_name "Build1"
            dockerfile_name "Dockerfile"
            conda_channel_bucket "my-bucket"
            conda_channel_name "main"
        }
    "#;

    #[test]
    fn test_parse_example() {
        let names = ResourceNames::from_kdl(EXAMPLE).unwrap();
        assert_eq!(names.get("repo_owner").unwrap(), "acme");
        assert_eq!(names.get("conda_channel_bucket").unwrap(), "my-bucket");
        assert_eq!(names.len(), 7);
        assert!(names.missing_keys().is_empty());
    }

    #[test]
    fn test_missing_stack_block() {
        let result = ResourceNames::from_kdl(r#"pipeline "nope""#);
        assert!(matches!(result.unwrap_err(), ConfigError::MissingField(_)));
    }

    #[test]
    fn test_missing_key_lookup_fails() {
        let names = ResourceNames::from_kdl(r#"stack { repo_owner "acme" }"#).unwrap();
        let err = names.get("repo_branch").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(key) if key == "repo_branch"));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let kdl = r#"
            stack {
                repo_owner "acme"
                repo_owner "other"
            }
        "#;
        let result = ResourceNames::from_kdl(kdl);
        assert!(matches!(result.unwrap_err(), ConfigError::Duplicate(key) if key == "repo_owner"));
    }

    #[test]
    fn test_non_string_value_rejected() {
        let result = ResourceNames::from_kdl("stack { repo_owner 1 }");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidValue { field, .. } if field == "repo_owner"
        ));
    }

    #[test]
    fn test_missing_keys_reported() {
        let names = ResourceNames::from_pairs([("repo_owner", "acme"), ("repo_name", "pkg")]);
        let missing = names.missing_keys();
        assert!(missing.contains(&"repo_branch"));
        assert!(missing.contains(&"conda_channel_name"));
        assert!(!missing.contains(&"repo_owner"));
    }

    #[test]
    fn test_declaration_order_preserved() {
        let names = ResourceNames::from_kdl(EXAMPLE).unwrap();
        let keys: Vec<&str> = names.keys().collect();
        assert_eq!(keys[0], "repo_owner");
        assert_eq!(keys[6], "conda_channel_name");
    }
}
