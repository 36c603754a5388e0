//! Template model: the stack description submitted to the deployment tool.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{Error, Result};

/// Template format version understood by the deployment tool.
pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// A deployable stack description: an ordered set of resources keyed by
/// logical ID. Resource order is preserved so emitted JSON is stable
/// across synthesis runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    /// Format version marker.
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,
    /// Human-readable stack description.
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared resources, keyed by logical ID.
    #[serde(rename = "Resources")]
    resources: IndexMap<String, Resource>,
}

impl Template {
    /// Create an empty template.
    pub fn new() -> Self {
        Self {
            format_version: TEMPLATE_FORMAT_VERSION.to_string(),
            description: None,
            resources: IndexMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Register a resource under a logical ID.
    ///
    /// Logical IDs must be unique within a template.
    pub fn add_resource(&mut self, logical_id: impl Into<String>, resource: Resource) -> Result<()> {
        let logical_id = logical_id.into();
        if self.resources.contains_key(&logical_id) {
            return Err(Error::DuplicateLogicalId(logical_id));
        }
        self.resources.insert(logical_id, resource);
        Ok(())
    }

    /// Look up a resource by logical ID.
    pub fn resource(&self, logical_id: &str) -> Option<&Resource> {
        self.resources.get(logical_id)
    }

    /// Logical IDs in declaration order.
    pub fn logical_ids(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(|k| k.as_str())
    }

    /// Logical IDs of all resources of the given type, in declaration order.
    pub fn resources_of_type<'a>(&'a self, resource_type: &'a str) -> impl Iterator<Item = &'a str> {
        self.resources
            .iter()
            .filter(move |(_, r)| r.resource_type == resource_type)
            .map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::new()
    }
}

/// A single declared resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Provider resource type (e.g. `AWS::CodePipeline::Pipeline`).
    #[serde(rename = "Type")]
    pub resource_type: String,
    /// Type-specific properties.
    #[serde(rename = "Properties")]
    pub properties: Value,
    /// Logical IDs this resource must be created after.
    #[serde(rename = "DependsOn", skip_serializing_if = "Vec::is_empty", default)]
    pub depends_on: Vec<String>,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>, properties: Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            properties,
            depends_on: Vec::new(),
        }
    }

    pub fn depends_on(mut self, logical_id: impl Into<String>) -> Self {
        self.depends_on.push(logical_id.into());
        self
    }
}

/// Intrinsic `Ref` to another resource in the same template.
pub fn reference(logical_id: &str) -> Value {
    json!({ "Ref": logical_id })
}

/// Intrinsic `Fn::GetAtt` on another resource in the same template.
pub fn get_att(logical_id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

/// Intrinsic `Fn::Sub` over pseudo parameters such as `${AWS::Region}`.
pub fn sub(expression: &str) -> Value {
    json!({ "Fn::Sub": expression })
}

/// Strip characters a logical ID may not contain.
///
/// Logical IDs are restricted to ASCII alphanumerics.
pub fn sanitize_logical_id(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}
