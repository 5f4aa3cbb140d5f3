//! Policy-engine tag/resource graph for one catalog entity.
//!
//! Serialized field names follow the policy engine's service-tags import
//! format (camelCase, absent values omitted).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Provenance recorded on every tag definition produced by the sync.
pub const TAG_SOURCE: &str = "catalog";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagDefinition {
    pub id: u64,
    pub name: String,
    pub source: String,
    pub is_enabled: bool,
}

impl TagDefinition {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            source: TAG_SOURCE.to_string(),
            is_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    #[serde(rename = "type")]
    pub tag_type: String,
}

/// Value list for one resource level (e.g. `catalog`, `table`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceElement {
    pub values: Vec<String>,
    pub is_excludes: bool,
    pub is_recursive: bool,
}

impl ResourceElement {
    pub fn single(value: impl Into<String>) -> Self {
        Self {
            values: vec![value.into()],
            is_excludes: false,
            is_recursive: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    pub id: u64,
    pub service_name: String,
    pub resource_elements: BTreeMap<String, ResourceElement>,
}

impl ResourceRecord {
    /// First value of a resource level, if present.
    pub fn element(&self, level: &str) -> Option<&str> {
        self.resource_elements
            .get(level)
            .and_then(|e| e.values.first())
            .map(String::as_str)
    }
}

/// Converted payload handed to the sink.
///
/// Tag ids and resource ids are both contiguous from 0 within one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyPayload {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub entity_urn: Option<String>,
    pub tag_definitions: BTreeMap<u64, TagDefinition>,
    pub tags: BTreeMap<u64, Tag>,
    pub service_resources: Vec<ResourceRecord>,
    pub resource_to_tag_ids: BTreeMap<u64, BTreeSet<u64>>,
}

impl PolicyPayload {
    /// Tag id assigned to a canonical name, if any.
    pub fn tag_id(&self, canonical: &str) -> Option<u64> {
        self.tag_definitions
            .values()
            .find(|d| d.name == canonical)
            .map(|d| d.id)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
