//! Typed shapes of the catalog aspects tagsync reads.
//!
//! Every aspect arrives wrapped as `{"value": {...}}`. Each shape is decoded
//! on its own so a malformed aspect is reported by name instead of surfacing
//! as a failed field access somewhere later.

use serde::Deserialize;

use crate::errors::{TagsyncError, TagsyncResult};
use crate::model::{CatalogEntity, DatasetIdentity};

pub const DATASET_KEY: &str = "datasetKey";
pub const GLOBAL_TAGS: &str = "globalTags";
pub const SCHEMA_METADATA: &str = "schemaMetadata";
pub const EDITABLE_SCHEMA_METADATA: &str = "editableSchemaMetadata";

/// Prefix every dataset platform URI must carry.
pub const URN_PREFIX: &str = "urn:li:";
const URN_DELIMITER: char = ':';

#[derive(Debug, Deserialize)]
pub struct Aspect<T> {
    pub value: T,
}

/// Identity aspect.
#[derive(Debug, Deserialize)]
pub struct DatasetKey {
    /// Platform URI, e.g. `urn:li:dataPlatform:trino`.
    pub platform: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GlobalTags {
    #[serde(default)]
    pub tags: Option<Vec<TagAssociation>>,
}

impl GlobalTags {
    fn uris(&self) -> Vec<String> {
        self.tags
            .iter()
            .flatten()
            .map(|t| t.tag.clone())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct TagAssociation {
    pub tag: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaField {
    pub field_path: String,
    #[serde(default)]
    pub global_tags: Option<GlobalTags>,
}

/// Generic schema aspect.
#[derive(Debug, Deserialize)]
pub struct SchemaMetadata {
    pub fields: Vec<SchemaField>,
}

/// Editable schema aspect (user edits made in the catalog UI).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditableSchemaMetadata {
    pub editable_schema_field_info: Vec<SchemaField>,
}

impl DatasetKey {
    /// Split the platform URI into `(platform, service)`.
    ///
    /// `urn:li:dataPlatform:trino` yields `("dataPlatform", "trino")`.
    pub fn identity(&self) -> TagsyncResult<DatasetIdentity> {
        if !self.platform.starts_with(URN_PREFIX) {
            return Err(TagsyncError::decode(format!(
                "invalid dataset urn: {}",
                self.platform
            )));
        }

        let segments: Vec<&str> = self.platform.split(URN_DELIMITER).collect();
        if segments.len() < 4 || segments[2].is_empty() || segments[3].is_empty() {
            return Err(TagsyncError::decode(format!(
                "dataset urn has no platform/service segments: {}",
                self.platform
            )));
        }

        Ok(DatasetIdentity {
            platform: segments[2].to_string(),
            service: segments[3].to_string(),
            name: self.name.clone(),
        })
    }
}

pub fn apply_dataset_key(entity: &mut CatalogEntity, key: DatasetKey) -> TagsyncResult<()> {
    entity.identity = Some(key.identity()?);
    Ok(())
}

pub fn apply_global_tags(entity: &mut CatalogEntity, tags: GlobalTags) {
    entity.table_tags.extend(tags.uris());
}

/// Insert per-column tags. A column already present is overwritten, so when
/// both schema aspects tag the same column the one applied last wins.
pub fn apply_schema_fields(entity: &mut CatalogEntity, fields: Vec<SchemaField>) {
    for field in fields {
        let Some(tags) = field.global_tags else {
            continue;
        };
        let uris = tags.uris();
        if uris.is_empty() {
            continue;
        }
        entity.field_tags.insert(field.field_path, uris);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn key(platform: &str) -> DatasetKey {
        DatasetKey {
            platform: platform.to_string(),
            name: Some("db.schema.tbl".to_string()),
        }
    }

    #[test]
    fn splits_platform_and_service() {
        let id = key("urn:li:dataPlatform:trino").identity().unwrap();
        assert_eq!(id.platform, "dataPlatform");
        assert_eq!(id.service, "trino");
        assert_eq!(id.name.as_deref(), Some("db.schema.tbl"));
    }

    #[test]
    fn rejects_foreign_scheme() {
        assert_matches!(key("urn:xx:dataPlatform:trino").identity(), Err(TagsyncError::Decode(_)));
    }

    #[test]
    fn rejects_short_urn() {
        assert_matches!(key("urn:li:dataPlatform").identity(), Err(TagsyncError::Decode(_)));
        assert_matches!(key("urn:li:dataPlatform:").identity(), Err(TagsyncError::Decode(_)));
    }

    #[test]
    fn untagged_and_empty_fields_are_skipped() {
        let mut e = CatalogEntity::default();
        let fields: Vec<SchemaField> = serde_json::from_value(serde_json::json!([
            {"fieldPath": "a"},
            {"fieldPath": "b", "globalTags": null},
            {"fieldPath": "c", "globalTags": {"tags": []}},
            {"fieldPath": "d", "globalTags": {"tags": null}},
            {"fieldPath": "e", "globalTags": {"tags": [{"tag": "urn:li:tag:x"}]}}
        ]))
        .unwrap();
        apply_schema_fields(&mut e, fields);
        assert_eq!(e.field_tags.len(), 1);
        assert_eq!(e.field_tags["e"], vec!["urn:li:tag:x".to_string()]);
    }
}
