//! Catalog page decoding.
//!
//! A page is `{"entities": [...], "scrollId": "..."}`. Each entity is an
//! object of aspects keyed by aspect name; unknown keys are ignored. The
//! aspects tagsync understands are decoded into typed shapes (see
//! `aspects`) and merged into one `CatalogEntity`.
//!
//! Any structural failure fails the whole page. Entities are decoded into
//! fresh values one at a time, so a bad entity never leaves partial state in
//! its siblings.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::{TagsyncError, TagsyncResult};
use crate::model::{CatalogEntity, CatalogPage};

pub mod aspects;

use aspects::{
    Aspect, DatasetKey, EditableSchemaMetadata, GlobalTags, SchemaMetadata, DATASET_KEY,
    EDITABLE_SCHEMA_METADATA, GLOBAL_TAGS, SCHEMA_METADATA,
};

#[derive(Debug, Deserialize)]
struct RawPage {
    entities: Vec<Value>,
    #[serde(rename = "scrollId", default)]
    scroll_id: Option<String>,
}

/// Decode one response body.
pub fn decode_page(body: &[u8]) -> TagsyncResult<CatalogPage> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| TagsyncError::decode(format!("malformed page json: {e}")))?;
    decode_page_value(value)
}

/// Decode an already-parsed page.
pub fn decode_page_value(value: Value) -> TagsyncResult<CatalogPage> {
    let raw: RawPage = serde_json::from_value(value)
        .map_err(|e| TagsyncError::decode(format!("malformed page: {e}")))?;

    let entities = raw
        .entities
        .into_iter()
        .enumerate()
        .map(|(idx, v)| decode_entity(v).map_err(|e| with_position(idx, e)))
        .collect::<TagsyncResult<Vec<_>>>()?;

    Ok(CatalogPage {
        entities,
        scroll_id: raw.scroll_id.filter(|s| !s.is_empty()),
    })
}

/// Decode one entity object.
pub fn decode_entity(value: Value) -> TagsyncResult<CatalogEntity> {
    let Value::Object(mut obj) = value else {
        return Err(TagsyncError::decode("entity is not a json object"));
    };

    let mut entity = CatalogEntity {
        urn: match obj.remove("urn") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(other) => {
                return Err(TagsyncError::decode(format!("urn is not a string: {other}")));
            }
        },
        ..Default::default()
    };

    if let Some(key) = take_aspect::<DatasetKey>(&mut obj, DATASET_KEY)? {
        aspects::apply_dataset_key(&mut entity, key)
            .map_err(|e| aspect_error(DATASET_KEY, e))?;
    }

    if let Some(tags) = take_aspect::<GlobalTags>(&mut obj, GLOBAL_TAGS)? {
        aspects::apply_global_tags(&mut entity, tags);
    }

    // Generic schema first, editable second: editable tags win per column.
    if let Some(schema) = take_aspect::<SchemaMetadata>(&mut obj, SCHEMA_METADATA)? {
        aspects::apply_schema_fields(&mut entity, schema.fields);
    }
    if let Some(schema) = take_aspect::<EditableSchemaMetadata>(&mut obj, EDITABLE_SCHEMA_METADATA)? {
        aspects::apply_schema_fields(&mut entity, schema.editable_schema_field_info);
    }

    tracing::trace!(urn = entity.display_urn(), "decoded catalog entity");
    Ok(entity)
}

/// Remove and decode one aspect. Absent and `null` aspects are both `None`.
fn take_aspect<T: DeserializeOwned>(obj: &mut Map<String, Value>, name: &str) -> TagsyncResult<Option<T>> {
    match obj.remove(name) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => serde_json::from_value::<Aspect<T>>(v)
            .map(|a| Some(a.value))
            .map_err(|e| TagsyncError::decode(format!("aspect '{name}': {e}"))),
    }
}

fn aspect_error(name: &str, err: TagsyncError) -> TagsyncError {
    match err {
        TagsyncError::Decode(msg) => TagsyncError::decode(format!("aspect '{name}': {msg}")),
        other => other,
    }
}

fn with_position(idx: usize, err: TagsyncError) -> TagsyncError {
    match err {
        TagsyncError::Decode(msg) => TagsyncError::decode(format!("entity #{idx}: {msg}")),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn tagged(tags: &[&str]) -> Value {
        json!({ "tags": tags.iter().map(|t| json!({ "tag": t })).collect::<Vec<_>>() })
    }

    #[test]
    fn decodes_full_entity() {
        let page = json!({
            "entities": [{
                "urn": "urn:li:dataset:(urn:li:dataPlatform:trino,db.schema.tbl,PROD)",
                "datasetKey": { "value": {
                    "platform": "urn:li:dataPlatform:trino",
                    "name": "db.schema.tbl",
                    "origin": "PROD"
                }},
                "globalTags": { "value": tagged(&["urn:li:tag:pii"]) },
                "schemaMetadata": { "value": { "fields": [
                    { "fieldPath": "col1", "globalTags": tagged(&["urn:li:tag:gdpr"]) },
                    { "fieldPath": "col2", "nativeDataType": "varchar" }
                ]}},
                "status": { "value": { "removed": false } }
            }],
            "scrollId": "abc"
        });

        let page = decode_page_value(page).unwrap();
        assert_eq!(page.scroll_id.as_deref(), Some("abc"));
        assert_eq!(page.entities.len(), 1);

        let e = &page.entities[0];
        assert_eq!(e.platform(), Some("dataPlatform"));
        assert_eq!(e.service(), Some("trino"));
        assert_eq!(e.name(), Some("db.schema.tbl"));
        assert_eq!(e.table_tags, vec!["urn:li:tag:pii".to_string()]);
        assert_eq!(e.field_tags.len(), 1);
        assert_eq!(e.field_tags["col1"], vec!["urn:li:tag:gdpr".to_string()]);
    }

    #[test]
    fn missing_scroll_id_ends_pagination() {
        let page = decode_page(br#"{"entities": []}"#).unwrap();
        assert!(page.is_last());
        let page = decode_page(br#"{"entities": [], "scrollId": null}"#).unwrap();
        assert!(page.is_last());
        let page = decode_page(br#"{"entities": [], "scrollId": ""}"#).unwrap();
        assert!(page.is_last());
    }

    #[test]
    fn editable_schema_overwrites_generic_for_same_column() {
        let page = json!({ "entities": [{
            "editableSchemaMetadata": { "value": { "editableSchemaFieldInfo": [
                { "fieldPath": "c", "globalTags": tagged(&["urn:li:tag:edited"]) }
            ]}},
            "schemaMetadata": { "value": { "fields": [
                { "fieldPath": "c", "globalTags": tagged(&["urn:li:tag:generic"]) },
                { "fieldPath": "d", "globalTags": tagged(&["urn:li:tag:generic"]) }
            ]}}
        }]});
        let e = decode_page_value(page).unwrap().entities.remove(0);
        assert_eq!(e.field_tags["c"], vec!["urn:li:tag:edited".to_string()]);
        assert_eq!(e.field_tags["d"], vec!["urn:li:tag:generic".to_string()]);
    }

    #[test]
    fn empty_table_tags_stay_empty() {
        let page = json!({ "entities": [{ "globalTags": { "value": { "tags": [] } } }] });
        let e = decode_page_value(page).unwrap().entities.remove(0);
        assert!(!e.has_table_tags());
        assert!(e.identity.is_none());
    }

    #[test]
    fn bad_dataset_urn_fails_page() {
        let page = json!({ "entities": [
            { "datasetKey": { "value": { "platform": "urn:li:dataPlatform:trino", "name": "a.b.c" } } },
            { "datasetKey": { "value": { "platform": "trino", "name": "a.b.c" } } }
        ]});
        assert_matches!(
            decode_page_value(page),
            Err(TagsyncError::Decode(msg)) if msg.contains("entity #1") && msg.contains("datasetKey")
        );
    }

    #[test]
    fn aspect_without_value_fails_page() {
        let page = json!({ "entities": [{ "globalTags": { "tags": [] } }] });
        assert_matches!(
            decode_page_value(page),
            Err(TagsyncError::Decode(msg)) if msg.contains("globalTags")
        );
    }

    #[test]
    fn schema_without_fields_fails_page() {
        let page = json!({ "entities": [{ "schemaMetadata": { "value": {} } }] });
        assert_matches!(decode_page_value(page), Err(TagsyncError::Decode(_)));
    }

    #[test]
    fn page_without_entities_fails() {
        assert_matches!(decode_page(br#"{"scrollId": "x"}"#), Err(TagsyncError::Decode(_)));
        assert_matches!(decode_page(b"not json"), Err(TagsyncError::Decode(_)));
    }

    #[test]
    fn null_aspects_are_ignored() {
        let page = json!({ "entities": [{ "urn": null, "globalTags": null }] });
        let e = decode_page_value(page).unwrap().entities.remove(0);
        assert_eq!(e, CatalogEntity::default());
    }
}
