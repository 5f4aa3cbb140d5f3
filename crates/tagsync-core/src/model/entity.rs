//! Normalized catalog-side types.

use std::collections::BTreeMap;

use serde::Serialize;

/// Platform, service and qualified name of a dataset.
///
/// All three come from the same identity aspect, so they are kept together:
/// `service` selects the resource mapper and `name` is split by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetIdentity {
    pub platform: String,
    pub service: String,
    pub name: Option<String>,
}

/// One dataset as seen by the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntity {
    pub urn: Option<String>,
    pub identity: Option<DatasetIdentity>,
    /// Table-level tag URIs. Order carries no meaning.
    pub table_tags: Vec<String>,
    /// Column path -> tag URIs on that column.
    pub field_tags: BTreeMap<String, Vec<String>>,
}

impl CatalogEntity {
    pub fn platform(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.platform.as_str())
    }

    pub fn service(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.service.as_str())
    }

    pub fn name(&self) -> Option<&str> {
        self.identity.as_ref().and_then(|i| i.name.as_deref())
    }

    /// Urn for log lines; entities without one are still convertible.
    pub fn display_urn(&self) -> &str {
        self.urn.as_deref().unwrap_or("<no-urn>")
    }

    pub fn has_table_tags(&self) -> bool {
        !self.table_tags.is_empty()
    }

    /// Every tag URI on the entity, table tags first, duplicates included.
    pub fn all_tag_uris(&self) -> impl Iterator<Item = &str> {
        self.table_tags
            .iter()
            .chain(self.field_tags.values().flatten())
            .map(String::as_str)
    }
}

/// One page of the catalog's dataset listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogPage {
    pub entities: Vec<CatalogEntity>,
    /// Continuation cursor; `None` ends pagination.
    pub scroll_id: Option<String>,
}

impl CatalogPage {
    pub fn is_last(&self) -> bool {
        self.scroll_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_tag_uris_walks_table_then_columns() {
        let mut e = CatalogEntity {
            table_tags: vec!["urn:li:tag:pii".into()],
            ..Default::default()
        };
        e.field_tags.insert("b".into(), vec!["urn:li:tag:b".into()]);
        e.field_tags.insert("a".into(), vec!["urn:li:tag:a".into(), "urn:li:tag:pii".into()]);

        let uris: Vec<&str> = e.all_tag_uris().collect();
        assert_eq!(
            uris,
            vec!["urn:li:tag:pii", "urn:li:tag:a", "urn:li:tag:pii", "urn:li:tag:b"]
        );
    }

    #[test]
    fn identity_accessors() {
        let e = CatalogEntity {
            identity: Some(DatasetIdentity {
                platform: "dataPlatform".into(),
                service: "trino".into(),
                name: None,
            }),
            ..Default::default()
        };
        assert_eq!(e.service(), Some("trino"));
        assert_eq!(e.name(), None);
        assert_eq!(e.display_urn(), "<no-urn>");
    }
}
