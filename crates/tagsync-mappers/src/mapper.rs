//! The resource mapper capability.
//!
//! A mapper knows how one catalog service lays out its datasets in the
//! policy engine's resource hierarchy. Given an entity it produces, in order:
//! - one table-level resource, if the entity has table tags
//! - one column-level resource per tagged column
//!
//! each paired with the ids of the tags that apply to it. Ids for the
//! resources themselves are assigned by the converter.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tagsync_core::canonical::TagCanonicalizer;
use tagsync_core::config::PlatformServiceMap;
use tagsync_core::model::{CatalogEntity, ResourceElement};
use tagsync_core::{TagsyncError, TagsyncResult};

/// How a qualified name decomposes into resource levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifiedNameLayout {
    pub delimiter: char,
    /// Table-identifying levels, outermost first.
    pub levels: &'static [&'static str],
    /// Level name used for column resources.
    pub column_level: &'static str,
}

impl QualifiedNameLayout {
    /// Split `name` into one element per level.
    ///
    /// The segment count must equal the number of levels and no segment may
    /// be empty.
    pub fn table_elements(&self, name: &str) -> TagsyncResult<BTreeMap<String, ResourceElement>> {
        let segments: Vec<&str> = name.split(self.delimiter).collect();
        if segments.len() != self.levels.len() {
            return Err(TagsyncError::invalid_qualified_name(
                name,
                format!(
                    "expected {} '{}'-separated segments ({}), found {}",
                    self.levels.len(),
                    self.delimiter,
                    self.levels.join(", "),
                    segments.len()
                ),
            ));
        }
        if let Some(pos) = segments.iter().position(|s| s.is_empty()) {
            return Err(TagsyncError::invalid_qualified_name(
                name,
                format!("empty {} segment", self.levels[pos]),
            ));
        }

        Ok(self
            .levels
            .iter()
            .zip(segments)
            .map(|(level, value)| (level.to_string(), ResourceElement::single(value)))
            .collect())
    }
}

/// Canonical tag name -> assigned tag id, for one entity.
pub struct TagIndex<'a> {
    by_name: BTreeMap<Arc<str>, u64>,
    canonicalizer: &'a TagCanonicalizer,
}

impl<'a> TagIndex<'a> {
    pub fn new(canonicalizer: &'a TagCanonicalizer) -> Self {
        Self {
            by_name: BTreeMap::new(),
            canonicalizer,
        }
    }

    pub fn insert(&mut self, name: Arc<str>, id: u64) {
        self.by_name.insert(name, id);
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.by_name.get(name).copied()
    }

    /// Ids of every assigned tag whose canonical name matches one of `uris`.
    pub fn ids_for(&self, uris: &[String]) -> TagsyncResult<BTreeSet<u64>> {
        let mut ids = BTreeSet::new();
        for uri in uris {
            let name = self.canonicalizer.canonicalize(uri)?;
            if let Some(id) = self.get(&name) {
                ids.insert(id);
            }
        }
        Ok(ids)
    }
}

/// A resource built by a mapper, before the converter assigns its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedResource {
    pub elements: BTreeMap<String, ResourceElement>,
    pub tag_ids: BTreeSet<u64>,
}

/// Platform-specific resource builder.
pub trait ResourceMapper: Send + Sync {
    /// Factory identifier (used in the extension list).
    fn id(&self) -> &str;

    /// Catalog service this mapper handles (`trino`, `hive`, ...).
    fn service(&self) -> &str;

    fn layout(&self) -> &QualifiedNameLayout;

    /// Policy service name for datasets of `platform` handled by this mapper.
    fn policy_service_name(&self, platform: &str, overrides: &PlatformServiceMap) -> String {
        overrides.resolve(platform, self.service())
    }

    fn build_resources(&self, entity: &CatalogEntity, tags: &TagIndex<'_>) -> TagsyncResult<Vec<MappedResource>> {
        build_layout_resources(self.layout(), entity, tags)
    }
}

/// Table-then-columns construction shared by layout-driven mappers.
pub fn build_layout_resources(
    layout: &QualifiedNameLayout,
    entity: &CatalogEntity,
    tags: &TagIndex<'_>,
) -> TagsyncResult<Vec<MappedResource>> {
    if !entity.has_table_tags() && entity.field_tags.is_empty() {
        return Ok(Vec::new());
    }

    let name = entity.name().ok_or_else(|| {
        TagsyncError::invalid_qualified_name("", format!("entity {} has no qualified name", entity.display_urn()))
    })?;
    let table = layout.table_elements(name)?;

    let mut out = Vec::with_capacity(1 + entity.field_tags.len());
    if entity.has_table_tags() {
        out.push(MappedResource {
            elements: table.clone(),
            tag_ids: tags.ids_for(&entity.table_tags)?,
        });
    }

    for (column, uris) in &entity.field_tags {
        let mut elements = table.clone();
        elements.insert(layout.column_level.to_string(), ResourceElement::single(column.as_str()));
        out.push(MappedResource {
            elements,
            tag_ids: tags.ids_for(uris)?,
        });
    }

    Ok(out)
}
