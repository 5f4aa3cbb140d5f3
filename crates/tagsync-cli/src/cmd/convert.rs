use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tagsync_core::decode::decode_page;
use tagsync_core::model::PolicyPayload;
use tagsync_mappers::{EntityConverter, MapperRegistry};

use crate::io::settings::load_mapping_config;
use crate::output;

#[derive(Debug, Serialize)]
pub struct SkippedEntity {
    pub urn: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct ConvertOut {
    pub entities: usize,
    pub has_more: bool,
    pub skipped: Vec<SkippedEntity>,
    pub payloads: Vec<PolicyPayload>,
}

pub async fn run(page_path: &Path, config: Option<&Path>) -> Result<()> {
    let raw = fs::read(page_path).with_context(|| format!("failed to read {}", page_path.display()))?;
    let page = decode_page(&raw)?;

    let mapping = load_mapping_config(config)?;
    let registry = MapperRegistry::initialize(&mapping.custom_mappers).into_result()?;
    let converter = EntityConverter::new(registry, mapping.service_map);

    let batch = converter.convert_batch(&page.entities);
    let skipped = batch
        .failures
        .into_iter()
        .map(|f| SkippedEntity { urn: f.urn, error: f.error.to_string() })
        .collect();

    output::print(&ConvertOut {
        entities: page.entities.len(),
        has_more: !page.is_last(),
        skipped,
        payloads: batch.payloads,
    })?;
    Ok(())
}
