use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tagsync_mappers::{MapperInfo, MapperRegistry};

use crate::io::settings::load_mapping_config;
use crate::output;

#[derive(Debug, Serialize)]
pub struct FailedMapper {
    pub id: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct MappersOut {
    pub mappers: Vec<MapperInfo>,
    pub failures: Vec<FailedMapper>,
}

pub async fn run(config: Option<&Path>) -> Result<()> {
    let mapping = load_mapping_config(config)?;
    let init = MapperRegistry::initialize(&mapping.custom_mappers);

    let failures = init
        .failures
        .iter()
        .map(|f| FailedMapper { id: f.id.clone(), error: f.error.to_string() })
        .collect();

    output::print(&MappersOut { mappers: init.registry.list(), failures })?;
    Ok(())
}
