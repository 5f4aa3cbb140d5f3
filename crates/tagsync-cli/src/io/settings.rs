//! Builds library configuration from a properties file plus CLI overrides.

use std::path::Path;

use anyhow::Result;
use tagsync_core::config::{keys, MappingConfig, SyncConfig};

use crate::args::SyncArgs;
use crate::io::properties::read_properties;

pub fn load_sync_config(args: &SyncArgs) -> Result<SyncConfig> {
    let mut props = read_properties(&args.config)?;
    if let Some(endpoint) = &args.endpoint {
        props.insert(keys::ENDPOINT.to_string(), endpoint.clone());
    }
    if let Some(token) = &args.token {
        props.insert(keys::TOKEN.to_string(), token.clone());
    }
    Ok(SyncConfig::from_properties(&props)?)
}

/// Mapping settings from an optional file; defaults when absent.
pub fn load_mapping_config(path: Option<&Path>) -> Result<MappingConfig> {
    match path {
        None => Ok(MappingConfig::default()),
        Some(p) => Ok(MappingConfig::from_properties(&read_properties(p)?)?),
    }
}
