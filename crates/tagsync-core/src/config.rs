//! Configuration structures for tagsync.
//!
//! This module defines explicit configuration objects consumed by the sync
//! worker. The core crate itself does not read files or environment
//! variables: callers hand in a key/value map (usually parsed from a
//! properties file by the CLI) and get back a validated `SyncConfig`.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::errors::{TagsyncError, TagsyncResult};

pub mod keys {
    pub const ENDPOINT: &str = "tagsync.catalog.endpoint";
    pub const TOKEN: &str = "tagsync.catalog.token";
    pub const INTERVAL_MILLIS: &str = "tagsync.catalog.interval.millis";
    pub const BATCH_SIZE: &str = "tagsync.catalog.batch.size";
    pub const REQUEST_TIMEOUT_MILLIS: &str = "tagsync.catalog.request.timeout.millis";
    pub const SERVICE_MAP: &str = "tagsync.catalog.service.map";
    pub const CUSTOM_MAPPERS: &str = "tagsync.catalog.custom.mappers";
}

pub const DEFAULT_INTERVAL_MILLIS: u64 = 60_000;
pub const DEFAULT_REQUEST_TIMEOUT_MILLIS: u64 = 30_000;

/// Separator used when no override names the policy service.
pub const DEFAULT_SERVICE_SEPARATOR: &str = "_";

/// Worker configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub catalog: CatalogConfig,
    pub interval: Duration,
    pub service_map: PlatformServiceMap,
    /// Extension mapper identifiers registered after the built-ins.
    pub custom_mappers: Vec<String>,
}

/// Catalog connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Base URL without trailing slash.
    pub base_url: String,
    pub token: Option<String>,
    pub batch_size: Option<u32>,
    pub request_timeout: Duration,
}

impl CatalogConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            token: None,
            batch_size: None,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MILLIS),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = if token.trim().is_empty() { None } else { Some(token) };
        self
    }
}

impl SyncConfig {
    pub fn new(catalog: CatalogConfig) -> Self {
        Self {
            catalog,
            interval: Duration::from_millis(DEFAULT_INTERVAL_MILLIS),
            service_map: PlatformServiceMap::default(),
            custom_mappers: Vec::new(),
        }
    }

    /// Build a config from `tagsync.catalog.*` properties.
    pub fn from_properties(props: &BTreeMap<String, String>) -> TagsyncResult<Self> {
        let endpoint = non_blank(props, keys::ENDPOINT).ok_or_else(|| {
            TagsyncError::config(format!("{} is required", keys::ENDPOINT))
        })?;

        let mut catalog = CatalogConfig::new(endpoint);
        if let Some(token) = non_blank(props, keys::TOKEN) {
            catalog = catalog.with_token(token);
        }
        catalog.batch_size = parse_num::<u32>(props, keys::BATCH_SIZE)?;
        if let Some(ms) = parse_num::<u64>(props, keys::REQUEST_TIMEOUT_MILLIS)? {
            catalog.request_timeout = Duration::from_millis(ms);
        }

        let mut cfg = SyncConfig::new(catalog);
        if let Some(ms) = parse_num::<u64>(props, keys::INTERVAL_MILLIS)? {
            cfg.interval = Duration::from_millis(ms);
        }
        let mapping = MappingConfig::from_properties(props)?;
        cfg.service_map = mapping.service_map;
        cfg.custom_mappers = mapping.custom_mappers;

        validate_config(&cfg)?;
        Ok(cfg)
    }
}

/// The conversion-only subset of the configuration.
///
/// Offline tools (page conversion, mapper listing) need the override table
/// and the extension list but no catalog endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingConfig {
    pub service_map: PlatformServiceMap,
    pub custom_mappers: Vec<String>,
}

impl MappingConfig {
    pub fn from_properties(props: &BTreeMap<String, String>) -> TagsyncResult<Self> {
        let mut cfg = Self::default();
        if let Some(table) = non_blank(props, keys::SERVICE_MAP) {
            cfg.service_map = PlatformServiceMap::parse(table)?;
        }
        if let Some(list) = non_blank(props, keys::CUSTOM_MAPPERS) {
            cfg.custom_mappers = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        Ok(cfg)
    }
}

/// (platform, service) -> policy service name overrides.
///
/// Populated once at startup and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformServiceMap {
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

impl PlatformServiceMap {
    /// Parse `platform,service,policyService[,platform,service,policyService...]`.
    ///
    /// Whitespace around items is trimmed and empty items are dropped. The
    /// remaining item count must be a multiple of three.
    pub fn parse(table: &str) -> TagsyncResult<Self> {
        let items: Vec<&str> = table
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if items.len() % 3 != 0 {
            return Err(TagsyncError::config(format!(
                "invalid service mapping (expected platform,service,policyService triples): {table}"
            )));
        }

        let mut map = Self::default();
        for triple in items.chunks_exact(3) {
            map.insert(triple[0], triple[1], triple[2]);
        }
        Ok(map)
    }

    pub fn insert(&mut self, platform: &str, service: &str, policy_service: &str) {
        self.entries
            .entry(platform.to_string())
            .or_default()
            .insert(service.to_string(), policy_service.to_string());
    }

    pub fn get(&self, platform: &str, service: &str) -> Option<&str> {
        self.entries
            .get(platform)
            .and_then(|m| m.get(service))
            .map(String::as_str)
    }

    /// Override if present, otherwise `platform_service`.
    pub fn resolve(&self, platform: &str, service: &str) -> String {
        match self.get(platform, service) {
            Some(name) => name.to_string(),
            None => format!("{platform}{DEFAULT_SERVICE_SEPARATOR}{service}"),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Validate a full configuration object.
pub fn validate_config(cfg: &SyncConfig) -> TagsyncResult<()> {
    if cfg.catalog.base_url.is_empty() {
        return Err(TagsyncError::config("catalog base url must not be empty"));
    }

    if !(cfg.catalog.base_url.starts_with("http://") || cfg.catalog.base_url.starts_with("https://")) {
        return Err(TagsyncError::config(format!(
            "catalog base url must be http(s): {}",
            cfg.catalog.base_url
        )));
    }

    if cfg.catalog.batch_size == Some(0) {
        return Err(TagsyncError::config("batch size must be greater than zero"));
    }

    if cfg.catalog.request_timeout.is_zero() {
        return Err(TagsyncError::config("request timeout must be greater than zero"));
    }

    Ok(())
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn non_blank<'a>(props: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    props.get(key).map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn parse_num<T: std::str::FromStr>(props: &BTreeMap<String, String>, key: &str) -> TagsyncResult<Option<T>> {
    match non_blank(props, key) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| TagsyncError::config(format!("{key} must be a non-negative integer, got '{raw}'"))),
    }
}
