//! Resource mapper registry.
//!
//! The registry maps a catalog service name to the mapper that handles it.
//!
//! Requirements:
//! - stable ordering for listing
//! - duplicate service names are rejected
//! - no global mutable state: the registry is built once at startup and
//!   handed to the converter by value

use std::collections::BTreeMap;

use serde::Serialize;
use tagsync_core::{TagsyncError, TagsyncResult};

use crate::builtin::{mapper_factory, BUILTIN_MAPPERS};
use crate::mapper::ResourceMapper;

/// Listing entry for a registered mapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapperInfo {
    pub id: String,
    pub service: String,
    pub levels: Vec<String>,
    pub column_level: String,
}

/// A registry of mappers keyed by catalog service name.
#[derive(Default)]
pub struct MapperRegistry {
    mappers: BTreeMap<String, Box<dyn ResourceMapper>>,
}

impl MapperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding only the built-in mappers.
    pub fn with_builtins() -> TagsyncResult<Self> {
        Self::initialize(&[]).into_result()
    }

    /// Register the built-ins, then each extension identifier in order.
    ///
    /// Failures are logged and collected; a bad extension does not stop the
    /// remaining ones from registering.
    pub fn initialize(extensions: &[String]) -> RegistryInit {
        let mut registry = Self::new();
        let mut failures = Vec::new();

        let ids = BUILTIN_MAPPERS
            .iter()
            .map(|s| s.to_string())
            .chain(extensions.iter().map(|s| s.trim().to_string()));

        for id in ids {
            let outcome = match mapper_factory(&id) {
                Some(mapper) => registry.register(mapper),
                None => Err(TagsyncError::config(format!("unknown resource mapper: {id}"))),
            };
            if let Err(e) = outcome {
                tracing::error!(mapper = %id, error = %e, "failed to create resource mapper");
                failures.push(MapperFailure { id, error: e });
            }
        }

        tracing::debug!(
            mappers = ?registry.services(),
            failures = failures.len(),
            "resource mappers initialized"
        );
        RegistryInit { registry, failures }
    }

    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }

    /// Register a mapper under its service name.
    pub fn register(&mut self, mapper: Box<dyn ResourceMapper>) -> TagsyncResult<()> {
        let service = mapper.service().to_string();
        if service.trim().is_empty() {
            return Err(TagsyncError::config(format!(
                "resource mapper '{}' declares an empty service",
                mapper.id()
            )));
        }
        if self.mappers.contains_key(&service) {
            return Err(TagsyncError::config(format!(
                "resource mapper already registered for service: {service}"
            )));
        }
        self.mappers.insert(service, mapper);
        Ok(())
    }

    pub fn get(&self, service: &str) -> Option<&dyn ResourceMapper> {
        self.mappers.get(service).map(|m| m.as_ref())
    }

    pub fn is_service_handled(&self, service: &str) -> bool {
        self.mappers.contains_key(service)
    }

    /// Registered service names in deterministic order.
    pub fn services(&self) -> Vec<String> {
        self.mappers.keys().cloned().collect()
    }

    pub fn list(&self) -> Vec<MapperInfo> {
        self.mappers
            .values()
            .map(|m| {
                let layout = m.layout();
                MapperInfo {
                    id: m.id().to_string(),
                    service: m.service().to_string(),
                    levels: layout.levels.iter().map(|l| l.to_string()).collect(),
                    column_level: layout.column_level.to_string(),
                }
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct MapperFailure {
    pub id: String,
    pub error: TagsyncError,
}

/// Outcome of registry initialization.
pub struct RegistryInit {
    pub registry: MapperRegistry,
    pub failures: Vec<MapperFailure>,
}

impl RegistryInit {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Treat any failure as a startup configuration error.
    pub fn into_result(self) -> TagsyncResult<MapperRegistry> {
        if self.failures.is_empty() {
            return Ok(self.registry);
        }
        let ids: Vec<&str> = self.failures.iter().map(|f| f.id.as_str()).collect();
        Err(TagsyncError::config(format!(
            "{} resource mapper(s) failed to initialize: {}",
            ids.len(),
            ids.join(", ")
        )))
    }
}
