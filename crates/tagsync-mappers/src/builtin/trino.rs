//! Trino-family mapper: `catalog.schema.table`, plus `column`.

use crate::mapper::{QualifiedNameLayout, ResourceMapper};

pub const TRINO_LAYOUT: QualifiedNameLayout = QualifiedNameLayout {
    delimiter: '.',
    levels: &["catalog", "schema", "table"],
    column_level: "column",
};

pub struct TrinoMapper {
    service: String,
}

impl TrinoMapper {
    pub fn new() -> Self {
        Self::for_service("trino")
    }

    /// Same hierarchy under another service name (e.g. `presto`).
    pub fn for_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }
}

impl Default for TrinoMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceMapper for TrinoMapper {
    fn id(&self) -> &str {
        &self.service
    }

    fn service(&self) -> &str {
        &self.service
    }

    fn layout(&self) -> &QualifiedNameLayout {
        &TRINO_LAYOUT
    }
}
