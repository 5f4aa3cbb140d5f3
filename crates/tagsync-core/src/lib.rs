//! tagsync-core
//!
//! Core primitives for tagsync:
//! - catalog entity and policy payload models
//! - error taxonomy shared by every tagsync crate
//! - explicit configuration objects (no environment reads)
//! - tag URI canonicalization with memoization
//! - catalog page decoding
//!
//! This crate does no network I/O.

pub mod canonical;
pub mod config;
pub mod decode;
pub mod errors;
pub mod model;

pub use crate::errors::{TagsyncError, TagsyncResult};

/// Endpoint path of the catalog's dataset listing, relative to the base URL.
pub const DATASET_ENDPOINT: &str = "/openapi/v2/entity/dataset";

/// Query parameter carrying the continuation cursor.
pub const SCROLL_ID_PARAM: &str = "scrollId";

/// Convenience re-exports.
pub mod prelude {
    pub use crate::canonical::{TagCanonicalizer, TAG_URI_PREFIX};
    pub use crate::config::{CatalogConfig, MappingConfig, PlatformServiceMap, SyncConfig};
    pub use crate::decode::{decode_entity, decode_page, decode_page_value};
    pub use crate::model::{
        CatalogEntity, CatalogPage, DatasetIdentity, PolicyPayload, ResourceElement, ResourceRecord,
        Tag, TagDefinition,
    };
    pub use crate::{TagsyncError, TagsyncResult};
}
