//! tagsync data models.
//!
//! Two sides of the conversion live here:
//! - `entity`: the normalized catalog view (`CatalogEntity`, `CatalogPage`)
//! - `payload`: the policy engine's tag/resource graph (`PolicyPayload`)
//!
//! Models are plain data. Decoding lives in `crate::decode`, conversion in
//! the `tagsync-mappers` crate.

pub mod entity;
pub mod payload;

pub use entity::{CatalogEntity, CatalogPage, DatasetIdentity};
pub use payload::{PolicyPayload, ResourceElement, ResourceRecord, Tag, TagDefinition, TAG_SOURCE};
