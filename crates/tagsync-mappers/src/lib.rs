//! tagsync-mappers
//!
//! Translates normalized catalog entities into the policy engine's
//! tag/resource graph:
//! - `mapper`: the per-platform `ResourceMapper` capability
//! - `builtin`: trino/presto and hive mappers plus the factory table
//! - `registry`: service name -> mapper, built once at startup
//! - `convert`: tag id assignment and resource numbering per entity

pub mod builtin;
pub mod convert;
pub mod mapper;
pub mod registry;

pub use convert::{BatchConversion, ConversionFailure, EntityConverter};
pub use mapper::{MappedResource, QualifiedNameLayout, ResourceMapper, TagIndex};
pub use registry::{MapperInfo, MapperRegistry, RegistryInit};
