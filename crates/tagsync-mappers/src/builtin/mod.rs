//! Built-in resource mappers and the extension factory table.
//!
//! Mappers are constructed by identifier. The built-in list is always
//! registered; extension identifiers from configuration go through the same
//! factory, so an unknown identifier fails at startup rather than mid-cycle.

pub mod hive;
pub mod trino;

use crate::mapper::ResourceMapper;

pub use hive::HiveMapper;
pub use trino::TrinoMapper;

/// Mappers registered on every start.
pub const BUILTIN_MAPPERS: &[&str] = &["trino", "hive"];

/// Every identifier the factory can construct.
pub const KNOWN_MAPPERS: &[&str] = &["hive", "presto", "trino"];

/// Construct a mapper by identifier.
pub fn mapper_factory(id: &str) -> Option<Box<dyn ResourceMapper>> {
    match id {
        "trino" => Some(Box::new(TrinoMapper::new())),
        "presto" => Some(Box::new(TrinoMapper::for_service("presto"))),
        "hive" => Some(Box::new(HiveMapper)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_id_constructs() {
        for id in KNOWN_MAPPERS {
            let m = mapper_factory(id).unwrap();
            assert_eq!(m.id(), *id);
        }
        for id in BUILTIN_MAPPERS {
            assert!(KNOWN_MAPPERS.contains(id));
        }
    }

    #[test]
    fn unknown_id_is_none() {
        assert!(mapper_factory("org.example.CustomMapper").is_none());
    }
}
