//! Entity-to-policy conversion.
//!
//! For one catalog entity:
//! 1. canonicalize every tag URI, collapse duplicates, and assign tag ids
//!    0.. in ascending canonical-name order
//! 2. resolve the policy service name (override map, else
//!    `platform_service`)
//! 3. dispatch to the mapper registered for the entity's service
//! 4. number the mapper's resources 0.. in construction order and link
//!    each to its tag ids
//!
//! Every failure here is scoped to the entity being converted.

use std::collections::BTreeSet;
use std::sync::Arc;

use tagsync_core::canonical::TagCanonicalizer;
use tagsync_core::config::PlatformServiceMap;
use tagsync_core::model::{CatalogEntity, PolicyPayload, ResourceRecord, Tag, TagDefinition};
use tagsync_core::{TagsyncError, TagsyncResult};

use crate::mapper::TagIndex;
use crate::registry::MapperRegistry;

/// Converts catalog entities into policy payloads.
///
/// Owns its registry, override map and canonicalizer cache; nothing is
/// shared with other converter instances.
pub struct EntityConverter {
    registry: MapperRegistry,
    service_map: PlatformServiceMap,
    canonicalizer: TagCanonicalizer,
}

/// Entity that could not be converted, and why.
#[derive(Debug)]
pub struct ConversionFailure {
    pub urn: String,
    pub error: TagsyncError,
}

/// Outcome of converting a batch.
#[derive(Debug, Default)]
pub struct BatchConversion {
    /// Successful payloads, in input order.
    pub payloads: Vec<PolicyPayload>,
    pub failures: Vec<ConversionFailure>,
}

impl EntityConverter {
    pub fn new(registry: MapperRegistry, service_map: PlatformServiceMap) -> Self {
        Self {
            registry,
            service_map,
            canonicalizer: TagCanonicalizer::new(),
        }
    }

    pub fn registry(&self) -> &MapperRegistry {
        &self.registry
    }

    pub fn canonicalizer(&self) -> &TagCanonicalizer {
        &self.canonicalizer
    }

    pub fn convert(&self, entity: &CatalogEntity) -> TagsyncResult<PolicyPayload> {
        let mut payload = PolicyPayload {
            entity_urn: entity.urn.clone(),
            ..Default::default()
        };

        let names = entity
            .all_tag_uris()
            .map(|uri| self.canonicalizer.canonicalize(uri))
            .collect::<TagsyncResult<BTreeSet<Arc<str>>>>()?;

        let mut index = TagIndex::new(&self.canonicalizer);
        for (id, name) in (0u64..).zip(names) {
            payload.tag_definitions.insert(id, TagDefinition::new(id, &*name));
            payload.tags.insert(
                id,
                Tag {
                    id,
                    tag_type: name.to_string(),
                },
            );
            index.insert(name, id);
        }

        let identity = entity.identity.as_ref().ok_or_else(|| TagsyncError::MissingIdentity {
            urn: entity.display_urn().to_string(),
        })?;

        let mapper = self
            .registry
            .get(&identity.service)
            .ok_or_else(|| TagsyncError::UnsupportedService {
                platform: identity.platform.clone(),
                service: identity.service.clone(),
            })?;

        let service_name = mapper.policy_service_name(&identity.platform, &self.service_map);

        for (id, resource) in (0u64..).zip(mapper.build_resources(entity, &index)?) {
            payload.service_resources.push(ResourceRecord {
                id,
                service_name: service_name.clone(),
                resource_elements: resource.elements,
            });
            payload.resource_to_tag_ids.insert(id, resource.tag_ids);
        }

        Ok(payload)
    }

    /// Convert every entity, collecting failures instead of stopping.
    pub fn convert_batch(&self, entities: &[CatalogEntity]) -> BatchConversion {
        let mut out = BatchConversion::default();
        for entity in entities {
            match self.convert(entity) {
                Ok(payload) => out.payloads.push(payload),
                Err(error) => {
                    tracing::error!(
                        urn = entity.display_urn(),
                        platform = entity.platform().unwrap_or_default(),
                        service = entity.service().unwrap_or_default(),
                        %error,
                        "skipping entity that failed conversion"
                    );
                    out.failures.push(ConversionFailure {
                        urn: entity.display_urn().to_string(),
                        error,
                    });
                }
            }
        }
        out
    }
}
