//! Tag URI canonicalization.
//!
//! The catalog names tags as URIs (`urn:li:tag:pii`); the policy engine wants
//! the bare name (`pii`). The mapping is pure, so results are memoized per
//! canonicalizer instance. The cache never evicts: the tag vocabulary is
//! bounded by the catalog's tag dictionary.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::errors::{TagsyncError, TagsyncResult};

/// Fixed prefix of every catalog tag URI.
pub const TAG_URI_PREFIX: &str = "urn:li:tag:";

/// Memoizing tag URI -> canonical name converter.
///
/// Cheap to share behind `&` or `Arc`; give each worker its own instance if
/// several run concurrently.
#[derive(Debug, Default)]
pub struct TagCanonicalizer {
    cache: RwLock<HashMap<String, Arc<str>>>,
}

impl TagCanonicalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strip the tag URI prefix, consulting the cache first.
    pub fn canonicalize(&self, uri: &str) -> TagsyncResult<Arc<str>> {
        if let Some(hit) = self.cache.read().get(uri) {
            return Ok(Arc::clone(hit));
        }

        let name: Arc<str> = Arc::from(strip_tag_prefix(uri)?);
        self.cache
            .write()
            .entry(uri.to_string())
            .or_insert_with(|| Arc::clone(&name));
        Ok(name)
    }

    /// Number of memoized URIs.
    pub fn cached(&self) -> usize {
        self.cache.read().len()
    }
}

/// Uncached canonicalization.
pub fn strip_tag_prefix(uri: &str) -> TagsyncResult<&str> {
    uri.strip_prefix(TAG_URI_PREFIX)
        .ok_or_else(|| TagsyncError::InvalidTagFormat(uri.to_string()))
}
