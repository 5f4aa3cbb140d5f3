//! Error taxonomy for tagsync.
//!
//! Every failure the sync pipeline can produce maps onto one variant here.
//! The variants are grouped by blast radius:
//! - configuration errors stop the process before the worker starts
//! - transport and decode errors fail the whole fetch for a cycle
//! - conversion errors are scoped to one entity
//! - delivery errors abort the remaining deliveries of a cycle

use thiserror::Error;

pub type TagsyncResult<T> = Result<T, TagsyncError>;

#[derive(Debug, Error)]
pub enum TagsyncError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("transport error for {url}: {message}")]
    Transport {
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid tag format: {0}")]
    InvalidTagFormat(String),

    #[error("unsupported platform service '{service}' (platform '{platform}')")]
    UnsupportedService { platform: String, service: String },

    #[error("entity {urn} carries no dataset identity aspect")]
    MissingIdentity { urn: String },

    #[error("invalid qualified name '{name}': {reason}")]
    InvalidQualifiedName { name: String, reason: String },

    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl TagsyncError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }

    /// Non-success HTTP status on `url`.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::Transport {
            url: url.into(),
            status: Some(status),
            message: format!("failed with response code: {status}"),
        }
    }

    /// Connection or body-read failure on `url`.
    pub fn transport(url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            status: None,
            message: msg.into(),
        }
    }

    pub fn invalid_qualified_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidQualifiedName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// True for failures that only invalidate the entity being converted.
    ///
    /// The orchestrator logs these and continues with the rest of the batch.
    pub fn is_entity_scoped(&self) -> bool {
        matches!(
            self,
            Self::InvalidTagFormat(_)
                | Self::UnsupportedService { .. }
                | Self::MissingIdentity { .. }
                | Self::InvalidQualifiedName { .. }
        )
    }

    /// HTTP status code carried by a transport error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_carries_code_and_url() {
        let err = TagsyncError::http_status("http://catalog/openapi/v2/entity/dataset", 503);
        assert_eq!(err.status(), Some(503));
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("http://catalog/openapi/v2/entity/dataset"));
    }

    #[test]
    fn entity_scope_classification() {
        assert!(TagsyncError::InvalidTagFormat("x".into()).is_entity_scoped());
        assert!(TagsyncError::invalid_qualified_name("a.b", "too short").is_entity_scoped());
        assert!(!TagsyncError::decode("bad page").is_entity_scoped());
        assert!(!TagsyncError::delivery("sink closed").is_entity_scoped());
        assert!(!TagsyncError::transport("u", "refused").is_entity_scoped());
    }
}
