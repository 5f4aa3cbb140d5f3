//! Catalog client: cursor pagination over the dataset listing.
//!
//! `fetch_all` drains every page of one sync cycle:
//! 1. GET `{base}/openapi/v2/entity/dataset`
//! 2. decode the page and append its entities
//! 3. if the page carries a `scrollId`, GET again with `?scrollId=<cursor>`
//! 4. stop at the first page without a cursor
//!
//! Any failing page fails the whole fetch; partial results are dropped.

use std::sync::Arc;

use url::Url;

use tagsync_core::config::CatalogConfig;
use tagsync_core::decode::decode_page;
use tagsync_core::model::{CatalogEntity, CatalogPage};
use tagsync_core::{TagsyncError, TagsyncResult, DATASET_ENDPOINT, SCROLL_ID_PARAM};

use crate::transport::{HttpTransport, PageTransport};

/// Query parameter carrying the batch size hint.
pub const COUNT_PARAM: &str = "count";

pub struct CatalogClient {
    endpoint: Url,
    token: Option<String>,
    batch_size: Option<u32>,
    transport: Arc<dyn PageTransport>,
}

impl CatalogClient {
    /// Client over `reqwest`.
    pub fn new(cfg: &CatalogConfig) -> TagsyncResult<Self> {
        let transport = HttpTransport::new(cfg.request_timeout)?;
        Self::with_transport(cfg, Arc::new(transport))
    }

    pub fn with_transport(cfg: &CatalogConfig, transport: Arc<dyn PageTransport>) -> TagsyncResult<Self> {
        let raw = format!("{}{}", cfg.base_url, DATASET_ENDPOINT);
        let endpoint = Url::parse(&raw)
            .map_err(|e| TagsyncError::config(format!("invalid catalog endpoint {raw}: {e}")))?;

        Ok(Self {
            endpoint,
            token: cfg.token.clone(),
            batch_size: cfg.batch_size,
            transport,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// URL of the page after `cursor` (first page when `None`).
    pub fn page_url(&self, cursor: Option<&str>) -> Url {
        let mut url = self.endpoint.clone();
        if self.batch_size.is_some() || cursor.is_some() {
            let mut q = url.query_pairs_mut();
            if let Some(n) = self.batch_size {
                q.append_pair(COUNT_PARAM, &n.to_string());
            }
            if let Some(c) = cursor {
                q.append_pair(SCROLL_ID_PARAM, c);
            }
        }
        url
    }

    pub async fn fetch_page(&self, cursor: Option<&str>) -> TagsyncResult<CatalogPage> {
        let url = self.page_url(cursor);
        let body = self.transport.get(&url, self.token.as_deref()).await?;
        decode_page(&body).map_err(|e| match e {
            TagsyncError::Decode(msg) => TagsyncError::decode(format!("{msg} (request: {url})")),
            other => other,
        })
    }

    #[tracing::instrument(level = "info", skip(self), fields(endpoint = %self.endpoint))]
    pub async fn fetch_all(&self) -> TagsyncResult<Vec<CatalogEntity>> {
        let mut entities = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self.fetch_page(cursor.as_deref()).await?;
            pages += 1;
            tracing::debug!(
                page = pages,
                entities = page.entities.len(),
                has_more = !page.is_last(),
                "fetched catalog page"
            );

            entities.extend(page.entities);
            match page.scroll_id {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        tracing::info!(pages, entities = entities.len(), "catalog fetch complete");
        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::testing::{page, trino_entity, Reply, ScriptedTransport};

    fn client(transport: Arc<ScriptedTransport>) -> CatalogClient {
        let cfg = CatalogConfig::new("http://catalog:8080/");
        CatalogClient::with_transport(&cfg, transport).unwrap()
    }

    #[tokio::test]
    async fn drains_pages_in_order() {
        let transport = Arc::new(ScriptedTransport::with(vec![
            page(vec![trino_entity("a", "x"), trino_entity("b", "x")], Some("c1")),
            page(vec![trino_entity("c", "x")], Some("c2")),
            page(vec![trino_entity("d", "x")], None),
        ]));
        let entities = client(transport.clone()).fetch_all().await.unwrap();

        let names: Vec<&str> = entities.iter().filter_map(|e| e.name()).collect();
        assert_eq!(names, vec!["db.schema.a", "db.schema.b", "db.schema.c", "db.schema.d"]);
        assert_eq!(
            transport.urls(),
            vec![
                "http://catalog:8080/openapi/v2/entity/dataset".to_string(),
                "http://catalog:8080/openapi/v2/entity/dataset?scrollId=c1".to_string(),
                "http://catalog:8080/openapi/v2/entity/dataset?scrollId=c2".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn failing_second_page_aborts_fetch() {
        let transport = Arc::new(ScriptedTransport::with(vec![
            page(vec![trino_entity("a", "x")], Some("c1")),
            Reply::Status(503),
        ]));
        let err = client(transport.clone()).fetch_all().await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("scrollId=c1"));
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn malformed_page_is_decode_error_with_url() {
        let transport = Arc::new(ScriptedTransport::with(vec![Reply::Page(serde_json::json!({
            "entities": [{ "datasetKey": { "value": { "platform": "mysql" } } }]
        }))]));
        assert_matches!(
            client(transport).fetch_all().await,
            Err(TagsyncError::Decode(msg)) if msg.contains("openapi/v2/entity/dataset")
        );
    }

    #[tokio::test]
    async fn bearer_token_is_attached_when_configured() {
        let transport = Arc::new(ScriptedTransport::default());
        let cfg = CatalogConfig::new("http://catalog").with_token("secret");
        CatalogClient::with_transport(&cfg, transport.clone())
            .unwrap()
            .fetch_all()
            .await
            .unwrap();
        assert_eq!(transport.bearers(), vec![Some("secret".to_string())]);

        let transport = Arc::new(ScriptedTransport::default());
        client(transport.clone()).fetch_all().await.unwrap();
        assert_eq!(transport.bearers(), vec![None]);
    }

    #[test]
    fn batch_size_and_cursor_are_query_params() {
        let mut cfg = CatalogConfig::new("https://catalog/");
        cfg.batch_size = Some(50);
        let c = CatalogClient::with_transport(&cfg, Arc::new(ScriptedTransport::default())).unwrap();
        assert_eq!(c.page_url(None).as_str(), "https://catalog/openapi/v2/entity/dataset?count=50");
        assert_eq!(
            c.page_url(Some("a b")).as_str(),
            "https://catalog/openapi/v2/entity/dataset?count=50&scrollId=a+b"
        );
    }
}
