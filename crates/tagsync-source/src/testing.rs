//! In-memory transport and sink used by unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use url::Url;

use tagsync_core::model::PolicyPayload;
use tagsync_core::{TagsyncError, TagsyncResult};

use crate::sink::TagSink;
use crate::transport::PageTransport;

pub enum Reply {
    Page(Value),
    Status(u16),
}

/// Replays queued replies; an empty queue answers with an empty final page.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<(String, Option<String>)>>,
}

impl ScriptedTransport {
    pub fn with(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::default(),
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests.lock().iter().map(|(u, _)| u.clone()).collect()
    }

    pub fn bearers(&self) -> Vec<Option<String>> {
        self.requests.lock().iter().map(|(_, b)| b.clone()).collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl PageTransport for ScriptedTransport {
    async fn get(&self, url: &Url, bearer: Option<&str>) -> TagsyncResult<Vec<u8>> {
        self.requests
            .lock()
            .push((url.to_string(), bearer.map(str::to_string)));

        let reply = self.replies.lock().pop_front();
        match reply {
            None => Ok(json!({ "entities": [] }).to_string().into_bytes()),
            Some(Reply::Page(v)) => Ok(v.to_string().into_bytes()),
            Some(Reply::Status(code)) => Err(TagsyncError::http_status(url.as_str(), code)),
        }
    }
}

/// Records delivered payloads; optionally rejects after `fail_after` deliveries.
#[derive(Default)]
pub struct RecordingSink {
    started: AtomicBool,
    updates: Mutex<Vec<PolicyPayload>>,
    fail_after: Option<usize>,
}

impl RecordingSink {
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Default::default()
        }
    }

    pub fn started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub fn delivered(&self) -> Vec<PolicyPayload> {
        self.updates.lock().clone()
    }
}

#[async_trait]
impl TagSink for RecordingSink {
    async fn start(&self) -> TagsyncResult<()> {
        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn update(&self, payload: PolicyPayload) -> TagsyncResult<()> {
        let mut updates = self.updates.lock();
        if self.fail_after.is_some_and(|n| updates.len() >= n) {
            return Err(TagsyncError::delivery("sink rejected payload"));
        }
        updates.push(payload);
        Ok(())
    }
}

/// A catalog entity object with one table tag.
pub fn trino_entity(table: &str, tag: &str) -> Value {
    json!({
        "urn": format!("urn:li:dataset:(urn:li:dataPlatform:trino,db.schema.{table},PROD)"),
        "datasetKey": { "value": {
            "platform": "urn:li:dataPlatform:trino",
            "name": format!("db.schema.{table}")
        }},
        "globalTags": { "value": { "tags": [{ "tag": format!("urn:li:tag:{tag}") }] } }
    })
}

pub fn page(entities: Vec<Value>, scroll_id: Option<&str>) -> Reply {
    Reply::Page(json!({ "entities": entities, "scrollId": scroll_id }))
}
