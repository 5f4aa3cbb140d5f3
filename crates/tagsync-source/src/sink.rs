//! Downstream delivery of converted payloads.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use tagsync_core::model::PolicyPayload;
use tagsync_core::{TagsyncError, TagsyncResult};

/// Receiver of converted payloads.
///
/// `start` is called once before the first cycle; `update` once per
/// converted entity, in catalog order. Any error from `update` aborts the
/// remaining deliveries of the cycle.
#[async_trait]
pub trait TagSink: Send + Sync {
    async fn start(&self) -> TagsyncResult<()>;

    async fn update(&self, payload: PolicyPayload) -> TagsyncResult<()>;
}

/// Writes one JSON payload per line.
pub struct JsonLinesSink {
    out: Mutex<Box<dyn Write + Send>>,
    started: AtomicBool,
}

impl JsonLinesSink {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
            started: AtomicBool::new(false),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Create (or truncate) `path`.
    pub fn create(path: &Path) -> TagsyncResult<Self> {
        let file = File::create(path).map_err(|e| {
            TagsyncError::delivery(format!("failed to open sink file {}: {e}", path.display()))
        })?;
        Ok(Self::new(Box::new(BufWriter::new(file))))
    }

    fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut out = self.out.lock();
        out.write_all(line.as_bytes())?;
        out.write_all(b"\n")?;
        out.flush()
    }
}

#[async_trait]
impl TagSink for JsonLinesSink {
    async fn start(&self) -> TagsyncResult<()> {
        self.started.store(true, Ordering::SeqCst);
        tracing::debug!("json-lines sink started");
        Ok(())
    }

    async fn update(&self, payload: PolicyPayload) -> TagsyncResult<()> {
        if !self.started.load(Ordering::SeqCst) {
            return Err(TagsyncError::delivery("sink received update before start"));
        }
        let line = payload
            .to_json()
            .map_err(|e| TagsyncError::delivery(format!("failed to serialize payload: {e}")))?;
        self.write_line(&line)
            .map_err(|e| TagsyncError::delivery(format!("failed to write payload: {e}")))
    }
}
