//! Sync worker: fetch, convert and deliver on a fixed interval.
//!
//! One cycle (`sync_up`):
//! - fetch every catalog entity (a transport or decode failure fails the cycle)
//! - convert entities in catalog order, logging and skipping the ones that
//!   fail conversion
//! - deliver each payload as soon as it is converted; the first delivery
//!   failure aborts the rest of the cycle
//!
//! The loop re-reads the active flag before every cycle. A passive worker
//! skips the cycle but keeps sleeping and re-checking. Cancellation wakes the
//! sleep immediately; an in-flight cycle is allowed to finish.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use tagsync_core::config::SyncConfig;
use tagsync_core::TagsyncResult;
use tagsync_mappers::{EntityConverter, MapperRegistry};

use crate::activity::ActiveFlag;
use crate::client::CatalogClient;
use crate::sink::TagSink;

/// Counters for one completed cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub fetched: usize,
    pub converted: usize,
    pub skipped: usize,
    pub delivered: usize,
}

pub struct TagSyncWorker {
    client: CatalogClient,
    converter: EntityConverter,
    sink: Arc<dyn TagSink>,
    interval: Duration,
    active: ActiveFlag,
    sink_started: AtomicBool,
}

impl TagSyncWorker {
    pub fn new(
        client: CatalogClient,
        converter: EntityConverter,
        sink: Arc<dyn TagSink>,
        interval: Duration,
    ) -> Self {
        Self {
            client,
            converter,
            sink,
            interval,
            active: ActiveFlag::active(),
            sink_started: AtomicBool::new(false),
        }
    }

    pub fn with_active_flag(mut self, active: ActiveFlag) -> Self {
        self.active = active;
        self
    }

    /// Wire a worker from validated configuration.
    ///
    /// Any extension mapper that fails to initialize is a configuration
    /// error; the worker is not created.
    pub fn from_config(cfg: &SyncConfig, sink: Arc<dyn TagSink>) -> TagsyncResult<Self> {
        let registry = MapperRegistry::initialize(&cfg.custom_mappers).into_result()?;
        let converter = EntityConverter::new(registry, cfg.service_map.clone());
        let client = CatalogClient::new(&cfg.catalog)?;
        Ok(Self::new(client, converter, sink, cfg.interval))
    }

    pub fn active_flag(&self) -> &ActiveFlag {
        &self.active
    }

    pub fn converter(&self) -> &EntityConverter {
        &self.converter
    }

    /// Start the sink once, before its first update.
    pub async fn start_sink(&self) -> TagsyncResult<()> {
        if self.sink_started.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        if let Err(e) = self.sink.start().await {
            self.sink_started.store(false, Ordering::SeqCst);
            return Err(e);
        }
        Ok(())
    }

    #[tracing::instrument(level = "info", skip(self))]
    pub async fn sync_up(&self) -> TagsyncResult<SyncReport> {
        let entities = self.client.fetch_all().await?;
        let mut report = SyncReport {
            fetched: entities.len(),
            ..Default::default()
        };

        for entity in &entities {
            tracing::debug!(entity = ?entity, "decoded catalog entity");

            let payload = match self.converter.convert(entity) {
                Ok(p) => p,
                Err(error) => {
                    tracing::error!(
                        urn = entity.display_urn(),
                        platform = entity.platform().unwrap_or_default(),
                        service = entity.service().unwrap_or_default(),
                        %error,
                        "skipping entity that failed conversion"
                    );
                    report.skipped += 1;
                    continue;
                }
            };
            report.converted += 1;

            if tracing::enabled!(tracing::Level::DEBUG) {
                if let Ok(json) = payload.to_json() {
                    tracing::debug!(urn = entity.display_urn(), payload = %json, "delivering payload");
                }
            }

            self.sink.update(payload).await?;
            report.delivered += 1;
        }

        tracing::info!(
            fetched = report.fetched,
            converted = report.converted,
            skipped = report.skipped,
            delivered = report.delivered,
            "sync cycle complete"
        );
        Ok(report)
    }

    /// Start the sink and run a single cycle.
    pub async fn run_once(&self) -> TagsyncResult<SyncReport> {
        self.start_sink().await?;
        self.sync_up().await
    }

    /// Run cycles until `cancel` fires or a cycle fails.
    ///
    /// A failed cycle ends the loop with that error; cancellation ends it
    /// with `Ok`.
    #[tracing::instrument(level = "info", skip_all, fields(interval_ms = self.interval.as_millis() as u64))]
    pub async fn run(&self, cancel: CancellationToken) -> TagsyncResult<()> {
        self.start_sink().await?;

        loop {
            if cancel.is_cancelled() {
                break;
            }

            if self.active.is_active() {
                if let Err(e) = self.sync_up().await {
                    tracing::error!(error = %e, "sync cycle failed; stopping worker");
                    return Err(e);
                }
            } else {
                tracing::debug!("passive mode; skipping sync cycle");
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::info!("tag sync worker stopped");
        Ok(())
    }

    /// Run the loop on a background task.
    pub fn spawn(self: Arc<Self>, cancel: CancellationToken) -> JoinHandle<TagsyncResult<()>> {
        tokio::spawn(async move { self.run(cancel).await })
    }
}
