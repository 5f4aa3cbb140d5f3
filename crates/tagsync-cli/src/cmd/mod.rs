use std::sync::Arc;

use anyhow::Result;
use tagsync_source::{JsonLinesSink, TagSink, TagSyncWorker};

use crate::args::{Cli, Command, SyncArgs};
use crate::io::settings::load_sync_config;
use crate::output;

mod convert;
mod mappers;
mod once;
mod run;

pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run(args) => run::run(&args).await,
        Command::Once(args) => once::run(&args).await,
        Command::Convert { page, config } => convert::run(&page, config.as_deref()).await,
        Command::Mappers { config } => mappers::run(config.as_deref()).await,
    }
}

/// Config, sink and worker for `run`/`once`.
///
/// Any failure here is a startup error: it is reported as `STARTUP_ERROR`
/// and the process exits with status 1 before the worker starts.
fn start_worker(args: &SyncArgs) -> TagSyncWorker {
    match build_worker(args) {
        Ok(w) => w,
        Err(err) => {
            output::eprintln_line(&format!("STARTUP_ERROR {err:#}"));
            std::process::exit(1);
        }
    }
}

fn build_worker(args: &SyncArgs) -> Result<TagSyncWorker> {
    let cfg = load_sync_config(args)?;
    let sink: Arc<dyn TagSink> = match &args.out {
        Some(path) => Arc::new(JsonLinesSink::create(path)?),
        None => Arc::new(JsonLinesSink::stdout()),
    };
    let worker = TagSyncWorker::from_config(&cfg, sink)?;
    tracing::info!(
        endpoint = %cfg.catalog.base_url,
        interval_ms = cfg.interval.as_millis() as u64,
        mappers = ?worker.converter().registry().services(),
        overrides = cfg.service_map.len(),
        "tag sync worker configured"
    );
    Ok(worker)
}
