use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::args::SyncArgs;

pub async fn run(args: &SyncArgs) -> Result<()> {
    let worker = Arc::new(super::start_worker(args));
    let cancel = CancellationToken::new();

    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received; stopping after current cycle");
            on_signal.cancel();
        }
    });

    worker.spawn(cancel).await??;
    Ok(())
}
