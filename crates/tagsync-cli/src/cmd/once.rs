use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::args::SyncArgs;
use crate::output;

pub async fn run(args: &SyncArgs) -> Result<()> {
    let worker = super::start_worker(args);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message("syncing catalog tags");

    let result = worker.run_once().await;
    pb.finish_and_clear();

    output::print(&result?)?;
    Ok(())
}
