use anyhow::Result;
use clap::Parser;

mod args;
mod cmd;
mod io;
mod output;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = args::Cli::parse();
    init_tracing(cli.json_logs);
    output::init(cli.json);

    cmd::dispatch(cli).await
}

/// Logs go to stderr so stdout stays clean for reports and payload lines.
fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
