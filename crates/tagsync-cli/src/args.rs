use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "tagsync", version, about = "Catalog tag sync for the policy engine")]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Poll the catalog on an interval until interrupted.
    Run(SyncArgs),

    /// Run a single sync cycle and print its report.
    Once(SyncArgs),

    /// Convert a saved catalog page offline and print the payloads.
    Convert {
        /// Catalog page JSON file.
        page: PathBuf,

        /// Properties file for the service map and extension mappers.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List registered resource mappers.
    Mappers {
        /// Properties file for extension mappers.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// Properties file (tagsync.catalog.* keys).
    #[arg(long)]
    pub config: PathBuf,

    /// Override tagsync.catalog.endpoint.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Override tagsync.catalog.token.
    #[arg(long, env = "TAGSYNC_CATALOG_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Write payloads as JSON lines to this file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}
