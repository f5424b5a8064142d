mod validate;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_kernel::settings::Settings;

/// Shelf book catalog
#[derive(Debug, Parser)]
#[command(name = "shelf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the catalog HTTP server until interrupted
    Serve,
    /// Check a JSON book, or array of books, against the catalog rules
    Validate {
        /// File holding the JSON to check
        file: PathBuf,
        /// Apply update rules, which require an `id` on every entry
        #[arg(long)]
        update: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => {
            let settings = Settings::load().with_context(|| "failed to load Shelf settings")?;
            shelf_telemetry::init(&settings.telemetry)?;

            tracing::info!(env = ?settings.environment, "shelf serve starting");
            shelf_app::bootstrap::run(settings).await
        }
        // Offline: needs neither settings nor a subscriber.
        Command::Validate { file, update } => validate::run(&file, update),
    }
}
