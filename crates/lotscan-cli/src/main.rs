use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod scrape;

#[derive(Debug, Parser)]
#[command(name = "lotscan-cli")]
#[command(about = "Scrape dealership inventory and publish it to Google Sheets")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
enum Commands {
    /// Scrape every listed vehicle and upload the records (the default).
    Scrape {
        /// Skip the Google Sheets upload even when credentials are set.
        #[arg(long)]
        no_upload: bool,
        /// Also write the records to this file as JSON.
        #[arg(long, value_name = "PATH")]
        json: Option<PathBuf>,
    },
    /// Print the detail-page URLs found on the listing pages, one per line.
    Links,
}

impl Cli {
    fn command_or_default(self) -> Commands {
        self.command.unwrap_or(Commands::Scrape {
            no_upload: false,
            json: None,
        })
    }
}

/// `RUST_LOG` wins; otherwise the configured level applies.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = lotscan_core::load_app_config()?;
    init_tracing(&config.log_level);
    tracing::debug!(?config, "configuration loaded");

    match cli.command_or_default() {
        Commands::Scrape { no_upload, json } => {
            scrape::run_scrape(&config, no_upload, json.as_deref()).await
        }
        Commands::Links => scrape::run_links(&config).await,
    }
}
