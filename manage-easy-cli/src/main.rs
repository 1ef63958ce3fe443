//! Manage Easy CLI - reorder and edit work items on the board.
//!
//! Commands:
//! - `manage-easy lanes [--feature ID] [--json]`: Show every lane in board order
//! - `manage-easy move <ID> <LANE> [--index N]`: Move an item and print the writes issued
//! - `manage-easy add <TITLE> [--lane LANE] [--kind task|bug]`: Create an item at the end of a lane
//! - `manage-easy delete <ID>`: Delete an item
//!
//! Environment variables:
//! - MANAGE_EASY_STORE__BASE_URL: Override the Cloud Functions base URL
//! - MANAGE_EASY_STORE__TOKEN: Bearer token for the store
//! - RUST_LOG: Log filter when `--debug` is not given
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error

use clap::Parser;
use tracing_subscriber::EnvFilter;

use manage_easy_board::{AppConfig, ConfigProvider, HttpWorkStore};
use manage_easy_cli::commands;
use manage_easy_cli::{Cli, Commands};

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut provider = ConfigProvider::new();
    if let Some(ref path) = cli.config {
        provider = provider.with_file(path);
    }
    Ok(provider.load()?)
}

async fn run(cli: Cli) -> anyhow::Result<String> {
    let config = load_config(&cli)?;
    let store = HttpWorkStore::new(&config.store)?;
    let layout = &config.layout;

    match cli.command {
        Commands::Lanes { feature, json } => {
            commands::run_lanes(&store, layout, feature.as_deref(), json).await
        }
        Commands::Move { id, lane, index } => {
            commands::run_move(&store, layout, &id, lane, index).await
        }
        Commands::Add { title, lane, kind } => {
            commands::run_add(&store, layout, &title, lane, kind).await
        }
        Commands::Delete { id } => commands::run_delete(&store, &id).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing with appropriate level
    let filter = if cli.debug {
        EnvFilter::new("manage_easy_board=debug,manage_easy_cli=debug,manage_easy=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}
