use std::fs::File;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hnfeed::app::AppContext;
use hnfeed::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref())?;

    let ctx = AppContext::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            hnfeed::tui::run(Arc::new(ctx)).await?;
        }
        Commands::Feed(args) => {
            commands::print_feed(&ctx, &args).await?;
        }
        Commands::Comments { id, limit } => {
            commands::print_comments(&ctx, id, limit).await?;
        }
        Commands::Picks => {
            commands::print_picks(&ctx).await?;
        }
    }

    Ok(())
}

/// Logs go to `log_path` when given; the TUI owns stderr's terminal otherwise.
fn init_tracing(log_path: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env();

    match log_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
