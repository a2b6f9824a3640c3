//! Jotter CLI - browse and edit notes on a hosted notes backend

mod cli;
mod commands;
mod error;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::common::AppContext;
use crate::commands::{run_add, run_delete, run_edit, run_list, run_theme};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("jotter=info")),
        )
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::from_cli(&cli)?;

    let result = match cli.command {
        Commands::List {
            search,
            page,
            per_page,
            json,
        } => run_list(&ctx, search.as_deref(), page, per_page, json).await,
        Commands::Add { title, content } => run_add(&ctx, title.as_deref(), &content).await,
        Commands::Edit { id, title, content } => {
            run_edit(&ctx, &id, title.as_deref(), content.as_deref()).await
        }
        Commands::Delete { id } => run_delete(&ctx, &id).await,
        Commands::Theme { mode } => run_theme(&ctx, mode),
    };

    ctx.flush_toasts();
    result
}
