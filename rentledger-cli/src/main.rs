//! rentledger CLI - HTTP API for rental property expense tracking
//!
//! Subcommands:
//! - `serve`: run migrations, then the HTTP server
//! - `migrate`: run migrations and exit

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "rentledger",
    author,
    version,
    about = "Track rental properties and the expenses recorded against them"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Run schema migrations and exit
    Migrate(commands::migrate::MigrateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; environment always wins.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init_tracing(&tracing_setup::TracingConfig { debug: cli.debug })?;

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await,
        Commands::Migrate(args) => commands::run_migrate(args).await,
    }
}
