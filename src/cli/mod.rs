use crate::errors::AppResult;
use clap::{Parser, Subcommand};

pub mod commands;

/// TON Jetton cell codec
#[derive(Parser)]
#[command(name = "jetton-codec")]
#[command(about = "Encode and decode TON Jetton metadata and message cells")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Encode or decode on-chain token metadata content cells
    Metadata(commands::metadata::MetadataCommand),
    /// Encode or decode minter and bonded-curve message bodies
    Message(commands::message::MessageCommand),
    /// Print the cell tree, depth and hash of a BOC
    Inspect(commands::inspect::InspectCommand),
}

pub fn run() -> AppResult<()> {
    // Uses RUST_LOG environment variable (defaults to "error" if not set)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Metadata(command) => command.run(),
        Commands::Message(command) => command.run(),
        Commands::Inspect(command) => command.run(),
    }
}
