//! # miw CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use miw_cli::identity::{run_did_document, run_identifier, DidDocumentArgs, IdentifierArgs};
use miw_cli::node::{run_bootstrap, BootstrapArgs};

/// Managed Identity Wallet toolchain.
///
/// Previews DID documents, classifies identifiers and bootstraps the
/// authority wallet.
#[derive(Parser, Debug)]
#[command(name = "miw", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML settings file. Defaults to `MIW_*` variables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the DID document a wallet would publish.
    DidDocument(DidDocumentArgs),

    /// Classify a value as DID or BPN.
    Identifier(IdentifierArgs),

    /// Load settings and ensure the authority wallet exists.
    Bootstrap(BootstrapArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::DidDocument(args) => run_did_document(&args),
        Commands::Identifier(args) => run_identifier(&args),
        Commands::Bootstrap(args) => run_bootstrap(&args, cli.config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
