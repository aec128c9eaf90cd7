//! LTI CLI - launch verification tooling.
//!
//! Provides commands for:
//! - `sign`: Sign launch parameters as a tool consumer would
//! - `verify`: Validate a launch body against configured consumers

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{SignArgs, VerifyArgs};
use output::Output;

/// LTI - launch verification tooling.
#[derive(Parser)]
#[command(name = "lti", version, about)]
struct Cli {
    /// Enable info-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign launch parameters as a tool consumer.
    Sign(SignArgs),
    /// Validate a signed launch body.
    Verify(VerifyArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Sign(args) => args.execute(),
        Commands::Verify(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
