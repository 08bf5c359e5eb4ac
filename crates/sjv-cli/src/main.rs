//! # sjv CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sjv_cli::check::{run_check, CheckArgs};
use sjv_cli::compile::{run_compile, CompileArgs};
use sjv_cli::ConfigArgs;

/// Streaming JSON Schema validator.
///
/// Compiles a schema into a constraint tree once, then validates documents
/// against it in a single pass without building a document tree.
#[derive(Parser, Debug)]
#[command(name = "sjv", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a schema and validate documents against it.
    Check(CheckArgs),

    /// Compile a schema and report the result.
    Compile(CompileArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG controls verbosity; warnings by default.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let result = cli.config.resolve().and_then(|config| match &cli.command {
        Commands::Check(args) => run_check(args, &config),
        Commands::Compile(args) => run_compile(args, &config),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
