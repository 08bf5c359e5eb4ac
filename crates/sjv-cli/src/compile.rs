//! # Compile Subcommand
//!
//! `sjv compile --schema <file>` compiles a schema without validating
//! anything, for checking schemas in CI.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use sjv_schema::{compile, SchemaError, ValidatorConfig};

/// Arguments for the `sjv compile` subcommand.
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Schema file to compile.
    #[arg(long, short)]
    pub schema: PathBuf,
}

/// Execute the compile subcommand.
pub fn run_compile(args: &CompileArgs, config: &ValidatorConfig) -> Result<u8> {
    let text = crate::read_text(&args.schema)?;
    match compile(&text, config) {
        Ok(schema) => {
            println!(
                "ok {}: {} nodes",
                args.schema.display(),
                schema.node_count()
            );
            Ok(0)
        }
        Err(err) => {
            println!("fail {}: {}", args.schema.display(), describe(&err));
            Ok(1)
        }
    }
}

/// One-line description of a compile error.
pub fn describe(err: &SchemaError) -> String {
    match err.keyword() {
        Some(keyword) => format!("invalid value for '{keyword}'"),
        None => err.to_string(),
    }
}
