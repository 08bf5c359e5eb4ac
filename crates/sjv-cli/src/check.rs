//! # Check Subcommand
//!
//! `sjv check --schema <file> <doc>...` compiles the schema once and
//! validates every document against it, printing one line per document:
//!
//! ```text
//! ok orders/1.json
//! fail orders/2.json: required at #/customer
//! ```
//!
//! Malformed documents are reported and counted as failures; they do not
//! stop the remaining documents from being checked.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Args;
use sjv_schema::{compile, ValidatorConfig, Verdict};

use crate::compile::describe;

/// Arguments for the `sjv check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema file to compile.
    #[arg(long, short)]
    pub schema: PathBuf,

    /// Documents to validate.
    #[arg(required = true)]
    pub documents: Vec<PathBuf>,
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs, config: &ValidatorConfig) -> Result<u8> {
    let text = crate::read_text(&args.schema)?;
    let schema = compile(&text, config)
        .map_err(|e| anyhow!("compiling {}: {}", args.schema.display(), describe(&e)))?;

    let mut failed = 0usize;
    for path in &args.documents {
        let document = crate::read_text(path)?;
        match schema.validate(&document) {
            Ok(Verdict::Match) => println!("ok {}", path.display()),
            Ok(Verdict::NoMatch(mismatch)) => {
                failed += 1;
                println!("fail {}: {mismatch}", path.display());
            }
            Err(err) => {
                failed += 1;
                println!("fail {}: {err}", path.display());
            }
        }
    }

    tracing::info!(
        documents = args.documents.len(),
        failed,
        "check complete"
    );
    Ok(if failed == 0 { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const SCHEMA: &str = r#"{"type":"object","required":["id"],"properties":{"id":{"type":"number","minimum":1}}}"#;

    fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_all_documents_pass() {
        let dir = tempfile::tempdir().unwrap();
        let args = CheckArgs {
            schema: write(dir.path(), "schema.json", SCHEMA),
            documents: vec![
                write(dir.path(), "a.json", r#"{"id":1}"#),
                write(dir.path(), "b.json", r#"{"id":2,"note":"x"}"#),
            ],
        };
        assert_eq!(run_check(&args, &ValidatorConfig::default()).unwrap(), 0);
    }

    #[test]
    fn test_any_failure_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let args = CheckArgs {
            schema: write(dir.path(), "schema.json", SCHEMA),
            documents: vec![
                write(dir.path(), "a.json", r#"{"id":1}"#),
                write(dir.path(), "b.json", r#"{"id":0}"#),
            ],
        };
        assert_eq!(run_check(&args, &ValidatorConfig::default()).unwrap(), 1);
    }

    #[test]
    fn test_malformed_document_counts_as_failure() {
        let dir = tempfile::tempdir().unwrap();
        let args = CheckArgs {
            schema: write(dir.path(), "schema.json", SCHEMA),
            documents: vec![write(dir.path(), "bad.json", r#"{"id":"#)],
        };
        assert_eq!(run_check(&args, &ValidatorConfig::default()).unwrap(), 1);
    }

    #[test]
    fn test_bad_schema_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = CheckArgs {
            schema: write(dir.path(), "schema.json", r#"{"type":"string","pattern":"("}"#),
            documents: vec![write(dir.path(), "a.json", r#""x""#)],
        };
        let err = run_check(&args, &ValidatorConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("pattern"));
    }
}
