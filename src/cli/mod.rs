//! CLI support for pathwise
//!
//! The command implementations live here so they can be driven from tests
//! without spawning the binary.

mod check;
mod docs;
mod explain;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use explain::explain;

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Path failed to compile
    #[error("Invalid path: {0}")]
    Compile(#[source] crate::Error),

    /// Path compiled but evaluation failed
    #[error("Query failed: {0}")]
    Query(#[source] crate::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,

    #[error("Unknown category: '{0}'\nRun 'pathwise docs' to see available categories.")]
    UnknownCategory(String),
}
