//! Run a path against JSON input

use super::CliError;
use crate::{CompiledPath, output};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The path to run
    pub path: String,
    /// JSON input text
    pub input: Option<String>,
    /// Re-indent container results
    pub pretty: bool,
    /// Only compile the path, don't run it
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// The path compiled
    SyntaxValid,
    /// The query ran; `None` when nothing matched
    Success(Option<String>),
}

pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let path = CompiledPath::compile(&options.path).map_err(CliError::Compile)?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }

    let input = options.input.as_deref().ok_or(CliError::NoInput)?;
    let result = path.query(input).map_err(CliError::Query)?;

    let result = if options.pretty {
        result.map(|text| output::to_json_pretty(&text))
    } else {
        result
    };

    Ok(CheckResult::Success(result))
}
