//! # pathwise
//!
//! A JSONPath engine that compiles a path once and evaluates it against JSON
//! text without building a document tree.
//!
//! ```
//! let doc = r#"{"items": [{"price": 5}, {"price": 12}, {"price": 30}]}"#;
//!
//! let cheap = pathwise::query(doc, "$.items[?(@.price < 20)].price").unwrap();
//! assert_eq!(cheap.as_deref(), Some("[5,12]"));
//!
//! let total = pathwise::query(doc, "$.items[*].price.sum()").unwrap();
//! assert_eq!(total.as_deref(), Some("47"));
//! ```
//!
//! See [`ast`] for the path syntax and [`value`] for how filter operands are
//! compared.

pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod cursor;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod value;

pub use ast::{CompiledPath, Function, MatchList, Operator, Range, Segment, SegmentKind, Token};
pub use cursor::Cursor;
pub use error::{Error, Result};
pub use evaluator::Evaluator;
pub use lexer::Lexer;
pub use parser::Parser;
pub use value::{Variant, VariantKind};

/// Compiles `path` for repeated evaluation.
pub fn compile(path: &str) -> Result<CompiledPath> {
    CompiledPath::compile(path)
}

/// Compiles `path` and evaluates it against `document` in one call.
///
/// `Ok(None)` means nothing matched.
pub fn query(document: &str, path: &str) -> Result<Option<String>> {
    compile(path)?.query(document)
}
