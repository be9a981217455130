//! # Compiled JSONPath representation
//!
//! A path string is compiled once into a [`CompiledPath`]: an ordered list
//! of [`Segment`]s, evaluated left to right against a document.
//!
//! ## Submodules
//!
//! - **[segments]** - path steps: wildcard, name/index lists, slices,
//!   filters and trailing functions
//! - **[tokens]** - filter-expression tokens, stored in postfix order
//! - **[operators]** - filter operators with precedence and arity group
//! - **[path]** - the compiled path itself
//!
//! ## Syntax overview
//!
//! ```text
//! $.store.book[0].title           member and index access
//! $['store']["book"][-1]          bracket notation, negative index
//! $.items[*].price                wildcard
//! $.items[1:3]                    slice
//! $..name                         recursive descent
//! $.items[?(@.price > 10)]        filter
//! $.items[*].price.sum()          aggregate function
//! ```
//!
//! ## Definite paths
//!
//! A path is *definite* when every segment picks at most one child (a single
//! name or index, no wildcard, slice, filter or `..`). Definite paths return
//! the matched value itself; all others return a JSON array of matches.
pub mod operators;
pub mod path;
pub mod segments;
pub mod tokens;

pub use operators::{Operator, TokenGroup};
pub use path::CompiledPath;
pub use segments::{Function, MatchList, Range, Segment, SegmentKind, render_postfix};
pub use tokens::{NumberLiteral, PathRef, RefStep, Token};
