//! Describe a compiled path segment by segment

use std::fmt::Write;

use super::CliError;
use crate::ast::{MatchList, SegmentKind};
use crate::{CompiledPath, ast::render_postfix};

/// One line per segment, then the definiteness flag.
///
/// ```text
/// 0: names ["store"]
/// 1: filter (postfix) @.price,10,<  [recursive]
/// definite: false
/// ```
pub fn explain(path: &str) -> Result<String, CliError> {
    let compiled = CompiledPath::compile(path).map_err(CliError::Compile)?;
    let mut out = String::new();

    for (i, segment) in compiled.segments().iter().enumerate() {
        let description = match &segment.kind {
            SegmentKind::MatchAll => "wildcard".to_string(),
            SegmentKind::MatchList(MatchList::Names(names)) => format!("names {:?}", names),
            SegmentKind::MatchList(MatchList::Indices(indices)) => {
                format!("indices {:?}", indices)
            }
            SegmentKind::MatchRange(range) => {
                let bound = |b: Option<i64>| b.map_or_else(|| "-".to_string(), |v| v.to_string());
                format!("range start={} end={}", bound(range.start), bound(range.end))
            }
            SegmentKind::MatchExpression(tokens) => {
                format!("filter (postfix) {}", render_postfix(tokens))
            }
            SegmentKind::Function(function) => format!("function {}()", function.name()),
        };

        let _ = write!(out, "{}: {}", i, description);
        if segment.detached {
            out.push_str("  [recursive]");
        }
        out.push('\n');
    }

    let _ = writeln!(out, "definite: {}", compiled.is_definite());
    Ok(out)
}
