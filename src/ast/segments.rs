use std::fmt;

use crate::ast::Token;

/// One compiled step of a path.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub kind: SegmentKind,

    /// Set by a preceding `..`: the segment also applies at any depth below
    /// the current node, not only to its immediate children.
    pub detached: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SegmentKind {
    /// Wildcard (`.*`, `[*]`)
    MatchAll,

    /// Member names or element indices (`.name`, `['a','b']`, `[0,-1]`)
    MatchList(MatchList),

    /// Slice of elements (`[1:3]`, `[-2:]`)
    MatchRange(Range),

    /// Filter predicate (`[?(@.price > 10)]`), compiled to postfix tokens
    MatchExpression(Vec<Token>),

    /// Trailing aggregate (`.sum()`)
    Function(Function),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchList {
    /// Object member names, unescaped
    Names(Vec<String>),

    /// Array indices; negative values count back from the end
    Indices(Vec<i64>),
}

impl MatchList {
    pub fn len(&self) -> usize {
        match self {
            MatchList::Names(names) => names.len(),
            MatchList::Indices(indices) => indices.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_name(&self, name: &str) -> bool {
        match self {
            MatchList::Names(names) => names.iter().any(|n| n == name),
            MatchList::Indices(_) => false,
        }
    }

    /// Whether element `index` of an array with `count` elements is listed.
    pub fn contains_index(&self, index: usize, count: usize) -> bool {
        let (index, count) = (index as i64, count as i64);
        match self {
            MatchList::Indices(indices) => indices
                .iter()
                .any(|&i| if i >= 0 { i == index } else { i + count == index }),
            MatchList::Names(_) => false,
        }
    }
}

/// `[start:end]` slice bounds. `None` marks an omitted bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Range {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl Range {
    pub fn has_start(&self) -> bool {
        self.start.is_some()
    }

    pub fn has_end(&self) -> bool {
        self.end.is_some()
    }

    /// Whether element `index` of an array with `count` elements falls in
    /// the half-open slice.
    pub fn contains(&self, index: usize, count: usize) -> bool {
        let count = count as i64;
        let resolve = |bound: i64| if bound < 0 { bound + count } else { bound };

        let start = self.start.map_or(0, resolve);
        let end = self.end.map_or(count, resolve);
        let index = index as i64;

        start <= index && index < end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Min,
    Max,
    Avg,
    Sum,
    Length,
    First,
}

impl Function {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "min" => Some(Function::Min),
            "max" => Some(Function::Max),
            "avg" => Some(Function::Avg),
            "sum" => Some(Function::Sum),
            "length" => Some(Function::Length),
            "first" => Some(Function::First),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Function::Min => "min",
            Function::Max => "max",
            Function::Avg => "avg",
            Function::Sum => "sum",
            Function::Length => "length",
            Function::First => "first",
        }
    }
}

impl Segment {
    pub fn new(kind: SegmentKind) -> Self {
        Segment {
            kind,
            detached: false,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, SegmentKind::Function(_))
    }

    /// Whether the segment selects at most one child.
    pub fn is_definite(&self) -> bool {
        if self.detached {
            return false;
        }
        match &self.kind {
            SegmentKind::MatchList(list) => list.len() == 1,
            SegmentKind::Function(_) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detached {
            f.write_str("..")?;
        }
        match &self.kind {
            SegmentKind::MatchAll => f.write_str("[*]"),
            SegmentKind::MatchList(MatchList::Names(names)) => {
                let quoted: Vec<String> = names.iter().map(|n| format!("{:?}", n)).collect();
                write!(f, "[{}]", quoted.join(","))
            }
            SegmentKind::MatchList(MatchList::Indices(indices)) => {
                let items: Vec<String> = indices.iter().map(|i| i.to_string()).collect();
                write!(f, "[{}]", items.join(","))
            }
            SegmentKind::MatchRange(range) => {
                let bound = |b: Option<i64>| b.map(|v| v.to_string()).unwrap_or_default();
                write!(f, "[{}:{}]", bound(range.start), bound(range.end))
            }
            SegmentKind::MatchExpression(tokens) => {
                write!(f, "[?({})]", render_postfix(tokens))
            }
            SegmentKind::Function(function) => write!(f, ".{}()", function.name()),
        }
    }
}

/// Comma-joined token stream, in stored (postfix) order.
pub fn render_postfix(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
