//! Documentation content for the pathwise CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Paths,
    Filters,
    Functions,
    Values,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "paths" | "path" | "syntax" => Some(Self::Paths),
            "filters" | "filter" | "operators" => Some(Self::Filters),
            "functions" | "function" | "aggregates" => Some(Self::Functions),
            "values" | "types" | "coercion" => Some(Self::Values),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"PATHWISE DOCUMENTATION

pathwise compiles JSONPath expressions and runs them against JSON text.
Paths start with $ (the root document) and chain segments that select
members, elements, slices, filtered children or aggregates.

DOCUMENTATION CATEGORIES

  paths             Dot and bracket notation, wildcards, slices, recursive descent
  filters           [?( ... )] predicates: references, literals and operators
  functions         Trailing aggregates: min, max, avg, sum, length, first
  values            How filter operands are compared and converted

QUICK REFERENCE

  $.a.b             Member access
  $['a']["b"]       Bracket notation
  $[0]  $[-1]       Element index (negative counts from the end)
  $[1:3]  $[-2:]    Slice
  $.*  $[*]         Wildcard
  $..name           Recursive descent
  $[?(@.x > 1)]     Filter
  $[*].x.sum()      Aggregate

Run 'pathwise doc <category>' for detailed documentation.
Run 'pathwise explain <PATH>' to see how a path compiles.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Paths) => Ok(PATHS_DOC),
        Some(DocCategory::Filters) => Ok(FILTERS_DOC),
        Some(DocCategory::Functions) => Ok(FUNCTIONS_DOC),
        Some(DocCategory::Values) => Ok(VALUES_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const PATHS_DOC: &str = r#"PATHS - Selecting Values

ROOT
  $
    Every path starts with $. A bare $ is rejected: at least one segment
    must follow.

MEMBER ACCESS
  $.name            letters, digits and underscores only
  $['name']         any name; \' and \\ are the only escapes
  $["a", 'b']       several names at once

    Example:
      Input:  {"user": {"name": "Alice"}}
      Path:   $.user.name
      Output: Alice

ELEMENT ACCESS
  $[0]              first element
  $[-1]             last element
  $[0, 2]           several indices

SLICES
  $[start:end]
    Half-open range. Either bound may be omitted; negative bounds count
    from the end.

    Example:
      Input:  [10, 20, 30, 40]
      Path:   $[-2:]
      Output: [30,40]

WILDCARD
  $.*   $[*]        every member or element

RECURSIVE DESCENT
  $..name   $..[0]   $..*
    Applies the next segment at every depth below the current node.
    Results follow document order.

RESULT SHAPE
  A path is definite when every segment picks at most one child. Definite
  paths return the value itself (strings without quotes). All other paths
  return a JSON array of the matches. No match is an empty result, not an
  error.
"#;

const FILTERS_DOC: &str = r#"FILTERS - Selecting Children by Predicate

SYNTAX
  [?( expression )]
    Keeps each child for which the expression is true.

OPERANDS
  @.field   @['a'][0]   @     the child being tested
  $.limit                      a value from the document root
  'text'   "text"              string literal
  42   -1.5   2e3              number literal

  References take names and non-negative indices only. A missing
  reference is an empty operand that compares below everything else.

OPERATORS (tightest first)
  !                  not
  *  /               multiply, divide
  +  -               add, subtract
  <  <=  >  >=       relational
  ==  !=  =~         equality and regular expression match
  &&                 and
  ||                 or

    Example:
      Input:  [{"x": 1}, {"x": 2}, {"x": 3}]
      Path:   $[?(@.x > 1)]
      Output: [{"x": 2},{"x": 3}]

REGULAR EXPRESSIONS
  @.name =~ '^A.*'
    Unanchored search. The pattern is the right-hand operand.
"#;

const FUNCTIONS_DOC: &str = r#"FUNCTIONS - Aggregates

  .length()    number of values
  .first()     first value
  .min()  .max()  .sum()  .avg()
               numeric aggregates; every value must be a number

    Example:
      Input:  {"prices": [1, 2, 4]}
      Path:   $.prices.avg()
      Output: 2.333333

INPUT
  On a definite path the function applies to the elements of the one array
  the path selects. Otherwise it applies to the list of matches.

CHAINING
  $.a.first().length()
    Each function feeds its single result to the next. Only functions may
    follow a function.

ERRORS
  - min/max/sum/avg of nothing
  - a value that is not a number
  - a definite path that does not select an array
"#;

const VALUES_DOC: &str = r#"VALUES - Comparison and Conversion

Filter operands are scalar values: none, unsigned integer, double, string
or binary.

ORDERING
  none < everything else
  binary > everything else
  numbers and numeric strings compare as doubles, equal within 0.000001
  anything else compares as text

CONVERSION
  text to number     trailing newlines, leading zeros and one '+' are
                     dropped before parsing
  double to integer  fails for negative values
  double to text     six decimals, trailing zeros removed

TRUTH
  non-zero numbers and non-empty strings are true; none is false
"#;
