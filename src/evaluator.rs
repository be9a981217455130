use log::{debug, trace};
use regex::Regex;

use crate::{
    ast::{
        CompiledPath, Function, MatchList, Operator, PathRef, Segment, SegmentKind, Token,
        TokenGroup, render_postfix,
    },
    cursor::{Cursor, JsonKind},
    error::{Error, Result},
    output,
    value::{Variant, VariantKind, atof, is_double},
};

/// Runs a [`CompiledPath`] against JSON text.
///
/// Holds no state between calls: every evaluation walks the document from
/// scratch, and regular expressions are compiled per use.
pub struct Evaluator<'p> {
    path: &'p CompiledPath,
}

impl<'p> Evaluator<'p> {
    pub fn new(path: &'p CompiledPath) -> Self {
        Evaluator { path }
    }

    pub fn evaluate(&self, document: &str) -> Result<Option<String>> {
        let root = Cursor::parse(document)?;
        self.evaluate_cursor(root)
    }

    /// Evaluates against an already validated document.
    pub fn evaluate_cursor(&self, root: Cursor<'_>) -> Result<Option<String>> {
        let result = self.run(root);
        if let Err(err) = &result {
            debug!("jsonpath query {} failed: {}", self.path, err);
        }
        result
    }

    fn run(&self, root: Cursor<'_>) -> Result<Option<String>> {
        let segments = self.path.segments();
        let functions_at = segments
            .iter()
            .position(Segment::is_function)
            .unwrap_or(segments.len());

        let mut context = EvalContext::new(root, segments);
        if functions_at > 0 {
            context.query_contents(root, 0)?;
        }
        trace!("jsonpath {} matched {} value(s)", self.path, context.matches.len());

        if functions_at < segments.len() {
            let input = if functions_at == 0 {
                vec![root]
            } else {
                context.matches
            };
            return apply_functions(&input, &segments[functions_at..], self.path.is_definite());
        }

        output::format_matches(&context.matches, self.path.is_definite())
    }
}

/// State of one walk: the document root for `$` references and the values
/// collected so far.
struct EvalContext<'a, 'p> {
    root: Cursor<'a>,
    segments: &'p [Segment],
    matches: Vec<Cursor<'a>>,
}

impl<'a, 'p> EvalContext<'a, 'p> {
    fn new(root: Cursor<'a>, segments: &'p [Segment]) -> Self {
        EvalContext {
            root,
            segments,
            matches: Vec::new(),
        }
    }

    /// Applies segment `depth` to the children of `node`. Scalars have no
    /// children and match nothing.
    fn query_contents(&mut self, node: Cursor<'a>, depth: usize) -> Result<()> {
        match node.kind() {
            JsonKind::Object => self.query_object(node, depth),
            JsonKind::Array => self.query_array(node, depth),
            _ => Ok(()),
        }
    }

    fn query_object(&mut self, object: Cursor<'a>, depth: usize) -> Result<()> {
        let segments = self.segments;
        let segment = &segments[depth];

        for member in object.members() {
            let (key, value) = member?;

            match &segment.kind {
                SegmentKind::MatchAll => self.next_segment(value, depth)?,
                SegmentKind::MatchList(list @ MatchList::Names(_)) => {
                    if list.contains_name(&key.decode_scalar()?) {
                        self.next_segment(value, depth)?;
                    }
                }
                SegmentKind::MatchExpression(tokens) => {
                    if self.matches_filter(tokens, value)? {
                        self.next_segment(value, depth)?;
                    }
                }
                _ => {}
            }

            if segment.detached {
                self.query_contents(value, depth)?;
            }
        }

        Ok(())
    }

    fn query_array(&mut self, array: Cursor<'a>, depth: usize) -> Result<()> {
        let segments = self.segments;
        let segment = &segments[depth];

        // negative indices and slice bounds need the count up front
        let count = array.elements().try_fold(0usize, |n, e| e.map(|_| n + 1))?;

        for (index, element) in array.elements().enumerate() {
            let element = element?;

            let matched = match &segment.kind {
                SegmentKind::MatchAll => true,
                SegmentKind::MatchList(list) => list.contains_index(index, count),
                SegmentKind::MatchRange(range) => range.contains(index, count),
                SegmentKind::MatchExpression(tokens) => self.matches_filter(tokens, element)?,
                SegmentKind::Function(_) => false,
            };
            if matched {
                self.next_segment(element, depth)?;
            }

            if segment.detached {
                self.query_contents(element, depth)?;
            }
        }

        Ok(())
    }

    /// Records `child` when the path ends (or only functions remain) after
    /// segment `depth`, otherwise descends into it.
    fn next_segment(&mut self, child: Cursor<'a>, depth: usize) -> Result<()> {
        let next = depth + 1;
        if next == self.segments.len() || self.segments[next].is_function() {
            self.matches.push(child);
            return Ok(());
        }
        self.query_contents(child, next)
    }

    /// Interprets a postfix filter against one candidate.
    fn matches_filter(&self, tokens: &[Token], candidate: Cursor<'a>) -> Result<bool> {
        let mut stack: Vec<Variant> = Vec::with_capacity(tokens.len());

        for token in tokens {
            match token {
                Token::Op(op) if op.group() == TokenGroup::Unary => {
                    let top = stack.last_mut().ok_or_else(|| expression_error(tokens))?;
                    *top = boolean(!top.is_truthy());
                }
                Token::Op(op) => {
                    let (Some(right), Some(left)) = (stack.pop(), stack.pop()) else {
                        return Err(expression_error(tokens));
                    };
                    stack.push(apply_binary(*op, left, right, tokens)?);
                }
                Token::AbsolutePath(reference) => {
                    stack.push(extract_value(self.root, reference)?);
                }
                Token::RelativePath(reference) => {
                    // relative references only apply to objects and arrays
                    if !candidate.is_container() {
                        return Ok(false);
                    }
                    stack.push(extract_value(candidate, reference)?);
                }
                Token::String(text) => stack.push(Variant::String(text.clone())),
                Token::Number(n) => stack.push(Variant::Double(n.value)),
                Token::LParen | Token::RParen => {}
            }
        }

        match stack.as_slice() {
            [result] => Ok(result.is_truthy()),
            _ => Err(expression_error(tokens)),
        }
    }
}

fn expression_error(tokens: &[Token]) -> Error {
    Error::CompiledExpression(render_postfix(tokens))
}

fn boolean(value: bool) -> Variant {
    Variant::Double(if value { 1.0 } else { 0.0 })
}

/// Decoded text of the referenced value, or `None` when it is missing.
fn extract_value(base: Cursor<'_>, reference: &PathRef) -> Result<Variant> {
    match base.resolve(&reference.steps)? {
        Some(found) => Ok(Variant::String(found.decode_scalar()?.into_owned())),
        None => Ok(Variant::None),
    }
}

fn to_double(mut value: Variant) -> Option<f64> {
    value.convert(VariantKind::Double).ok()?;
    match value {
        Variant::Double(n) => Some(n),
        _ => None,
    }
}

fn to_text(mut value: Variant) -> Option<String> {
    value.convert(VariantKind::String).ok()?;
    match value {
        Variant::String(s) => Some(s),
        _ => None,
    }
}

fn apply_binary(op: Operator, left: Variant, right: Variant, tokens: &[Token]) -> Result<Variant> {
    use std::cmp::Ordering;

    let result = match op {
        Operator::Plus | Operator::Minus | Operator::Multiply | Operator::Divide => {
            let (Some(a), Some(b)) = (to_double(left), to_double(right)) else {
                return Ok(Variant::None);
            };
            Variant::Double(match op {
                Operator::Plus => a + b,
                Operator::Minus => a - b,
                Operator::Multiply => a * b,
                _ => a / b,
            })
        }
        Operator::Equal => boolean(left.compare(&right) == Ordering::Equal),
        Operator::NotEqual => boolean(left.compare(&right) != Ordering::Equal),
        Operator::GreaterThan => boolean(left.compare(&right) == Ordering::Greater),
        Operator::GreaterEqual => boolean(left.compare(&right) != Ordering::Less),
        Operator::LessThan => boolean(left.compare(&right) == Ordering::Less),
        Operator::LessEqual => boolean(left.compare(&right) != Ordering::Greater),
        Operator::And => boolean(left.is_truthy() && right.is_truthy()),
        Operator::Or => boolean(left.is_truthy() || right.is_truthy()),
        Operator::Regex => {
            let (Some(text), Some(pattern)) = (to_text(left), to_text(right)) else {
                return Ok(boolean(false));
            };
            let regex = Regex::new(&pattern).map_err(|err| Error::RegexCompile(err.to_string()))?;
            boolean(regex.is_match(&text))
        }
        Operator::Not => return Err(expression_error(tokens)),
    };

    Ok(result)
}

/// Runs the trailing function segments. Each function's output becomes the
/// only input of the next one.
fn apply_functions(input: &[Cursor<'_>], functions: &[Segment], definite: bool) -> Result<Option<String>> {
    let mut chained: Option<String> = None;

    for segment in functions {
        let SegmentKind::Function(function) = &segment.kind else {
            continue;
        };

        let result = match &chained {
            None => apply_function(*function, input, definite)?,
            Some(previous) => {
                // one value in, so the input counts as definite from here on
                let cursor = chained_input(previous)?;
                apply_function(*function, &[cursor], true)?
            }
        };

        match result {
            Some(text) => chained = Some(text),
            None => return Ok(None),
        }
    }

    Ok(chained)
}

/// A previous function's output as input for the next one. Only array text
/// can be fed further.
fn chained_input(text: &str) -> Result<Cursor<'_>> {
    if !text.starts_with('[') {
        return Err(non_array_error());
    }
    Cursor::parse(text)
}

fn non_array_error() -> Error {
    Error::FunctionInput("cannot apply function to non-array JSON element".to_string())
}

fn apply_function(function: Function, input: &[Cursor<'_>], definite: bool) -> Result<Option<String>> {
    // a definite path names one array, the function works on its elements
    let unwrapped;
    let items = if definite {
        let array = input.first().filter(|c| c.is_array()).ok_or_else(non_array_error)?;
        unwrapped = array.elements().collect::<Result<Vec<_>>>()?;
        unwrapped.as_slice()
    } else {
        input
    };

    trace!("applying {}() to {} value(s)", function.name(), items.len());

    match function {
        Function::Length => return Ok(Some(items.len().to_string())),
        Function::First => return items.first().map(output::extract_element).transpose(),
        _ => {}
    }

    let Some((head, tail)) = items.split_first() else {
        return Err(Error::FunctionInput(
            "cannot apply aggregation function to empty array".to_string(),
        ));
    };

    let mut result = numeric_value(head)?;
    for item in tail {
        let value = numeric_value(item)?;
        match function {
            Function::Min if value < result => result = value,
            Function::Max if value > result => result = value,
            Function::Sum | Function::Avg => result += value,
            _ => {}
        }
    }

    if function == Function::Avg {
        result /= items.len() as f64;
    }

    output::format_number(result).map(Some)
}

fn numeric_value(item: &Cursor<'_>) -> Result<f64> {
    let not_a_number = || {
        Error::FunctionInput(format!(
            "array value is not a number starting with: {}",
            item.as_str()
        ))
    };

    if item.is_container() {
        return Err(not_a_number());
    }
    let text = item.decode_scalar()?;
    if !is_double(&text) {
        return Err(not_a_number());
    }
    Ok(atof(&text))
}
