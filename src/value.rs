use std::cmp::Ordering;
use std::fmt;

/// Two doubles closer than this compare equal.
pub const DOUBLE_EPSILON: f64 = 0.000001;

/// A scalar value used as a filter-expression operand.
///
/// Filter evaluation pushes these onto its operand stack: literals become
/// `Double` or `String`, values pulled out of the document by a path
/// reference become `String`, and a reference that resolves to nothing
/// becomes `None`.
///
/// # Ordering
///
/// [`Variant::compare`] defines a total order across kinds:
/// - `None` sorts below everything else
/// - `Binary` sorts above everything else
/// - two `UInt64` compare as integers
/// - otherwise, if either side is a string that is not a number, both sides
///   compare lexically as text
/// - otherwise both sides compare as doubles, within [`DOUBLE_EPSILON`]
///
/// # Examples
///
/// ```
/// use pathwise::Variant;
/// use std::cmp::Ordering;
///
/// let a = Variant::String("10".to_string());
/// let b = Variant::Double(9.5);
/// assert_eq!(a.compare(&b), Ordering::Greater);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Variant {
    /// No value (an unresolved reference)
    #[default]
    None,

    /// Unsigned 64-bit integer
    UInt64(u64),

    /// Floating-point number
    Double(f64),

    /// UTF-8 text
    String(String),

    /// Raw bytes
    Binary(Vec<u8>),
}

/// The kinds a [`Variant`] can be converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    None,
    UInt64,
    Double,
    String,
    Binary,
}

impl VariantKind {
    pub fn name(self) -> &'static str {
        match self {
            VariantKind::None => "none",
            VariantKind::UInt64 => "uint64",
            VariantKind::Double => "double",
            VariantKind::String => "string",
            VariantKind::Binary => "binary",
        }
    }
}

/// Returned when a variant cannot be converted to the requested kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionError {
    pub value: String,
    pub from: VariantKind,
    pub to: VariantKind,
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Value \"{}\" of type \"{}\" is not suitable for type \"{}\"",
            self.value,
            self.from.name(),
            self.to.name()
        )
    }
}

impl std::error::Error for ConversionError {}

impl Variant {
    pub fn kind(&self) -> VariantKind {
        match self {
            Variant::None => VariantKind::None,
            Variant::UInt64(_) => VariantKind::UInt64,
            Variant::Double(_) => VariantKind::Double,
            Variant::String(_) => VariantKind::String,
            Variant::Binary(_) => VariantKind::Binary,
        }
    }

    /// Replace the value, taking ownership of the payload.
    pub fn set(&mut self, value: Variant) {
        *self = value;
    }

    /// Drop any payload and become `None`.
    pub fn clear(&mut self) {
        *self = Variant::None;
    }

    /// Parse text as `UInt64` when it is an unsigned integer, otherwise as
    /// `Double`. Fails (leaving `self` untouched) when it is neither.
    pub fn set_numeric(&mut self, text: &str) -> bool {
        let trimmed = trim_integer(text);
        if trimmed.starts_with('+') {
            // one sign was already stripped, so there were more
            return false;
        }
        let normalized = del_zeros(&trimmed);

        if let Some(n) = parse_uint64(&normalized) {
            *self = Variant::UInt64(n);
            return true;
        }
        if is_double(&normalized) {
            *self = Variant::Double(atof(&normalized));
            return true;
        }
        false
    }

    /// Convert in place to `kind`.
    ///
    /// On failure the value is left unchanged.
    pub fn convert(&mut self, kind: VariantKind) -> Result<(), ConversionError> {
        let converted = match kind {
            VariantKind::None => Some(Variant::None),
            VariantKind::UInt64 => self.to_uint64(),
            VariantKind::Double => self.to_double(),
            VariantKind::String => self.to_text().map(Variant::String),
            VariantKind::Binary => match self {
                Variant::Binary(_) => Some(self.clone()),
                _ => None,
            },
        };

        match converted {
            Some(value) => {
                *self = value;
                Ok(())
            }
            None => Err(ConversionError {
                value: self.to_string(),
                from: self.kind(),
                to: kind,
            }),
        }
    }

    fn to_double(&self) -> Option<Variant> {
        match self {
            Variant::Double(n) => Some(Variant::Double(*n)),
            Variant::UInt64(n) => Some(Variant::Double(*n as f64)),
            Variant::String(s) => {
                let buffer = trim_float(s.trim_end_matches(['\n', '\r']));
                if !is_double(&buffer) {
                    return None;
                }
                Some(Variant::Double(atof(&buffer)))
            }
            _ => None,
        }
    }

    fn to_uint64(&self) -> Option<Variant> {
        match self {
            Variant::UInt64(n) => Some(Variant::UInt64(*n)),
            Variant::Double(n) if *n < 0.0 => None,
            Variant::Double(n) => Some(Variant::UInt64(*n as u64)),
            Variant::String(s) => {
                let buffer = trim_integer(s.trim_end_matches(['\n', '\r']));
                parse_uint64(&del_zeros(&buffer)).map(Variant::UInt64)
            }
            _ => None,
        }
    }

    fn to_text(&self) -> Option<String> {
        match self {
            Variant::String(s) => Some(s.clone()),
            Variant::Double(n) => Some(format_double(*n)),
            Variant::UInt64(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Boolean truthiness: non-zero numbers and non-empty strings are true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Variant::UInt64(n) => *n != 0,
            Variant::Double(n) => !double_eq(*n, 0.0),
            Variant::String(s) => !s.is_empty(),
            Variant::None | Variant::Binary(_) => false,
        }
    }

    /// Total-order comparison across variant kinds (see the type docs).
    pub fn compare(&self, other: &Variant) -> Ordering {
        use Variant::*;

        match (self, other) {
            (None, None) => Ordering::Equal,
            (None, _) => Ordering::Less,
            (_, None) => Ordering::Greater,
            (Binary(a), Binary(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Binary(_), _) => Ordering::Greater,
            (_, Binary(_)) => Ordering::Less,
            (UInt64(a), UInt64(b)) => a.cmp(b),
            _ if self.is_numeric() && other.is_numeric() => {
                compare_doubles(self.as_double_lossy(), other.as_double_lossy())
            }
            _ => self.to_string().as_str().cmp(other.to_string().as_str()),
        }
    }

    /// Numbers, and strings that parse as numbers.
    fn is_numeric(&self) -> bool {
        match self {
            Variant::UInt64(_) | Variant::Double(_) => true,
            Variant::String(s) => is_double(s),
            _ => false,
        }
    }

    fn as_double_lossy(&self) -> f64 {
        match self {
            Variant::UInt64(n) => *n as f64,
            Variant::Double(n) => *n,
            Variant::String(s) => atof(s),
            _ => 0.0,
        }
    }
}

/// Display text: doubles with trailing zeros removed, strings verbatim,
/// `None` as empty text and binary payloads as hex bytes.
impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::None => Ok(()),
            Variant::UInt64(n) => write!(f, "{}", n),
            Variant::Double(n) => f.write_str(&format_double(*n)),
            Variant::String(s) => f.write_str(s),
            Variant::Binary(bytes) => {
                let hex: Vec<String> = bytes.iter().map(|b| format!("{:02x}", b)).collect();
                f.write_str(&hex.join(" "))
            }
        }
    }
}

impl From<&str> for Variant {
    fn from(s: &str) -> Self {
        Variant::String(s.to_string())
    }
}

impl From<String> for Variant {
    fn from(s: String) -> Self {
        Variant::String(s)
    }
}

impl From<f64> for Variant {
    fn from(n: f64) -> Self {
        Variant::Double(n)
    }
}

impl From<u64> for Variant {
    fn from(n: u64) -> Self {
        Variant::UInt64(n)
    }
}

pub fn double_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= DOUBLE_EPSILON
}

fn compare_doubles(a: f64, b: f64) -> Ordering {
    if double_eq(a, b) {
        return Ordering::Equal;
    }
    // NaN never satisfies double_eq; order it above everything
    a.partial_cmp(&b).unwrap_or_else(|| {
        if a.is_nan() {
            if b.is_nan() { Ordering::Equal } else { Ordering::Greater }
        } else {
            Ordering::Less
        }
    })
}

/// Format with six decimals, then strip the trailing zeros.
pub fn format_double(n: f64) -> String {
    del_zeros(&format!("{:.6}", n))
}

/// Remove trailing zeros after a decimal point, and the point itself if
/// nothing remains after it.
pub fn del_zeros(s: &str) -> String {
    if !s.contains('.') || s.contains(['e', 'E']) {
        return s.to_string();
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Whether `s` is a decimal number: optional sign, digits with an optional
/// fraction (at least one digit overall) and an optional exponent.
/// Surrounding spaces are allowed.
pub fn is_double(s: &str) -> bool {
    let bytes = s.trim_matches(' ').as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'-' | b'+')) {
        i += 1;
    }

    let mut digits = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return false;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if i < bytes.len() && matches!(bytes[i], b'-' | b'+') {
            i += 1;
        }
        let exponent_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exponent_start {
            return false;
        }
    }

    i == bytes.len()
}

/// Lenient float parse: the longest numeric prefix, or 0.
pub(crate) fn atof(s: &str) -> f64 {
    let s = s.trim_matches(' ');
    let end = s
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);

    (1..=end)
        .rev()
        .find_map(|len| s[..len].parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn parse_uint64(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Trim spaces and quotes, then the zero padding in front of the digits.
/// Integers also lose one leading `+`.
fn trim_number(s: &str, strip_plus: bool) -> String {
    let s = s.trim_matches([' ', '"']);
    let (sign, digits) = match s.strip_prefix('+') {
        Some(rest) if strip_plus => ("", rest),
        _ => match s.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", s),
        },
    };

    let unpadded = digits.trim_start_matches('0');
    let unpadded = if unpadded.is_empty() || unpadded.starts_with(['.', 'e', 'E']) {
        // keep a single zero in front of a fraction or in place of "000"
        &digits[digits.len() - unpadded.len() - usize::from(digits.len() > unpadded.len())..]
    } else {
        unpadded
    };

    format!("{}{}", sign, unpadded)
}

fn trim_integer(s: &str) -> String {
    trim_number(s, true)
}

fn trim_float(s: &str) -> String {
    trim_number(s, false)
}
