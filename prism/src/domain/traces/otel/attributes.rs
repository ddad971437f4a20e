//! Typed access to OTLP/JSON attribute lists.
//!
//! Every classifier and metric extractor reads attributes through
//! [`get_attribute_value`], so absence and type coercion are decided here once.

use std::borrow::Cow;
use std::fmt;

use crate::data::types::{TraceSpanAttribute, TraceSpanAttributeValue};

/// Separator used when an array attribute is read as a scalar
const ARRAY_SEPARATOR: &str = ", ";

// ============================================================================
// ATTRIBUTE VALUE
// ============================================================================

/// Scalar read from an attribute. Absence is `None` at the call site.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue<'a> {
    String(Cow<'a, str>),
    Number(f64),
    Boolean(bool),
}

impl AttributeValue<'_> {
    /// Loose presence test: `""`, `0`, `NaN` and `false` count as absent.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::String(s) => !s.is_empty(),
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Boolean(b) => *b,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

// ============================================================================
// LOOKUP
// ============================================================================

/// Read the first attribute named `key`.
///
/// Field precedence is `stringValue`, `intValue` (parsed as a float),
/// `boolValue`, `doubleValue`, `arrayValue` (elements joined with `", "`).
/// A missing key or an entry with no populated field yields `None`.
pub fn get_attribute_value<'a>(
    attributes: &'a [TraceSpanAttribute],
    key: &str,
) -> Option<AttributeValue<'a>> {
    let attr = attributes.iter().find(|a| a.key == key)?;
    scalar_value(&attr.value)
}

/// Attribute is present and truthy
pub fn has_truthy_attribute(attributes: &[TraceSpanAttribute], key: &str) -> bool {
    get_attribute_value(attributes, key).is_some_and(|v| v.is_truthy())
}

/// Attribute is present with any value, including `""`, `0` and `false`
pub fn has_attribute(attributes: &[TraceSpanAttribute], key: &str) -> bool {
    get_attribute_value(attributes, key).is_some()
}

/// Attribute read as a number. Strings are not coerced.
pub fn get_number_attribute(attributes: &[TraceSpanAttribute], key: &str) -> Option<f64> {
    get_attribute_value(attributes, key).and_then(|v| v.as_number())
}

/// Attribute read as a string. Numbers and booleans are not coerced.
pub fn get_string_attribute<'a>(
    attributes: &'a [TraceSpanAttribute],
    key: &str,
) -> Option<Cow<'a, str>> {
    match get_attribute_value(attributes, key)? {
        AttributeValue::String(s) => Some(s),
        _ => None,
    }
}

fn scalar_value(value: &TraceSpanAttributeValue) -> Option<AttributeValue<'_>> {
    if let Some(s) = &value.string_value {
        return Some(AttributeValue::String(Cow::Borrowed(s)));
    }
    if let Some(i) = &value.int_value {
        return Some(AttributeValue::Number(parse_float(i)));
    }
    if let Some(b) = value.bool_value {
        return Some(AttributeValue::Boolean(b));
    }
    if let Some(d) = value.double_value {
        return Some(AttributeValue::Number(d));
    }
    value
        .array_value
        .as_ref()
        .map(|arr| AttributeValue::String(Cow::Owned(join_array(&arr.values))))
}

fn join_array(values: &[TraceSpanAttributeValue]) -> String {
    values
        .iter()
        .map(|v| scalar_value(v).map(|s| s.to_string()).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(ARRAY_SEPARATOR)
}

// ============================================================================
// NUMBER PARSING AND FORMATTING
// ============================================================================

/// Lenient float parse: the longest numeric prefix after leading whitespace.
///
/// `"42abc"` is 42, `"Infinity"` is infinite, and input without a numeric
/// prefix is `NaN`.
pub fn parse_float(input: &str) -> f64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Render a number the way it reads in a trace viewer: integral values without
/// a fractional part, very large or small magnitudes in exponent form.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let magnitude = n.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let formatted = format!("{n:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => formatted,
        };
    }
    format!("{n}")
}
