//! Typed view of stored text.
//!
//! Web Storage only holds strings. Reads go through [`StoredValue::decode`],
//! which turns `"true"`/`"false"` back into booleans and numeric text back
//! into numbers, and leaves everything else as text.

use std::fmt;

/// A decoded storage entry
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    /// Text that was exactly `"true"` or `"false"`
    Bool(bool),
    /// Text that parses as a number
    Number(f64),
    /// Anything else, unchanged
    Text(String),
}

impl StoredValue {
    /// The value a missing key reads as
    pub fn missing() -> Self {
        StoredValue::Text(String::new())
    }

    /// Decode raw stored text.
    ///
    /// Rules, in order: `"true"` and `"false"` become booleans; the empty
    /// string and text that is not numeric stay text; numeric text becomes a
    /// number. Numeric means numeric to JavaScript's `Number()`, so
    /// surrounding whitespace is ignored and `"0x1F"` or `"Infinity"` count,
    /// while `"inf"` and `"NaN"` do not. A missing entry decodes as empty text.
    pub fn decode(raw: Option<&str>) -> Self {
        let text = match raw {
            Some(text) => text,
            None => return Self::missing(),
        };

        match text {
            "true" => StoredValue::Bool(true),
            "false" => StoredValue::Bool(false),
            "" => StoredValue::Text(String::new()),
            _ => match parse_js_number(text) {
                Some(n) => StoredValue::Number(n),
                None => StoredValue::Text(text.to_string()),
            },
        }
    }

    /// JavaScript truthiness: `false`, `0`, `NaN` and `""` are falsy
    pub fn is_truthy(&self) -> bool {
        match self {
            StoredValue::Bool(b) => *b,
            StoredValue::Number(n) => *n != 0.0 && !n.is_nan(),
            StoredValue::Text(s) => !s.is_empty(),
        }
    }

    /// JavaScript `ToNumber`: booleans are 1/0, non-numeric text is NaN
    pub fn to_number(&self) -> f64 {
        match self {
            StoredValue::Bool(true) => 1.0,
            StoredValue::Bool(false) => 0.0,
            StoredValue::Number(n) => *n,
            StoredValue::Text(s) => parse_js_number(s).unwrap_or(f64::NAN),
        }
    }

    /// The boolean, if this is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StoredValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The number, if this is one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StoredValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The text, if this is text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StoredValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl Default for StoredValue {
    fn default() -> Self {
        Self::missing()
    }
}

/// Re-encodes the value as the text it would be stored as
impl fmt::Display for StoredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoredValue::Bool(b) => write!(f, "{}", b),
            StoredValue::Number(n) => f.write_str(&format_js_number(*n)),
            StoredValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for StoredValue {
    fn from(value: bool) -> Self {
        StoredValue::Bool(value)
    }
}

impl From<f64> for StoredValue {
    fn from(value: f64) -> Self {
        StoredValue::Number(value)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for StoredValue {
                fn from(value: $ty) -> Self {
                    StoredValue::Number(value as f64)
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl From<&str> for StoredValue {
    fn from(value: &str) -> Self {
        StoredValue::Text(value.to_string())
    }
}

impl From<String> for StoredValue {
    fn from(value: String) -> Self {
        StoredValue::Text(value)
    }
}

/// Format a number the way JavaScript's `String(n)` spells the special cases
fn format_js_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 {
        // -0 prints as 0
        "0".to_string()
    } else {
        n.to_string()
    }
}

/// ECMAScript `StringToNumber` whitespace (WhiteSpace and LineTerminator)
fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'
            | '\u{000A}'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{000D}'
            | '\u{0020}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Parse text the way JavaScript's `Number()` does, `None` where it gives NaN
pub(crate) fn parse_js_number(text: &str) -> Option<f64> {
    let trimmed = text.trim_matches(is_js_whitespace);
    if trimmed.is_empty() {
        return Some(0.0);
    }

    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let bytes = trimmed.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'0' {
        let radix = match bytes[1] {
            b'x' | b'X' => Some(16),
            b'o' | b'O' => Some(8),
            b'b' | b'B' => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            return parse_radix_integer(&trimmed[2..], radix);
        }
    }

    if !is_decimal_literal(bytes) {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

fn parse_radix_integer(digits: &str, radix: u32) -> Option<f64> {
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
    })
}

/// `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`
fn is_decimal_literal(bytes: &[u8]) -> bool {
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        mantissa_digits += i - frac_start;
    }

    if mantissa_digits == 0 {
        return false;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}
