//! Tolerant parsing of `log variable` value tokens.
//!
//! The device prints plain numbers (`42`, `3.14159`) and arrays (`[1,2,3]`).
//! Parsing first strips everything that is not a digit, `_`, `,` or `.`, then
//! splits on commas. An empty segment counts as `0`.

use crate::error::{DebuggerError, Result};
use crate::model::{Number, Value};

/// Value token parser. The default configuration drops minus signs together
/// with every other non-numeric character; see [`ValueParser::with_sign`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueParser {
    keep_sign: bool,
}

impl ValueParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `-` while sanitizing so negative numbers survive.
    pub fn with_sign(mut self, keep_sign: bool) -> Self {
        self.keep_sign = keep_sign;
        self
    }

    pub fn keeps_sign(&self) -> bool {
        self.keep_sign
    }

    /// Parse a raw token into a scalar or vector.
    ///
    /// Any malformed segment fails the whole token, so a caller never records
    /// half of an array.
    pub fn parse(&self, raw: &str) -> Result<Value> {
        let cleaned = self.sanitize(raw);
        if !cleaned.bytes().any(|b| b.is_ascii_digit()) {
            return Err(DebuggerError::value_parse(raw, "no digits"));
        }
        let mut numbers = cleaned
            .split(',')
            .map(|seg| parse_segment(seg).map_err(|reason| DebuggerError::value_parse(raw, reason)))
            .collect::<Result<Vec<_>>>()?;
        if numbers.len() == 1 {
            Ok(Value::Scalar(numbers.remove(0)))
        } else {
            Ok(Value::Vector(numbers))
        }
    }

    fn sanitize(&self, raw: &str) -> String {
        raw.chars()
            .filter(|&c| {
                c.is_ascii_digit()
                    || matches!(c, '_' | ',' | '.')
                    || (self.keep_sign && c == '-')
            })
            .collect()
    }
}

/// Parse with the default (sign-dropping) parser.
pub fn parse_value(raw: &str) -> Result<Value> {
    ValueParser::default().parse(raw)
}

fn parse_segment(seg: &str) -> Result<Number, String> {
    if seg.is_empty() {
        return Ok(Number::Int(0));
    }
    let digits = strip_separators(seg).ok_or_else(|| format!("misplaced '_' in {:?}", seg))?;
    if digits.contains('.') {
        digits
            .parse::<f64>()
            .map(Number::Float)
            .map_err(|e| format!("{:?}: {}", seg, e))
    } else {
        digits
            .parse::<i64>()
            .map(Number::Int)
            .map_err(|e| format!("{:?}: {}", seg, e))
    }
}

/// Remove `_` digit separators. Each one must sit between two digits.
fn strip_separators(seg: &str) -> Option<String> {
    let bytes = seg.as_bytes();
    let mut out = String::with_capacity(seg.len());
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'_' {
            let before = i > 0 && bytes[i - 1].is_ascii_digit();
            let after = bytes.get(i + 1).is_some_and(|c| c.is_ascii_digit());
            if !(before && after) {
                return None;
            }
        } else {
            out.push(b as char);
        }
    }
    Some(out)
}
