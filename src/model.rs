use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// ────────────────────────────────────────────────────────────────────────────
// Message – one decoded protocol line
// ────────────────────────────────────────────────────────────────────────────

/// A single telemetry line after tokenizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Message {
    /// `log breakpoint <id>`: the device is waiting for an acknowledgement.
    Breakpoint { id: String },
    /// `log variable <name> <raw_value>`; the value is still the raw token.
    VariableUpdate { name: String, raw_value: String },
    /// Blank line.
    Ignored,
    /// Anything that is not a recognised `log` line.
    Unknown { raw_line: String },
}

// ────────────────────────────────────────────────────────────────────────────
// Number / Value
// ────────────────────────────────────────────────────────────────────────────

/// A numeric sample. The wire token decides the variant: tokens containing a
/// period are floats, everything else is an integer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    /// Numeric ordering across variants. `None` only when a float is NaN.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            // Debug keeps the trailing ".0" so floats stay distinguishable.
            Number::Float(x) => write!(f, "{:?}", x),
        }
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::Int(v)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Float(v)
    }
}

/// A recorded variable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(Number),
    Vector(Vec<Number>),
    /// Non-numeric payload, stored verbatim.
    Text(String),
}

impl Value {
    pub fn as_scalar(&self) -> Option<Number> {
        match self {
            Value::Scalar(n) => Some(*n),
            Value::Vector(_) | Value::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(n) => write!(f, "{}", n),
            Value::Vector(items) => {
                write!(f, "[")?;
                for (i, n) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", n)?;
                }
                write!(f, "]")
            }
            Value::Text(s) => f.write_str(s),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// VariableSeries
// ────────────────────────────────────────────────────────────────────────────

/// History and running statistics for one named variable.
///
/// `min` and `max` only ever see scalar values; vectors and text are recorded
/// in `history` but do not touch the bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSeries {
    pub name: String,
    pub history: Vec<Value>,
    pub min: Option<Number>,
    pub max: Option<Number>,
    pub paused: bool,
}

impl VariableSeries {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            history: Vec::new(),
            min: None,
            max: None,
            paused: false,
        }
    }

    pub fn latest(&self) -> Option<&Value> {
        self.history.last()
    }

    /// Widen `min`/`max` to include `n`. Ties keep the existing bound.
    pub(crate) fn observe(&mut self, n: Number) {
        match self.min {
            Some(cur) if cur.compare(n) != Some(Ordering::Greater) => {}
            _ => self.min = Some(n),
        }
        match self.max {
            Some(cur) if cur.compare(n) != Some(Ordering::Less) => {}
            _ => self.max = Some(n),
        }
    }

    /// Text shown next to the variable name: `min / current / max` for a
    /// scalar, the value itself otherwise, empty when nothing is recorded.
    pub fn summary(&self) -> String {
        let Some(latest) = self.latest() else {
            return String::new();
        };
        match (latest, self.min, self.max) {
            (Value::Scalar(cur), Some(min), Some(max)) => {
                format!("min: {}\ncurrent: {}\nmax: {}", min, cur, max)
            }
            _ => latest.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_display_keeps_float_marker() {
        assert_eq!(Number::Int(3).to_string(), "3");
        assert_eq!(Number::Float(3.0).to_string(), "3.0");
        assert_eq!(Number::Float(2.5).to_string(), "2.5");
    }

    #[test]
    fn mixed_number_comparison_uses_numeric_value() {
        assert_eq!(Number::Int(2).compare(Number::Float(2.5)), Some(Ordering::Less));
        assert_eq!(Number::Float(2.0).compare(Number::Int(2)), Some(Ordering::Equal));
    }

    #[test]
    fn summary_for_scalar_and_vector() {
        let mut s = VariableSeries::new("x");
        assert_eq!(s.summary(), "");
        for v in [4, 1, 7] {
            s.history.push(Value::Scalar(Number::Int(v)));
            s.observe(Number::Int(v));
        }
        assert_eq!(s.summary(), "min: 1\ncurrent: 7\nmax: 7");

        s.history
            .push(Value::Vector(vec![Number::Int(1), Number::Float(0.5)]));
        assert_eq!(s.summary(), "[1, 0.5]");
    }

    #[test]
    fn values_serialize_untagged() {
        let v = Value::Vector(vec![Number::Int(1), Number::Float(2.5)]);
        assert_eq!(serde_json::to_string(&v).unwrap(), "[1,2.5]");
        let m = Message::Breakpoint { id: "7".into() };
        assert_eq!(
            serde_json::to_string(&m).unwrap(),
            r#"{"kind":"breakpoint","id":"7"}"#
        );
    }
}
