//! Device-side line formatting.
//!
//! Produces exactly what the Arduino `SerialDebugger` library prints, which
//! makes it the reference for feeding synthetic traffic into the decoder.

use super::DELIMITER;
use crate::model::{Number, Value};

/// Digits after the decimal point used by the device for floats.
pub const FLOAT_DECIMALS: usize = 5;

pub fn encode_breakpoint(id: &str) -> String {
    format!("log breakpoint {}", id)
}

pub fn encode_variable(name: &str, value: &Value) -> String {
    format!("log variable {} {}", name, encode_value(value))
}

/// Format a value token: plain numbers, `[a,b,c]` for arrays, text verbatim.
pub fn encode_value(value: &Value) -> String {
    match value {
        Value::Scalar(n) => encode_number(*n),
        Value::Vector(items) => {
            let parts: Vec<String> = items.iter().map(|n| encode_number(*n)).collect();
            format!("[{}]", parts.join(","))
        }
        Value::Text(s) => s.clone(),
    }
}

/// Log a register bit by bit: every byte expands to eight `0`/`1` entries,
/// least significant bit first.
pub fn encode_register(name: &str, bytes: &[u8]) -> String {
    let bits = bytes
        .iter()
        .flat_map(|b| (0..8u32).map(move |j| Number::Int(i64::from((*b >> j) & 1))))
        .collect();
    encode_variable(name, &Value::Vector(bits))
}

/// Append the line delimiter.
pub fn frame(line: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(line.len() + DELIMITER.len());
    out.extend_from_slice(line.as_bytes());
    out.extend_from_slice(DELIMITER);
    out
}

fn encode_number(n: Number) -> String {
    match n {
        Number::Int(i) => i.to_string(),
        Number::Float(x) => format!("{:.*}", FLOAT_DECIMALS, x),
    }
}
