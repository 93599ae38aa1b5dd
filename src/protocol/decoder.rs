//! Tokenizing a single protocol line.

use crate::model::Message;

/// Decode one line (delimiter already stripped).
///
/// Tokens are separated by single spaces. Missing tokens make the line
/// [`Message::Unknown`]; extra trailing tokens are ignored.
pub fn decode(line: &str) -> Message {
    if line.is_empty() {
        return Message::Ignored;
    }
    let unknown = || Message::Unknown {
        raw_line: line.to_string(),
    };

    let mut tokens = line.split(' ');
    if tokens.next() != Some("log") {
        return unknown();
    }
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some("breakpoint"), Some(id), _) => Message::Breakpoint { id: id.to_string() },
        (Some("variable"), Some(name), Some(raw_value)) => Message::VariableUpdate {
            name: name.to_string(),
            raw_value: raw_value.to_string(),
        },
        _ => unknown(),
    }
}
