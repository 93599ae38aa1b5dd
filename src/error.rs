//! Error taxonomy shared by the decoder, tracker and breakpoint controller.
//!
//! None of these conditions is fatal: each one is recovered at the smallest
//! scope (one chunk, one line, one acknowledgement) and the next tick proceeds.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DebuggerError {
    /// A chunk contained bytes that are not valid UTF-8. The chunk was dropped
    /// and the pending fragment kept as it was.
    #[error("dropped {len} byte chunk with invalid UTF-8: {source}")]
    DecodeBytes {
        len: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    /// A variable value token could not be turned into numbers.
    #[error("cannot parse value {raw:?}: {reason}")]
    ValueParse { raw: String, reason: String },

    /// A breakpoint acknowledgement was requested before a transport exists.
    #[error("serial not initialized")]
    TransportUnavailable,

    #[error("transport I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl DebuggerError {
    pub(crate) fn value_parse(raw: &str, reason: impl Into<String>) -> Self {
        DebuggerError::ValueParse {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = DebuggerError> = std::result::Result<T, E>;
