//! Reassembly of protocol lines from partial reads.

use super::DELIMITER;
use crate::error::{DebuggerError, Result};
use log::warn;
use std::str::Utf8Error;

/// Longest unterminated fragment kept between reads. A device that prints
/// without line breaks gets its fragment discarded instead of buffered forever.
pub const MAX_PENDING: usize = 4096;

/// Buffers the unterminated tail of the byte stream between reads.
///
/// The pending fragment never contains a full delimiter: everything up to the
/// last CR LF is handed out as lines on the call that completes it.
#[derive(Debug, Clone)]
pub struct Reassembler {
    pending: Vec<u8>,
    max_pending: usize,
}

impl Default for Reassembler {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            max_pending: MAX_PENDING,
        }
    }
}

impl Reassembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_pending(mut self, max_pending: usize) -> Self {
        self.max_pending = max_pending;
        self
    }

    /// Append `chunk` to the stream and return every line it completes, in
    /// arrival order and without delimiters.
    ///
    /// If a completed line is not valid UTF-8 the whole chunk is dropped and
    /// the pending fragment stays as it was before the call. The stream
    /// resynchronizes on the next delimiter. The one exception is a pending
    /// fragment ending in a partial character that this chunk does not
    /// complete: that fragment can never decode, so it is discarded and the
    /// chunk is decoded on its own.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<String>> {
        let decode_error = |source| DebuggerError::DecodeBytes {
            len: chunk.len(),
            source,
        };
        let (lines, tail) = match decode_lines(&self.pending, chunk) {
            Ok(decoded) => decoded,
            Err(_) if std::str::from_utf8(&self.pending).is_err() => {
                warn!(
                    "discarding {} pending bytes ending in an unfinished character",
                    self.pending.len()
                );
                self.pending.clear();
                decode_lines(&[], chunk).map_err(decode_error)?
            }
            Err(source) => return Err(decode_error(source)),
        };
        self.store_tail(tail);
        Ok(lines)
    }

    /// Bytes of the incomplete line carried over to the next call.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Forget the pending fragment, e.g. when the stream is replaced.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    fn store_tail(&mut self, tail: Vec<u8>) {
        if tail.len() > self.max_pending {
            warn!(
                "discarding {} byte fragment without line break, resynchronizing",
                tail.len()
            );
            self.pending.clear();
        } else {
            self.pending = tail;
        }
    }
}

/// Decode every line completed by `chunk` and return them with the new tail.
fn decode_lines(
    pending: &[u8],
    chunk: &[u8],
) -> std::result::Result<(Vec<String>, Vec<u8>), Utf8Error> {
    let mut data = Vec::with_capacity(pending.len() + chunk.len());
    data.extend_from_slice(pending);
    data.extend_from_slice(chunk);

    // `pending` holds no delimiter, so one can only start at its last byte.
    let mut segments = split_lines(&data, pending.len().saturating_sub(1));
    let tail = segments.pop().unwrap_or_default();

    let mut lines = Vec::with_capacity(segments.len());
    for seg in segments {
        lines.push(std::str::from_utf8(seg)?.to_string());
    }
    check_tail(tail)?;
    Ok((lines, tail.to_vec()))
}

/// Split on every non-overlapping CR LF at or after `from`. Always yields at
/// least one segment; the last one is whatever follows the final delimiter.
fn split_lines(data: &[u8], from: usize) -> Vec<&[u8]> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut i = from;
    while i + DELIMITER.len() <= data.len() {
        if &data[i..i + DELIMITER.len()] == DELIMITER {
            out.push(&data[start..i]);
            i += DELIMITER.len();
            start = i;
        } else {
            i += 1;
        }
    }
    out.push(&data[start..]);
    out
}

/// The tail may stop in the middle of a multi-byte character; only bytes that
/// can never become valid UTF-8 are rejected.
fn check_tail(tail: &[u8]) -> std::result::Result<(), Utf8Error> {
    match std::str::from_utf8(tail) {
        Ok(_) => Ok(()),
        Err(e) if e.error_len().is_none() => Ok(()),
        Err(e) => Err(e),
    }
}
