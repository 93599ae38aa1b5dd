//! SerialDebugger wire protocol.
//!
//! The device prints CR LF terminated text lines of the form
//! `log breakpoint <id>` or `log variable <name> <value>` and waits for the
//! two bytes `ok` after every breakpoint. Sub-modules split the work:
//!
//! - [`reassembler`] – turns arbitrary byte chunks into complete lines
//! - [`decoder`] – tokenizes one line into a [`Message`](crate::model::Message)
//! - [`value`] – tolerant parsing of the value token
//! - [`encoder`] – the device-side formatting rules

pub mod decoder;
pub mod encoder;
pub mod reassembler;
pub mod value;

pub use decoder::decode;
pub use encoder::{encode_breakpoint, encode_register, encode_value, encode_variable, frame};
pub use reassembler::Reassembler;
pub use value::{ValueParser, parse_value};

/// Line terminator used by the device (`Serial.println`).
pub const DELIMITER: &[u8] = b"\r\n";

/// Acknowledgement that releases a halted device. Sent without a delimiter.
pub const ACK: &[u8] = b"ok";
