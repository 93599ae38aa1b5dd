//! SerialDebugger telemetry decoder.
//!
//! This crate decodes the line protocol printed by the Arduino `SerialDebugger`
//! library, keeps a history with running bounds for every logged variable and
//! answers breakpoints with the `ok` acknowledgement.
//!
//! The binary `rustydebug` wires a [`session::DebugSession`] to a serial port
//! or a recorded capture and prints tick reports as JSON.

pub mod breakpoint;
pub mod config;
pub mod console;
pub mod downsample;
pub mod error;
pub mod model;
pub mod protocol;
pub mod session;
pub mod tracker;
pub mod transport;

pub use error::{DebuggerError, Result};
