//! One debugging session: transport, decoder, tracker and breakpoint state
//! wired into a single tick function.
//!
//! The host calls [`DebugSession::tick`] from its periodic timer. Each tick
//! drains the transport once, processes the completed lines strictly in
//! arrival order and returns a [`TickReport`] for whatever renders the
//! result. Nothing here blocks or spawns threads.

use crate::breakpoint::{BreakpointController, BreakpointOutcome, BreakpointState};
use crate::config::DebuggerConfig;
use crate::downsample::{downsample, numeric_history};
use crate::error::Result;
use crate::model::{Message, Number, Value, VariableSeries};
use crate::protocol::{Reassembler, ValueParser, decode};
use crate::tracker::VariableTracker;
use crate::transport::Transport;
use log::{debug, info, warn};
use serde::Serialize;
use std::fmt;

// ────────────────────────────────────────────────────────────────────────────
// Reports
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    #[default]
    NotInitialized,
    /// Data arrived on this tick.
    Open,
    /// The link is up but nothing arrived.
    NoMessages,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LinkStatus::NotInitialized => "Serial not initialized",
            LinkStatus::Open => "Serial open",
            LinkStatus::NoMessages => "Serial open, no messages",
        })
    }
}

/// A value that was recorded into the tracker on this tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Update {
    pub name: String,
    pub value: Value,
}

/// Everything a renderer needs to know about one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    pub status: LinkStatus,
    pub updates: Vec<Update>,
    /// Set when a breakpoint halted the device on this tick.
    pub halted: Option<String>,
    /// Breakpoints acknowledged automatically on this tick.
    pub skipped: Vec<String>,
    pub unknown: usize,
    pub rejected_values: usize,
    pub dropped_chunk: bool,
    pub read_error: Option<String>,
}

impl TickReport {
    fn with_status(status: LinkStatus) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    /// True when the tick produced nothing beyond a status.
    pub fn is_quiet(&self) -> bool {
        self.updates.is_empty()
            && self.halted.is_none()
            && self.skipped.is_empty()
            && self.unknown == 0
            && self.rejected_values == 0
            && !self.dropped_chunk
            && self.read_error.is_none()
    }
}

/// Read-only view of one series, ready for display or JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSnapshot {
    pub name: String,
    pub samples: usize,
    pub paused: bool,
    pub min: Option<Number>,
    pub max: Option<Number>,
    pub latest: Option<Value>,
    pub summary: String,
    /// Downsampled history, only for all-scalar series.
    pub plot: Option<Vec<f64>>,
}

// ────────────────────────────────────────────────────────────────────────────
// DebugSession
// ────────────────────────────────────────────────────────────────────────────

/// Generic over [`Transport`] so the same session drives a serial port or a
/// recorded capture.
pub struct DebugSession<T: Transport> {
    transport: Option<T>,
    reassembler: Reassembler,
    parser: ValueParser,
    tracker: VariableTracker,
    breakpoints: BreakpointController,
    config: DebuggerConfig,
}

impl<T: Transport> DebugSession<T> {
    /// A session without a transport; ticks report
    /// [`LinkStatus::NotInitialized`] until one is set.
    pub fn new(config: DebuggerConfig) -> Self {
        Self {
            transport: None,
            reassembler: Reassembler::new(),
            parser: ValueParser::new().with_sign(config.keep_sign),
            tracker: VariableTracker::new().with_reset_clears_bounds(config.reset_clears_bounds),
            breakpoints: BreakpointController::new(),
            config,
        }
    }

    pub fn with_transport(transport: T, config: DebuggerConfig) -> Self {
        let mut session = Self::new(config);
        session.transport = Some(transport);
        session
    }

    /// Replace the transport, returning the previous one. The pending line
    /// fragment belongs to the old stream and is discarded.
    pub fn set_transport(&mut self, transport: T) -> Option<T> {
        self.reassembler.clear();
        self.transport.replace(transport)
    }

    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }

    pub fn transport_mut(&mut self) -> Option<&mut T> {
        self.transport.as_mut()
    }

    pub fn config(&self) -> &DebuggerConfig {
        &self.config
    }

    pub fn tracker(&self) -> &VariableTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut VariableTracker {
        &mut self.tracker
    }

    pub fn breakpoint_state(&self) -> &BreakpointState {
        self.breakpoints.state()
    }

    /// Poll the transport once and process what arrived.
    pub fn tick(&mut self) -> TickReport {
        let Some(transport) = self.transport.as_mut() else {
            return TickReport::with_status(LinkStatus::NotInitialized);
        };
        let chunk = match transport.read_available() {
            Ok(chunk) => chunk,
            Err(e) => {
                warn!("reading from transport failed: {}", e);
                let mut report = TickReport::with_status(LinkStatus::Open);
                report.read_error = Some(e.to_string());
                return report;
            }
        };
        if chunk.is_empty() {
            return TickReport::with_status(LinkStatus::NoMessages);
        }
        self.process_chunk(&chunk)
    }

    /// Reassemble `chunk` and handle every line it completes, in order.
    pub fn process_chunk(&mut self, chunk: &[u8]) -> TickReport {
        let mut report = TickReport::with_status(LinkStatus::Open);
        let lines = match self.reassembler.feed(chunk) {
            Ok(lines) => lines,
            Err(e) => {
                warn!("{}", e);
                report.dropped_chunk = true;
                return report;
            }
        };
        for line in &lines {
            self.handle_line(line, &mut report);
        }
        report
    }

    fn handle_line(&mut self, line: &str, report: &mut TickReport) {
        debug!("line {:?}", line);
        match decode(line) {
            Message::Ignored => {}
            Message::Unknown { raw_line } => {
                info!("unknown message encountered: {}", raw_line);
                report.unknown += 1;
            }
            Message::Breakpoint { id } => {
                let transport = self.transport.as_mut().map(|t| t as &mut dyn Transport);
                match self
                    .breakpoints
                    .on_breakpoint(&id, self.config.auto_skip, transport)
                {
                    BreakpointOutcome::Halted(id) => report.halted = Some(id),
                    BreakpointOutcome::Skipped(id) => report.skipped.push(id),
                }
            }
            Message::VariableUpdate { name, raw_value } => {
                let value = match self.parser.parse(&raw_value) {
                    Ok(value) => value,
                    Err(e) if self.config.keep_text_values => {
                        debug!("keeping {} as text: {}", name, e);
                        Value::Text(raw_value)
                    }
                    Err(e) => {
                        warn!("skipping update of {}: {}", name, e);
                        report.rejected_values += 1;
                        return;
                    }
                };
                if self.tracker.record(&name, value.clone()) {
                    report.updates.push(Update { name, value });
                }
            }
        }
    }

    /// Release the device from the current breakpoint.
    pub fn skip_breakpoint(&mut self) -> Result<()> {
        let transport = self.transport.as_mut().map(|t| t as &mut dyn Transport);
        self.breakpoints.skip(transport)
    }

    /// Switch automatic skipping. Turning it on while halted releases the
    /// device right away.
    pub fn set_auto_skip(&mut self, auto_skip: bool) -> Result<()> {
        self.config.auto_skip = auto_skip;
        if auto_skip && self.breakpoints.is_halted() {
            self.skip_breakpoint()?;
        }
        Ok(())
    }

    /// Downsampled numeric history of `name`, or `None` for unknown, empty or
    /// non-scalar series.
    pub fn plot(&self, name: &str) -> Option<Vec<f64>> {
        let series = self.tracker.get(name)?;
        self.plot_series(series)
    }

    pub fn snapshot(&self) -> Vec<SeriesSnapshot> {
        self.tracker
            .iter()
            .map(|s| SeriesSnapshot {
                name: s.name.clone(),
                samples: s.history.len(),
                paused: s.paused,
                min: s.min,
                max: s.max,
                latest: s.latest().cloned(),
                summary: s.summary(),
                plot: self.plot_series(s),
            })
            .collect()
    }

    /// Forget all variables. Breakpoint state and the link are untouched.
    pub fn reset_all(&mut self) {
        self.tracker.reset_all();
    }

    fn plot_series(&self, series: &VariableSeries) -> Option<Vec<f64>> {
        let numeric = numeric_history(&series.history)?;
        Some(downsample(
            &numeric,
            self.config.plot_length,
            self.config.plot_only_latest,
        ))
    }
}
