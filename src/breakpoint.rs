//! Breakpoint halt / skip handshake.
//!
//! The device prints `log breakpoint <id>` and then blocks until it reads
//! `ok`. The controller remembers which breakpoint is holding the device and
//! sends the acknowledgement.

use crate::error::{DebuggerError, Result};
use crate::protocol::ACK;
use crate::transport::Transport;
use log::{debug, info, warn};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "id", rename_all = "snake_case")]
pub enum BreakpointState {
    #[default]
    Idle,
    Halted(String),
}

/// What happened to an incoming breakpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "id", rename_all = "snake_case")]
pub enum BreakpointOutcome {
    /// The device is waiting; show the id and wait for the operator.
    Halted(String),
    /// Acknowledged immediately.
    Skipped(String),
}

#[derive(Debug, Clone, Default)]
pub struct BreakpointController {
    state: BreakpointState,
}

impl BreakpointController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &BreakpointState {
        &self.state
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.state, BreakpointState::Halted(_))
    }

    pub fn halted_id(&self) -> Option<&str> {
        match &self.state {
            BreakpointState::Halted(id) => Some(id),
            BreakpointState::Idle => None,
        }
    }

    /// Handle `log breakpoint <id>`.
    ///
    /// With `auto_skip` the acknowledgement goes out immediately. If it cannot
    /// be sent the device is still waiting, so the breakpoint is reported as
    /// halted and the operator can retry with [`skip`](Self::skip).
    pub fn on_breakpoint(
        &mut self,
        id: &str,
        auto_skip: bool,
        transport: Option<&mut dyn Transport>,
    ) -> BreakpointOutcome {
        if auto_skip {
            match self.skip(transport) {
                Ok(()) => {
                    debug!("breakpoint {} skipped automatically", id);
                    return BreakpointOutcome::Skipped(id.to_string());
                }
                Err(e) => warn!("cannot auto-skip breakpoint {}: {}", id, e),
            }
        }
        info!("halted at breakpoint {}", id);
        self.state = BreakpointState::Halted(id.to_string());
        BreakpointOutcome::Halted(id.to_string())
    }

    /// Send the acknowledgement and return to `Idle`, whatever the current
    /// state. Without a transport, or if the write fails, the state is kept.
    pub fn skip(&mut self, transport: Option<&mut dyn Transport>) -> Result<()> {
        let transport = transport.ok_or(DebuggerError::TransportUnavailable)?;
        transport.write_all(ACK)?;
        if let BreakpointState::Halted(id) = &self.state {
            debug!("released breakpoint {}", id);
        }
        self.state = BreakpointState::Idle;
        Ok(())
    }
}
