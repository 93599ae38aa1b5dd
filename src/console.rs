//! Operator commands typed while a session is running.

use crate::error::Result;
use crate::session::{DebugSession, SeriesSnapshot};
use crate::transport::Transport;
use log::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Continue past the current breakpoint.
    Next,
    Pause(String),
    Resume(String),
    Reset(String),
    ResetAll,
    AutoSkip(bool),
    Show,
    Quit,
}

impl ConsoleCommand {
    /// Parse one input line. An empty line means "next", like pressing the
    /// continue button. Returns `None` for anything unrecognised.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let cmd = words.next().unwrap_or("");
        let arg = words.next();
        if words.next().is_some() {
            return None;
        }
        let named = |f: fn(String) -> ConsoleCommand| arg.map(|a| f(a.to_string()));
        match (cmd, arg) {
            ("" | "n" | "next", None) => Some(ConsoleCommand::Next),
            ("pause", Some(_)) => named(ConsoleCommand::Pause),
            ("resume", Some(_)) => named(ConsoleCommand::Resume),
            ("reset", Some(_)) => named(ConsoleCommand::Reset),
            ("reset", None) => Some(ConsoleCommand::ResetAll),
            ("auto", Some("on")) => Some(ConsoleCommand::AutoSkip(true)),
            ("auto", Some("off")) => Some(ConsoleCommand::AutoSkip(false)),
            ("show" | "s", None) => Some(ConsoleCommand::Show),
            ("q" | "quit", None) => Some(ConsoleCommand::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Continue,
    Show(Vec<SeriesSnapshot>),
    Quit,
}

impl<T: Transport> DebugSession<T> {
    /// Execute a console command. Only `Next` and `AutoSkip(true)` touch the
    /// transport and can fail.
    pub fn apply(&mut self, cmd: ConsoleCommand) -> Result<CommandOutcome> {
        match cmd {
            ConsoleCommand::Next => self.skip_breakpoint()?,
            ConsoleCommand::Pause(name) => {
                if !self.tracker_mut().pause(&name) {
                    warn!("no variable named {}", name);
                }
            }
            ConsoleCommand::Resume(name) => {
                if !self.tracker_mut().resume(&name) {
                    warn!("no variable named {}", name);
                }
            }
            ConsoleCommand::Reset(name) => {
                if !self.tracker_mut().reset(&name) {
                    warn!("no variable named {}", name);
                }
            }
            ConsoleCommand::ResetAll => self.reset_all(),
            ConsoleCommand::AutoSkip(on) => self.set_auto_skip(on)?,
            ConsoleCommand::Show => return Ok(CommandOutcome::Show(self.snapshot())),
            ConsoleCommand::Quit => return Ok(CommandOutcome::Quit),
        }
        Ok(CommandOutcome::Continue)
    }
}
