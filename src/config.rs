//! Runtime settings, loadable from a JSON file. Every field has a default so
//! a config file only needs the entries it changes.

use crate::transport::check_baud_rate;
use anyhow::{Context, Result, anyhow};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebuggerConfig {
    /// Maximum number of points handed to a plot.
    pub plot_length: usize,
    /// Plot only the most recent `plot_length` points instead of spreading
    /// them over the whole history.
    pub plot_only_latest: bool,
    /// Acknowledge every breakpoint as soon as it arrives.
    pub auto_skip: bool,
    pub poll_interval_ms: u64,
    pub baud_rate: u32,
    /// Keep `-` when sanitizing value tokens.
    pub keep_sign: bool,
    /// Resetting a single variable also forgets its min/max.
    pub reset_clears_bounds: bool,
    /// Record unparsable value tokens as text instead of dropping them.
    pub keep_text_values: bool,
}

impl Default for DebuggerConfig {
    fn default() -> Self {
        Self {
            plot_length: 2000,
            plot_only_latest: false,
            auto_skip: false,
            poll_interval_ms: 100,
            baud_rate: 115200,
            keep_sign: false,
            reset_clears_bounds: false,
            keep_text_values: false,
        }
    }
}

impl DebuggerConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("Failed to parse debugger config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the serial link cannot use.
    pub fn validate(&self) -> Result<()> {
        check_baud_rate(self.baud_rate).map_err(|e| anyhow!(e))?;
        Ok(())
    }

    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_std_path())
            .with_context(|| format!("Failed to read {}", path))?;
        Self::from_json_str(&text).with_context(|| format!("Invalid config in {}", path))
    }
}
