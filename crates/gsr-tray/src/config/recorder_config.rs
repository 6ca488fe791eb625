use crate::config::{DEFAULT_GRACE_PERIOD_MS, GRACE_PERIOD_RANGE, clamp_to};

use std::time::Duration;

use gsr_tray_core::DEFAULT_RECORDER_BINARY;
use serde::{Deserialize, Serialize};

/// Recorder process settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Recorder executable, looked up on `PATH` when not absolute.
    pub binary: String,
    /// Milliseconds between SIGTERM and SIGKILL when stopping.
    pub grace_period_ms: u64,
}

impl RecorderConfig {
    /// Graceful-stop window for the session.
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    pub(crate) fn clamp(&mut self) {
        self.grace_period_ms = clamp_to(self.grace_period_ms, &GRACE_PERIOD_RANGE);
        if self.binary.trim().is_empty() {
            self.binary = DEFAULT_RECORDER_BINARY.to_string();
        }
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            binary: DEFAULT_RECORDER_BINARY.to_string(),
            grace_period_ms: DEFAULT_GRACE_PERIOD_MS,
        }
    }
}
