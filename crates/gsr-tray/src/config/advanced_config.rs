use crate::config::{DEFAULT_KEYFRAME_INTERVAL, KEYFRAME_INTERVAL_RANGE, clamp_to};

use serde::{Deserialize, Serialize};

/// Encoder and diagnostics settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedConfig {
    /// Encoder choice.
    pub encoder: String,
    /// Seconds between keyframes.
    pub keyframe_interval: f64,
    /// Reuse the previous desktop portal session.
    pub restore_portal_session: bool,
    /// Overclock memory transfer rate (NVIDIA).
    pub overclock: bool,
    /// Verbose recorder output.
    pub verbose: bool,
}

impl AdvancedConfig {
    pub(crate) fn clamp(&mut self) {
        self.keyframe_interval = if self.keyframe_interval.is_finite() {
            clamp_to(self.keyframe_interval, &KEYFRAME_INTERVAL_RANGE)
        } else {
            DEFAULT_KEYFRAME_INTERVAL
        };
    }
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            encoder: "gpu".to_string(),
            keyframe_interval: DEFAULT_KEYFRAME_INTERVAL,
            restore_portal_session: false,
            overclock: false,
            verbose: true,
        }
    }
}
