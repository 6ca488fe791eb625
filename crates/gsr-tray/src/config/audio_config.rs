use crate::config::{AUDIO_BITRATE_RANGE, DEFAULT_AUDIO_BITRATE, clamp_to};

use serde::{Deserialize, Serialize};

/// Audio capture configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Audio source label, device id or `app:` source. Empty = no audio.
    pub source: String,
    /// Audio codec choice.
    pub codec: String,
    /// Bitrate in kbps, used when `auto_bitrate` is off.
    pub bitrate: u32,
    /// Let the recorder pick the audio bitrate.
    pub auto_bitrate: bool,
}

impl AudioConfig {
    /// Bitrate to pass to the recorder, if any.
    pub fn effective_bitrate(&self) -> Option<u32> {
        (!self.auto_bitrate).then_some(self.bitrate)
    }

    pub(crate) fn clamp(&mut self) {
        self.bitrate = clamp_to(self.bitrate, &AUDIO_BITRATE_RANGE);
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            source: "default_output".to_string(),
            codec: "opus".to_string(),
            bitrate: DEFAULT_AUDIO_BITRATE,
            auto_bitrate: true,
        }
    }
}
