use crate::config::{CBR_BITRATE_RANGE, DEFAULT_CBR_BITRATE, clamp_to};

use serde::{Deserialize, Serialize};

/// Encoding quality settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Quality preset choice.
    pub quality: String,
    /// Video codec choice.
    pub codec: String,
    /// Bitrate mode choice.
    pub bitrate_mode: String,
    /// Constant bitrate in kbps.
    pub cbr_bitrate: u32,
    /// Color range choice.
    pub color_range: String,
}

impl VideoConfig {
    pub(crate) fn clamp(&mut self) {
        self.cbr_bitrate = clamp_to(self.cbr_bitrate, &CBR_BITRATE_RANGE);
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            quality: "very_high".to_string(),
            codec: "auto".to_string(),
            bitrate_mode: "auto".to_string(),
            cbr_bitrate: DEFAULT_CBR_BITRATE,
            color_range: "limited".to_string(),
        }
    }
}
