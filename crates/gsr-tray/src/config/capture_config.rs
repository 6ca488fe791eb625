use crate::config::{
    DEFAULT_CAPTURE_SOURCE, DEFAULT_FPS, FPS_RANGE, HEIGHT_RANGE, WIDTH_RANGE, clamp_to,
};

use serde::{Deserialize, Serialize};

/// What and how to capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Capture source choice or `NAME (WxH)` monitor entry.
    pub source: String,
    /// Output width when `original_resolution` is off (0 = unset).
    pub width: u32,
    /// Output height when `original_resolution` is off (0 = unset).
    pub height: u32,
    /// Keep the source resolution.
    pub original_resolution: bool,
    /// Frames per second.
    pub fps: u32,
    /// Frame rate mode choice.
    pub frame_mode: String,
    /// Record the cursor.
    pub show_cursor: bool,
}

impl CaptureConfig {
    pub(crate) fn clamp(&mut self) {
        self.width = clamp_to(self.width, &WIDTH_RANGE);
        self.height = clamp_to(self.height, &HEIGHT_RANGE);
        self.fps = clamp_to(self.fps, &FPS_RANGE);
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_CAPTURE_SOURCE.to_string(),
            width: 0,
            height: 0,
            original_resolution: true,
            fps: DEFAULT_FPS,
            frame_mode: "vfr".to_string(),
            show_cursor: true,
        }
    }
}
