use crate::config::{BUFFER_SIZE_RANGE, DEFAULT_BUFFER_SIZE, clamp_to, default_replay_dir};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Replay buffer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Start a replay buffer instead of a regular recording.
    pub enabled: bool,
    /// Seconds kept in the buffer.
    pub buffer_size: u32,
    /// Clear the buffer after every save.
    pub restart_on_save: bool,
    /// Save replays into per-date folders.
    pub date_folders: bool,
    /// Directory saved replays are written to.
    pub output_dir: PathBuf,
    /// Container choice for saved replays.
    pub container: String,
}

impl ReplayConfig {
    pub(crate) fn clamp(&mut self) {
        self.buffer_size = clamp_to(self.buffer_size, &BUFFER_SIZE_RANGE);
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
            restart_on_save: false,
            date_folders: true,
            output_dir: default_replay_dir(),
            container: "mp4".to_string(),
        }
    }
}
