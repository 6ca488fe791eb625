use crate::config::default_videos_dir;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where regular recordings go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file, or a directory to generate a file name in.
    pub path: PathBuf,
    /// Container choice.
    pub container: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_videos_dir(),
            container: "mp4".to_string(),
        }
    }
}
