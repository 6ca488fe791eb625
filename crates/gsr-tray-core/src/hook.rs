//! Post-save script hook.
//!
//! The script is called with two positional arguments: the saved file's path
//! and the recording type (`replay`).

use crate::{CoreResult, RecorderError};

use std::{
    panic::Location,
    path::{Path, PathBuf},
    process::Stdio,
};

use error_location::ErrorLocation;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Recording type passed to the script for replay saves.
pub const RECORDING_TYPE_REPLAY: &str = "replay";

/// A user script run after a replay is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSaveHook {
    script: PathBuf,
}

impl PostSaveHook {
    /// Hook for `script`.
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
        }
    }

    /// Hook from the `enabled`/`script` settings pair, if usable.
    pub fn configured(enabled: bool, script: &str) -> Option<Self> {
        let script = script.trim();
        (enabled && !script.is_empty()).then(|| Self::new(script))
    }

    /// Path of the script.
    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Run the script for `saved_file` and wait for it.
    ///
    /// Returns the script's standard output.
    ///
    /// # Errors
    ///
    /// [`RecorderError::ScriptHook`] when the script cannot be spawned or
    /// exits unsuccessfully. Callers treat this as non-fatal.
    #[instrument(skip(self), fields(script = ?self.script))]
    pub async fn run(&self, saved_file: &Path, recording_type: &str) -> CoreResult<String> {
        let output = Command::new(&self.script)
            .arg(saved_file)
            .arg(recording_type)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| RecorderError::ScriptHook {
                script: self.script.clone(),
                reason: format!("failed to start: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            return Err(RecorderError::ScriptHook {
                script: self.script.clone(),
                reason: format!("{}: {}", output.status, stderr.trim()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if !stderr.trim().is_empty() {
            debug!(stderr = %stderr.trim(), "Post-save script wrote to stderr");
        }

        info!(saved_file = ?saved_file, "Post-save script finished");

        Ok(stdout)
    }
}
