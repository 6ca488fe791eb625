use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Recorder control errors with source location tracking.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// The recorder (or a helper program) could not be spawned.
    #[error("Failed to launch {program}: {source} {location}")]
    Launch {
        /// Program that failed to start.
        program: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A control signal was requested but no recorder process is tracked.
    #[error("No active recorder process {location}")]
    NoActiveProcess {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A session was started while another one is still active.
    #[error("A recorder session is already active (pid {pid:?}) {location}")]
    AlreadyActive {
        /// Process id of the active session, if known.
        pid: Option<u32>,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Command assembly has no output destination.
    #[error("No output path specified {location}")]
    MissingOutput {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Delivering a signal to the recorder failed.
    #[error("Failed to send {signal} to pid {pid}: {source} {location}")]
    Signal {
        /// Signal name (e.g. `SIGUSR1`).
        signal: &'static str,
        /// Target process id.
        pid: u32,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The post-save script failed to run or exited unsuccessfully.
    #[error("Post-save script {script:?} failed: {reason} {location}")]
    ScriptHook {
        /// Script that was invoked.
        script: PathBuf,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`RecorderError`].
pub type Result<T> = std::result::Result<T, RecorderError>;
