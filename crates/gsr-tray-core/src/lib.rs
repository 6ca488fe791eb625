//! gsr-tray Core Library
//!
//! Configures and supervises a single `gpu-screen-recorder` process:
//! command assembly from option values, the recording session lifecycle,
//! and POSIX signal control.
//!
//! # Example
//!
//! ```no_run
//! use gsr_tray_core::{CommandSpec, CoreResult, RecordOptions, RecordingSession};
//!
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> CoreResult<()> {
//!     let options = RecordOptions {
//!         output: "/tmp/out.mp4".into(),
//!         ..RecordOptions::default()
//!     };
//!     let spec = CommandSpec::assemble("gpu-screen-recorder", &options)?;
//!
//!     let (events_tx, _events_rx) = tokio::sync::mpsc::unbounded_channel();
//!     let mut session = RecordingSession::new(events_tx);
//!
//!     session.start(&spec, false)?;
//!     tokio::time::sleep(Duration::from_secs(3)).await;
//!     session.stop().await;
//!     Ok(())
//! }
//! ```

mod command;
pub mod discovery;
mod error;
pub mod hook;
mod session;

pub use {
    command::{
        CommandSpec, DEFAULT_RECORDER_BINARY, RecordOptions, ReplayOptions, mapping,
    },
    error::{RecorderError, Result as CoreResult},
    session::{
        DEFAULT_GRACE_PERIOD, OutputStream, PosixSignals, RecorderSignal, RecordingSession,
        SessionEvent, SessionPhase, SignalSender,
    },
};

#[cfg(test)]
mod tests;
