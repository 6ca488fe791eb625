/// Lifecycle phase of a [`crate::RecordingSession`].
///
/// Pause is tracked separately; it is only meaningful while `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No recorder process.
    Idle,
    /// Spawn requested, process id not yet known.
    Starting,
    /// Recorder process alive and tracked.
    Running,
    /// Termination requested, waiting for the process to exit.
    Stopping,
}
