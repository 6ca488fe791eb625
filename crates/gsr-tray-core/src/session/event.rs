use uuid::Uuid;

/// Which pipe a chunk of recorder output came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

/// Notifications emitted by a [`crate::RecordingSession`].
///
/// All events for one session carry the id returned by `start`, so the owner
/// can ignore stragglers from a session it already stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The recorder process was created.
    Started {
        /// Session id.
        session_id: Uuid,
        /// OS process id.
        pid: u32,
    },
    /// A chunk of text the recorder wrote, verbatim.
    Output {
        /// Session id.
        session_id: Uuid,
        /// Source pipe.
        stream: OutputStream,
        /// Decoded chunk.
        text: String,
    },
    /// The recorder process exited (on its own or after `stop`).
    Exited {
        /// Session id.
        session_id: Uuid,
        /// Exit code, `None` when terminated by a signal.
        code: Option<i32>,
    },
}
