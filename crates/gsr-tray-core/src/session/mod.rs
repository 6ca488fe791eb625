mod event;
mod phase;
mod recording_session;
mod signals;

pub use {
    event::{OutputStream, SessionEvent},
    phase::SessionPhase,
    recording_session::{DEFAULT_GRACE_PERIOD, RecordingSession},
    signals::{PosixSignals, RecorderSignal, SignalSender},
};
