use std::{io, sync::Arc};

/// Signals understood by gpu-screen-recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecorderSignal {
    /// `SIGUSR1`: save the replay buffer to disk.
    SaveReplay,
    /// `SIGUSR2`: toggle pause/resume.
    TogglePause,
    /// `SIGTERM`: finish the recording and exit.
    Terminate,
    /// `SIGKILL`: forced termination after the grace period.
    Kill,
}

impl RecorderSignal {
    /// Conventional signal name, for logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            RecorderSignal::SaveReplay => "SIGUSR1",
            RecorderSignal::TogglePause => "SIGUSR2",
            RecorderSignal::Terminate => "SIGTERM",
            RecorderSignal::Kill => "SIGKILL",
        }
    }

    #[cfg(unix)]
    fn raw(self) -> libc::c_int {
        match self {
            RecorderSignal::SaveReplay => libc::SIGUSR1,
            RecorderSignal::TogglePause => libc::SIGUSR2,
            RecorderSignal::Terminate => libc::SIGTERM,
            RecorderSignal::Kill => libc::SIGKILL,
        }
    }
}

/// Delivers signals to a process by id.
///
/// The session controller only talks to the recorder through this trait, so
/// tests can observe exactly which signals were sent.
pub trait SignalSender: Send + Sync {
    /// Send `signal` to `pid`.
    fn send(&self, pid: u32, signal: RecorderSignal) -> io::Result<()>;
}

impl<T: SignalSender + ?Sized> SignalSender for Arc<T> {
    fn send(&self, pid: u32, signal: RecorderSignal) -> io::Result<()> {
        (**self).send(pid, signal)
    }
}

/// [`SignalSender`] backed by `kill(2)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PosixSignals;

#[cfg(unix)]
impl SignalSender for PosixSignals {
    fn send(&self, pid: u32, signal: RecorderSignal) -> io::Result<()> {
        let pid = libc::pid_t::try_from(pid)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;

        // SAFETY: kill(2) has no memory-safety preconditions.
        let res = unsafe { libc::kill(pid, signal.raw()) };
        if res == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }
}

#[cfg(not(unix))]
impl SignalSender for PosixSignals {
    fn send(&self, _pid: u32, signal: RecorderSignal) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("{} is only supported on Unix platforms", signal.name()),
        ))
    }
}
