use crate::{
    CommandSpec, CoreResult, RecorderError,
    session::{OutputStream, PosixSignals, RecorderSignal, SessionEvent, SessionPhase, SignalSender},
};

use std::{
    io,
    panic::Location,
    process::Stdio,
    time::{Duration, Instant},
};

use error_location::ErrorLocation;
use tokio::{
    io::{AsyncRead, AsyncReadExt},
    process::Command,
    sync::{mpsc, watch},
    task::JoinHandle,
    time::timeout,
};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// How long `stop` waits for a graceful exit before sending `SIGKILL`.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(1000);

/// Upper bound on waiting for the reaper after `SIGKILL`.
const REAP_TIMEOUT: Duration = Duration::from_secs(2);

/// Upper bound on draining output pipes after the process exited.
///
/// Grandchildren (e.g. a post-save script) can keep the pipes open.
const DRAIN_TIMEOUT: Duration = Duration::from_millis(500);

const READ_CHUNK: usize = 4096;

struct ActiveProcess {
    session_id: Uuid,
    pid: u32,
    started_at: Instant,
    exited_rx: watch::Receiver<bool>,
    _reaper: JoinHandle<()>,
}

impl ActiveProcess {
    fn has_exited(&self) -> bool {
        *self.exited_rx.borrow()
    }
}

/// Owns the lifecycle of at most one recorder process.
///
/// Not thread-safe: one owner drives `start`/`stop` sequentially,
/// and consumes [`SessionEvent`]s from the channel given at construction.
/// Output and exit notifications are produced by background tasks, so
/// `start` must be called from within a tokio runtime.
///
/// ```text
/// Idle -> Starting -> Running -> Stopping -> Idle
///                        |
///                        +---- (process exits) ----> Idle
/// ```
pub struct RecordingSession<S = PosixSignals> {
    signals: S,
    events: mpsc::UnboundedSender<SessionEvent>,
    grace_period: Duration,
    phase: SessionPhase,
    active: Option<ActiveProcess>,
    paused: bool,
    replay_mode: bool,
}

impl RecordingSession<PosixSignals> {
    /// Create an idle session that signals the recorder with `kill(2)`.
    pub fn new(events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self::with_signals(PosixSignals, events)
    }
}

impl<S: SignalSender> RecordingSession<S> {
    /// Create an idle session with a custom signal sender.
    pub fn with_signals(signals: S, events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self {
            signals,
            events,
            grace_period: DEFAULT_GRACE_PERIOD,
            phase: SessionPhase::Idle,
            active: None,
            paused: false,
            replay_mode: false,
        }
    }

    /// Override the graceful-stop window.
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Change the graceful-stop window for subsequent stops.
    pub fn set_grace_period(&mut self, grace_period: Duration) {
        self.grace_period = grace_period;
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Whether a recorder process is tracked.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Process id of the tracked recorder.
    pub fn pid(&self) -> Option<u32> {
        self.active.as_ref().map(|a| a.pid)
    }

    /// Id of the tracked session.
    pub fn session_id(&self) -> Option<Uuid> {
        self.active.as_ref().map(|a| a.session_id)
    }

    /// Whether the recorder was last told to pause.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the tracked session runs a replay buffer.
    pub fn is_replay_mode(&self) -> bool {
        self.active.is_some() && self.replay_mode
    }

    /// Spawn the recorder described by `spec`.
    ///
    /// Stdout and stderr are relayed as [`SessionEvent::Output`]; exit is
    /// reported as [`SessionEvent::Exited`].
    ///
    /// # Errors
    ///
    /// - [`RecorderError::AlreadyActive`] if a session is already tracked.
    /// - [`RecorderError::Launch`] if the program cannot be spawned; the
    ///   session stays `Idle`.
    #[track_caller]
    #[instrument(skip(self, spec), fields(program = spec.program()))]
    pub fn start(&mut self, spec: &CommandSpec, replay_mode: bool) -> CoreResult<Uuid> {
        if self.phase != SessionPhase::Idle || self.active.is_some() {
            return Err(RecorderError::AlreadyActive {
                pid: self.pid(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.phase = SessionPhase::Starting;

        let mut command = Command::new(spec.program());
        command
            .args(spec.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(source) => {
                self.phase = SessionPhase::Idle;
                return Err(RecorderError::Launch {
                    program: spec.program().to_string(),
                    source,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        let Some(pid) = child.id() else {
            self.phase = SessionPhase::Idle;
            return Err(RecorderError::Launch {
                program: spec.program().to_string(),
                source: io::Error::other("process exited before its id was observed"),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let session_id = Uuid::new_v4();

        let relays: Vec<JoinHandle<()>> = [
            child.stdout.take().map(|out| {
                tokio::spawn(relay_output(
                    out,
                    OutputStream::Stdout,
                    session_id,
                    self.events.clone(),
                ))
            }),
            child.stderr.take().map(|err| {
                tokio::spawn(relay_output(
                    err,
                    OutputStream::Stderr,
                    session_id,
                    self.events.clone(),
                ))
            }),
        ]
        .into_iter()
        .flatten()
        .collect();

        let (exited_tx, exited_rx) = watch::channel(false);
        let events = self.events.clone();
        let reaper = tokio::spawn(async move {
            let code = match child.wait().await {
                Ok(status) => status.code(),
                Err(e) => {
                    error!(session_id = %session_id, error = ?e, "Failed to wait for recorder");
                    None
                }
            };
            let _ = exited_tx.send(true);

            for relay in relays {
                if timeout(DRAIN_TIMEOUT, relay).await.is_err() {
                    debug!(session_id = %session_id, "Output pipe still open after exit");
                }
            }

            let _ = events.send(SessionEvent::Exited { session_id, code });
        });

        self.active = Some(ActiveProcess {
            session_id,
            pid,
            started_at: Instant::now(),
            exited_rx,
            _reaper: reaper,
        });
        self.phase = SessionPhase::Running;
        self.paused = false;
        self.replay_mode = replay_mode;

        let _ = self.events.send(SessionEvent::Started { session_id, pid });

        info!(session_id = %session_id, pid, replay_mode, "Recorder started");

        Ok(session_id)
    }

    /// Stop the recorder: `SIGTERM`, wait up to the grace period, then
    /// `SIGKILL` once if it is still alive.
    ///
    /// No-op when idle. Always leaves the session `Idle`.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) {
        let Some(active) = self.active.take() else {
            self.phase = SessionPhase::Idle;
            return;
        };

        self.phase = SessionPhase::Stopping;
        let pid = active.pid;
        let mut exited_rx = active.exited_rx.clone();

        if !active.has_exited() {
            if let Err(e) = self.signals.send(pid, RecorderSignal::Terminate) {
                warn!(pid, error = ?e, "Failed to send SIGTERM");
            }

            let graceful = timeout(self.grace_period, exited_rx.wait_for(|exited| *exited))
                .await
                .is_ok();

            if !graceful {
                warn!(
                    pid,
                    grace_ms = self.grace_period.as_millis(),
                    "Recorder did not exit within grace period, forcing"
                );

                if let Err(e) = self.signals.send(pid, RecorderSignal::Kill) {
                    error!(pid, error = ?e, "Failed to send SIGKILL");
                }

                if timeout(REAP_TIMEOUT, exited_rx.wait_for(|exited| *exited))
                    .await
                    .is_err()
                {
                    error!(pid, "Recorder still not reaped after SIGKILL");
                }
            }
        }

        info!(
            session_id = %active.session_id,
            pid,
            duration_ms = active.started_at.elapsed().as_millis(),
            "Recorder stopped"
        );

        self.phase = SessionPhase::Idle;
        self.paused = false;
    }

    /// Record that session `session_id` exited on its own.
    ///
    /// Returns `true` if it was the tracked session (now `Idle`), `false` for
    /// a stale id, e.g. a session already cleared by [`Self::stop`].
    #[instrument(skip(self))]
    pub fn handle_exit(&mut self, session_id: Uuid) -> bool {
        match &self.active {
            Some(active) if active.session_id == session_id => {
                info!(
                    session_id = %session_id,
                    pid = active.pid,
                    duration_ms = active.started_at.elapsed().as_millis(),
                    "Recorder exited"
                );
                self.active = None;
                self.phase = SessionPhase::Idle;
                self.paused = false;
                true
            }
            _ => false,
        }
    }

    /// Send `SIGUSR2` and flip the paused flag.
    ///
    /// Returns the new paused state.
    ///
    /// # Errors
    ///
    /// [`RecorderError::NoActiveProcess`] when nothing is running; the
    /// session is left untouched.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn toggle_pause(&mut self) -> CoreResult<bool> {
        self.signal(RecorderSignal::TogglePause)?;
        self.paused = !self.paused;

        info!(paused = self.paused, "Recorder pause toggled");

        Ok(self.paused)
    }

    /// Send `SIGUSR1` so the recorder saves its replay buffer.
    ///
    /// # Errors
    ///
    /// Same as [`Self::toggle_pause`].
    #[track_caller]
    #[instrument(skip(self))]
    pub fn request_save(&mut self) -> CoreResult<()> {
        self.signal(RecorderSignal::SaveReplay)?;

        info!("Replay save requested");

        Ok(())
    }

    #[track_caller]
    fn signal(&self, signal: RecorderSignal) -> CoreResult<()> {
        // An exited-but-unreported process keeps its pid until the exit
        // event is handled; never signal it, the pid may be reused.
        let pid = match &self.active {
            Some(active) if self.phase == SessionPhase::Running && !active.has_exited() => {
                active.pid
            }
            _ => {
                return Err(RecorderError::NoActiveProcess {
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        self.signals.send(pid, signal).map_err(|source| {
            #[cfg(unix)]
            if source.raw_os_error() == Some(libc::ESRCH) {
                return RecorderError::NoActiveProcess {
                    location: ErrorLocation::from(Location::caller()),
                };
            }
            RecorderError::Signal {
                signal: signal.name(),
                pid,
                source,
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        debug!(pid, signal = signal.name(), "Signal delivered");

        Ok(())
    }
}

async fn relay_output<R>(
    mut reader: R,
    stream: OutputStream,
    session_id: Uuid,
    events: mpsc::UnboundedSender<SessionEvent>,
) where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                let text = String::from_utf8_lossy(&buf[..n]).into_owned();
                let event = SessionEvent::Output {
                    session_id,
                    stream,
                    text,
                };
                if events.send(event).is_err() {
                    break;
                }
            }
            Err(e) => {
                debug!(session_id = %session_id, ?stream, error = ?e, "Output relay ended");
                break;
            }
        }
    }
}
