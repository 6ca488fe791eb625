use crate::{
    AppCommand, AppResult, TrayCommand, TrayIconState, TrayMenuIds, TraySink,
    config::Config,
    notifier::{DEFAULT_TIMEOUT, Notifier, REPLAY_SAVED_TIMEOUT, TITLE},
};

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::Local;
use gsr_tray_core::{CommandSpec, OutputStream, RecordingSession, SessionEvent};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};
use tray_icon::menu::MenuEvent;
use uuid::Uuid;

pub(crate) const REPLAY_NOT_ACTIVE: &str = "You need to start replay buffer first.";
pub(crate) const REPLAY_SAVED: &str = "Replay saved";

/// Main application state.
///
/// Runs on the async runtime thread and exclusively owns the recorder
/// session. Tray updates go back to the main thread through `tray`
/// because `TrayIcon` is `!Send` and must remain on the UI thread.
pub struct App {
    pub(crate) config: Config,
    pub(crate) config_path: PathBuf,
    pub(crate) session: RecordingSession,
    pub(crate) session_rx: mpsc::UnboundedReceiver<SessionEvent>,
    pub(crate) notifier: Box<dyn Notifier>,
    pub(crate) tray: Box<dyn TraySink>,
    pub(crate) menu_ids: TrayMenuIds,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
}

impl App {
    /// Run the main application event loop until shutdown.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("gsr-tray starting");

        // MenuEvent::receiver() is a blocking crossbeam receiver; forward it
        // from one blocking task. Dropping tray_event_rx ends the task on
        // its next send.
        let (tray_event_tx, mut tray_event_rx) = mpsc::channel(32);
        let tray_handle = tokio::task::spawn_blocking(move || {
            let receiver = MenuEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if tray_event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                Some(event) = tray_event_rx.recv() => {
                    match self.menu_ids.command_for(&event.id) {
                        Some(command) => {
                            if !self.handle_command(command).await {
                                break;
                            }
                        }
                        None => debug!(id = ?event.id, "Unknown tray menu item"),
                    }
                }

                Some(command) = self.command_rx.recv() => {
                    if !self.handle_command(command).await {
                        break;
                    }
                }

                Some(event) = self.session_rx.recv() => {
                    self.handle_session_event(event);
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        self.shutdown().await;

        drop(tray_event_rx);

        match tokio::time::timeout(Duration::from_secs(1), tray_handle).await {
            Ok(Ok(())) => info!("Tray event forwarder stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Tray event forwarder task panicked"),
            Err(_) => info!(
                "Tray event forwarder did not stop within timeout, \
                     will be cleaned up on exit"
            ),
        }

        info!("gsr-tray shut down successfully");

        Ok(())
    }

    /// Apply one command. Returns `false` once shutdown was requested.
    #[instrument(skip(self))]
    pub(crate) async fn handle_command(&mut self, command: AppCommand) -> bool {
        match command {
            AppCommand::ToggleRecording => {
                if self.session.is_active() {
                    self.stop_session().await;
                } else if let Err(e) = self.start_session() {
                    error!(error = ?e, "Failed to start recorder");
                    self.notify(&format!("Error starting recording: {}", e));
                    self.sync_tray();
                }
            }
            AppCommand::TogglePause => self.toggle_pause(),
            AppCommand::SaveReplay => self.save_replay(),
            AppCommand::OpenSettings => self.open_settings(),
            AppCommand::Shutdown => {
                info!("Shutdown requested");
                return false;
            }
        }
        true
    }

    /// React to output and exit of the recorder.
    pub(crate) fn handle_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Started { session_id, pid } => {
                debug!(session_id = %session_id, pid, "Recorder process running");
            }
            SessionEvent::Output {
                session_id,
                stream,
                text,
            } => log_output(session_id, stream, &text),
            SessionEvent::Exited { session_id, code } => {
                if self.session.handle_exit(session_id) {
                    info!(session_id = %session_id, ?code, "Recording finished");
                    self.sync_tray();
                } else {
                    debug!(session_id = %session_id, ?code, "Exit of a stopped session");
                }
            }
        }
    }

    fn start_session(&mut self) -> AppResult<()> {
        self.reload_config();

        let options = self.config.record_options(Local::now().naive_local());
        let replay = options.is_replay();
        info!(replay, "Replay mode");

        prepare_output(&options.output, replay);

        let (spec, assembly_error) =
            CommandSpec::assemble_or_usage(&self.config.recorder.binary, &options);
        if let Some(e) = &assembly_error {
            error!(error = %e, "Invalid recording settings, showing recorder usage instead");
            self.notify(&format!("Error starting recording: {}", e));
        }

        info!(command = %spec, "Starting recorder");
        self.session.start(&spec, replay && !spec.is_usage())?;
        self.sync_tray();

        if !spec.is_usage() {
            self.notify(if replay {
                "Replay buffer started"
            } else {
                "Recording started"
            });

            if let Err(e) = self.config.save_to(&self.config_path) {
                warn!(error = ?e, "Failed to save configuration");
            }
        }

        Ok(())
    }

    async fn stop_session(&mut self) {
        let replay = self.session.is_replay_mode();

        self.session.stop().await;
        self.sync_tray();

        self.notify(if replay {
            "Replay buffer stopped"
        } else {
            "Recording stopped"
        });
    }

    fn toggle_pause(&mut self) {
        if !self.session.is_active() {
            debug!("Pause requested while idle");
            return;
        }

        match self.session.toggle_pause() {
            Ok(true) => self.notify("Recording paused"),
            Ok(false) => self.notify("Recording resumed"),
            Err(e) => {
                error!(error = ?e, "Failed to toggle pause");
                self.notify(&format!("Failed to pause recording: {}", e));
            }
        }
        self.sync_tray();
    }

    fn save_replay(&mut self) {
        if !self.session.is_replay_mode() {
            warn!("Replay save requested without an active replay buffer");
            self.notify(REPLAY_NOT_ACTIVE);
            return;
        }

        match self.session.request_save() {
            Ok(()) => {
                self.notify_for(REPLAY_SAVED, REPLAY_SAVED_TIMEOUT);
                self.send_tray(TrayCommand::ShowStatus(REPLAY_SAVED.to_string()));
            }
            Err(e) => {
                error!(error = ?e, "Failed to save replay");
                self.notify(&format!("Failed to save replay: {}", e));
            }
        }
    }

    fn open_settings(&self) {
        match open::that(&self.config_path) {
            Ok(()) => info!(config_path = ?self.config_path, "Opened settings"),
            Err(e) => {
                error!(config_path = ?self.config_path, error = ?e, "Failed to open settings");
                self.notify(&format!(
                    "Edit the settings in {}",
                    self.config_path.display()
                ));
            }
        }
    }

    async fn shutdown(&mut self) {
        if self.session.is_active() {
            self.session.stop().await;
        }

        self.send_tray(TrayCommand::Shutdown);
        let _ = self.shutdown_tx.send(true);
    }

    /// Pick up edits made to the file since the last start.
    fn reload_config(&mut self) {
        match Config::load_from(&self.config_path) {
            Ok(config) => {
                self.session.set_grace_period(config.recorder.grace_period());
                self.config = config;
            }
            Err(e) => warn!(error = ?e, "Failed to reload configuration, keeping previous"),
        }
    }

    pub(crate) fn tray_state(&self) -> TrayIconState {
        TrayIconState::from_session(
            self.session.is_active(),
            self.session.is_replay_mode(),
            self.session.is_paused(),
        )
    }

    fn sync_tray(&self) {
        self.send_tray(TrayCommand::SetState(self.tray_state()));
    }

    fn send_tray(&self, command: TrayCommand) {
        if let Err(e) = self.tray.send_tray(command) {
            warn!(error = ?e, "Failed to update tray");
        }
    }

    fn notify(&self, message: &str) {
        self.notify_for(message, DEFAULT_TIMEOUT);
    }

    fn notify_for(&self, message: &str, timeout: Duration) {
        self.notifier.notify(TITLE, message, timeout);
    }
}

/// Make sure the directory the recorder writes into exists.
fn prepare_output(output: &Path, replay: bool) {
    let dir = if replay { Some(output) } else { output.parent() };

    let Some(dir) = dir.filter(|d| !d.as_os_str().is_empty() && !d.exists()) else {
        return;
    };

    match fs::create_dir_all(dir) {
        Ok(()) => debug!(dir = ?dir, "Created output directory"),
        Err(e) => warn!(dir = ?dir, error = ?e, "Failed to create output directory"),
    }
}

fn log_output(session_id: Uuid, stream: OutputStream, text: &str) {
    for line in text.lines().map(str::trim_end).filter(|l| !l.is_empty()) {
        info!(target: "recorder", session_id = %session_id, ?stream, "{}", line);
    }
}
