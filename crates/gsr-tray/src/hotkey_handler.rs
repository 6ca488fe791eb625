//! Global shortcuts.
//!
//! Registers Ctrl+Shift+S (save replay), Ctrl+Shift+R (start/stop) and
//! Ctrl+Shift+P (pause/resume) when the platform allows it, and forwards
//! presses as [`AppCommand`]s.

use crate::{AppCommand, AppError, AppResult};

use std::{collections::HashMap, panic::Location, time::Duration};

use error_location::ErrorLocation;
use global_hotkey::{
    GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState,
    hotkey::{Code, HotKey, Modifiers},
};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// A shortcut and the command it triggers.
#[derive(Debug, Clone, Copy)]
pub struct Shortcut {
    /// Human-readable accelerator.
    pub accelerator: &'static str,
    /// Key code.
    pub code: Code,
    /// Command sent on press.
    pub command: AppCommand,
}

impl Shortcut {
    /// The global-hotkey definition.
    pub fn hotkey(&self) -> HotKey {
        HotKey::new(Some(Modifiers::CONTROL | Modifiers::SHIFT), self.code)
    }
}

/// Default shortcuts.
pub const SHORTCUTS: [Shortcut; 3] = [
    Shortcut {
        accelerator: "Ctrl+Shift+S",
        code: Code::KeyS,
        command: AppCommand::SaveReplay,
    },
    Shortcut {
        accelerator: "Ctrl+Shift+R",
        code: Code::KeyR,
        command: AppCommand::ToggleRecording,
    },
    Shortcut {
        accelerator: "Ctrl+Shift+P",
        code: Code::KeyP,
        command: AppCommand::TogglePause,
    },
];

/// Hotkey id to command lookup. `Send`, unlike the manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotkeyBindings {
    commands: HashMap<u32, AppCommand>,
}

impl HotkeyBindings {
    /// Bindings for `shortcuts`.
    pub fn new(shortcuts: &[Shortcut]) -> Self {
        Self {
            commands: shortcuts
                .iter()
                .map(|s| (s.hotkey().id(), s.command))
                .collect(),
        }
    }

    /// Command bound to hotkey `id`.
    pub fn command_for(&self, id: u32) -> Option<AppCommand> {
        self.commands.get(&id).copied()
    }

    /// Whether no shortcut is bound.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// How shortcuts reach the application, chosen once at startup.
pub enum ShortcutService {
    /// System-wide hotkeys. The manager must stay alive on the main thread.
    Global {
        /// Keeps the hotkeys registered.
        _manager: GlobalHotKeyManager,
        /// Registered bindings.
        bindings: HotkeyBindings,
    },
    /// No global hotkeys; the tray menu offers every action.
    TrayOnly,
}

impl ShortcutService {
    /// Try to register the default shortcuts, falling back to tray-only.
    ///
    /// Must be called on a thread with a message pump (e.g. the main thread
    /// running a `tao` event loop) so hotkey messages are dispatched.
    #[instrument]
    pub fn probe() -> Self {
        match Self::register_global(&SHORTCUTS) {
            Ok(service) => service,
            Err(e) => {
                warn!(error = %e, "Global shortcuts unavailable, use the tray menu");
                Self::TrayOnly
            }
        }
    }

    /// Register `shortcuts` system-wide.
    #[track_caller]
    pub fn register_global(shortcuts: &[Shortcut]) -> AppResult<Self> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to create manager: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let hotkeys: Vec<HotKey> = shortcuts.iter().map(Shortcut::hotkey).collect();

        if let Err(e) = manager.register_all(&hotkeys) {
            let _ = manager.unregister_all(&hotkeys);
            return Err(AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to register shortcuts: {}", e),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        for shortcut in shortcuts {
            info!(
                hotkey = shortcut.accelerator,
                command = ?shortcut.command,
                "Global hotkey registered"
            );
        }

        Ok(Self::Global {
            _manager: manager,
            bindings: HotkeyBindings::new(shortcuts),
        })
    }

    /// Bindings to hand to a [`HotkeyHandler`].
    pub fn bindings(&self) -> HotkeyBindings {
        match self {
            Self::Global { bindings, .. } => bindings.clone(),
            Self::TrayOnly => HotkeyBindings::default(),
        }
    }

    /// Strategy name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Global { .. } => "global",
            Self::TrayOnly => "tray-only",
        }
    }
}

/// Forwards hotkey presses to the application.
pub struct HotkeyHandler {
    bindings: HotkeyBindings,
    command_tx: mpsc::Sender<AppCommand>,
}

impl HotkeyHandler {
    /// Create a handler for previously registered bindings.
    ///
    /// This struct is `Send` and can live on any thread; it only listens on
    /// the global [`GlobalHotKeyEvent`] channel.
    pub fn new(bindings: HotkeyBindings, command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self {
            bindings,
            command_tx,
        }
    }

    /// Run the hotkey handler event loop until shutdown is signalled.
    #[instrument(skip_all)]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        if self.bindings.is_empty() {
            debug!("No global shortcuts bound");
            let _ = shutdown_rx.changed().await;
            return Ok(());
        }

        let receiver = GlobalHotKeyEvent::receiver().clone();
        let (event_tx, mut event_rx) = mpsc::channel(32);

        // Single persistent blocking task that forwards hotkey events.
        // Dropping event_rx makes the next blocking_send fail and ends it.
        let handle = tokio::task::spawn_blocking(move || {
            while let Ok(event) = receiver.recv() {
                if event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Hotkey handler shutting down");
                    break;
                }
                Some(event) = event_rx.recv() => {
                    if event.state == HotKeyState::Pressed {
                        self.handle_press(event.id).await?;
                    }
                }
            }
        }

        drop(event_rx);

        // The blocking task may stay in recv() until the next hotkey event.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Hotkey event forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Hotkey event forwarder task panicked"),
            Err(_) => debug!(
                "Hotkey event forwarder did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }

    /// Send the command bound to hotkey `id`, if any.
    #[instrument(skip(self))]
    pub async fn handle_press(&self, id: u32) -> AppResult<Option<AppCommand>> {
        let Some(command) = self.bindings.command_for(id) else {
            return Ok(None);
        };

        self.command_tx
            .send(command)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send {:?}: {}", command, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(?command, "Shortcut pressed");

        Ok(Some(command))
    }
}
