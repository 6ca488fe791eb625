use crate::{AppError, AppResult, TrayIconState};

use std::panic::Location;

use error_location::ErrorLocation;
use tao::event_loop::EventLoopProxy;
use tokio::sync::mpsc;

/// Commands sent from the async runtime to the main UI thread.
///
/// The main thread owns `TrayManager` (because `TrayIcon` is `!Send`),
/// so all tray mutations and process lifecycle events flow through this enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayCommand {
    /// Update the tray icon, tooltip and menu to a new state.
    SetState(TrayIconState),
    /// Show a transient status in the tooltip, then fall back to the state.
    ShowStatus(String),
    /// Shut down the application. The main thread will exit the event loop.
    Shutdown,
}

/// Delivers [`TrayCommand`]s to whoever owns the tray.
pub trait TraySink: Send {
    /// Queue `command` for the tray thread.
    fn send_tray(&self, command: TrayCommand) -> AppResult<()>;
}

impl TraySink for EventLoopProxy<TrayCommand> {
    #[track_caller]
    fn send_tray(&self, command: TrayCommand) -> AppResult<()> {
        self.send_event(command)
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Tray event loop closed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

impl TraySink for mpsc::UnboundedSender<TrayCommand> {
    #[track_caller]
    fn send_tray(&self, command: TrayCommand) -> AppResult<()> {
        self.send(command).map_err(|e| AppError::ChannelSendFailed {
            message: format!("Tray channel closed: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
