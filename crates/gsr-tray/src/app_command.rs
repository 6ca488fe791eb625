/// Commands sent from shortcuts and the tray menu to the main application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Start a session when idle, stop it otherwise.
    ToggleRecording,
    /// Pause or resume the running recorder.
    TogglePause,
    /// Save the replay buffer.
    SaveReplay,
    /// Open the configuration file.
    OpenSettings,
    /// Request application shutdown.
    Shutdown,
}
