/// Tray icon states corresponding to the recorder session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIconState {
    /// No recorder running.
    Idle,
    /// Regular recording in progress.
    Recording,
    /// Replay buffer running.
    ReplayBuffer,
    /// Recorder paused.
    Paused {
        /// Whether the paused session is a replay buffer.
        replay: bool,
    },
}

impl TrayIconState {
    /// State for a session with the given flags.
    pub fn from_session(active: bool, replay: bool, paused: bool) -> Self {
        match (active, paused, replay) {
            (false, _, _) => Self::Idle,
            (true, true, replay) => Self::Paused { replay },
            (true, false, true) => Self::ReplayBuffer,
            (true, false, false) => Self::Recording,
        }
    }

    /// Short status text.
    pub fn status(self) -> &'static str {
        match self {
            Self::Idle => "Ready",
            Self::Recording => "Recording",
            Self::ReplayBuffer => "Replay buffer active",
            Self::Paused { .. } => "Paused",
        }
    }

    /// Label of the start/stop menu item.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Idle => "Start Recording",
            _ => "Stop Recording",
        }
    }

    /// Label of the pause menu item.
    pub fn pause_label(self) -> &'static str {
        match self {
            Self::Paused { .. } => "Resume",
            _ => "Pause",
        }
    }

    /// Pause/resume is only meaningful with a running recorder.
    pub fn can_pause(self) -> bool {
        self != Self::Idle
    }

    /// Saving needs an active replay buffer.
    pub fn can_save_replay(self) -> bool {
        matches!(self, Self::ReplayBuffer | Self::Paused { replay: true })
    }

    /// Icon fill colour as RGB.
    pub fn color(self) -> [u8; 3] {
        match self {
            Self::Idle => [128, 128, 128],
            Self::Recording => [220, 40, 40],
            Self::ReplayBuffer => [40, 180, 80],
            Self::Paused { .. } => [230, 160, 30],
        }
    }
}
