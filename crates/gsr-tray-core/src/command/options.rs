use std::path::PathBuf;

/// Option values fed into command assembly.
///
/// String choices may be either friendly labels or literal tokens; they are
/// resolved through the tables in [`crate::mapping`] at assembly time.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordOptions {
    /// Capture source (`screen`, `focused`, `portal` or a monitor entry).
    pub source: String,
    /// Keep the source resolution instead of scaling.
    pub original_resolution: bool,
    /// Target width when not using the original resolution.
    pub width: u32,
    /// Target height when not using the original resolution.
    pub height: u32,
    /// Frames per second.
    pub fps: u32,
    /// Frame rate mode choice.
    pub frame_mode: String,
    /// Record the mouse cursor.
    pub show_cursor: bool,
    /// Audio source; empty records no audio.
    pub audio_source: String,
    /// Audio codec choice.
    pub audio_codec: String,
    /// Audio bitrate in kbps, `None` lets the recorder choose.
    pub audio_bitrate: Option<u32>,
    /// Quality preset choice.
    pub quality: String,
    /// Video codec choice.
    pub video_codec: String,
    /// Bitrate mode choice.
    pub bitrate_mode: String,
    /// Target bitrate in kbps, used only in `cbr` mode.
    pub cbr_bitrate: u32,
    /// Color range choice.
    pub color_range: String,
    /// Keyframe interval in seconds.
    pub keyframe_interval: f64,
    /// Encoder choice.
    pub encoder: String,
    /// Overclock memory transfer rate (NVIDIA only).
    pub overclock: bool,
    /// Restore the previous desktop portal session.
    pub restore_portal_session: bool,
    /// Verbose recorder output.
    pub verbose: bool,
    /// Container for regular recordings.
    pub container: String,
    /// Output file (recording) or directory (replay buffer).
    pub output: PathBuf,
    /// Replay buffer settings; `None` means a regular recording.
    pub replay: Option<ReplayOptions>,
}

/// Replay buffer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOptions {
    /// Seconds kept in the rolling buffer.
    pub buffer_seconds: u32,
    /// Container for saved replays.
    pub container: String,
    /// Start a fresh buffer after every save.
    pub restart_on_save: bool,
    /// Organize saved replays in date folders.
    pub date_folders: bool,
    /// Script the recorder runs after each save.
    pub script: Option<PathBuf>,
}

impl RecordOptions {
    /// Whether these options describe a replay buffer session.
    pub fn is_replay(&self) -> bool {
        self.replay.is_some()
    }
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self {
            source: "screen".to_string(),
            original_resolution: true,
            width: 0,
            height: 0,
            fps: 60,
            frame_mode: "vfr".to_string(),
            show_cursor: true,
            audio_source: "default_output".to_string(),
            audio_codec: "opus".to_string(),
            audio_bitrate: None,
            quality: "very_high".to_string(),
            video_codec: "auto".to_string(),
            bitrate_mode: "auto".to_string(),
            cbr_bitrate: 15000,
            color_range: "limited".to_string(),
            keyframe_interval: 2.0,
            encoder: "gpu".to_string(),
            overclock: false,
            restore_portal_session: false,
            verbose: true,
            container: "mp4".to_string(),
            output: PathBuf::new(),
            replay: None,
        }
    }
}
