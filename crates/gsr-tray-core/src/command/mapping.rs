//! Friendly-label to CLI-token tables for gpu-screen-recorder options.

/// A fixed table of `(label, token)` pairs with a default token.
///
/// Resolution accepts either the human-readable label or the literal token;
/// anything else resolves to [`OptionMapping::default_token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionMapping {
    name: &'static str,
    entries: &'static [(&'static str, &'static str)],
    default_token: &'static str,
}

impl OptionMapping {
    const fn new(
        name: &'static str,
        entries: &'static [(&'static str, &'static str)],
        default_token: &'static str,
    ) -> Self {
        Self {
            name,
            entries,
            default_token,
        }
    }

    /// Mapping name, used in log fields.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Token used when a choice is not in the table.
    pub fn default_token(&self) -> &'static str {
        self.default_token
    }

    /// Label/token pairs in display order.
    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        self.entries
    }

    /// Look a choice up by label or token without falling back.
    pub fn lookup(&self, choice: &str) -> Option<&'static str> {
        let choice = choice.trim();
        self.entries
            .iter()
            .find(|(label, token)| *label == choice || *token == choice)
            .map(|(_, token)| *token)
    }

    /// Resolve a choice to its token, falling back to the default.
    pub fn resolve(&self, choice: &str) -> &'static str {
        self.lookup(choice).unwrap_or(self.default_token)
    }

    /// Friendly label for a token, if the token is in the table.
    pub fn label_for(&self, token: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, t)| *t == token)
            .map(|(label, _)| *label)
    }
}

/// What to record (`-w`).
pub const CAPTURE_SOURCE: OptionMapping = OptionMapping::new(
    "capture_source",
    &[
        ("Screen", "screen"),
        ("Current Window", "focused"),
        ("Select Area (Portal)", "portal"),
    ],
    "screen",
);

/// Common audio sources (`-a`). Unmapped text is passed through by the caller.
pub const AUDIO_SOURCE: OptionMapping = OptionMapping::new(
    "audio_source",
    &[
        ("System Sound", "default_output"),
        ("Microphone", "default_input"),
        ("System Sound + Microphone", "default_output|default_input"),
    ],
    "default_output",
);

/// Video quality preset (`-q`).
pub const QUALITY: OptionMapping = OptionMapping::new(
    "quality",
    &[
        ("Low (Smaller Files)", "medium"),
        ("Medium", "high"),
        ("High (Default)", "very_high"),
        ("Ultra (Larger Files)", "ultra"),
    ],
    "very_high",
);

/// Container for regular recordings (`-c`).
pub const CONTAINER: OptionMapping = OptionMapping::new(
    "container",
    &[
        ("MP4 (Recommended)", "mp4"),
        ("MKV (More Features)", "mkv"),
        ("WebM (Web Compatible)", "webm"),
        ("FLV (Flash Video)", "flv"),
    ],
    "mp4",
);

/// Container for replay buffer saves (`-c`).
pub const REPLAY_CONTAINER: OptionMapping = OptionMapping::new(
    "replay_container",
    &[
        ("MP4 (Recommended)", "mp4"),
        ("MKV (More Features)", "mkv"),
        ("WebM (Web Compatible)", "webm"),
    ],
    "mp4",
);

/// Video codec (`-k`).
pub const VIDEO_CODEC: OptionMapping = OptionMapping::new(
    "video_codec",
    &[
        ("Auto (Recommended)", "auto"),
        ("H.264 (Good Compatibility)", "h264"),
        ("HEVC/H.265 (Better Compression)", "hevc"),
        ("AV1 (Best Compression, New)", "av1"),
        ("VP8 (WebM)", "vp8"),
        ("VP9 (WebM, Better)", "vp9"),
        ("HEVC HDR", "hevc_hdr"),
        ("AV1 HDR", "av1_hdr"),
        ("HEVC 10-bit", "hevc_10bit"),
        ("AV1 10-bit", "av1_10bit"),
    ],
    "auto",
);

/// Bitrate mode (`-bm`).
pub const BITRATE_MODE: OptionMapping = OptionMapping::new(
    "bitrate_mode",
    &[
        ("Auto (Recommended)", "auto"),
        ("Constant Quality (Varies Size)", "qp"),
        ("Variable Bitrate (Balanced)", "vbr"),
        ("Constant Bitrate (Fixed Size)", "cbr"),
    ],
    "auto",
);

/// Color range (`-cr`).
pub const COLOR_RANGE: OptionMapping = OptionMapping::new(
    "color_range",
    &[
        ("Limited (Standard/Rec.709)", "limited"),
        ("Full (Enhanced/High Quality)", "full"),
    ],
    "limited",
);

/// Frame rate mode (`-fm`).
pub const FRAME_RATE_MODE: OptionMapping = OptionMapping::new(
    "frame_rate_mode",
    &[
        ("Variable (Recommended)", "vfr"),
        ("Constant (Consistent)", "cfr"),
        ("Match Content (Smart)", "content"),
    ],
    "vfr",
);

/// Encoder device (`-encoder`).
pub const ENCODER: OptionMapping = OptionMapping::new(
    "encoder",
    &[("GPU (Recommended)", "gpu"), ("CPU (Software Encoding)", "cpu")],
    "gpu",
);

/// Audio codec (`-ac`).
pub const AUDIO_CODEC: OptionMapping = OptionMapping::new(
    "audio_codec",
    &[
        ("Opus (Better Quality)", "opus"),
        ("AAC (Better Compatibility)", "aac"),
    ],
    "opus",
);

/// Resolve a capture source.
///
/// Besides the fixed choices, `--list-capture-options` reports monitors that
/// are displayed as `NAME (WxH)`; those resolve to `NAME`. Bare monitor names
/// are not distinguishable from typos and resolve to the default.
pub fn resolve_capture_source(choice: &str) -> String {
    if let Some(token) = CAPTURE_SOURCE.lookup(choice) {
        return token.to_string();
    }

    match choice.trim().split_once(" (") {
        Some((monitor, rest)) if !monitor.is_empty() && rest.ends_with(')') => {
            monitor.to_string()
        }
        _ => CAPTURE_SOURCE.default_token().to_string(),
    }
}

/// Resolve an audio source.
///
/// Known labels map to their token; anything else (device ids, `app:` sources,
/// hand-written `a|b` merges) is passed through trimmed. Empty means no audio.
pub fn resolve_audio_source(choice: &str) -> Option<String> {
    let trimmed = choice.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(
        AUDIO_SOURCE
            .lookup(trimmed)
            .map(str::to_string)
            .unwrap_or_else(|| trimmed.to_string()),
    )
}
