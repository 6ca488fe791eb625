use crate::{
    CoreResult, RecordOptions, RecorderError,
    command::mapping::{
        AUDIO_CODEC, BITRATE_MODE, COLOR_RANGE, CONTAINER, ENCODER, FRAME_RATE_MODE, QUALITY,
        REPLAY_CONTAINER, VIDEO_CODEC, resolve_audio_source, resolve_capture_source,
    },
};

use std::{fmt, panic::Location};

use error_location::ErrorLocation;
use tracing::{debug, instrument};

/// Default recorder executable.
pub const DEFAULT_RECORDER_BINARY: &str = "gpu-screen-recorder";

/// An immutable recorder invocation: program plus ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    /// Build a spec from a program and its arguments.
    pub fn new<P, I, S>(program: P, args: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The safe placeholder invocation (`<program> --help`).
    ///
    /// Substituted whenever assembly fails so nothing destructive or
    /// malformed is ever launched.
    pub fn usage(program: impl Into<String>) -> Self {
        Self::new(program, ["--help"])
    }

    /// Assemble the recorder invocation for `options`.
    ///
    /// Pure and deterministic. Token order follows the recorder's grammar:
    /// capture flags, replay flags, encoder flags, container, and `-o` last.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::MissingOutput`] when `options.output` is empty.
    #[track_caller]
    #[instrument(skip(options), fields(replay = options.is_replay()))]
    pub fn assemble(program: &str, options: &RecordOptions) -> CoreResult<Self> {
        if options.output.as_os_str().is_empty() {
            return Err(RecorderError::MissingOutput {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut args: Vec<String> = Vec::with_capacity(48);
        let mut push = |flag: &str, value: String| {
            args.push(flag.to_string());
            args.push(value);
        };

        // Capture
        push("-w", resolve_capture_source(&options.source));
        if !options.original_resolution && options.width > 0 && options.height > 0 {
            push("-s", format!("{}x{}", options.width, options.height));
        }
        push("-f", options.fps.to_string());
        if let Some(audio) = resolve_audio_source(&options.audio_source) {
            push("-a", audio);
        }
        push("-cursor", yes_no(options.show_cursor));

        let bitrate_mode = BITRATE_MODE.resolve(&options.bitrate_mode);
        if bitrate_mode == "cbr" {
            // In CBR mode the recorder reads -q as a bitrate in kbps.
            push("-q", options.cbr_bitrate.to_string());
        } else {
            push("-q", QUALITY.resolve(&options.quality).to_string());
        }

        // Replay buffer
        if let Some(replay) = &options.replay {
            push("-r", replay.buffer_seconds.to_string());
            push("-restart-replay-on-save", yes_no(replay.restart_on_save));
            if replay.date_folders {
                push("-df", yes_no(true));
            }
            if let Some(script) = replay
                .script
                .as_ref()
                .filter(|s| !s.as_os_str().is_empty())
            {
                push("-sc", script.to_string_lossy().into_owned());
            }
        }

        // Encoding
        push("-k", VIDEO_CODEC.resolve(&options.video_codec).to_string());
        push("-fm", FRAME_RATE_MODE.resolve(&options.frame_mode).to_string());
        push("-ac", AUDIO_CODEC.resolve(&options.audio_codec).to_string());
        if let Some(kbps) = options.audio_bitrate {
            push("-ab", kbps.to_string());
        }
        push("-bm", bitrate_mode.to_string());
        push("-cr", COLOR_RANGE.resolve(&options.color_range).to_string());
        push("-keyint", format!("{:.1}", options.keyframe_interval));
        push("-encoder", ENCODER.resolve(&options.encoder).to_string());
        if options.overclock {
            push("-oc", yes_no(true));
        }
        if options.restore_portal_session {
            push("-restore-portal-session", yes_no(true));
        }
        push("-v", yes_no(options.verbose));

        // Output
        let container = match &options.replay {
            Some(replay) => REPLAY_CONTAINER.resolve(&replay.container),
            None => CONTAINER.resolve(&options.container),
        };
        push("-c", container.to_string());
        push("-o", options.output.to_string_lossy().into_owned());

        let spec = Self::new(program, args);
        debug!(command = %spec, "Recorder command assembled");

        Ok(spec)
    }

    /// Assemble, substituting [`CommandSpec::usage`] on failure.
    ///
    /// The error is returned alongside so the caller can report it.
    pub fn assemble_or_usage(
        program: &str,
        options: &RecordOptions,
    ) -> (Self, Option<RecorderError>) {
        match Self::assemble(program, options) {
            Ok(spec) => (spec, None),
            Err(e) => (Self::usage(program), Some(e)),
        }
    }

    /// Executable to spawn.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments after the program.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Program followed by its arguments.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str))
    }

    /// Whether this is the placeholder produced by [`CommandSpec::usage`].
    pub fn is_usage(&self) -> bool {
        self.args.len() == 1 && self.args[0] == "--help"
    }

    /// Value following `flag`, if present.
    pub fn flag_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for token in self.tokens() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            if token.is_empty() || token.contains(char::is_whitespace) {
                write!(f, "'{}'", token.replace('\'', "'\\''"))?;
            } else {
                f.write_str(token)?;
            }
        }
        Ok(())
    }
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}
