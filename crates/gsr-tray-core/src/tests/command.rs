use crate::{CommandSpec, RecordOptions, RecorderError, ReplayOptions};

use std::path::PathBuf;

const PROGRAM: &str = "gpu-screen-recorder";

const REPLAY_FLAGS: [&str; 4] = ["-r", "-restart-replay-on-save", "-df", "-sc"];

fn scenario_options() -> RecordOptions {
    RecordOptions {
        source: "screen".to_string(),
        fps: 60,
        audio_source: "default_output".to_string(),
        quality: "very_high".to_string(),
        output: PathBuf::from("/tmp/out.mp4"),
        ..RecordOptions::default()
    }
}

fn replay_options() -> ReplayOptions {
    ReplayOptions {
        buffer_seconds: 60,
        container: "mkv".to_string(),
        restart_on_save: false,
        date_folders: true,
        script: Some(PathBuf::from("/home/user/bin/upload.sh")),
    }
}

fn position_of(spec: &CommandSpec, flag: &str, value: &str) -> Option<usize> {
    spec.args()
        .windows(2)
        .position(|pair| pair[0] == flag && pair[1] == value)
}

/// WHAT: Basic options assemble in the recorder's flag order
/// WHY: The recorder's argument grammar is positional for -o and flags must pair correctly
#[test]
#[allow(clippy::unwrap_used)]
fn given_screen_recording_options_when_assembling_then_flags_in_order_and_output_last() {
    // Given: Screen capture at 60 fps with system audio and very_high quality
    let options = scenario_options();

    // When: Assembling the command
    let spec = CommandSpec::assemble(PROGRAM, &options).unwrap();

    // Then: Source, fps, audio and quality appear in order, output terminates the command
    let source = position_of(&spec, "-w", "screen").unwrap();
    let fps = position_of(&spec, "-f", "60").unwrap();
    let audio = position_of(&spec, "-a", "default_output").unwrap();
    let quality = position_of(&spec, "-q", "very_high").unwrap();
    assert!(source < fps && fps < audio && audio < quality);

    let args = spec.args();
    assert_eq!(args[args.len() - 2], "-o");
    assert_eq!(args[args.len() - 1], "/tmp/out.mp4");
    assert_eq!(spec.program(), PROGRAM);
}

/// WHAT: Assembly is deterministic
/// WHY: The same settings must always launch the same command
#[test]
#[allow(clippy::unwrap_used)]
fn given_identical_options_when_assembling_twice_then_token_sequences_identical() {
    // Given: Options with every optional branch enabled
    let options = RecordOptions {
        original_resolution: false,
        width: 1920,
        height: 1080,
        audio_bitrate: Some(192),
        overclock: true,
        restore_portal_session: true,
        replay: Some(replay_options()),
        ..scenario_options()
    };

    // When: Assembling twice
    let first = CommandSpec::assemble(PROGRAM, &options).unwrap();
    let second = CommandSpec::assemble(PROGRAM, &options).unwrap();

    // Then: Both sequences are byte-identical
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}

/// WHAT: Regular recordings never carry replay flags
/// WHY: Replay flags switch the recorder into replay buffer mode
#[test]
#[allow(clippy::unwrap_used)]
fn given_replay_disabled_when_assembling_then_no_replay_flags() {
    // Given: A regular recording
    let options = scenario_options();
    assert!(!options.is_replay());

    // When: Assembling the command
    let spec = CommandSpec::assemble(PROGRAM, &options).unwrap();

    // Then: None of the replay-specific flags are present
    for flag in REPLAY_FLAGS {
        assert!(
            !spec.args().iter().any(|a| a == flag),
            "unexpected replay flag {flag}"
        );
    }
    assert_eq!(spec.flag_value("-c"), Some("mp4"));
}

/// WHAT: Replay options add the replay flags and use the replay container
/// WHY: Replay buffer sessions need the buffer length, hook and container
#[test]
#[allow(clippy::unwrap_used)]
fn given_replay_enabled_when_assembling_then_replay_flags_present() {
    // Given: A replay buffer session saving into a directory
    let options = RecordOptions {
        output: PathBuf::from("/home/user/Videos/Replays"),
        replay: Some(replay_options()),
        ..scenario_options()
    };

    // When: Assembling the command
    let spec = CommandSpec::assemble(PROGRAM, &options).unwrap();

    // Then: Replay flags carry the configured values
    assert_eq!(spec.flag_value("-r"), Some("60"));
    assert_eq!(spec.flag_value("-restart-replay-on-save"), Some("no"));
    assert_eq!(spec.flag_value("-df"), Some("yes"));
    assert_eq!(spec.flag_value("-sc"), Some("/home/user/bin/upload.sh"));
    assert_eq!(spec.flag_value("-c"), Some("mkv"));
    assert_eq!(
        spec.args().last().map(String::as_str),
        Some("/home/user/Videos/Replays")
    );
}

/// WHAT: Date folders and empty scripts are omitted when not configured
/// WHY: The recorder treats presence of -df/-sc as a request
#[test]
#[allow(clippy::unwrap_used)]
fn given_replay_without_date_folders_or_script_when_assembling_then_flags_omitted() {
    // Given: Replay options with date folders off and an empty script path
    let options = RecordOptions {
        replay: Some(ReplayOptions {
            date_folders: false,
            script: Some(PathBuf::new()),
            ..replay_options()
        }),
        ..scenario_options()
    };

    // When: Assembling the command
    let spec = CommandSpec::assemble(PROGRAM, &options).unwrap();

    // Then: -df and -sc are absent, -r is still there
    assert!(spec.flag_value("-df").is_none());
    assert!(spec.flag_value("-sc").is_none());
    assert!(spec.flag_value("-r").is_some());
}

/// WHAT: Missing output path is rejected
/// WHY: Launching without -o would produce a malformed invocation
#[test]
fn given_empty_output_when_assembling_then_missing_output_error() {
    // Given: Options without an output destination
    let options = RecordOptions {
        output: PathBuf::new(),
        ..scenario_options()
    };

    // When: Assembling the command
    let result = CommandSpec::assemble(PROGRAM, &options);

    // Then: MissingOutput is returned
    assert!(matches!(result, Err(RecorderError::MissingOutput { .. })));
}

/// WHAT: Assembly failure substitutes the usage invocation
/// WHY: The caller must never launch a half-built command
#[test]
fn given_empty_output_when_assembling_or_usage_then_help_invocation() {
    // Given: Options without an output destination
    let options = RecordOptions::default();

    // When: Assembling with fallback
    let (spec, error) = CommandSpec::assemble_or_usage(PROGRAM, &options);

    // Then: The placeholder is returned along with the error
    assert!(spec.is_usage());
    assert_eq!(spec.to_string(), "gpu-screen-recorder --help");
    assert!(matches!(error, Some(RecorderError::MissingOutput { .. })));
}

/// WHAT: CBR mode passes the bitrate through -q exactly once
/// WHY: The recorder reads -q as kbps in CBR mode; a second -q would override it
#[test]
#[allow(clippy::unwrap_used)]
fn given_cbr_bitrate_mode_when_assembling_then_quality_flag_carries_bitrate() {
    // Given: Constant bitrate at 20000 kbps
    let options = RecordOptions {
        bitrate_mode: "Constant Bitrate (Fixed Size)".to_string(),
        cbr_bitrate: 20000,
        ..scenario_options()
    };

    // When: Assembling the command
    let spec = CommandSpec::assemble(PROGRAM, &options).unwrap();

    // Then: -q carries the bitrate and appears once
    assert_eq!(spec.flag_value("-bm"), Some("cbr"));
    assert_eq!(spec.flag_value("-q"), Some("20000"));
    assert_eq!(spec.args().iter().filter(|a| *a == "-q").count(), 1);
}

/// WHAT: Custom resolution is only emitted with both dimensions set
/// WHY: -s 0x0 is rejected by the recorder
#[test]
#[allow(clippy::unwrap_used)]
fn given_custom_resolution_when_assembling_then_size_flag_only_when_complete() {
    // Given: A complete and an incomplete custom resolution
    let complete = RecordOptions {
        original_resolution: false,
        width: 1280,
        height: 720,
        ..scenario_options()
    };
    let incomplete = RecordOptions {
        original_resolution: false,
        width: 1280,
        height: 0,
        ..scenario_options()
    };

    // When: Assembling both
    let with_size = CommandSpec::assemble(PROGRAM, &complete).unwrap();
    let without_size = CommandSpec::assemble(PROGRAM, &incomplete).unwrap();

    // Then: Only the complete one carries -s
    assert_eq!(with_size.flag_value("-s"), Some("1280x720"));
    assert!(without_size.flag_value("-s").is_none());
}

/// WHAT: Optional audio flags follow the settings
/// WHY: Empty audio source means "no audio"; automatic bitrate omits -ab
#[test]
#[allow(clippy::unwrap_used)]
fn given_no_audio_and_auto_bitrate_when_assembling_then_audio_flags_omitted() {
    // Given: No audio source and automatic audio bitrate
    let options = RecordOptions {
        audio_source: "  ".to_string(),
        audio_bitrate: None,
        ..scenario_options()
    };

    // When: Assembling the command
    let spec = CommandSpec::assemble(PROGRAM, &options).unwrap();

    // Then: -a and -ab are absent, -ac still set
    assert!(spec.flag_value("-a").is_none());
    assert!(spec.flag_value("-ab").is_none());
    assert_eq!(spec.flag_value("-ac"), Some("opus"));
}

/// WHAT: Encoder flags are rendered with recorder-friendly values
/// WHY: Keyframe interval and yes/no flags must match the recorder grammar
#[test]
#[allow(clippy::unwrap_used)]
fn given_advanced_options_when_assembling_then_encoder_flags_rendered() {
    // Given: Advanced options set by label
    let options = RecordOptions {
        video_codec: "HEVC/H.265 (Better Compression)".to_string(),
        frame_mode: "Constant (Consistent)".to_string(),
        color_range: "full".to_string(),
        encoder: "CPU (Software Encoding)".to_string(),
        keyframe_interval: 1.5,
        show_cursor: false,
        verbose: false,
        overclock: true,
        ..scenario_options()
    };

    // When: Assembling the command
    let spec = CommandSpec::assemble(PROGRAM, &options).unwrap();

    // Then: Labels are resolved to tokens
    assert_eq!(spec.flag_value("-k"), Some("hevc"));
    assert_eq!(spec.flag_value("-fm"), Some("cfr"));
    assert_eq!(spec.flag_value("-cr"), Some("full"));
    assert_eq!(spec.flag_value("-encoder"), Some("cpu"));
    assert_eq!(spec.flag_value("-keyint"), Some("1.5"));
    assert_eq!(spec.flag_value("-cursor"), Some("no"));
    assert_eq!(spec.flag_value("-v"), Some("no"));
    assert_eq!(spec.flag_value("-oc"), Some("yes"));
}

/// WHAT: Display quotes tokens containing whitespace
/// WHY: Logged commands should be copy-pasteable into a shell
#[test]
fn given_path_with_spaces_when_displaying_then_token_quoted() {
    // Given: A spec with a spaced output path
    let spec = CommandSpec::new(PROGRAM, ["-o", "/tmp/my videos/out.mp4"]);

    // When: Rendering it
    let rendered = spec.to_string();

    // Then: The spaced token is single-quoted
    assert_eq!(rendered, "gpu-screen-recorder -o '/tmp/my videos/out.mp4'");
}
