use crate::{AppError, config::Config};

use std::{fs, path::PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

#[allow(clippy::unwrap_used)]
fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 14)
        .unwrap()
        .and_hms_opt(15, 9, 26)
        .unwrap()
}

#[allow(clippy::unwrap_used)]
fn config_file() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gsr-tray").join("config.toml");
    (dir, path)
}

/// WHAT: Defaults follow the recorder front-end's historical settings
/// WHY: A fresh install must start from known-good values
#[test]
fn given_no_settings_when_creating_default_then_documented_defaults() {
    // Given/When: Default configuration
    let config = Config::default();

    // Then: Key defaults are in place
    assert_eq!(config.recorder.binary, "gpu-screen-recorder");
    assert_eq!(config.capture.source, "portal");
    assert_eq!(config.capture.fps, 60);
    assert!(config.capture.original_resolution);
    assert_eq!(config.audio.source, "default_output");
    assert!(config.audio.auto_bitrate);
    assert_eq!(config.audio.bitrate, 128);
    assert_eq!(config.video.quality, "very_high");
    assert_eq!(config.video.cbr_bitrate, 15000);
    assert!(!config.replay.enabled);
    assert_eq!(config.replay.buffer_size, 60);
    assert!(config.replay.date_folders);
    assert!(config.replay.output_dir.ends_with("Replays"));
    assert!(!config.post_processing.enabled);
    assert!(config.advanced.verbose);
    assert!((config.advanced.keyframe_interval - 2.0).abs() < f64::EPSILON);
}

/// WHAT: Loading a missing file writes defaults
/// WHY: The settings file must exist so the tray can open it for editing
#[test]
#[allow(clippy::unwrap_used)]
fn given_missing_file_when_loading_then_defaults_written() {
    // Given: A path in a directory that does not exist yet
    let (_dir, path) = config_file();

    // When: Loading
    let config = Config::load_from(&path).unwrap();

    // Then: Defaults returned and persisted, no temp file left behind
    assert_eq!(config, Config::default());
    assert!(path.exists());
    assert!(!path.with_extension("toml.tmp").exists());
    assert_eq!(Config::load_from(&path).unwrap(), config);
}

/// WHAT: Saved settings survive a reload
/// WHY: Atomic save and load must be inverse operations
#[test]
#[allow(clippy::unwrap_used)]
fn given_modified_config_when_saved_and_reloaded_then_identical() {
    // Given: A config with non-default values
    let (_dir, path) = config_file();
    let mut config = Config::default();
    config.video.codec = "hevc".to_string();
    config.replay.enabled = true;
    config.post_processing.script = "/home/user/upload.sh".to_string();
    config.advanced.keyframe_interval = 1.5;

    // When: Saving and loading
    config.save_to(&path).unwrap();
    let loaded = Config::load_from(&path).unwrap();

    // Then: Identical
    assert_eq!(loaded, config);
}

/// WHAT: Partial and out-of-range files are completed and clamped
/// WHY: Hand-edited settings must never produce an invalid recorder command
#[test]
#[allow(clippy::unwrap_used)]
fn given_partial_file_with_out_of_range_values_when_loading_then_clamped() {
    // Given: A file with only a few keys, some out of range
    let (_dir, path) = config_file();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        "[capture]\nfps = 1000\nwidth = 10000\n\n[replay]\nbuffer_size = 1\n\n\
         [video]\ncbr_bitrate = 5\n\n[advanced]\nkeyframe_interval = 60.0\n",
    )
    .unwrap();

    // When: Loading
    let config = Config::load_from(&path).unwrap();

    // Then: Values clamped, missing ones defaulted
    assert_eq!(config.capture.fps, 240);
    assert_eq!(config.capture.width, 7680);
    assert_eq!(config.replay.buffer_size, 5);
    assert_eq!(config.video.cbr_bitrate, 1000);
    assert!((config.advanced.keyframe_interval - 10.0).abs() < f64::EPSILON);
    assert_eq!(config.audio, Config::default().audio);
}

/// WHAT: Malformed TOML is a configuration error
/// WHY: A broken file must be reported, not silently replaced
#[test]
#[allow(clippy::unwrap_used)]
fn given_malformed_file_when_loading_then_config_error() {
    // Given: Garbage in the config file
    let (_dir, path) = config_file();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "[capture\nfps = ").unwrap();

    // When: Loading
    let result = Config::load_from(&path);

    // Then: ConfigError
    assert!(matches!(result, Err(AppError::ConfigError { .. })));
}

/// WHAT: Dotted and slashed keys address the same value
/// WHY: The CLI accepts both `video.codec` and `video/codec`
#[test]
#[allow(clippy::unwrap_used)]
fn given_config_when_getting_by_dotted_or_slashed_key_then_same_value() {
    let config = Config::default();

    assert_eq!(
        config.get("video.codec").unwrap(),
        toml::Value::String("auto".to_string())
    );
    assert_eq!(
        config.get("video/codec").unwrap(),
        config.get("video.codec").unwrap()
    );
    assert_eq!(config.get("capture.fps").unwrap(), toml::Value::Integer(60));
    assert!(matches!(
        config.get("video.nope"),
        Err(AppError::ConfigError { .. })
    ));
}

/// WHAT: Set parses by the existing type and clamps
/// WHY: CLI edits go through the same validation as loading
#[test]
#[allow(clippy::unwrap_used)]
fn given_config_when_setting_values_then_typed_and_clamped() {
    // Given: Defaults
    let mut config = Config::default();

    // When: Setting values of each type
    config.set("video.codec", "av1").unwrap();
    config.set("replay/enabled", "yes").unwrap();
    config.set("capture.fps", "500").unwrap();
    config.set("advanced.keyframe_interval", "0.5").unwrap();

    // Then: Stored with the right type, numeric values clamped
    assert_eq!(config.video.codec, "av1");
    assert!(config.replay.enabled);
    assert_eq!(config.capture.fps, 240);
    assert!((config.advanced.keyframe_interval - 0.5).abs() < f64::EPSILON);
}

/// WHAT: Invalid set requests leave the config untouched
/// WHY: A typo must not corrupt the other settings
#[test]
fn given_invalid_values_when_setting_then_error_and_unchanged() {
    // Given: Defaults
    let mut config = Config::default();

    // When/Then: Each invalid request fails
    assert!(matches!(
        config.set("capture.fps", "sixty"),
        Err(AppError::ConfigError { .. })
    ));
    assert!(matches!(
        config.set("capture.fps", "-5"),
        Err(AppError::ConfigError { .. })
    ));
    assert!(matches!(
        config.set("replay.enabled", "maybe"),
        Err(AppError::ConfigError { .. })
    ));
    assert!(matches!(
        config.set("nonexistent.key", "1"),
        Err(AppError::ConfigError { .. })
    ));
    assert!(matches!(
        config.set("capture", "1"),
        Err(AppError::ConfigError { .. })
    ));

    assert_eq!(config, Config::default());
}

/// WHAT: A directory output gets a timestamped file name
/// WHY: The recorder needs a file path for regular recordings
#[test]
#[allow(clippy::unwrap_used)]
fn given_output_directory_when_building_options_then_timestamped_file() {
    // Given: Output pointing at an existing directory, MKV container
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.output.path = dir.path().to_path_buf();
    config.output.container = "mkv".to_string();

    // When: Building options
    let options = config.record_options(fixed_time());

    // Then: File name generated inside the directory
    assert_eq!(
        options.output,
        dir.path().join("Video_2025-03-14_15-09-26.mkv")
    );
    assert!(!options.is_replay());
}

/// WHAT: An explicit file output is used as is
/// WHY: Users may pick the exact file to record into
#[test]
fn given_output_file_when_building_options_then_path_kept() {
    // Given: Output pointing at a file path that does not exist yet
    let mut config = Config::default();
    config.output.path = PathBuf::from("/tmp/gsr-tray-test/clip.webm");

    // When: Building options
    let options = config.record_options(fixed_time());

    // Then: Same path
    assert_eq!(options.output, PathBuf::from("/tmp/gsr-tray-test/clip.webm"));
}

/// WHAT: Replay settings map onto replay options
/// WHY: The replay directory and hook script drive the replay flags
#[test]
#[allow(clippy::unwrap_used)]
fn given_replay_enabled_when_building_options_then_replay_directory_and_script() {
    // Given: Replay enabled with a post-save script
    let mut config = Config::default();
    config.replay.enabled = true;
    config.replay.output_dir = PathBuf::from("/home/user/Videos/Replays");
    config.replay.container = "mkv".to_string();
    config.post_processing.enabled = true;
    config.post_processing.script = "/home/user/upload.sh".to_string();
    config.audio.auto_bitrate = false;
    config.audio.bitrate = 192;

    // When: Building options
    let options = config.record_options(fixed_time());

    // Then: Replay options carry the settings
    let replay = options.replay.clone().unwrap();
    assert_eq!(options.output, PathBuf::from("/home/user/Videos/Replays"));
    assert_eq!(replay.buffer_seconds, 60);
    assert_eq!(replay.container, "mkv");
    assert_eq!(replay.script, Some(PathBuf::from("/home/user/upload.sh")));
    assert_eq!(options.audio_bitrate, Some(192));
}

/// WHAT: A disabled hook is not passed to the recorder
/// WHY: The script path is kept in settings even while disabled
#[test]
#[allow(clippy::unwrap_used)]
fn given_disabled_hook_when_building_options_then_no_script() {
    // Given: Replay enabled, script configured but disabled
    let mut config = Config::default();
    config.replay.enabled = true;
    config.post_processing.enabled = false;
    config.post_processing.script = "/home/user/upload.sh".to_string();

    // When: Building options
    let options = config.record_options(fixed_time());

    // Then: No script, automatic audio bitrate
    assert_eq!(options.replay.unwrap().script, None);
    assert_eq!(options.audio_bitrate, None);
}

/// WHAT: A missing directory still gets a timestamped file name
/// WHY: Recording into a fresh `~/Videos` must not create a file named `Videos`
#[test]
#[allow(clippy::unwrap_used)]
fn given_missing_output_directory_when_building_options_then_file_inside_it() {
    // Given: An output directory that does not exist yet
    let dir = tempfile::tempdir().unwrap();
    let videos = dir.path().join("Videos");
    let mut config = Config::default();
    config.output.path = videos.clone();
    config.output.container = "mp4".to_string();

    // When: Building options
    let options = config.record_options(fixed_time());

    // Then: The file goes inside the directory
    assert_eq!(options.output, videos.join("Video_2025-03-14_15-09-26.mp4"));
}

/// WHAT: An existing extension-less file is recorded into as is
/// WHY: Only directories get generated file names
#[test]
#[allow(clippy::unwrap_used)]
fn given_existing_file_without_extension_when_building_options_then_path_kept() {
    // Given: An existing file with no extension
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("capture");
    fs::write(&file, b"").unwrap();
    let mut config = Config::default();
    config.output.path = file.clone();

    // When: Building options
    let options = config.record_options(fixed_time());

    // Then: Same path
    assert_eq!(options.output, file);
}

/// WHAT: A non-finite keyframe interval falls back to the default
/// WHY: `nan` is valid TOML but must never reach the recorder as `-keyint NaN`
#[test]
#[allow(clippy::unwrap_used)]
fn given_nan_keyframe_interval_when_loading_then_default_interval() {
    // Given: A file with a NaN keyframe interval
    let (_dir, path) = config_file();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "[advanced]\nkeyframe_interval = nan\n").unwrap();

    // When: Loading and building options
    let config = Config::load_from(&path).unwrap();
    let options = config.record_options(fixed_time());

    // Then: Default interval
    assert!((config.advanced.keyframe_interval - 2.0).abs() < f64::EPSILON);
    assert!(options.keyframe_interval.is_finite());
}

/// WHAT: Setting a non-finite keyframe interval is also reset
/// WHY: CLI edits go through the same clamping as loading
#[test]
#[allow(clippy::unwrap_used)]
fn given_config_when_setting_infinite_keyframe_interval_then_default_interval() {
    let mut config = Config::default();

    config.set("advanced.keyframe_interval", "inf").unwrap();

    assert!((config.advanced.keyframe_interval - 2.0).abs() < f64::EPSILON);
}
