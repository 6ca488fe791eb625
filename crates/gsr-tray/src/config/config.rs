//! Configuration management for gsr-tray.
//!
//! Handles loading and saving the TOML configuration file with
//! cross-platform paths, range clamping, dotted-key access for the CLI and
//! atomic write operations.

use crate::{
    AppError, AppResult,
    config::{
        AdvancedConfig, AudioConfig, CaptureConfig, OutputConfig, PostProcessingConfig,
        RecorderConfig, ReplayConfig, VideoConfig,
    },
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use chrono::NaiveDateTime;
use directories::ProjectDirs;
use error_location::ErrorLocation;
use gsr_tray_core::{RecordOptions, ReplayOptions, mapping};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

const FILE_NAME_TIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Recorder process settings.
    pub recorder: RecorderConfig,
    /// Capture source and frame settings.
    pub capture: CaptureConfig,
    /// Audio capture settings.
    pub audio: AudioConfig,
    /// Encoding quality settings.
    pub video: VideoConfig,
    /// Regular recording destination.
    pub output: OutputConfig,
    /// Replay buffer settings.
    pub replay: ReplayConfig,
    /// Post-save script.
    pub post_processing: PostProcessingConfig,
    /// Encoder and diagnostics settings.
    pub advanced: AdvancedConfig,
}

impl Config {
    /// Load configuration from the default location, creating it if missing.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, writing defaults there if it does not
    /// exist yet. Out-of-range values are clamped.
    #[track_caller]
    #[instrument]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            info!(config_path = ?path, "No config found, creating default");
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let mut config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;
        config.clamp();

        info!(config_path = ?path, "Configuration loaded");

        Ok(config)
    }

    /// Save configuration to `path` using the atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
                debug!(config_dir = ?parent, "Created config directory");
            }
        }

        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Path of the configuration file.
    #[track_caller]
    pub fn config_path() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Directory for rolling log files.
    #[track_caller]
    pub fn log_dir() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join("logs"))
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "gsr-tray", "GSR-Tray").ok_or_else(|| AppError::ConfigError {
            reason: "Failed to get project directories".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Pull every numeric field back into its valid range.
    pub fn clamp(&mut self) {
        self.recorder.clamp();
        self.capture.clamp();
        self.audio.clamp();
        self.video.clamp();
        self.replay.clamp();
        self.advanced.clamp();
    }

    /// Read a value by `section.field` (or `section/field`) key.
    #[track_caller]
    pub fn get(&self, key: &str) -> AppResult<toml::Value> {
        let root = self.to_value()?;

        let mut current = &root;
        for part in key_parts(key) {
            current = current.get(part).ok_or_else(|| unknown_key(key))?;
        }

        Ok(current.clone())
    }

    /// Set a value by key, parsing `raw` as the type the key already holds.
    ///
    /// The result is clamped; the file is not written.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn set(&mut self, key: &str, raw: &str) -> AppResult<()> {
        let mut root = self.to_value()?;

        let mut current = &mut root;
        for part in key_parts(key) {
            current = current.get_mut(part).ok_or_else(|| unknown_key(key))?;
        }

        let parsed = parse_like(current, raw).ok_or_else(|| AppError::ConfigError {
            reason: format!("Invalid value {:?} for {} ({})", raw, key, current.type_str()),
            location: ErrorLocation::from(Location::caller()),
        })?;
        *current = parsed;

        let mut updated: Config = root.try_into().map_err(|e| AppError::ConfigError {
            reason: format!("Invalid value {:?} for {}: {}", raw, key, e),
            location: ErrorLocation::from(Location::caller()),
        })?;
        updated.clamp();
        *self = updated;

        debug!(key, value = raw, "Configuration value set");

        Ok(())
    }

    /// Option values for the next session.
    ///
    /// With the replay buffer enabled the output is the replay directory;
    /// otherwise a recording path that is a directory, or does not exist yet
    /// and has no extension, gets a timestamped file name built from `now`.
    pub fn record_options(&self, now: NaiveDateTime) -> RecordOptions {
        let replay = self.replay.enabled.then(|| ReplayOptions {
            buffer_seconds: self.replay.buffer_size,
            container: self.replay.container.clone(),
            restart_on_save: self.replay.restart_on_save,
            date_folders: self.replay.date_folders,
            script: self
                .post_processing
                .hook()
                .map(|hook| hook.script().to_path_buf()),
        });

        let output = if self.replay.enabled {
            self.replay.output_dir.clone()
        } else if is_output_dir(&self.output.path) {
            self.output
                .path
                .join(recording_file_name(now, &self.output.container))
        } else {
            self.output.path.clone()
        };

        RecordOptions {
            source: self.capture.source.clone(),
            original_resolution: self.capture.original_resolution,
            width: self.capture.width,
            height: self.capture.height,
            fps: self.capture.fps,
            frame_mode: self.capture.frame_mode.clone(),
            show_cursor: self.capture.show_cursor,
            audio_source: self.audio.source.clone(),
            audio_codec: self.audio.codec.clone(),
            audio_bitrate: self.audio.effective_bitrate(),
            quality: self.video.quality.clone(),
            video_codec: self.video.codec.clone(),
            bitrate_mode: self.video.bitrate_mode.clone(),
            cbr_bitrate: self.video.cbr_bitrate,
            color_range: self.video.color_range.clone(),
            keyframe_interval: self.advanced.keyframe_interval,
            encoder: self.advanced.encoder.clone(),
            overclock: self.advanced.overclock,
            restore_portal_session: self.advanced.restore_portal_session,
            verbose: self.advanced.verbose,
            container: self.output.container.clone(),
            output,
            replay,
        }
    }

    #[track_caller]
    fn to_value(&self) -> AppResult<toml::Value> {
        toml::Value::try_from(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// `Video_<YYYY-MM-DD_HH-MM-SS>.<container>`.
fn recording_file_name(now: NaiveDateTime, container: &str) -> String {
    format!(
        "Video_{}.{}",
        now.format(FILE_NAME_TIME_FORMAT),
        mapping::CONTAINER.resolve(container)
    )
}

/// An existing directory, or a missing path without an extension.
fn is_output_dir(path: &Path) -> bool {
    if path.as_os_str().is_empty() {
        return false;
    }
    path.is_dir() || (!path.exists() && path.extension().is_none())
}

fn key_parts(key: &str) -> impl Iterator<Item = &str> {
    key.split(['.', '/']).filter(|part| !part.is_empty())
}

#[track_caller]
fn unknown_key(key: &str) -> AppError {
    AppError::ConfigError {
        reason: format!("Unknown configuration key: {}", key),
        location: ErrorLocation::from(Location::caller()),
    }
}

fn parse_like(existing: &toml::Value, raw: &str) -> Option<toml::Value> {
    let raw = raw.trim();
    match existing {
        toml::Value::String(_) => Some(toml::Value::String(raw.to_string())),
        toml::Value::Integer(_) => raw.parse().ok().map(toml::Value::Integer),
        toml::Value::Float(_) => raw.parse().ok().map(toml::Value::Float),
        toml::Value::Boolean(_) => match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(toml::Value::Boolean(true)),
            "false" | "no" | "off" | "0" => Some(toml::Value::Boolean(false)),
            _ => None,
        },
        _ => None,
    }
}
