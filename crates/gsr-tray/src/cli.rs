//! Command-line interface.

use crate::{AppError, AppResult, config::Config};

use std::{panic::Location, path::PathBuf};

use chrono::Local;
use clap::{Parser, Subcommand};
use error_location::ErrorLocation;
use gsr_tray_core::{
    CommandSpec, discovery,
    hook::RECORDING_TYPE_REPLAY,
    mapping::{AUDIO_SOURCE, CAPTURE_SOURCE},
};
use tracing::instrument;

/// Tray front-end for gpu-screen-recorder.
#[derive(Debug, Parser)]
#[command(name = "gsr-tray", version)]
#[command(about = "Tray front-end for gpu-screen-recorder")]
pub struct Cli {
    /// What to do; the tray application when omitted.
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Run the tray application.
    Run,
    /// Print the recorder command for the current configuration.
    Command,
    /// List capture and audio sources reported by the recorder.
    Sources,
    /// Inspect or change the configuration.
    Config {
        /// Configuration action.
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Run the configured post-save script against a saved file.
    Hook {
        /// Saved replay file handed to the script.
        file: PathBuf,
    },
}

/// `config` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Print the configuration file path.
    Path,
    /// Print a value, e.g. `video.codec` or `video/codec`.
    Get {
        /// Dotted key.
        key: String,
    },
    /// Set a value and save the file.
    Set {
        /// Dotted key.
        key: String,
        /// New value, parsed as the key's current type.
        value: String,
    },
}

/// Assembled recorder command for the saved settings.
#[track_caller]
pub fn assembled_command() -> AppResult<String> {
    let config = Config::load()?;
    let options = config.record_options(Local::now().naive_local());
    let spec = CommandSpec::assemble(&config.recorder.binary, &options)?;
    Ok(spec.to_string())
}

/// Human-readable source listing.
#[instrument]
pub async fn sources() -> AppResult<String> {
    let config = Config::load()?;
    let found = discovery::discover(&config.recorder.binary).await?;

    let mut out = String::from("Capture sources:\n");
    for (label, token) in CAPTURE_SOURCE.entries() {
        out.push_str(&format!("  {:<24} {}\n", token, label));
    }
    for monitor in &found.capture {
        out.push_str(&format!("  {:<24} Monitor\n", monitor.to_string()));
    }

    out.push_str("Audio sources:\n");
    for (label, token) in AUDIO_SOURCE.entries() {
        out.push_str(&format!("  {:<24} {}\n", token, label));
    }
    for device in &found.audio {
        out.push_str(&format!("  {:<24} {}\n", device.id, device.name));
    }

    Ok(out)
}

/// Run a `config` action, returning what to print.
#[track_caller]
pub fn config(action: &ConfigAction) -> AppResult<String> {
    let path = Config::config_path()?;

    match action {
        ConfigAction::Path => Ok(path.display().to_string()),
        ConfigAction::Get { key } => {
            let config = Config::load_from(&path)?;
            Ok(display_value(&config.get(key)?))
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_from(&path)?;
            config.set(key, value)?;
            config.save_to(&path)?;
            Ok(format!("{} = {}", key, display_value(&config.get(key)?)))
        }
    }
}

/// Run the configured post-save script on `file`, returning its stdout.
#[instrument]
pub async fn hook(file: PathBuf) -> AppResult<String> {
    let config = Config::load()?;

    let Some(hook) = config.post_processing.hook() else {
        return Err(AppError::ConfigError {
            reason: "No post-save script configured (post_processing.enabled, post_processing.script)"
                .to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    };

    Ok(hook.run(&file, RECORDING_TYPE_REPLAY).await?)
}

/// Strings print bare, everything else in TOML syntax.
pub fn display_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
