//! Capture and audio source discovery via the recorder's `--list-*` flags.

use crate::{CoreResult, RecorderError};

use std::{fmt, panic::Location, process::Stdio};

use error_location::ErrorLocation;
use tokio::process::Command;
use tracing::{debug, instrument};

/// A monitor reported by `--list-capture-options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOption {
    /// Monitor name, usable as the `-w` value.
    pub name: String,
    /// Reported resolution, e.g. `1920x1080`.
    pub resolution: String,
}

impl fmt::Display for CaptureOption {
    /// `NAME (WxH)`, the form accepted by
    /// [`crate::mapping::resolve_capture_source`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.resolution)
    }
}

/// An audio source: a device or an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    /// Value passed to `-a`.
    pub id: String,
    /// Human-readable name.
    pub name: String,
}

/// Everything the recorder can capture from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sources {
    /// Monitors.
    pub capture: Vec<CaptureOption>,
    /// Audio devices followed by application audio sources.
    pub audio: Vec<AudioDevice>,
}

/// Parse `--list-capture-options` output. Only `name|resolution` lines are
/// monitors; the fixed choices are listed without a separator.
pub fn parse_capture_options(output: &str) -> Vec<CaptureOption> {
    output
        .lines()
        .filter_map(|line| line.trim().split_once('|'))
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, resolution)| CaptureOption {
            name: name.to_string(),
            resolution: resolution.to_string(),
        })
        .collect()
}

/// Parse `--list-audio-devices` output (`id|name` lines).
pub fn parse_audio_devices(output: &str) -> Vec<AudioDevice> {
    output
        .lines()
        .filter_map(|line| line.trim().split_once('|'))
        .filter(|(id, name)| !id.is_empty() && !name.is_empty())
        .map(|(id, name)| AudioDevice {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect()
}

/// Parse `--list-application-audio` output (one application per line).
pub fn parse_application_audio(output: &str) -> Vec<AudioDevice> {
    output
        .lines()
        .map(str::trim)
        .filter(|app| !app.is_empty())
        .map(|app| AudioDevice {
            id: format!("app:{}", app),
            name: format!("App: {}", app),
        })
        .collect()
}

/// Query the recorder for all capture and audio sources.
///
/// # Errors
///
/// [`RecorderError::Launch`] if the recorder cannot be run.
#[instrument]
pub async fn discover(program: &str) -> CoreResult<Sources> {
    let capture = parse_capture_options(&list(program, "--list-capture-options").await?);

    let mut audio = parse_audio_devices(&list(program, "--list-audio-devices").await?);
    audio.extend(parse_application_audio(
        &list(program, "--list-application-audio").await?,
    ));

    debug!(
        monitors = capture.len(),
        audio_sources = audio.len(),
        "Sources discovered"
    );

    Ok(Sources { capture, audio })
}

async fn list(program: &str, flag: &str) -> CoreResult<String> {
    let output = Command::new(program)
        .arg(flag)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| RecorderError::Launch {
            program: program.to_string(),
            source,
            location: ErrorLocation::from(Location::caller()),
        })?;

    if !output.status.success() {
        debug!(flag, status = %output.status, "Listing exited unsuccessfully");
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
