mod advanced_config;
mod audio_config;
mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod output_config;
mod post_processing_config;
mod recorder_config;
mod replay_config;
mod video_config;

pub(crate) use {
    advanced_config::AdvancedConfig,
    audio_config::AudioConfig,
    capture_config::CaptureConfig,
    config::Config,
    output_config::OutputConfig,
    post_processing_config::PostProcessingConfig,
    recorder_config::RecorderConfig,
    replay_config::ReplayConfig,
    video_config::VideoConfig,
};

use std::{
    ops::RangeInclusive,
    path::{Path, PathBuf},
};

use directories::UserDirs;

pub(crate) const DEFAULT_GRACE_PERIOD_MS: u64 = 1000;
pub(crate) const DEFAULT_CAPTURE_SOURCE: &str = "portal";
pub(crate) const DEFAULT_FPS: u32 = 60;
pub(crate) const DEFAULT_AUDIO_BITRATE: u32 = 128;
pub(crate) const DEFAULT_CBR_BITRATE: u32 = 15000;
pub(crate) const DEFAULT_BUFFER_SIZE: u32 = 60;
pub(crate) const DEFAULT_KEYFRAME_INTERVAL: f64 = 2.0;

pub(crate) const GRACE_PERIOD_RANGE: RangeInclusive<u64> = 100..=30_000;
pub(crate) const FPS_RANGE: RangeInclusive<u32> = 1..=240;
pub(crate) const WIDTH_RANGE: RangeInclusive<u32> = 0..=7680;
pub(crate) const HEIGHT_RANGE: RangeInclusive<u32> = 0..=4320;
pub(crate) const AUDIO_BITRATE_RANGE: RangeInclusive<u32> = 0..=500;
pub(crate) const CBR_BITRATE_RANGE: RangeInclusive<u32> = 1000..=100_000;
pub(crate) const BUFFER_SIZE_RANGE: RangeInclusive<u32> = 5..=1200;
pub(crate) const KEYFRAME_INTERVAL_RANGE: RangeInclusive<f64> = 0.1..=10.0;

/// `~/Videos`, or the platform's video directory when it is known.
pub(crate) fn default_videos_dir() -> PathBuf {
    UserDirs::new()
        .map(|dirs| {
            dirs.video_dir()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| dirs.home_dir().join("Videos"))
        })
        .unwrap_or_else(|| PathBuf::from("Videos"))
}

pub(crate) fn default_replay_dir() -> PathBuf {
    default_videos_dir().join("Replays")
}

pub(crate) fn clamp_to<T: PartialOrd + Copy>(value: T, range: &RangeInclusive<T>) -> T {
    if value < *range.start() {
        *range.start()
    } else if value > *range.end() {
        *range.end()
    } else {
        value
    }
}
