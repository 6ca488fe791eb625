pub mod mapping;
mod options;
mod spec;

pub use {
    options::{RecordOptions, ReplayOptions},
    spec::{CommandSpec, DEFAULT_RECORDER_BINARY},
};
