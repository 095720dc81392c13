//! Configuration violations and load errors.

use crate::melody::MelodyError;
use thiserror::Error;

/// A single rule broken by a configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error(
        "next-song press time ({next_song_ms} ms) must be shorter than on/off press time ({on_off_ms} ms)"
    )]
    ThresholdOrder { next_song_ms: u32, on_off_ms: u32 },

    #[error("debounce time must be greater than zero")]
    ZeroDebounce,

    #[error("debounce time ({debounce_ms} ms) must be shorter than next-song press time ({next_song_ms} ms)")]
    DebounceTooLong { debounce_ms: u32, next_song_ms: u32 },

    #[error("playlist is empty")]
    EmptyPlaylist,

    #[error("playlist has {len} melodies, at most {max} fit")]
    PlaylistTooLong { len: usize, max: usize },

    #[error("unknown melody '{name}'")]
    UnknownMelody { name: String },

    #[error("initial speed {speed} must be finite and at least {min}")]
    InvalidSpeed { speed: f64, min: f64 },

    #[error("invalid custom melody: {0}")]
    BadMelody(#[from] MelodyError),
}

/// Errors returned when loading or applying a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {}", describe(.0))]
    Invalid(Vec<ConfigViolation>),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

fn describe(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
