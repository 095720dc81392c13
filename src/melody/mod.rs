//! Melodies: a name plus parallel note frequency and duration sequences.
//!
//! Built-in melodies borrow static tables; user melodies own their data.
//! Either way a `Melody` is immutable once built, so buzzers share one
//! through an `Arc`.

pub mod library;
pub mod notes;

use serde::Serialize;
use std::borrow::Cow;
use thiserror::Error;

/// Errors raised when building a melody from user data.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MelodyError {
    #[error("melody name is empty")]
    EmptyName,

    #[error("melody '{name}' has no notes")]
    NoNotes { name: String },

    #[error("melody '{name}' has {frequencies} frequencies but {durations} durations")]
    LengthMismatch {
        name: String,
        frequencies: usize,
        durations: usize,
    },

    #[error("melody '{name}' has an invalid frequency at note {index}")]
    InvalidFrequency { name: String, index: usize },
}

/// One note of a melody. A frequency of `0.0` is a rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub frequency_hz: f64,
    pub duration_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Melody {
    name: Cow<'static, str>,
    frequencies: Cow<'static, [f64]>,
    durations: Cow<'static, [u32]>,
}

impl Melody {
    /// Build a melody from owned data, checking it is well formed.
    pub fn new(
        name: impl Into<String>,
        frequencies: Vec<f64>,
        durations: Vec<u32>,
    ) -> Result<Self, MelodyError> {
        let name = name.into();
        if name.is_empty() {
            return Err(MelodyError::EmptyName);
        }
        if frequencies.len() != durations.len() {
            return Err(MelodyError::LengthMismatch {
                name,
                frequencies: frequencies.len(),
                durations: durations.len(),
            });
        }
        if frequencies.is_empty() {
            return Err(MelodyError::NoNotes { name });
        }
        if let Some(index) = frequencies
            .iter()
            .position(|f| !f.is_finite() || *f < 0.0)
        {
            return Err(MelodyError::InvalidFrequency { name, index });
        }

        Ok(Self {
            name: Cow::Owned(name),
            frequencies: Cow::Owned(frequencies),
            durations: Cow::Owned(durations),
        })
    }

    /// Build a melody over static tables. Panics at compile time when the
    /// tables differ in length.
    pub const fn from_static(
        name: &'static str,
        frequencies: &'static [f64],
        durations: &'static [u32],
    ) -> Self {
        assert!(frequencies.len() == durations.len());
        Self {
            name: Cow::Borrowed(name),
            frequencies: Cow::Borrowed(frequencies),
            durations: Cow::Borrowed(durations),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of notes.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn durations(&self) -> &[u32] {
        &self.durations
    }

    pub fn note(&self, index: usize) -> Option<Note> {
        Some(Note {
            frequency_hz: *self.frequencies.get(index)?,
            duration_ms: *self.durations.get(index)?,
        })
    }

    /// Playing time at normal speed.
    pub fn total_duration_ms(&self) -> u64 {
        self.durations.iter().map(|&d| u64::from(d)).sum()
    }
}
