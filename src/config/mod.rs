//! Jukebox configuration.
//!
//! Press-time thresholds, debounce time, starting speed, intro and outro
//! melodies and the playlist loaded into the melody slots. A configuration
//! is plain serde data (JSON on disk, every field optional) and is checked
//! with [`rules::validate`], which reports every broken rule at once.
//!
//! # Example
//!
//! ```rust
//! use jukebox_fsm::config::JukeboxConfig;
//!
//! let config = JukeboxConfig::from_json_str(r#"{ "next_song_press_time_ms": 400 }"#).unwrap();
//! assert_eq!(config.on_off_press_time_ms, 1000);
//! assert!(config.check().is_ok());
//! ```

pub mod rules;
pub mod violations;

pub use rules::ConfigCheck;
pub use violations::{ConfigError, ConfigViolation};

use crate::melody::{library, Melody};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use stillwater::validation::Validation;

/// A user melody given by name and note data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MelodyDef {
    pub name: String,
    pub frequencies: Vec<f64>,
    pub durations: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JukeboxConfig {
    /// A press longer than this switches the jukebox on or off.
    pub on_off_press_time_ms: u32,
    /// A press at least this long, but shorter than the on/off time, skips
    /// to the next melody.
    pub next_song_press_time_ms: u32,
    pub debounce_time_ms: u32,
    pub initial_speed: f64,
    pub intro_melody: String,
    pub outro_melody: String,
    /// Melody names loaded into slots 0, 1, ...
    pub playlist: Vec<String>,
    /// User melodies. A user melody hides a built-in of the same name.
    pub melodies: Vec<MelodyDef>,
}

impl Default for JukeboxConfig {
    fn default() -> Self {
        Self {
            on_off_press_time_ms: 1000,
            next_song_press_time_ms: 500,
            debounce_time_ms: 150,
            initial_speed: 1.0,
            intro_melody: library::SCALE.name().to_string(),
            outro_melody: library::SCALE.name().to_string(),
            playlist: library::all()
                .iter()
                .map(|m| m.name().to_string())
                .collect(),
            melodies: Vec::new(),
        }
    }
}

impl JukeboxConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Run every rule, accumulating all violations.
    pub fn validate(&self) -> ConfigCheck {
        rules::validate(self)
    }

    /// [`validate`](Self::validate) as a `Result`.
    pub fn check(&self) -> Result<(), ConfigError> {
        match self.validate() {
            Validation::Success(()) => Ok(()),
            Validation::Failure(errors) => {
                Err(ConfigError::Invalid(errors.iter().cloned().collect()))
            }
        }
    }

    pub(crate) fn knows_melody(&self, name: &str) -> bool {
        self.melodies.iter().any(|m| m.name == name) || library::find(name).is_some()
    }

    /// Resolve a melody name, user melodies first.
    pub fn melody(&self, name: &str) -> Result<Arc<Melody>, ConfigViolation> {
        if let Some(def) = self.melodies.iter().find(|m| m.name == name) {
            let melody = Melody::new(def.name.clone(), def.frequencies.clone(), def.durations.clone())?;
            return Ok(Arc::new(melody));
        }

        library::find(name)
            .map(|m| Arc::new(m.clone()))
            .ok_or_else(|| ConfigViolation::UnknownMelody {
                name: name.to_string(),
            })
    }

    /// Melodies of the playlist, in slot order.
    pub fn playlist_melodies(&self) -> Result<Vec<Arc<Melody>>, ConfigError> {
        self.playlist
            .iter()
            .map(|name| self.melody(name))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|v| ConfigError::Invalid(vec![v]))
    }
}
