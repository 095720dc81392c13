//! Configuration rules, accumulated with `Validation`.
//!
//! Every rule is checked, and all broken rules are reported together.

use crate::config::violations::ConfigViolation;
use crate::config::JukeboxConfig;
use crate::jukebox::{MAX_MELODIES, MIN_SPEED};
use crate::melody::Melody;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Result of one or more configuration rules.
pub type ConfigCheck = Validation<(), NonEmptyVec<ConfigViolation>>;

fn require(ok: bool, violation: impl FnOnce() -> ConfigViolation) -> ConfigCheck {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

pub fn threshold_order(config: &JukeboxConfig) -> ConfigCheck {
    require(
        config.next_song_press_time_ms < config.on_off_press_time_ms,
        || ConfigViolation::ThresholdOrder {
            next_song_ms: config.next_song_press_time_ms,
            on_off_ms: config.on_off_press_time_ms,
        },
    )
}

pub fn debounce(config: &JukeboxConfig) -> ConfigCheck {
    if config.debounce_time_ms == 0 {
        return Validation::fail(ConfigViolation::ZeroDebounce);
    }

    require(
        config.debounce_time_ms < config.next_song_press_time_ms,
        || ConfigViolation::DebounceTooLong {
            debounce_ms: config.debounce_time_ms,
            next_song_ms: config.next_song_press_time_ms,
        },
    )
}

pub fn playlist_size(config: &JukeboxConfig) -> ConfigCheck {
    let len = config.playlist.len();
    if len == 0 {
        return Validation::fail(ConfigViolation::EmptyPlaylist);
    }

    require(len <= MAX_MELODIES, || ConfigViolation::PlaylistTooLong {
        len,
        max: MAX_MELODIES,
    })
}

pub fn initial_speed(config: &JukeboxConfig) -> ConfigCheck {
    let speed = config.initial_speed;
    require(speed.is_finite() && speed >= MIN_SPEED, || {
        ConfigViolation::InvalidSpeed {
            speed,
            min: MIN_SPEED,
        }
    })
}

/// Custom melodies must be well formed.
pub fn custom_melodies(config: &JukeboxConfig) -> ConfigCheck {
    let checks = config
        .melodies
        .iter()
        .map(|def| {
            match Melody::new(def.name.clone(), def.frequencies.clone(), def.durations.clone()) {
                Ok(_) => Validation::success(()),
                Err(err) => Validation::fail(ConfigViolation::from(err)),
            }
        })
        .collect::<Vec<ConfigCheck>>();

    Validation::all_vec(checks).map(|_| ())
}

/// Intro, outro and every playlist entry must name a known melody.
pub fn melody_references(config: &JukeboxConfig) -> ConfigCheck {
    let checks = [&config.intro_melody, &config.outro_melody]
        .into_iter()
        .chain(config.playlist.iter())
        .map(|name| {
            require(config.knows_melody(name), || ConfigViolation::UnknownMelody {
                name: name.clone(),
            })
        })
        .collect::<Vec<ConfigCheck>>();

    Validation::all_vec(checks).map(|_| ())
}

/// Run every rule, accumulating ALL violations.
pub fn validate(config: &JukeboxConfig) -> ConfigCheck {
    let checks = vec![
        threshold_order(config),
        debounce(config),
        playlist_size(config),
        initial_speed(config),
        custom_melodies(config),
        melody_references(config),
    ];

    Validation::all_vec(checks).map(|_| ())
}
