//! Composition root: owns every machine and runs the cooperative cycle.

use crate::config::{ConfigError, JukeboxConfig};
use crate::devices::{
    ButtonFsm, BuzzerFsm, BuzzerState, LedFsm, LedSignals, UsartFsm, UserAction,
};
use crate::hw::{ButtonInput, Clock, LedOutput, PowerControl, SerialLink, SimBoard, ToneGenerator};
use crate::jukebox::{Jukebox, JukeboxState, Peripherals};
use serde::Serialize;
use std::sync::Arc;

pub const BUTTON_ID: usize = 0;
pub const BUZZER_ID: usize = 0;
pub const USART_ID: usize = 0;
/// Lit while a melody is playing or paused.
pub const PLAYING_LED_ID: usize = 0;
/// Lit while the jukebox is switched on.
pub const POWER_LED_ID: usize = 1;

/// Hardware collaborators handed to the machines.
#[derive(Clone)]
pub struct Hardware {
    pub clock: Arc<dyn Clock>,
    pub buttons: Arc<dyn ButtonInput>,
    pub tones: Arc<dyn ToneGenerator>,
    pub serial: Arc<dyn SerialLink>,
    pub leds: Arc<dyn LedOutput>,
    pub power: Arc<dyn PowerControl>,
}

impl Hardware {
    /// Every collaborator backed by one simulated board.
    pub fn from_board(board: Arc<SimBoard>) -> Self {
        Self {
            clock: board.clone(),
            buttons: board.clone(),
            tones: board.clone(),
            serial: board.clone(),
            leds: board.clone(),
            power: board,
        }
    }
}

/// Serialisable snapshot of the jukebox.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JukeboxStatus {
    pub state: JukeboxState,
    pub powered: bool,
    pub melody_idx: usize,
    pub melody: String,
    pub speed: f64,
    pub buzzer_state: BuzzerState,
    pub buzzer_action: UserAction,
    pub note_index: usize,
    pub playing_led: bool,
    pub power_led: bool,
}

/// The whole jukebox: devices, orchestrator and indicator LEDs.
#[derive(Debug)]
pub struct JukeboxSystem {
    peripherals: Peripherals,
    jukebox: Jukebox,
    playing_led: LedFsm,
    power_led: LedFsm,
}

impl JukeboxSystem {
    pub fn new(config: &JukeboxConfig, hw: Hardware) -> Result<Self, ConfigError> {
        let jukebox = Jukebox::new(config, hw.power)?;
        let peripherals = Peripherals {
            button: ButtonFsm::new(BUTTON_ID, config.debounce_time_ms, hw.buttons, hw.clock),
            usart: UsartFsm::new(USART_ID, hw.serial),
            buzzer: BuzzerFsm::new(BUZZER_ID, hw.tones),
        };

        Ok(Self {
            peripherals,
            jukebox,
            playing_led: LedFsm::new(PLAYING_LED_ID, hw.leds.clone()),
            power_led: LedFsm::new(POWER_LED_ID, hw.leds),
        })
    }

    /// Fire every machine once: button, usart, buzzer, jukebox, then LEDs.
    pub fn run_cycle(&mut self) {
        self.peripherals.button.fire();
        self.peripherals.usart.fire();
        self.peripherals.buzzer.fire();
        self.jukebox.fire(&mut self.peripherals);

        self.playing_led
            .fire(LedSignals::follow(self.peripherals.buzzer.check_activity()));
        self.power_led
            .fire(LedSignals::follow(self.jukebox.is_powered()));
    }

    pub fn jukebox(&self) -> &Jukebox {
        &self.jukebox
    }

    pub fn peripherals(&self) -> &Peripherals {
        &self.peripherals
    }

    pub fn status(&self) -> JukeboxStatus {
        let buzzer = &self.peripherals.buzzer;
        JukeboxStatus {
            state: self.jukebox.state(),
            powered: self.jukebox.is_powered(),
            melody_idx: self.jukebox.melody_idx(),
            melody: self.jukebox.melody_name().to_string(),
            speed: self.jukebox.speed(),
            buzzer_state: buzzer.state(),
            buzzer_action: buzzer.action(),
            note_index: buzzer.note_index(),
            playing_led: self.playing_led.is_illuminated(),
            power_led: self.power_led.is_illuminated(),
        }
    }
}
