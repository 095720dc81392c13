//! Jukebox orchestrator.
//!
//! The jukebox owns no device. The composition root owns a [`Peripherals`]
//! set and lends it to [`Jukebox::fire`] once per cycle, after the devices
//! themselves have fired, so every guard sees this cycle's device state.

pub mod command;

pub use command::{decode_line, Command, CommandError};

use crate::builder::{BuildError, TableBuilder, TransitionBuilder};
use crate::config::{ConfigError, JukeboxConfig};
use crate::core::{Fsm, State, TransitionTable};
use crate::devices::{ButtonFsm, BuzzerFsm, UsartFsm, UserAction};
use crate::hw::PowerControl;
use crate::melody::Melody;
use crate::state_enum;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Number of melody slots.
pub const MAX_MELODIES: usize = 10;
/// Lowest player speed accepted by the `speed` command.
pub const MIN_SPEED: f64 = 0.1;

state_enum! {
    /// Power and command states of the jukebox.
    pub enum JukeboxState {
        Off,
        StartUp,
        WaitCommand,
        ShutDown,
        SleepWhileOff,
        SleepWhileOn,
    }
    idle: [Off, SleepWhileOff]
}

/// Devices the jukebox coordinates.
#[derive(Debug)]
pub struct Peripherals {
    pub button: ButtonFsm,
    pub usart: UsartFsm,
    pub buzzer: BuzzerFsm,
}

impl Peripherals {
    /// Whether any device has work in progress.
    pub fn check_activity(&self) -> bool {
        self.button.check_activity() || self.usart.check_activity() || self.buzzer.check_activity()
    }
}

pub struct JukeboxData {
    melodies: [Option<Arc<Melody>>; MAX_MELODIES],
    melody_idx: usize,
    on_off_press_time_ms: u32,
    next_song_press_time_ms: u32,
    speed: f64,
    intro: Arc<Melody>,
    outro: Arc<Melody>,
    power: Arc<dyn PowerControl>,
}

impl JukeboxData {
    fn current_melody(&self) -> Option<&Arc<Melody>> {
        self.melodies[self.melody_idx].as_ref()
    }

    /// Make slot `index` current and load it, stopped.
    fn load(&mut self, index: usize, p: &mut Peripherals) -> Result<(), CommandError> {
        let melody = self
            .melodies
            .get(index)
            .and_then(Option::as_ref)
            .ok_or(CommandError::MelodyNotFound)?;

        p.buzzer.set_action(UserAction::Stop);
        p.buzzer.set_melody(Arc::clone(melody));
        self.melody_idx = index;
        Ok(())
    }

    /// Stop, move to the next non-empty slot (wrapping) and play it.
    fn set_next_song(&mut self, p: &mut Peripherals) {
        let next = (1..=MAX_MELODIES)
            .map(|step| (self.melody_idx + step) % MAX_MELODIES)
            .find(|&i| self.melodies[i].is_some())
            .unwrap_or(self.melody_idx);

        if self.load(next, p).is_ok() {
            p.buzzer.set_action(UserAction::Play);
            info!(slot = next, melody = self.melody_name(), "next melody");
        }
    }

    fn melody_name(&self) -> &str {
        self.current_melody().map_or("", |m| m.name())
    }

    fn execute(&mut self, command: Command, p: &mut Peripherals) -> Result<Option<String>, CommandError> {
        match command {
            Command::Play => p.buzzer.set_action(UserAction::Play),
            Command::Stop => p.buzzer.set_action(UserAction::Stop),
            Command::Pause => p.buzzer.set_action(UserAction::Pause),
            Command::Speed(requested) => {
                self.speed = requested.max(MIN_SPEED);
                p.buzzer.set_speed(self.speed);
            }
            Command::Next => self.set_next_song(p),
            Command::Select(index) => self.load(index, p)?,
            Command::Info => return Ok(Some(format!("Playing {}\n", self.melody_name()))),
        }
        Ok(None)
    }
}

type JukeboxTable = TransitionTable<JukeboxState, JukeboxData, Peripherals>;

// Guards

fn check_on_off(j: &JukeboxData, p: &Peripherals) -> bool {
    p.button.duration() > j.on_off_press_time_ms
}

fn check_next_song_button(j: &JukeboxData, p: &Peripherals) -> bool {
    let duration = p.button.duration();
    duration >= j.next_song_press_time_ms && duration < j.on_off_press_time_ms
}

fn check_command_received(_: &JukeboxData, p: &Peripherals) -> bool {
    p.usart.data_received()
}

fn check_melody_finished(_: &JukeboxData, p: &Peripherals) -> bool {
    p.buzzer.action() == UserAction::Stop
}

fn check_activity(_: &JukeboxData, p: &Peripherals) -> bool {
    p.check_activity()
}

fn check_no_activity(_: &JukeboxData, p: &Peripherals) -> bool {
    !p.check_activity()
}

// Actions

fn do_start_up(j: &mut JukeboxData, p: &mut Peripherals) {
    info!("jukebox powering on");
    p.button.reset_duration();
    p.usart.enable_rx_interrupt();
    p.buzzer.set_action(UserAction::Stop);
    p.buzzer.set_speed(j.speed);
    p.buzzer.set_melody(Arc::clone(&j.intro));
    p.buzzer.set_action(UserAction::Play);
}

fn do_start_jukebox(j: &mut JukeboxData, p: &mut Peripherals) {
    p.button.reset_duration();
    if j.load(0, p).is_ok() {
        info!(melody = j.melody_name(), "jukebox ready");
    }
}

fn do_load_next_song(j: &mut JukeboxData, p: &mut Peripherals) {
    p.button.reset_duration();
    j.set_next_song(p);
}

fn do_read_command(j: &mut JukeboxData, p: &mut Peripherals) {
    let message = decode_line(p.usart.in_data());
    p.usart.reset_input_data();

    let reply = match Command::parse(&message) {
        Ok(None) => {
            debug!("ignoring empty message");
            None
        }
        Ok(Some(command)) => {
            info!(?command, "command");
            j.execute(command, p).unwrap_or_else(|err| {
                warn!(%err, %message, "command rejected");
                Some(format!("{err}\n"))
            })
        }
        Err(err) => {
            warn!(%err, %message, "command rejected");
            Some(format!("{err}\n"))
        }
    };

    if let Some(reply) = reply {
        p.usart.set_out_data(reply.as_bytes());
    }
}

fn do_stop_jukebox(j: &mut JukeboxData, p: &mut Peripherals) {
    info!("jukebox powering off");
    p.button.reset_duration();
    p.buzzer.set_action(UserAction::Stop);
    p.buzzer.set_melody(Arc::clone(&j.outro));
    p.buzzer.set_action(UserAction::Play);
    p.usart.disable_rx_interrupt();
}

fn do_sleep_off(_: &mut JukeboxData, p: &mut Peripherals) {
    p.buzzer.set_action(UserAction::Stop);
    p.button.reset_duration();
}

fn do_sleep(j: &mut JukeboxData, _: &mut Peripherals) {
    j.power.sleep();
}

fn build_table() -> Result<JukeboxTable, BuildError> {
    use JukeboxState::*;

    TableBuilder::new("jukebox")
        .transition(
            TransitionBuilder::new()
                .from(Off)
                .when(check_on_off)
                .to(StartUp)
                .action(do_start_up),
        )?
        .transition(
            TransitionBuilder::new()
                .from(Off)
                .when(check_no_activity)
                .to(SleepWhileOff)
                .action(do_sleep),
        )?
        .transition(
            TransitionBuilder::new()
                .from(StartUp)
                .when(check_melody_finished)
                .to(WaitCommand)
                .action(do_start_jukebox),
        )?
        .transition(
            TransitionBuilder::new()
                .from(WaitCommand)
                .when(check_next_song_button)
                .to(WaitCommand)
                .action(do_load_next_song),
        )?
        .transition(
            TransitionBuilder::new()
                .from(WaitCommand)
                .when(check_command_received)
                .to(WaitCommand)
                .action(do_read_command),
        )?
        // Ahead of the no-activity check so a finished long press is never
        // left pending while asleep.
        .transition(
            TransitionBuilder::new()
                .from(WaitCommand)
                .when(check_on_off)
                .to(ShutDown)
                .action(do_stop_jukebox),
        )?
        .transition(
            TransitionBuilder::new()
                .from(WaitCommand)
                .when(check_no_activity)
                .to(SleepWhileOn)
                .action(do_sleep),
        )?
        .transition(
            TransitionBuilder::new()
                .from(ShutDown)
                .when(check_melody_finished)
                .to(Off)
                .action(do_sleep_off),
        )?
        .transition(
            TransitionBuilder::new()
                .from(SleepWhileOn)
                .when(check_activity)
                .to(WaitCommand),
        )?
        .transition(
            TransitionBuilder::new()
                .from(SleepWhileOn)
                .when(check_no_activity)
                .to(SleepWhileOn)
                .action(do_sleep),
        )?
        .transition(
            TransitionBuilder::new()
                .from(SleepWhileOff)
                .when(check_activity)
                .to(Off),
        )?
        .transition(
            TransitionBuilder::new()
                .from(SleepWhileOff)
                .when(check_no_activity)
                .to(SleepWhileOff)
                .action(do_sleep),
        )?
        .build()
}

fn table() -> Arc<JukeboxTable> {
    static TABLE: OnceLock<Arc<JukeboxTable>> = OnceLock::new();
    TABLE
        .get_or_init(|| Arc::new(build_table().expect("jukebox table is well formed")))
        .clone()
}

/// Top-level machine: power states, melody selection and serial commands.
pub struct Jukebox {
    fsm: Fsm<JukeboxState, JukeboxData, Peripherals>,
    data: JukeboxData,
}

impl Jukebox {
    /// Build a jukebox from a configuration, refusing an invalid one.
    pub fn new(config: &JukeboxConfig, power: Arc<dyn PowerControl>) -> Result<Self, ConfigError> {
        config.check()?;

        let playlist = config.playlist_melodies()?;
        let intro = config.melody(&config.intro_melody).map_err(|v| ConfigError::Invalid(vec![v]))?;
        let outro = config.melody(&config.outro_melody).map_err(|v| ConfigError::Invalid(vec![v]))?;

        Ok(Self {
            fsm: Fsm::new(table()),
            data: JukeboxData {
                melodies: std::array::from_fn(|i| playlist.get(i).cloned()),
                melody_idx: 0,
                on_off_press_time_ms: config.on_off_press_time_ms,
                next_song_press_time_ms: config.next_song_press_time_ms,
                speed: config.initial_speed,
                intro,
                outro,
                power,
            },
        })
    }

    pub fn fire(&mut self, peripherals: &mut Peripherals) -> Option<JukeboxState> {
        self.fsm.fire(&mut self.data, peripherals)
    }

    pub fn state(&self) -> JukeboxState {
        self.fsm.current_state()
    }

    /// Whether the jukebox is switched on (including its sleep and shutdown
    /// states).
    pub fn is_powered(&self) -> bool {
        !self.state().is_idle()
    }

    pub fn melody_idx(&self) -> usize {
        self.data.melody_idx
    }

    /// Name of the current melody.
    pub fn melody_name(&self) -> &str {
        self.data.melody_name()
    }

    pub fn melody(&self, index: usize) -> Option<&Arc<Melody>> {
        self.data.melodies.get(index).and_then(Option::as_ref)
    }

    pub fn speed(&self) -> f64 {
        self.data.speed
    }
}

impl std::fmt::Debug for Jukebox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Jukebox")
            .field("state", &self.state())
            .field("melody_idx", &self.data.melody_idx)
            .field("melody", &self.melody_name())
            .field("speed", &self.data.speed)
            .finish()
    }
}
