//! Indicator LED switched by external signals.

use crate::builder::{guarded_transition, BuildError};
use crate::core::{Fsm, TransitionTable};
use crate::hw::LedOutput;
use crate::state_enum;
use std::sync::{Arc, OnceLock};

state_enum! {
    pub enum LedState {
        Off,
        On,
    }
    idle: [Off]
}

/// Conditions sampled by the owner before each fire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedSignals {
    /// Turns the LED on.
    pub start: bool,
    /// Turns the LED off.
    pub end: bool,
}

impl LedSignals {
    /// Light the LED while `condition` holds.
    pub fn follow(condition: bool) -> Self {
        Self {
            start: condition,
            end: !condition,
        }
    }
}

pub struct LedData {
    id: usize,
    is_illuminated: bool,
    output: Arc<dyn LedOutput>,
}

type LedTable = TransitionTable<LedState, LedData, LedSignals>;

fn build_table() -> Result<LedTable, BuildError> {
    TransitionTable::new(
        "led",
        vec![
            guarded_transition(LedState::Off, LedState::On, |_: &LedData, s: &LedSignals| {
                s.start
            })
            .with_action(|led: &mut LedData, _: &mut LedSignals| {
                led.output.turn_on(led.id);
                led.is_illuminated = true;
            }),
            guarded_transition(LedState::On, LedState::Off, |_: &LedData, s: &LedSignals| s.end)
                .with_action(|led: &mut LedData, _: &mut LedSignals| {
                    led.output.turn_off(led.id);
                    led.is_illuminated = false;
                }),
        ],
    )
}

/// One table for every LED.
fn table() -> Arc<LedTable> {
    static TABLE: OnceLock<Arc<LedTable>> = OnceLock::new();
    TABLE
        .get_or_init(|| Arc::new(build_table().expect("led table is well formed")))
        .clone()
}

pub struct LedFsm {
    fsm: Fsm<LedState, LedData, LedSignals>,
    data: LedData,
}

impl LedFsm {
    /// Create an LED machine and switch the output off.
    pub fn new(id: usize, output: Arc<dyn LedOutput>) -> Self {
        output.turn_off(id);
        Self {
            fsm: Fsm::new(table()),
            data: LedData {
                id,
                is_illuminated: false,
                output,
            },
        }
    }

    pub fn fire(&mut self, mut signals: LedSignals) -> Option<LedState> {
        self.fsm.fire(&mut self.data, &mut signals)
    }

    pub fn state(&self) -> LedState {
        self.fsm.current_state()
    }

    pub fn id(&self) -> usize {
        self.data.id
    }

    pub fn is_illuminated(&self) -> bool {
        self.data.is_illuminated
    }

    pub fn check_activity(&self) -> bool {
        self.state() == LedState::On
    }
}

impl std::fmt::Debug for LedFsm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedFsm")
            .field("id", &self.data.id)
            .field("state", &self.state())
            .finish()
    }
}
