//! Debounced push button measuring press durations.

use crate::builder::{BuildError, TableBuilder, TransitionBuilder};
use crate::core::{Fsm, State, TransitionTable};
use crate::hw::{tick_after, ButtonInput, Clock};
use crate::state_enum;
use std::sync::{Arc, OnceLock};

state_enum! {
    /// Debounce states of a push button.
    pub enum ButtonState {
        Released,
        PressedWait,
        Pressed,
        ReleasedWait,
    }
    idle: [Released]
}

/// Timing data of one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonData {
    id: usize,
    debounce_time_ms: u32,
    next_timeout: u32,
    tick_pressed: u32,
    duration: u32,
}

/// Hardware handles used by the button guards and actions.
pub struct ButtonIo {
    input: Arc<dyn ButtonInput>,
    clock: Arc<dyn Clock>,
}

type ButtonTable = TransitionTable<ButtonState, ButtonData, ButtonIo>;

fn is_pressed(button: &ButtonData, io: &ButtonIo) -> bool {
    io.input.is_pressed(button.id)
}

fn is_released(button: &ButtonData, io: &ButtonIo) -> bool {
    !io.input.is_pressed(button.id)
}

fn debounce_elapsed(button: &ButtonData, io: &ButtonIo) -> bool {
    tick_after(io.clock.now_ms(), button.next_timeout)
}

fn store_tick_pressed(button: &mut ButtonData, io: &mut ButtonIo) {
    let now = io.clock.now_ms();
    button.tick_pressed = now;
    button.next_timeout = now.wrapping_add(button.debounce_time_ms);
}

fn set_duration(button: &mut ButtonData, io: &mut ButtonIo) {
    let now = io.clock.now_ms();
    button.duration = now.wrapping_sub(button.tick_pressed);
    button.next_timeout = now.wrapping_add(button.debounce_time_ms);
}

fn build_table() -> Result<ButtonTable, BuildError> {
    use ButtonState::*;

    TableBuilder::new("button")
        .transition(
            TransitionBuilder::new()
                .from(Released)
                .when(is_pressed)
                .to(PressedWait)
                .action(store_tick_pressed),
        )?
        .transition(
            TransitionBuilder::new()
                .from(PressedWait)
                .when(debounce_elapsed)
                .to(Pressed),
        )?
        .transition(
            TransitionBuilder::new()
                .from(Pressed)
                .when(is_released)
                .to(ReleasedWait)
                .action(set_duration),
        )?
        .transition(
            TransitionBuilder::new()
                .from(ReleasedWait)
                .when(debounce_elapsed)
                .to(Released),
        )?
        .build()
}

fn table() -> Arc<ButtonTable> {
    static TABLE: OnceLock<Arc<ButtonTable>> = OnceLock::new();
    TABLE
        .get_or_init(|| Arc::new(build_table().expect("button table is well formed")))
        .clone()
}

/// Button machine.
///
/// A completed press leaves its length in [`duration`](Self::duration) until
/// a consumer calls [`reset_duration`](Self::reset_duration). A consumer that
/// forgets to reset will see the same duration on every poll.
pub struct ButtonFsm {
    fsm: Fsm<ButtonState, ButtonData, ButtonIo>,
    data: ButtonData,
    io: ButtonIo,
}

impl ButtonFsm {
    pub fn new(
        id: usize,
        debounce_time_ms: u32,
        input: Arc<dyn ButtonInput>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            fsm: Fsm::new(table()),
            data: ButtonData {
                id,
                debounce_time_ms,
                next_timeout: 0,
                tick_pressed: 0,
                duration: 0,
            },
            io: ButtonIo { input, clock },
        }
    }

    pub fn fire(&mut self) -> Option<ButtonState> {
        self.fsm.fire(&mut self.data, &mut self.io)
    }

    pub fn state(&self) -> ButtonState {
        self.fsm.current_state()
    }

    pub fn id(&self) -> usize {
        self.data.id
    }

    pub fn debounce_time_ms(&self) -> u32 {
        self.data.debounce_time_ms
    }

    /// Length of the last completed press in ms, 0 if none is pending.
    pub fn duration(&self) -> u32 {
        self.data.duration
    }

    pub fn reset_duration(&mut self) {
        self.data.duration = 0;
    }

    /// Whether the button is anywhere but at rest.
    pub fn check_activity(&self) -> bool {
        !self.state().is_idle()
    }
}

impl std::fmt::Debug for ButtonFsm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ButtonFsm")
            .field("state", &self.state())
            .field("data", &self.data)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::SimBoard;

    fn setup() -> (Arc<SimBoard>, ButtonFsm) {
        let board = Arc::new(SimBoard::default());
        let button = ButtonFsm::new(0, 150, board.clone(), board.clone());
        (board, button)
    }

    fn run(board: &SimBoard, button: &mut ButtonFsm, ms: u32) {
        for _ in 0..ms {
            board.advance_ms(1);
            button.fire();
        }
    }

    #[test]
    fn starts_released() {
        let (_, button) = setup();
        assert_eq!(button.state(), ButtonState::Released);
        assert!(!button.check_activity());
        assert_eq!(button.duration(), 0);
    }

    #[test]
    fn press_waits_for_debounce() {
        let (board, mut button) = setup();
        board.press_button(0);
        button.fire();
        assert_eq!(button.state(), ButtonState::PressedWait);
        assert!(button.check_activity());

        run(&board, &mut button, 150);
        assert_eq!(button.state(), ButtonState::PressedWait);

        run(&board, &mut button, 1);
        assert_eq!(button.state(), ButtonState::Pressed);
    }

    #[test]
    fn full_cycle_measures_duration() {
        let (board, mut button) = setup();
        board.press_button(0);
        button.fire();
        run(&board, &mut button, 1200);
        board.release_button(0);
        button.fire();

        assert_eq!(button.state(), ButtonState::ReleasedWait);
        assert_eq!(button.duration(), 1200);

        run(&board, &mut button, 151);
        assert_eq!(button.state(), ButtonState::Released);
        assert_eq!(button.duration(), 1200);
    }

    #[test]
    fn duration_persists_until_reset() {
        let (board, mut button) = setup();
        board.press_button(0);
        run(&board, &mut button, 600);
        board.release_button(0);
        run(&board, &mut button, 200);

        // Stale until the consumer resets it.
        assert_eq!(button.duration(), 600);
        assert_eq!(button.duration(), 600);

        button.reset_duration();
        assert_eq!(button.duration(), 0);
        run(&board, &mut button, 500);
        assert_eq!(button.duration(), 0);
    }

    #[test]
    fn bounce_during_debounce_is_ignored() {
        let (board, mut button) = setup();
        board.press_button(0);
        button.fire();
        board.advance_ms(20);
        board.release_button(0);
        button.fire();

        assert_eq!(button.state(), ButtonState::PressedWait);
    }

    #[test]
    fn timing_survives_tick_wrap() {
        let (board, mut button) = setup();
        board.set_millis(u32::MAX - 100);
        board.press_button(0);
        button.fire();
        run(&board, &mut button, 400);
        board.release_button(0);
        button.fire();

        assert_eq!(button.duration(), 400);
    }
}
