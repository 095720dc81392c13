//! Property-based tests for the machine engine and the devices.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use approx::assert_relative_eq;
use jukebox_fsm::core::{Fsm, Guard, State, Transition, TransitionTable};
use jukebox_fsm::devices::{ButtonFsm, ButtonState, BuzzerFsm, UserAction};
use jukebox_fsm::hw::SimBoard;
use jukebox_fsm::jukebox::{Command, CommandError};
use jukebox_fsm::melody::library;
use jukebox_fsm::state_enum;
use proptest::prelude::*;
use std::sync::Arc;

state_enum! {
    enum TestState {
        A,
        B,
        C,
    }
    idle: [A]
}

/// Machine data: the guard input and a log of actions run.
#[derive(Debug, Default, Clone, PartialEq)]
struct Model {
    input: u8,
    ran: Vec<usize>,
}

prop_compose! {
    fn arbitrary_state()(variant in 0..3u8) -> TestState {
        match variant {
            0 => TestState::A,
            1 => TestState::B,
            _ => TestState::C,
        }
    }
}

/// One transition per `(from, to, threshold)`, guarded by `input >= threshold`.
/// Each action records its table position.
fn build(rows: &[(TestState, TestState, u8)]) -> Arc<TransitionTable<TestState, Model, ()>> {
    let transitions = rows
        .iter()
        .enumerate()
        .map(|(i, &(from, to, threshold))| {
            Transition::new(
                from,
                Guard::new(move |m: &Model, _: &()| m.input >= threshold),
                to,
            )
            .with_action(move |m: &mut Model, _: &mut ()| m.ran.push(i))
        })
        .collect();

    Arc::new(TransitionTable::new("test", transitions).unwrap())
}

proptest! {
    #[test]
    fn no_match_leaves_everything_untouched(
        rows in prop::collection::vec((arbitrary_state(), arbitrary_state(), 1..=255u8), 1..8),
    ) {
        let table = build(&rows);
        let mut fsm = Fsm::new(table);
        let mut model = Model::default();

        // input 0 fails every guard
        let before = model.clone();
        prop_assert_eq!(fsm.fire(&mut model, &mut ()), None);
        prop_assert_eq!(fsm.current_state(), rows[0].0);
        prop_assert_eq!(model, before);
    }

    #[test]
    fn first_enabled_transition_wins(
        rows in prop::collection::vec((arbitrary_state(), arbitrary_state(), 0..=255u8), 1..8),
        input in 0..=255u8,
    ) {
        let table = build(&rows);
        let mut fsm = Fsm::new(table);
        let start = fsm.current_state();
        let mut model = Model { input, ran: Vec::new() };

        let expected = rows
            .iter()
            .position(|&(from, _, threshold)| from == start && input >= threshold);

        let result = fsm.fire(&mut model, &mut ());
        match expected {
            Some(i) => {
                prop_assert_eq!(result, Some(rows[i].1));
                prop_assert_eq!(fsm.current_state(), rows[i].1);
                prop_assert_eq!(model.ran, vec![i]);
            }
            None => {
                prop_assert_eq!(result, None);
                prop_assert_eq!(fsm.current_state(), start);
                prop_assert!(model.ran.is_empty());
            }
        }
    }

    #[test]
    fn initial_state_is_first_origin(
        rows in prop::collection::vec((arbitrary_state(), arbitrary_state(), 0..=255u8), 1..8),
    ) {
        let table = build(&rows);
        let mut fsm = Fsm::new(table);
        prop_assert_eq!(fsm.current_state(), rows[0].0);

        let mut model = Model { input: 255, ran: Vec::new() };
        fsm.fire(&mut model, &mut ());
        fsm.reset();
        prop_assert_eq!(fsm.current_state(), rows[0].0);
    }

    #[test]
    fn state_names_match_variants(state in arbitrary_state()) {
        prop_assert_eq!(state.name(), format!("{:?}", state));
        prop_assert_eq!(state.is_idle(), state == TestState::A);
    }

    #[test]
    fn button_measures_hold_time(
        debounce in 1..300u32,
        extra in 2..3000u32,
        start in any::<u32>(),
    ) {
        let hold = debounce + extra;
        let board = Arc::new(SimBoard::default());
        board.set_millis(start);
        let mut button = ButtonFsm::new(0, debounce, board.clone(), board.clone());

        board.press_button(0);
        button.fire();
        for _ in 0..hold {
            board.advance_ms(1);
            button.fire();
        }
        board.release_button(0);
        button.fire();

        prop_assert_eq!(button.state(), ButtonState::ReleasedWait);
        prop_assert_eq!(button.duration(), hold);
    }

    #[test]
    fn buzzer_scales_note_duration_by_speed(speed in 0.1..8.0f64) {
        let board = Arc::new(SimBoard::default());
        let mut buzzer = BuzzerFsm::new(0, board.clone());
        buzzer.set_melody(Arc::new(library::SCALE.clone()));
        buzzer.set_speed(speed);
        buzzer.set_action(UserAction::Play);
        buzzer.fire();

        let notes = board.played_notes(0);
        prop_assert_eq!(notes.len(), 1);
        prop_assert_eq!(notes[0].duration_ms, (250.0 / speed) as u32);
        assert_relative_eq!(notes[0].frequency_hz, library::SCALE.frequencies()[0]);
    }

    #[test]
    fn parse_never_panics(line in "\\PC{0,12}") {
        let _ = Command::parse(&line);
    }

    #[test]
    fn select_accepts_any_index(index in any::<usize>()) {
        let line = format!("select {index}");
        prop_assert_eq!(Command::parse(&line), Ok(Some(Command::Select(index))));
    }

    #[test]
    fn unknown_words_are_rejected(word in "[A-Z][a-z]{0,8}") {
        prop_assert_eq!(Command::parse(&word), Err(CommandError::NotFound));
    }
}
