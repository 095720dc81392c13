//! Melody player sequencing notes on a tone generator.

use crate::builder::BuildError;
use crate::core::{Fsm, Guard, Transition, TransitionTable};
use crate::hw::ToneGenerator;
use crate::melody::Melody;
use crate::state_enum;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use tracing::warn;

state_enum! {
    /// Playback states of a buzzer.
    pub enum BuzzerState {
        WaitStart,
        PlayNote,
        PauseNote,
        WaitNote,
        WaitMelody,
    }
    idle: [WaitStart]
}

/// Playback request set by the user of the buzzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserAction {
    #[default]
    Stop,
    Play,
    Pause,
}

/// Player speed used until `set_speed` is called.
pub const DEFAULT_SPEED: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct BuzzerData {
    id: usize,
    melody: Option<Arc<Melody>>,
    note_index: usize,
    user_action: UserAction,
    player_speed: f64,
}

impl BuzzerData {
    fn wants(&self, action: UserAction) -> bool {
        self.user_action == action
    }

    fn melody_len(&self) -> usize {
        self.melody.as_ref().map_or(0, |m| m.len())
    }
}

pub struct BuzzerIo {
    tone: Arc<dyn ToneGenerator>,
}

type BuzzerTable = TransitionTable<BuzzerState, BuzzerData, BuzzerIo>;

/// Program the note under the cursor and move the cursor past it.
fn start_note(buzzer: &mut BuzzerData, io: &mut BuzzerIo) {
    let Some(note) = buzzer
        .melody
        .as_ref()
        .and_then(|m| m.note(buzzer.note_index))
    else {
        return;
    };

    let duration_ms = (f64::from(note.duration_ms) / buzzer.player_speed) as u32;
    io.tone.set_note_frequency(buzzer.id, note.frequency_hz);
    io.tone.set_note_duration(buzzer.id, duration_ms);
    buzzer.note_index += 1;
}

fn end_note(buzzer: &mut BuzzerData, io: &mut BuzzerIo) {
    io.tone.stop(buzzer.id);
}

fn pause_note(buzzer: &mut BuzzerData, io: &mut BuzzerIo) {
    io.tone.stop(buzzer.id);
}

fn stop_note(buzzer: &mut BuzzerData, io: &mut BuzzerIo) {
    io.tone.stop(buzzer.id);
    buzzer.note_index = 0;
}

fn end_melody(buzzer: &mut BuzzerData, io: &mut BuzzerIo) {
    io.tone.stop(buzzer.id);
    buzzer.note_index = 0;
    buzzer.user_action = UserAction::Stop;
}

fn build_table() -> Result<BuzzerTable, BuildError> {
    use BuzzerState::*;

    let wants = |action: UserAction| Guard::new(move |b: &BuzzerData, _: &BuzzerIo| b.wants(action));
    let ready_to_play = || {
        Guard::new(|b: &BuzzerData, _: &BuzzerIo| b.melody.is_some() && b.wants(UserAction::Play))
    };

    TransitionTable::new(
        "buzzer",
        vec![
            Transition::new(WaitStart, ready_to_play(), WaitNote).with_action(start_note),
            Transition::new(
                WaitStart,
                Guard::new(|b: &BuzzerData, _: &BuzzerIo| {
                    b.melody.is_none() && b.wants(UserAction::Play)
                }),
                WaitMelody,
            ),
            Transition::new(
                WaitNote,
                Guard::new(|b: &BuzzerData, io: &BuzzerIo| io.tone.note_expired(b.id)),
                PlayNote,
            )
            .with_action(end_note),
            Transition::new(PlayNote, wants(UserAction::Stop), WaitStart).with_action(stop_note),
            Transition::new(PlayNote, wants(UserAction::Pause), PauseNote)
                .with_action(pause_note),
            Transition::new(
                PlayNote,
                Guard::new(|b: &BuzzerData, _: &BuzzerIo| b.note_index >= b.melody_len()),
                WaitStart,
            )
            .with_action(end_melody),
            Transition::new(
                PlayNote,
                Guard::new(|b: &BuzzerData, _: &BuzzerIo| {
                    b.note_index < b.melody_len() && b.wants(UserAction::Play)
                }),
                WaitNote,
            )
            .with_action(start_note),
            Transition::new(PauseNote, wants(UserAction::Play), PlayNote),
            Transition::new(PauseNote, wants(UserAction::Stop), WaitStart).with_action(stop_note),
            Transition::new(WaitMelody, ready_to_play(), WaitNote).with_action(start_note),
            Transition::new(WaitMelody, wants(UserAction::Stop), WaitStart),
        ],
    )
}

fn table() -> Arc<BuzzerTable> {
    static TABLE: OnceLock<Arc<BuzzerTable>> = OnceLock::new();
    TABLE
        .get_or_init(|| Arc::new(build_table().expect("buzzer table is well formed")))
        .clone()
}

/// Buzzer machine playing one melody at a time.
///
/// The melody is shared, never copied. Each note is programmed with its
/// nominal duration divided by the player speed, so speeds above 1 play
/// faster.
pub struct BuzzerFsm {
    fsm: Fsm<BuzzerState, BuzzerData, BuzzerIo>,
    data: BuzzerData,
    io: BuzzerIo,
}

impl BuzzerFsm {
    pub fn new(id: usize, tone: Arc<dyn ToneGenerator>) -> Self {
        Self {
            fsm: Fsm::new(table()),
            data: BuzzerData {
                id,
                melody: None,
                note_index: 0,
                user_action: UserAction::Stop,
                player_speed: DEFAULT_SPEED,
            },
            io: BuzzerIo { tone },
        }
    }

    pub fn fire(&mut self) -> Option<BuzzerState> {
        self.fsm.fire(&mut self.data, &mut self.io)
    }

    pub fn state(&self) -> BuzzerState {
        self.fsm.current_state()
    }

    pub fn id(&self) -> usize {
        self.data.id
    }

    /// Swap the melody. The cursor is left where it is; stop first to start
    /// the new melody from its first note.
    pub fn set_melody(&mut self, melody: Arc<Melody>) {
        self.data.melody = Some(melody);
    }

    pub fn melody(&self) -> Option<&Arc<Melody>> {
        self.data.melody.as_ref()
    }

    /// Set the player speed. Values that are not strictly positive are
    /// ignored.
    pub fn set_speed(&mut self, speed: f64) {
        if speed > 0.0 && speed.is_finite() {
            self.data.player_speed = speed;
        } else {
            warn!(buzzer = self.data.id, speed, "ignoring non-positive player speed");
        }
    }

    pub fn speed(&self) -> f64 {
        self.data.player_speed
    }

    /// Request play, pause or stop. Stopping rewinds the melody.
    pub fn set_action(&mut self, action: UserAction) {
        if action == UserAction::Stop {
            self.data.note_index = 0;
        }
        self.data.user_action = action;
    }

    pub fn action(&self) -> UserAction {
        self.data.user_action
    }

    /// Index of the next note to be played.
    pub fn note_index(&self) -> usize {
        self.data.note_index
    }

    /// Whether playback is requested or paused.
    pub fn check_activity(&self) -> bool {
        self.data.user_action != UserAction::Stop
    }
}

impl std::fmt::Debug for BuzzerFsm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuzzerFsm")
            .field("state", &self.state())
            .field("melody", &self.data.melody.as_ref().map(|m| m.name()))
            .field("note_index", &self.data.note_index)
            .field("user_action", &self.data.user_action)
            .field("player_speed", &self.data.player_speed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::SimBoard;
    use crate::melody::library;
    use approx::assert_relative_eq;

    fn setup() -> (Arc<SimBoard>, BuzzerFsm) {
        let board = Arc::new(SimBoard::default());
        let buzzer = BuzzerFsm::new(0, board.clone());
        (board, buzzer)
    }

    fn three_notes() -> Arc<Melody> {
        Arc::new(Melody::new("abc", vec![440.0, 494.0, 523.0], vec![100, 200, 300]).unwrap())
    }

    fn run(board: &SimBoard, buzzer: &mut BuzzerFsm, ms: u32) {
        for _ in 0..ms {
            board.advance_ms(1);
            buzzer.fire();
        }
    }

    #[test]
    fn idle_until_play() {
        let (board, mut buzzer) = setup();
        buzzer.set_melody(three_notes());
        run(&board, &mut buzzer, 10);

        assert_eq!(buzzer.state(), BuzzerState::WaitStart);
        assert!(!buzzer.check_activity());
        assert!(board.played_notes(0).is_empty());
    }

    #[test]
    fn plays_every_note_then_stops() {
        let (board, mut buzzer) = setup();
        buzzer.set_melody(three_notes());
        buzzer.set_action(UserAction::Play);

        buzzer.fire();
        assert_eq!(buzzer.state(), BuzzerState::WaitNote);
        assert_eq!(buzzer.note_index(), 1);

        run(&board, &mut buzzer, 700);

        assert_eq!(buzzer.state(), BuzzerState::WaitStart);
        assert_eq!(buzzer.action(), UserAction::Stop);
        assert_eq!(buzzer.note_index(), 0);
        assert_eq!(board.tone_frequency(0), 0.0);

        let played: Vec<_> = board.played_notes(0).iter().map(|n| n.duration_ms).collect();
        assert_eq!(played, vec![100, 200, 300]);
    }

    #[test]
    fn note_index_advances_once_per_expiry() {
        let (board, mut buzzer) = setup();
        buzzer.set_melody(three_notes());
        buzzer.set_action(UserAction::Play);
        buzzer.fire();

        run(&board, &mut buzzer, 100);
        assert_eq!(buzzer.state(), BuzzerState::PlayNote);
        assert_eq!(buzzer.note_index(), 1);

        run(&board, &mut buzzer, 1);
        assert_eq!(buzzer.note_index(), 2);
        run(&board, &mut buzzer, 201);
        assert_eq!(buzzer.note_index(), 3);
    }

    #[test]
    fn pause_keeps_position_and_resume_continues() {
        let (board, mut buzzer) = setup();
        buzzer.set_melody(three_notes());
        buzzer.set_action(UserAction::Play);
        buzzer.fire();

        buzzer.set_action(UserAction::Pause);
        run(&board, &mut buzzer, 150);
        assert_eq!(buzzer.state(), BuzzerState::PauseNote);
        assert_eq!(buzzer.note_index(), 1);
        assert!(buzzer.check_activity());

        buzzer.set_action(UserAction::Play);
        buzzer.fire();
        buzzer.fire();
        assert_eq!(buzzer.state(), BuzzerState::WaitNote);
        assert_eq!(buzzer.note_index(), 2);

        let frequencies: Vec<_> = board.played_notes(0).iter().map(|n| n.frequency_hz).collect();
        assert_eq!(frequencies, vec![440.0, 494.0]);
    }

    #[test]
    fn stop_rewinds() {
        let (board, mut buzzer) = setup();
        buzzer.set_melody(three_notes());
        buzzer.set_action(UserAction::Play);
        buzzer.fire();
        run(&board, &mut buzzer, 150);

        buzzer.set_action(UserAction::Stop);
        assert_eq!(buzzer.note_index(), 0);
        run(&board, &mut buzzer, 200);

        assert_eq!(buzzer.state(), BuzzerState::WaitStart);
        assert_eq!(board.played_notes(0).len(), 2);
    }

    #[test]
    fn play_without_melody_waits_for_one() {
        let (board, mut buzzer) = setup();
        buzzer.set_action(UserAction::Play);
        buzzer.fire();
        assert_eq!(buzzer.state(), BuzzerState::WaitMelody);

        buzzer.set_melody(Arc::new(library::SCALE.clone()));
        buzzer.fire();
        assert_eq!(buzzer.state(), BuzzerState::WaitNote);
        assert_eq!(board.played_notes(0)[0].frequency_hz, library::SCALE.frequencies()[0]);
    }

    #[test]
    fn stop_leaves_wait_melody() {
        let (_, mut buzzer) = setup();
        buzzer.set_action(UserAction::Play);
        buzzer.fire();
        buzzer.set_action(UserAction::Stop);
        buzzer.fire();
        assert_eq!(buzzer.state(), BuzzerState::WaitStart);
    }

    #[test]
    fn speed_divides_note_duration() {
        let (board, mut buzzer) = setup();
        buzzer.set_melody(three_notes());
        buzzer.set_speed(2.0);
        buzzer.set_action(UserAction::Play);
        buzzer.fire();

        assert_relative_eq!(buzzer.speed(), 2.0);
        assert_eq!(board.played_notes(0)[0].duration_ms, 50);
    }

    #[test]
    fn non_positive_speed_is_ignored() {
        let (_, mut buzzer) = setup();
        buzzer.set_speed(0.0);
        buzzer.set_speed(-3.0);
        buzzer.set_speed(f64::NAN);
        assert_relative_eq!(buzzer.speed(), DEFAULT_SPEED);
    }
}
