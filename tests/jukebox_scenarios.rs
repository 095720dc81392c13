//! End-to-end scenarios on the complete jukebox system.

use approx::assert_relative_eq;
use jukebox_fsm::config::JukeboxConfig;
use jukebox_fsm::devices::{BuzzerState, UserAction};
use jukebox_fsm::hw::SimBoard;
use jukebox_fsm::jukebox::JukeboxState;
use jukebox_fsm::system::{
    Hardware, JukeboxSystem, BUTTON_ID, PLAYING_LED_ID, POWER_LED_ID, USART_ID,
};
use std::sync::Arc;

struct Bench {
    board: Arc<SimBoard>,
    system: JukeboxSystem,
}

impl Bench {
    fn new(config: JukeboxConfig) -> Self {
        let board = Arc::new(SimBoard::default());
        let system = JukeboxSystem::new(&config, Hardware::from_board(board.clone())).unwrap();
        Self { board, system }
    }

    fn run(&mut self, ms: u32) {
        for _ in 0..ms {
            self.board.advance_ms(1);
            self.system.run_cycle();
        }
    }

    fn state(&self) -> JukeboxState {
        self.system.jukebox().state()
    }

    fn press(&mut self, ms: u32) {
        self.board.press_button(BUTTON_ID);
        self.run(ms);
        self.board.release_button(BUTTON_ID);
        self.run(1);
    }

    fn send(&mut self, line: &str) -> Vec<String> {
        self.board.receive_line(USART_ID, line);
        self.run(5);
        self.board.take_transmitted(USART_ID)
    }

    /// Switch on and let the intro play out.
    fn power_on(&mut self) {
        self.press(1200);
        assert_eq!(self.state(), JukeboxState::StartUp);
        for _ in 0..5000 {
            if self.state() != JukeboxState::StartUp {
                break;
            }
            self.run(1);
        }
        assert_eq!(self.state(), JukeboxState::WaitCommand);
    }
}

#[test]
fn power_on_plays_intro_then_loads_first_slot() {
    let mut bench = Bench::new(JukeboxConfig::default());
    bench.run(10);
    assert_eq!(bench.state(), JukeboxState::SleepWhileOff);

    bench.power_on();
    let status = bench.system.status();
    assert_eq!(status.melody_idx, 0);
    assert_eq!(status.melody, "scale");
    assert_eq!(status.buzzer_action, UserAction::Stop);
    assert_eq!(bench.board.played_notes(0).len(), 8);
}

#[test]
fn serial_session() {
    let mut bench = Bench::new(JukeboxConfig::default());
    bench.power_on();

    assert!(bench.send("select 2").is_empty());
    assert_eq!(bench.send("info"), vec!["Playing happy_birthday".to_string()]);
    assert_eq!(
        bench.send("select 9"),
        vec!["Error: Melody not found".to_string()]
    );
    assert_eq!(bench.send("foo"), vec!["Error: Command not found".to_string()]);
    assert_eq!(
        bench.send("speed"),
        vec!["Error: Invalid parameter".to_string()]
    );
    assert_eq!(bench.system.status().melody_idx, 2);
}

#[test]
fn play_uses_clamped_speed() {
    let mut bench = Bench::new(JukeboxConfig::default());
    bench.power_on();

    bench.send("speed 0.05");
    assert_relative_eq!(bench.system.status().speed, 0.1);

    bench.send("speed 2");
    let played_before = bench.board.played_notes(0).len();
    bench.send("play");

    let notes = bench.board.played_notes(0);
    assert!(notes.len() > played_before);
    // scale notes last 250 ms at speed 1
    assert_eq!(notes[played_before].duration_ms, 125);
    assert_eq!(bench.system.status().buzzer_state, BuzzerState::WaitNote);
}

#[test]
fn leds_follow_playback_and_power() {
    let mut bench = Bench::new(JukeboxConfig::default());
    bench.run(2);
    assert!(!bench.board.led_is_on(POWER_LED_ID));

    bench.power_on();
    assert!(bench.board.led_is_on(POWER_LED_ID));
    assert!(!bench.board.led_is_on(PLAYING_LED_ID));

    bench.send("play");
    assert!(bench.board.led_is_on(PLAYING_LED_ID));
    bench.send("pause");
    assert!(bench.board.led_is_on(PLAYING_LED_ID));
    bench.send("stop");
    assert!(!bench.board.led_is_on(PLAYING_LED_ID));
}

#[test]
fn medium_press_skips_to_next_melody() {
    let mut bench = Bench::new(JukeboxConfig::default());
    bench.power_on();

    bench.press(700);
    assert_eq!(bench.system.status().melody, "tetris");
    assert_eq!(bench.system.status().buzzer_action, UserAction::Play);
}

#[test]
fn long_press_shuts_down_after_outro() {
    let mut bench = Bench::new(JukeboxConfig::default());
    bench.power_on();

    bench.press(1200);
    assert_eq!(bench.state(), JukeboxState::ShutDown);
    assert!(!bench.board.rx_enabled(USART_ID));

    bench.run(2500);
    assert!(!bench.system.jukebox().is_powered());
    assert!(!bench.board.led_is_on(POWER_LED_ID));
    assert!(bench.send("info").is_empty());
}

#[test]
fn custom_playlist_from_json() {
    let config = JukeboxConfig::from_json_str(
        r#"{
            "intro_melody": "beep",
            "playlist": ["beep", "ave_maria"],
            "melodies": [
                { "name": "beep", "frequencies": [880.0, 0.0], "durations": [50, 50] }
            ]
        }"#,
    )
    .unwrap();

    let mut bench = Bench::new(config);
    bench.power_on();
    assert_eq!(bench.send("info"), vec!["Playing beep".to_string()]);
    bench.send("next");
    assert_eq!(bench.send("info"), vec!["Playing ave_maria".to_string()]);
}
