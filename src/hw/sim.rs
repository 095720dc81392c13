//! In-memory board implementing every hardware collaborator.
//!
//! `SimBoard` stands in for the microcontroller: [`SimBoard::advance_ms`]
//! plays the part of the SysTick, note-timer and serial TX interrupts, and
//! [`SimBoard::receive_line`] the serial RX interrupt. It is shared behind an
//! `Arc` between the device machines and the code driving the simulation.

use crate::hw::{
    tick_after, ButtonInput, Clock, LedOutput, PowerControl, SerialLink, ToneGenerator,
    EMPTY_BYTE, END_BYTE, USART_INPUT_BUFFER_LEN, USART_OUTPUT_BUFFER_LEN,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

/// A note programmed on a tone generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayedNote {
    pub frequency_hz: f64,
    pub duration_ms: u32,
    pub started_at_ms: u32,
}

#[derive(Debug, Default)]
struct ToneChannel {
    frequency_hz: f64,
    deadline: Option<u32>,
    note_end: bool,
    history: Vec<PlayedNote>,
}

#[derive(Debug)]
struct SerialChannel {
    input: [u8; USART_INPUT_BUFFER_LEN],
    i_idx: usize,
    read_complete: bool,
    rx_enabled: bool,
    output: [u8; USART_OUTPUT_BUFFER_LEN],
    writing: bool,
    write_complete: bool,
    tx_enabled: bool,
    tx_ready: bool,
    transmitted: Vec<String>,
}

impl Default for SerialChannel {
    fn default() -> Self {
        Self {
            input: [EMPTY_BYTE; USART_INPUT_BUFFER_LEN],
            i_idx: 0,
            read_complete: false,
            rx_enabled: false,
            output: [EMPTY_BYTE; USART_OUTPUT_BUFFER_LEN],
            writing: false,
            write_complete: false,
            tx_enabled: false,
            tx_ready: true,
            transmitted: Vec::new(),
        }
    }
}

impl SerialChannel {
    /// Send the buffered line in one go, as the TX interrupt would byte by byte.
    fn drain_output(&mut self) {
        let len = self
            .output
            .iter()
            .position(|&b| b == END_BYTE || b == EMPTY_BYTE)
            .unwrap_or(USART_OUTPUT_BUFFER_LEN);
        let line = String::from_utf8_lossy(&self.output[..len]).into_owned();

        self.transmitted.push(line);
        self.writing = false;
        self.write_complete = true;
        self.tx_enabled = false;
    }
}

/// Simulated board with buttons, buzzers, serial ports and LEDs.
#[derive(Debug)]
pub struct SimBoard {
    millis: AtomicU32,
    buttons: Vec<AtomicBool>,
    tones: Vec<Mutex<ToneChannel>>,
    usarts: Vec<Mutex<SerialChannel>>,
    leds: Vec<AtomicBool>,
    sleeps: AtomicUsize,
}

impl SimBoard {
    /// Create a board with the given number of each peripheral.
    pub fn new(buttons: usize, buzzers: usize, usarts: usize, leds: usize) -> Self {
        Self {
            millis: AtomicU32::new(0),
            buttons: (0..buttons).map(|_| AtomicBool::new(false)).collect(),
            tones: (0..buzzers).map(|_| Mutex::default()).collect(),
            usarts: (0..usarts).map(|_| Mutex::default()).collect(),
            leds: (0..leds).map(|_| AtomicBool::new(false)).collect(),
            sleeps: AtomicUsize::new(0),
        }
    }

    /// Let `ms` milliseconds pass, running the timer and TX interrupts each tick.
    pub fn advance_ms(&self, ms: u32) {
        for _ in 0..ms {
            let now = self.millis.fetch_add(1, Ordering::SeqCst).wrapping_add(1);

            for tone in &self.tones {
                let mut tone = tone.lock();
                if let Some(deadline) = tone.deadline {
                    if !tick_after(deadline, now) {
                        tone.deadline = None;
                        tone.note_end = true;
                    }
                }
            }

            for usart in &self.usarts {
                let mut usart = usart.lock();
                if usart.writing && usart.tx_enabled {
                    usart.drain_output();
                }
            }
        }
    }

    /// Set the tick counter directly.
    pub fn set_millis(&self, ms: u32) {
        self.millis.store(ms, Ordering::SeqCst);
    }

    pub fn press_button(&self, id: usize) {
        if let Some(button) = self.buttons.get(id) {
            button.store(true, Ordering::SeqCst);
        }
    }

    pub fn release_button(&self, id: usize) {
        if let Some(button) = self.buttons.get(id) {
            button.store(false, Ordering::SeqCst);
        }
    }

    /// Deliver `line` followed by the end-of-line byte to serial port `id`.
    ///
    /// Bytes are dropped while the RX interrupt is disabled, and bytes past
    /// the input capacity are dropped until the end of the line.
    pub fn receive_line(&self, id: usize, line: &str) {
        let Some(usart) = self.usarts.get(id) else {
            return;
        };
        let mut usart = usart.lock();

        for byte in line.bytes().chain(std::iter::once(END_BYTE)) {
            if !usart.rx_enabled {
                return;
            }
            if byte == END_BYTE {
                usart.read_complete = true;
                usart.i_idx = 0;
            } else if usart.i_idx < USART_INPUT_BUFFER_LEN {
                let idx = usart.i_idx;
                usart.input[idx] = byte;
                usart.i_idx += 1;
            }
        }
    }

    /// Lines fully transmitted on serial port `id` since the last call.
    pub fn take_transmitted(&self, id: usize) -> Vec<String> {
        self.usarts
            .get(id)
            .map(|usart| std::mem::take(&mut usart.lock().transmitted))
            .unwrap_or_default()
    }

    /// Make the transmit data register report busy (or ready again).
    pub fn set_tx_ready(&self, id: usize, ready: bool) {
        if let Some(usart) = self.usarts.get(id) {
            usart.lock().tx_ready = ready;
        }
    }

    pub fn rx_enabled(&self, id: usize) -> bool {
        self.usarts
            .get(id)
            .map(|usart| usart.lock().rx_enabled)
            .unwrap_or(false)
    }

    /// Every note programmed on buzzer `id`, oldest first.
    pub fn played_notes(&self, id: usize) -> Vec<PlayedNote> {
        self.tones
            .get(id)
            .map(|tone| tone.lock().history.clone())
            .unwrap_or_default()
    }

    /// Current PWM frequency of buzzer `id`; `0.0` when silent.
    pub fn tone_frequency(&self, id: usize) -> f64 {
        self.tones
            .get(id)
            .map(|tone| tone.lock().frequency_hz)
            .unwrap_or(0.0)
    }

    pub fn led_is_on(&self, id: usize) -> bool {
        self.leds
            .get(id)
            .map(|led| led.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    /// Number of times the board was put to sleep.
    pub fn sleep_count(&self) -> usize {
        self.sleeps.load(Ordering::SeqCst)
    }
}

impl Default for SimBoard {
    /// One button, one buzzer, one serial port and two LEDs.
    fn default() -> Self {
        Self::new(1, 1, 1, 2)
    }
}

impl Clock for SimBoard {
    fn now_ms(&self) -> u32 {
        self.millis.load(Ordering::SeqCst)
    }
}

impl ButtonInput for SimBoard {
    fn is_pressed(&self, id: usize) -> bool {
        self.buttons
            .get(id)
            .map(|button| button.load(Ordering::SeqCst))
            .unwrap_or(false)
    }
}

impl ToneGenerator for SimBoard {
    fn set_note_frequency(&self, id: usize, frequency_hz: f64) {
        if let Some(tone) = self.tones.get(id) {
            tone.lock().frequency_hz = frequency_hz;
        }
    }

    fn set_note_duration(&self, id: usize, duration_ms: u32) {
        let now = self.now_ms();
        if let Some(tone) = self.tones.get(id) {
            let mut tone = tone.lock();
            tone.deadline = Some(now.wrapping_add(duration_ms));
            tone.note_end = false;
            let frequency_hz = tone.frequency_hz;
            tone.history.push(PlayedNote {
                frequency_hz,
                duration_ms,
                started_at_ms: now,
            });
        }
    }

    fn note_expired(&self, id: usize) -> bool {
        self.tones
            .get(id)
            .map(|tone| tone.lock().note_end)
            .unwrap_or(false)
    }

    fn stop(&self, id: usize) {
        if let Some(tone) = self.tones.get(id) {
            let mut tone = tone.lock();
            tone.frequency_hz = 0.0;
            tone.deadline = None;
            tone.note_end = false;
        }
    }
}

impl SerialLink for SimBoard {
    fn rx_done(&self, id: usize) -> bool {
        self.usarts
            .get(id)
            .map(|usart| usart.lock().read_complete)
            .unwrap_or(false)
    }

    fn read_input(&self, id: usize, buf: &mut [u8]) {
        if let Some(usart) = self.usarts.get(id) {
            let usart = usart.lock();
            let len = buf.len().min(USART_INPUT_BUFFER_LEN);
            buf[..len].copy_from_slice(&usart.input[..len]);
            buf[len..].fill(EMPTY_BYTE);
        }
    }

    fn reset_input(&self, id: usize) {
        if let Some(usart) = self.usarts.get(id) {
            let mut usart = usart.lock();
            usart.input.fill(EMPTY_BYTE);
            usart.i_idx = 0;
            usart.read_complete = false;
        }
    }

    fn write_output(&self, id: usize, data: &[u8]) {
        if let Some(usart) = self.usarts.get(id) {
            let mut usart = usart.lock();
            let len = data.len().min(USART_OUTPUT_BUFFER_LEN);
            usart.output[..len].copy_from_slice(&data[..len]);
            usart.output[len..].fill(EMPTY_BYTE);
        }
    }

    fn reset_output(&self, id: usize) {
        if let Some(usart) = self.usarts.get(id) {
            let mut usart = usart.lock();
            usart.output.fill(EMPTY_BYTE);
            usart.writing = false;
            usart.write_complete = false;
        }
    }

    fn tx_ready(&self, id: usize) -> bool {
        self.usarts
            .get(id)
            .map(|usart| usart.lock().tx_ready)
            .unwrap_or(false)
    }

    fn start_write(&self, id: usize) {
        if let Some(usart) = self.usarts.get(id) {
            let mut usart = usart.lock();
            usart.writing = true;
            usart.write_complete = false;
        }
    }

    fn tx_done(&self, id: usize) -> bool {
        self.usarts
            .get(id)
            .map(|usart| usart.lock().write_complete)
            .unwrap_or(false)
    }

    fn enable_rx_interrupt(&self, id: usize) {
        if let Some(usart) = self.usarts.get(id) {
            usart.lock().rx_enabled = true;
        }
    }

    fn disable_rx_interrupt(&self, id: usize) {
        if let Some(usart) = self.usarts.get(id) {
            usart.lock().rx_enabled = false;
        }
    }

    fn enable_tx_interrupt(&self, id: usize) {
        if let Some(usart) = self.usarts.get(id) {
            usart.lock().tx_enabled = true;
        }
    }

    fn disable_tx_interrupt(&self, id: usize) {
        if let Some(usart) = self.usarts.get(id) {
            usart.lock().tx_enabled = false;
        }
    }
}

impl LedOutput for SimBoard {
    fn turn_on(&self, id: usize) {
        if let Some(led) = self.leds.get(id) {
            led.store(true, Ordering::SeqCst);
        }
    }

    fn turn_off(&self, id: usize) {
        if let Some(led) = self.leds.get(id) {
            led.store(false, Ordering::SeqCst);
        }
    }

    fn toggle(&self, id: usize) {
        if let Some(led) = self.leds.get(id) {
            led.fetch_xor(true, Ordering::SeqCst);
        }
    }
}

impl PowerControl for SimBoard {
    fn sleep(&self) {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
    }
}
