//! Hardware collaborators consumed by the device machines.
//!
//! Every method takes `&self`: on a target the state behind these traits is
//! written by interrupt handlers and read by the cooperative loop, so
//! implementations keep it in atomics or short critical sections.
//! Peripherals are addressed by a small integer id.

mod sim;

pub use sim::{PlayedNote, SimBoard};

/// Capacity of a serial input buffer.
pub const USART_INPUT_BUFFER_LEN: usize = 10;
/// Capacity of a serial output buffer.
pub const USART_OUTPUT_BUFFER_LEN: usize = 100;
/// Value of an unused buffer byte.
pub const EMPTY_BYTE: u8 = 0;
/// Line terminator on the serial link.
pub const END_BYTE: u8 = b'\n';

/// Whether tick `a` is strictly later than tick `b`, across wrap-around.
pub fn tick_after(a: u32, b: u32) -> bool {
    (a.wrapping_sub(b) as i32) > 0
}

/// Monotonic millisecond tick source.
pub trait Clock: Send + Sync {
    /// Current tick. Wraps around after `u32::MAX`.
    fn now_ms(&self) -> u32;
}

/// Digital inputs with an interrupt-maintained pressed flag.
pub trait ButtonInput: Send + Sync {
    fn is_pressed(&self, id: usize) -> bool;
}

/// PWM tone output with a one-shot note timer.
pub trait ToneGenerator: Send + Sync {
    /// Set the PWM frequency. `0.0` silences the output.
    fn set_note_frequency(&self, id: usize, frequency_hz: f64);

    /// Arm the note timer. Clears the expiry flag.
    fn set_note_duration(&self, id: usize, duration_ms: u32);

    /// Whether the note timer armed last has expired.
    fn note_expired(&self, id: usize) -> bool;

    /// Disable both the PWM output and the note timer.
    fn stop(&self, id: usize);
}

/// Interrupt-driven serial port with fixed-size line buffers.
pub trait SerialLink: Send + Sync {
    /// A full line has been received.
    fn rx_done(&self, id: usize) -> bool;

    /// Copy the received bytes into `buf`. Unused bytes are [`EMPTY_BYTE`].
    fn read_input(&self, id: usize, buf: &mut [u8]);

    /// Empty the receive buffer and clear the completion flag.
    fn reset_input(&self, id: usize);

    /// Copy `data` into the transmit buffer, truncating to its capacity.
    fn write_output(&self, id: usize, data: &[u8]);

    /// Empty the transmit buffer and clear the completion flag.
    fn reset_output(&self, id: usize);

    /// The transmit data register can take a byte.
    fn tx_ready(&self, id: usize) -> bool;

    /// Put the first buffered byte on the wire.
    fn start_write(&self, id: usize);

    /// The whole line in the transmit buffer has been sent.
    fn tx_done(&self, id: usize) -> bool;

    fn enable_rx_interrupt(&self, id: usize);
    fn disable_rx_interrupt(&self, id: usize);
    fn enable_tx_interrupt(&self, id: usize);
    fn disable_tx_interrupt(&self, id: usize);
}

/// Digital outputs driving indicator LEDs.
pub trait LedOutput: Send + Sync {
    fn turn_on(&self, id: usize);
    fn turn_off(&self, id: usize);
    fn toggle(&self, id: usize);
}

/// Low-power entry.
pub trait PowerControl: Send + Sync {
    /// Sleep until the next interrupt.
    fn sleep(&self);
}
