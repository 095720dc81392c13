//! Equal-tempered note frequencies in Hz (A4 = 440 Hz).

/// Silence.
pub const REST: f64 = 0.0;

pub const C3: f64 = 130.81;
pub const D3: f64 = 146.83;
pub const E3: f64 = 164.81;
pub const F3: f64 = 174.61;
pub const G3: f64 = 196.00;
pub const A3: f64 = 220.00;
pub const B3: f64 = 246.94;

pub const C4: f64 = 261.63;
pub const D4: f64 = 293.66;
pub const E4: f64 = 329.63;
pub const F4: f64 = 349.23;
pub const G4: f64 = 392.00;
pub const A4: f64 = 440.00;
/// A sharp 4.
pub const AS4: f64 = 466.16;
pub const B4: f64 = 493.88;

pub const C5: f64 = 523.25;
pub const D5: f64 = 587.33;
pub const E5: f64 = 659.26;
pub const F5: f64 = 698.46;
pub const G5: f64 = 783.99;
pub const A5: f64 = 880.00;
