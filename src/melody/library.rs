//! Built-in melodies.

use super::notes::*;
use super::Melody;

pub static SCALE: Melody = Melody::from_static(
    "scale",
    &[C4, D4, E4, F4, G4, A4, B4, C5],
    &[250, 250, 250, 250, 250, 250, 250, 250],
);

pub static TETRIS: Melody = Melody::from_static(
    "tetris",
    &[
        E5, B4, C5, D5, C5, B4, A4, A4, C5, E5, D5, C5, B4, C5, D5, E5, C5, A4, A4, A4, B4, C5, D5,
        F4, A5, G5, F5, E5, C5, E5, D5, C5, B4, B4, A4, D5, E5, C5, A4, A4,
    ],
    &[
        400, 200, 200, 400, 200, 200, 400, 200, 200, 400, 200, 200, 600, 200, 400, 400, 400, 400,
        200, 200, 200, 200, 600, 200, 400, 200, 200, 600, 200, 400, 200, 200, 400, 200, 200, 400,
        400, 400, 400, 400,
    ],
);

pub static HAPPY_BIRTHDAY: Melody = Melody::from_static(
    "happy_birthday",
    &[
        C4, C4, D4, C4, F4, E4, C4, C4, D4, C4, G4, F4, C4, C4, C5, A4, F4, E4, D4, AS4, AS4, A4,
        F4, G4, F4,
    ],
    &[
        300, 100, 400, 400, 400, 800, 300, 100, 400, 400, 400, 800, 300, 100, 400, 400, 400, 400,
        400, 300, 100, 400, 400, 400, 800,
    ],
);

pub static AVE_MARIA: Melody = Melody::from_static(
    "ave_maria",
    &[
        E5, D5, C5, D5, C5, E5, E5, D5, C5, D5, C5, E5, D5, C5, D5, E5, F5, F5, E5, C5, D5, C5, E5,
        D5, C5, D5, C5, E5, E5, D5, C5, D5, C5, E5, D5, C5, D5, E5, F5, F5, E5, C5, D5, C5,
    ],
    &[
        200, 200, 200, 200, 400, 400, 200, 200, 200, 200, 600, 200, 200, 200, 200, 400, 400, 200,
        200, 200, 400, 400, 200, 200, 200, 200, 400, 400, 200, 200, 200, 200, 600, 200, 200, 200,
        200, 400, 400, 200, 200, 200, 400, 400,
    ],
);

pub static ANTHEM: Melody = Melody::from_static(
    "anthem",
    &[
        C4, E4, C4, F4, C4, E4, D4, C4, F4, F4, C4, E4, G4, C3, G4, A4, G4, F4, D3, D3, C3, E3, C3,
        F3, C3, E3, D3, C3, F3, F3, C3, E3, C3, F3, C3, E3, D3, C3, D3, C4, E4, C4, F4, C4, E4, D4,
        C4, F4, F4, C4, E4, G4, C3, G4, A4, G4, F4, D3, D3, C3, E3, B4, D3, A4, C3, B4, A4, F3, E3,
        C3, A4, C3,
    ],
    // 100 eighth, 200 quarter, 300 dotted quarter, 400 half
    &[
        100, 300, 100, 300, 100, 100, 100, 100, 200, 200, 100, 300, 100, 300, 100, 100, 100, 100,
        200, 200, 100, 300, 100, 300, 100, 100, 100, 100, 200, 200, 100, 300, 100, 300, 100, 100,
        100, 100, 400, 100, 300, 100, 300, 100, 100, 100, 100, 200, 200, 100, 300, 100, 300, 100,
        100, 100, 100, 200, 200, 100, 300, 100, 300, 100, 100, 100, 100, 600, 100, 100, 100, 100,
    ],
);

/// Every built-in melody, in default playlist order.
pub fn all() -> [&'static Melody; 5] {
    [&SCALE, &TETRIS, &HAPPY_BIRTHDAY, &AVE_MARIA, &ANTHEM]
}

/// Look a built-in melody up by name.
pub fn find(name: &str) -> Option<&'static Melody> {
    all().into_iter().find(|m| m.name() == name)
}
