//! Peripheral machines.
//!
//! Each device embeds an [`Fsm`](crate::core::Fsm) over a table shared by
//! every instance of that device, owns its timing and buffer data, and holds
//! handles to the hardware collaborators it reads and drives.

pub mod button;
pub mod buzzer;
pub mod led;
pub mod usart;

pub use button::{ButtonFsm, ButtonState};
pub use buzzer::{BuzzerFsm, BuzzerState, UserAction};
pub use led::{LedFsm, LedSignals, LedState};
pub use usart::{UsartFsm, UsartState};
