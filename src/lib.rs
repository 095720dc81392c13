//! Jukebox FSM: cooperative, table-driven state machines for a jukebox.
//!
//! Every device (button, buzzer, serial port, LED) and the jukebox itself is
//! a finite-state machine described by a static transition table. Each cycle
//! the composition root fires every machine once; a machine evaluates the
//! transitions leaving its current state in order and takes the first whose
//! guard holds.
//!
//! # Modules
//!
//! - [`core`]: the generic engine (`State`, `Guard`, `Transition`, `Fsm`)
//! - [`builder`]: fluent construction of transitions and tables
//! - [`hw`]: hardware traits and a simulated board
//! - [`devices`]: button, buzzer, usart and LED machines
//! - [`melody`]: melody data and the built-in library
//! - [`jukebox`]: the orchestrator and its serial command language
//! - [`config`]: validated jukebox configuration
//! - [`system`]: the composition root
//!
//! # Example
//!
//! ```rust
//! use jukebox_fsm::config::JukeboxConfig;
//! use jukebox_fsm::hw::SimBoard;
//! use jukebox_fsm::system::{Hardware, JukeboxSystem};
//! use std::sync::Arc;
//!
//! let board = Arc::new(SimBoard::default());
//! let mut system =
//!     JukeboxSystem::new(&JukeboxConfig::default(), Hardware::from_board(board.clone())).unwrap();
//!
//! // Hold the button long enough to switch on.
//! board.press_button(0);
//! for _ in 0..1200 {
//!     board.advance_ms(1);
//!     system.run_cycle();
//! }
//! board.release_button(0);
//! board.advance_ms(1);
//! system.run_cycle();
//!
//! assert!(system.jukebox().is_powered());
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod devices;
pub mod hw;
pub mod jukebox;
pub mod melody;
pub mod system;

// Re-export commonly used types
pub use builder::{BuildError, TableBuilder, TransitionBuilder};
pub use config::{ConfigError, JukeboxConfig};
pub use crate::core::{Fsm, Guard, State, Transition, TransitionTable};
pub use jukebox::{Jukebox, JukeboxState};
pub use system::{Hardware, JukeboxSystem};
