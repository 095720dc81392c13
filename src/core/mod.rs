//! Generic machine engine.
//!
//! This module contains the table-driven core every device is built on:
//! - State definitions via the `State` trait
//! - Guard predicates over machine data and environment
//! - Transitions and non-empty transition tables
//! - The `Fsm` evaluator with first-match-wins semantics

mod guard;
mod machine;
mod state;
mod transition;

pub use guard::Guard;
pub use machine::Fsm;
pub use state::State;
pub use transition::{Action, Transition, TransitionTable};
