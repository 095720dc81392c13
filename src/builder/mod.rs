//! Builder API for ergonomic transition table construction.
//!
//! This module provides fluent builders and macros for declaring the
//! transition tables of the device machines with minimal boilerplate.

pub mod error;
pub mod macros;
pub mod table;
pub mod transition;

pub use error::BuildError;
pub use table::TableBuilder;
pub use transition::TransitionBuilder;

use crate::core::{Guard, State, Transition};

/// Create an unconditional transition without an action.
///
/// # Example
///
/// ```
/// use jukebox_fsm::builder::simple_transition;
/// use jukebox_fsm::state_enum;
///
/// state_enum! {
///     enum MyState {
///         Start,
///         End,
///     }
/// }
///
/// let transition = simple_transition::<MyState, (), ()>(MyState::Start, MyState::End);
/// assert!(transition.can_execute(MyState::Start, &(), &()));
/// ```
pub fn simple_transition<S, M, E>(from: S, to: S) -> Transition<S, M, E>
where
    S: State,
{
    Transition::new(from, Guard::always(), to)
}

/// Create a transition guarded by a predicate, without an action.
///
/// # Example
///
/// ```
/// use jukebox_fsm::builder::guarded_transition;
/// use jukebox_fsm::state_enum;
///
/// state_enum! {
///     enum Lamp {
///         Off,
///         On,
///     }
/// }
///
/// let transition = guarded_transition(Lamp::Off, Lamp::On, |_: &(), switch: &bool| *switch);
/// assert!(transition.can_execute(Lamp::Off, &(), &true));
/// ```
pub fn guarded_transition<S, M, E, F>(from: S, to: S, guard: F) -> Transition<S, M, E>
where
    S: State,
    F: Fn(&M, &E) -> bool + Send + Sync + 'static,
{
    Transition::new(from, Guard::new(guard), to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
    enum TestState {
        Start,
        Middle,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Start => "Start",
                Self::Middle => "Middle",
            }
        }
    }

    #[test]
    fn simple_transition_builds() {
        let transition = simple_transition::<TestState, (), ()>(TestState::Start, TestState::Middle);

        assert_eq!(transition.from, TestState::Start);
        assert_eq!(transition.to, TestState::Middle);
        assert!(transition.can_execute(TestState::Start, &(), &()));
        assert!(!transition.can_execute(TestState::Middle, &(), &()));
    }

    #[test]
    fn guarded_transition_respects_guard() {
        let transition =
            guarded_transition(TestState::Start, TestState::Middle, |n: &u8, _: &()| *n > 2);

        assert!(transition.can_execute(TestState::Start, &3, &()));
        assert!(!transition.can_execute(TestState::Start, &1, &()));
        assert!(transition.action.is_none());
    }
}
