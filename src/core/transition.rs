//! Transitions and transition tables.

use crate::builder::BuildError;
use crate::core::{Guard, State};

/// Side effect run when a transition fires.
///
/// Actions may mutate the machine data and the environment (program a
/// timer, copy a buffer, command a peer machine).
pub type Action<M, E> = Box<dyn Fn(&mut M, &mut E) + Send + Sync>;

/// A guarded move from one state to another, with an optional action.
///
/// A transition without an action is a pure state change.
pub struct Transition<S: State, M, E> {
    pub from: S,
    pub guard: Guard<M, E>,
    pub to: S,
    pub action: Option<Action<M, E>>,
}

impl<S: State, M, E> Transition<S, M, E> {
    /// Create a pure state change guarded by `guard`.
    pub fn new(from: S, guard: Guard<M, E>, to: S) -> Self {
        Self {
            from,
            guard,
            to,
            action: None,
        }
    }

    /// Attach an action to this transition.
    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut M, &mut E) + Send + Sync + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    /// Check if this transition can fire from `current`.
    pub fn can_execute(&self, current: S, model: &M, env: &E) -> bool {
        if current != self.from {
            return false;
        }

        self.guard.check(model, env)
    }
}

/// Ordered, non-empty list of transitions.
///
/// The table is the only place where a machine's behaviour is declared. Its
/// first entry's origin is the machine's initial state; an empty table cannot
/// be constructed.
pub struct TransitionTable<S: State, M, E> {
    name: &'static str,
    transitions: Vec<Transition<S, M, E>>,
}

impl<S: State, M, E> TransitionTable<S, M, E> {
    /// Create a named table.
    ///
    /// Returns [`BuildError::NoTransitions`] when `transitions` is empty.
    pub fn new(
        name: &'static str,
        transitions: Vec<Transition<S, M, E>>,
    ) -> Result<Self, BuildError> {
        if transitions.is_empty() {
            return Err(BuildError::NoTransitions);
        }

        Ok(Self { name, transitions })
    }

    /// Name used in log events.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Origin of the first transition.
    pub fn initial_state(&self) -> S {
        self.transitions[0].from
    }

    pub fn transitions(&self) -> &[Transition<S, M, E>] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// First transition, in table order, that can fire from `current`.
    pub fn find(&self, current: S, model: &M, env: &E) -> Option<&Transition<S, M, E>> {
        self.transitions
            .iter()
            .find(|t| t.can_execute(current, model, env))
    }
}

impl<S: State, M, E> std::fmt::Debug for TransitionTable<S, M, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionTable")
            .field("name", &self.name)
            .field("transitions", &self.transitions.len())
            .finish()
    }
}
