//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::{Action, Guard, State, Transition};

/// Builder for constructing transitions with a fluent API.
pub struct TransitionBuilder<S: State, M, E> {
    from: Option<S>,
    to: Option<S>,
    guard: Option<Guard<M, E>>,
    action: Option<Action<M, E>>,
}

impl<S: State, M, E> TransitionBuilder<S, M, E> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            from: None,
            to: None,
            guard: None,
            action: None,
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: S) -> Self {
        self.from = Some(state);
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: S) -> Self {
        self.to = Some(state);
        self
    }

    /// Set a prebuilt guard (required, or use `when`/`always`).
    pub fn guard(mut self, guard: Guard<M, E>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Set the guard using a closure.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&M, &E) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Fire unconditionally from the source state.
    pub fn always(mut self) -> Self {
        self.guard = Some(Guard::always());
        self
    }

    /// Set the action (optional).
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut M, &mut E) + Send + Sync + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<S, M, E>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;
        let guard = self.guard.ok_or(BuildError::MissingGuard)?;

        Ok(Transition {
            from,
            guard,
            to,
            action: self.action,
        })
    }
}

impl<S: State, M, E> Default for TransitionBuilder<S, M, E> {
    fn default() -> Self {
        Self::new()
    }
}
