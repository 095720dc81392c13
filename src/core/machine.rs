//! Table-driven machine evaluator shared by every device.

use crate::core::{State, TransitionTable};
use std::sync::Arc;
use tracing::debug;

/// Current state plus an installed transition table.
///
/// The machine data `M` and the environment `E` are not owned by the engine;
/// the device that embeds an `Fsm` passes them to [`Fsm::fire`]. This keeps
/// the table free of any lifetime and lets several devices share it.
pub struct Fsm<S: State, M, E> {
    current: S,
    table: Arc<TransitionTable<S, M, E>>,
}

impl<S: State, M, E> Fsm<S, M, E> {
    /// Install `table` and start in its initial state.
    pub fn new(table: Arc<TransitionTable<S, M, E>>) -> Self {
        Self {
            current: table.initial_state(),
            table,
        }
    }

    /// Get current state (pure)
    pub fn current_state(&self) -> S {
        self.current
    }

    pub fn table(&self) -> &Arc<TransitionTable<S, M, E>> {
        &self.table
    }

    /// Go back to the table's initial state without running any action.
    pub fn reset(&mut self) {
        self.current = self.table.initial_state();
    }

    /// Evaluate the table once.
    ///
    /// The first transition, in table order, whose origin is the current
    /// state and whose guard passes runs its action and then moves the
    /// machine to its destination, which is returned. When nothing matches
    /// the machine, `model` and `env` are left untouched and `None` is
    /// returned.
    ///
    /// Actions must not fire the same machine again.
    pub fn fire(&mut self, model: &mut M, env: &mut E) -> Option<S> {
        let transition = self.table.find(self.current, model, env)?;

        if let Some(action) = &transition.action {
            action(model, env);
        }

        if transition.to != self.current {
            debug!(
                machine = self.table.name(),
                from = self.current.name(),
                to = transition.to.name(),
                "transition"
            );
        }
        self.current = transition.to;
        Some(self.current)
    }
}

impl<S: State, M, E> std::fmt::Debug for Fsm<S, M, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fsm")
            .field("machine", &self.table.name())
            .field("current", &self.current)
            .finish()
    }
}
