//! Builder for constructing transition tables.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{State, Transition, TransitionTable};
use std::sync::Arc;

/// Builder for constructing transition tables with a fluent API.
///
/// Transitions keep the order in which they are added; that order is the
/// evaluation priority of the finished table.
pub struct TableBuilder<S: State, M, E> {
    name: &'static str,
    transitions: Vec<Transition<S, M, E>>,
}

impl<S: State, M, E> TableBuilder<S, M, E> {
    /// Create a new builder for a table called `name`.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            transitions: Vec::new(),
        }
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder<S, M, E>) -> Result<Self, BuildError> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition<S, M, E>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<Transition<S, M, E>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Build the table.
    pub fn build(self) -> Result<TransitionTable<S, M, E>, BuildError> {
        TransitionTable::new(self.name, self.transitions)
    }

    /// Build the table behind an `Arc`, ready to be installed in machines.
    pub fn build_shared(self) -> Result<Arc<TransitionTable<S, M, E>>, BuildError> {
        self.build().map(Arc::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Fsm, Guard};
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
    enum TestState {
        Waiting,
        Sending,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Waiting => "Waiting",
                Self::Sending => "Sending",
            }
        }
    }

    #[test]
    fn builder_requires_transitions() {
        let result = TableBuilder::<TestState, (), ()>::new("empty").build();

        assert!(matches!(result, Err(BuildError::NoTransitions)));
    }

    #[test]
    fn builder_propagates_transition_errors() {
        let result = TableBuilder::<TestState, (), ()>::new("link")
            .transition(TransitionBuilder::new().from(TestState::Waiting));

        assert!(matches!(result, Err(BuildError::MissingToState)));
    }

    #[test]
    fn fluent_api_builds_table() {
        let table = TableBuilder::<TestState, Vec<u8>, ()>::new("link")
            .transition(
                TransitionBuilder::new()
                    .from(TestState::Waiting)
                    .when(|out: &Vec<u8>, _| !out.is_empty())
                    .to(TestState::Sending),
            )
            .unwrap()
            .add_transition(
                Transition::new(TestState::Sending, Guard::always(), TestState::Waiting)
                    .with_action(|out: &mut Vec<u8>, _| out.clear()),
            )
            .build_shared()
            .unwrap();

        let mut machine = Fsm::new(table);
        let mut out = b"hi".to_vec();

        machine.fire(&mut out, &mut ());
        assert_eq!(machine.current_state(), TestState::Sending);

        machine.fire(&mut out, &mut ());
        assert_eq!(machine.current_state(), TestState::Waiting);
        assert!(out.is_empty());
    }

    #[test]
    fn add_multiple_transitions() {
        let table = TableBuilder::<TestState, (), ()>::new("link")
            .transitions(vec![
                Transition::new(TestState::Waiting, Guard::always(), TestState::Sending),
                Transition::new(TestState::Sending, Guard::always(), TestState::Waiting),
            ])
            .build()
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.initial_state(), TestState::Waiting);
    }
}
