//! Build errors for transition and table builders.

use thiserror::Error;

/// Errors that can occur when building transitions and tables.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("No transitions defined. Add at least one transition")]
    NoTransitions,

    #[error("Transition source state not specified. Call .from(state)")]
    MissingFromState,

    #[error("Transition target state not specified. Call .to(state)")]
    MissingToState,

    #[error("Transition guard not specified. Call .when(predicate) or .always()")]
    MissingGuard,
}
