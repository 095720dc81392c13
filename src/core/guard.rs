//! Guard predicates for controlling state transitions.
//!
//! A guard looks at the machine's own data and at its environment (the
//! hardware collaborators, or the peer machines for the jukebox) and decides
//! whether a transition may fire. Guards never mutate anything.

/// Predicate that determines if a transition can fire.
///
/// `M` is the data owned by the machine (timers, counters, buffers) and `E`
/// is the environment handed to [`Fsm::fire`](crate::core::Fsm::fire).
///
/// # Example
///
/// ```rust
/// use jukebox_fsm::core::Guard;
///
/// struct Counter {
///     ticks: u32,
/// }
///
/// let expired = Guard::new(|c: &Counter, limit: &u32| c.ticks >= *limit);
///
/// assert!(expired.check(&Counter { ticks: 10 }, &5));
/// assert!(!expired.check(&Counter { ticks: 1 }, &5));
/// ```
pub struct Guard<M, E> {
    predicate: Box<dyn Fn(&M, &E) -> bool + Send + Sync>,
}

impl<M, E> Guard<M, E> {
    /// Create a guard from a predicate function.
    ///
    /// The predicate must not have side effects and must be thread-safe
    /// (Send + Sync) so that tables can be shared between instances.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&M, &E) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// A guard that always passes.
    pub fn always() -> Self {
        Guard::new(|_, _| true)
    }

    /// Evaluate the predicate against the machine data and environment.
    pub fn check(&self, model: &M, env: &E) -> bool {
        (self.predicate)(model, env)
    }
}

impl<M, E> std::fmt::Debug for Guard<M, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Guard(..)")
    }
}
