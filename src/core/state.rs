//! Core State trait for machine states.
//!
//! Every device machine names its states with a small `Copy` enum that
//! implements this trait. The trait only exposes pure inspection methods.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Copy`: states are small tags, copied in and out of the engine
/// - `PartialEq`: the engine compares the current state with each origin
/// - `Debug`: states show up in diagnostics
/// - `Serialize` + `Deserialize`: states appear in status snapshots
///
/// # Example
///
/// ```rust
/// use jukebox_fsm::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
/// enum LampState {
///     Dark,
///     Lit,
/// }
///
/// impl State for LampState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Dark => "Dark",
///             Self::Lit => "Lit",
///         }
///     }
///
///     fn is_idle(&self) -> bool {
///         matches!(self, Self::Dark)
///     }
/// }
///
/// assert!(LampState::Dark.is_idle());
/// assert_eq!(LampState::Lit.name(), "Lit");
/// ```
pub trait State:
    Copy + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a resting state.
    ///
    /// A machine sitting in an idle state reports no activity to the
    /// low-power logic of the jukebox.
    ///
    /// Default implementation returns `false`.
    fn is_idle(&self) -> bool {
        false
    }
}
