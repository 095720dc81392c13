//! Macros for ergonomic state machine construction.

/// Generate a state enum together with its `State` implementation.
///
/// The enum derives `Clone`, `Copy`, `PartialEq`, `Eq`, `Debug` and the serde
/// traits. Variants listed under `idle:` report `is_idle() == true`.
///
/// # Example
///
/// ```
/// use jukebox_fsm::state_enum;
/// use jukebox_fsm::core::State;
///
/// state_enum! {
///     pub enum DoorState {
///         Closed,
///         Opening,
///         Open,
///     }
///     idle: [Closed]
/// }
///
/// assert!(DoorState::Closed.is_idle());
/// assert_eq!(DoorState::Opening.name(), "Opening");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(idle: [$($idle:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            #[allow(unreachable_patterns)]
            fn is_idle(&self) -> bool {
                match self {
                    $($(Self::$idle => true,)*)?
                    _ => false,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::State;

    state_enum! {
        enum TestState {
            Released,
            PressedWait,
            Pressed,
        }
        idle: [Released]
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        assert_eq!(TestState::PressedWait.name(), "PressedWait");
        assert!(TestState::Released.is_idle());
        assert!(!TestState::Pressed.is_idle());
    }

    #[test]
    fn state_enum_supports_visibility() {
        state_enum! {
            pub enum PublicState {
                A,
                B,
            }
            idle: [A, B]
        }

        assert!(PublicState::B.is_idle());
    }

    #[test]
    fn state_enum_works_without_idle_list() {
        state_enum! {
            enum MinimalState {
                One,
                Two,
            }
        }

        let state = MinimalState::One;
        assert!(!state.is_idle());
        assert_ne!(state, MinimalState::Two);
    }
}
