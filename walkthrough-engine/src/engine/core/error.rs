use std::fmt;

/// Which controller rejected a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateMachine {
    Avatar,
    Camera,
    Transition,
    Carousel,
}

impl fmt::Display for StateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Avatar => "avatar",
            Self::Camera => "camera",
            Self::Transition => "transition",
            Self::Carousel => "carousel",
        };
        f.write_str(name)
    }
}

/// Errors raised by the walkthrough controllers.
///
/// Recoverable variants are absorbed where they happen (logged, no state
/// change). Fatal variants are forwarded to the session controller as a
/// [`FatalSessionError`](crate::engine::core::session::FatalSessionError).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WalkthroughError {
    /// A tracked resource reported a failed load. Counted as done.
    #[error("resource `{label}` failed to load")]
    ResourceFailure { label: String },

    /// A trigger arrived in a state that does not accept it.
    #[error("{machine}: `{action}` ignored while {from}")]
    InvalidStateTransition {
        machine: StateMachine,
        from: &'static str,
        action: &'static str,
    },

    /// Path following needs at least one waypoint.
    #[error("waypoint path must contain at least one waypoint")]
    EmptyPath,

    /// The exhibit room could not be built after the teleport.
    #[error("exhibit scene construction failed: {0}")]
    SceneConstruction(String),

    /// The loading tracker already reported ready.
    #[error("loading tracker already completed, late `{0}` rejected")]
    TrackerClosed(&'static str),

    /// A completion arrived without a matching start.
    #[error("resource completion reported without a matching start")]
    UnbalancedDone,

    /// A config value outside its valid range. The default is used instead.
    #[error("config `{field}` = {value} is out of range, using {fallback}")]
    InvalidConfig {
        field: &'static str,
        value: f32,
        fallback: f32,
    },
}

impl WalkthroughError {
    /// Fatal errors end the interactive session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::EmptyPath | Self::SceneConstruction(_))
    }

    pub(crate) fn invalid(machine: StateMachine, from: &'static str, action: &'static str) -> Self {
        Self::InvalidStateTransition {
            machine,
            from,
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_path_and_scene_errors_are_fatal() {
        assert!(WalkthroughError::EmptyPath.is_fatal());
        assert!(WalkthroughError::SceneConstruction("no catalogue".into()).is_fatal());
        assert!(!WalkthroughError::UnbalancedDone.is_fatal());
        assert!(!WalkthroughError::TrackerClosed("start").is_fatal());
        assert!(
            !WalkthroughError::ResourceFailure {
                label: "intro".into()
            }
            .is_fatal()
        );
        assert!(!WalkthroughError::invalid(StateMachine::Camera, "Sitting", "begin_approach").is_fatal());
        assert!(
            !WalkthroughError::InvalidConfig {
                field: "avatar.step",
                value: 0.0,
                fallback: 0.5,
            }
            .is_fatal()
        );
    }

    #[test]
    fn invalid_transition_names_the_machine() {
        let err = WalkthroughError::invalid(StateMachine::Transition, "Running", "trigger");
        assert_eq!(err.to_string(), "transition: `trigger` ignored while Running");
    }
}
