//! Categorized navigation errors
//!
//! Navigation calls never hand these back to their caller. They are routed
//! to [`Diagnostics`](crate::diagnostics::Diagnostics) and the call becomes a
//! no-op. Only configuration loading returns errors directly.

use std::fmt;

use thiserror::Error;

use crate::presentation::{LayerId, PhaseEvent, PresentationPhase};
use crate::route::RouteType;

/// Navigation operation a diagnostic was raised from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Root content mounted
    Mount,
    /// Hierarchy torn down
    Unmount,
    /// `push`
    Push,
    /// `pop`
    Pop,
    /// `pop_to_root`
    PopToRoot,
    /// `pop_levels`
    PopLevels,
    /// `present_*`
    Present,
    /// `dismiss`
    Dismiss,
    /// Host reported an animation finished
    TransitionCompleted,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mount => "mount",
            Self::Unmount => "unmount",
            Self::Push => "push",
            Self::Pop => "pop",
            Self::PopToRoot => "pop_to_root",
            Self::PopLevels => "pop_levels",
            Self::Present => "present",
            Self::Dismiss => "dismiss",
            Self::TransitionCompleted => "transition_completed",
        };
        f.write_str(name)
    }
}

/// High-level classes of navigation misuse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The handle could not reach a live stack
    UnresolvedSurface,
    /// A type-erased handle got a route of the wrong type
    TypeMismatch,
    /// A presentation was requested while another one is active or in flight
    ReentrantPresentation,
    /// The request does not fit the layer's current lifecycle phase
    InvalidState,
}

impl ErrorCategory {
    /// Short label for logs and debug overlays.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::UnresolvedSurface => "Unresolved",
            Self::TypeMismatch => "Type Mismatch",
            Self::ReentrantPresentation => "Re-entrant Presentation",
            Self::InvalidState => "Invalid State",
        }
    }

    /// Whether the same call could succeed later without code changes.
    ///
    /// A handle may resolve once its host mounts, and a presentation may be
    /// accepted once the current transition lands.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::UnresolvedSurface | Self::ReentrantPresentation)
    }

    /// Whether this always indicates a bug at the call site.
    #[must_use]
    pub fn is_programmer_error(&self) -> bool {
        matches!(self, Self::TypeMismatch)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Why a navigation call was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    /// The host owning every stack has been torn down
    #[error("navigation host is no longer available")]
    HostUnavailable,

    /// The host exists but its root content was never mounted
    #[error("navigation host has no mounted root")]
    NotMounted,

    /// The handle's layer was dismissed or is being dismissed
    #[error("{layer} is not on screen")]
    Unresolved {
        /// Layer the handle is bound to
        layer: LayerId,
    },

    /// Type-erased push with a route the bound stack does not accept
    #[error("route type mismatch: navigator expects {expected}, got {actual}")]
    RouteTypeMismatch {
        /// Route type the navigator was created for
        expected: RouteType,
        /// Route type that was supplied
        actual: RouteType,
    },

    /// Present requested while a presentation over `layer` is active or in flight
    #[error("cannot present over {layer} while it is {phase}")]
    ReentrantPresentation {
        /// Layer that would have been presented over
        layer: LayerId,
        /// Phase that blocked the request
        phase: PresentationPhase,
    },

    /// Lifecycle event not valid in the layer's phase
    #[error("{layer} cannot handle {event} while {from}")]
    InvalidTransition {
        /// Layer the event targeted
        layer: LayerId,
        /// Phase the layer was in
        from: PresentationPhase,
        /// Rejected event
        event: PhaseEvent,
    },

    /// Host reported a finished animation for a layer at rest
    #[error("{layer} has no transition in flight while {phase}")]
    NoTransitionInFlight {
        /// Layer named by the host
        layer: LayerId,
        /// Phase the layer was in
        phase: PresentationPhase,
    },

    /// Navigation called back into the host while it was mid-update
    #[error("re-entrant navigation call during {operation}")]
    ReentrantCall {
        /// Operation that found the host busy
        operation: Operation,
    },
}

impl NavError {
    /// Category used for diagnostics routing.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HostUnavailable | Self::NotMounted | Self::Unresolved { .. } => {
                ErrorCategory::UnresolvedSurface
            }
            Self::RouteTypeMismatch { .. } => ErrorCategory::TypeMismatch,
            Self::ReentrantPresentation { .. } | Self::ReentrantCall { .. } => {
                ErrorCategory::ReentrantPresentation
            }
            Self::InvalidTransition { .. } | Self::NoTransitionInFlight { .. } => {
                ErrorCategory::InvalidState
            }
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// TOML could not be parsed into a config
    #[error("Invalid navigation config: {0}")]
    Parse(String),

    /// Config could not be rendered to TOML
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Parsed config violates a constraint
    #[error("Configuration error: {0}")]
    Invalid(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
