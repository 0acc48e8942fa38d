//! # Presentation Layers
//!
//! Types describing modal layers: how they are shown ([`PresentationStyle`]),
//! where they sit in the hierarchy ([`PresentationNode`]), and the lifecycle
//! each layer moves through ([`PresentationPhase`]).
//!
//! ```text
//! Absent ──present──► Presenting ──finished──► Presented ──dismiss──► Dismissing ──finished──► Absent
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::stack::ScreenStack;

/// Identifier of one presentation layer (the root stack or a modal).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(u64);

impl LayerId {
    pub(crate) const ROOT: LayerId = LayerId(0);

    pub(crate) fn next(self) -> LayerId {
        LayerId(self.0 + 1)
    }

    /// Raw numeric value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer-{}", self.0)
    }
}

/// How a modal layer covers the one beneath it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationKind {
    /// Partial-height card over the presenting layer
    Sheet,
    /// Full-bleed cover hiding the presenting layer
    FullScreenCover,
}

impl fmt::Display for PresentationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sheet => write!(f, "sheet"),
            Self::FullScreenCover => write!(f, "full-screen cover"),
        }
    }
}

/// Resting height a sheet may snap to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Detent {
    /// About half the screen
    Medium,
    /// Full available height
    Large,
    /// Fixed height in points
    Height(u32),
}

/// Sheet presentation options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Heights the sheet can rest at, smallest first
    pub detents: Vec<Detent>,
    /// Whether the host shows a drag grabber
    pub prefers_grabber_visible: bool,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            detents: vec![Detent::Medium, Detent::Large],
            prefers_grabber_visible: false,
        }
    }
}

impl SheetConfig {
    /// Sheet with the given detents and a hidden grabber.
    pub fn with_detents(detents: impl Into<Vec<Detent>>) -> Self {
        Self {
            detents: detents.into(),
            prefers_grabber_visible: false,
        }
    }

    /// Show or hide the grabber.
    pub fn grabber(mut self, visible: bool) -> Self {
        self.prefers_grabber_visible = visible;
        self
    }
}

/// Presentation kind together with its host options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PresentationStyle {
    /// Page sheet
    Sheet(SheetConfig),
    /// Full-screen cover
    FullScreenCover,
}

impl PresentationStyle {
    /// Kind of presentation, without options.
    pub fn kind(&self) -> PresentationKind {
        match self {
            Self::Sheet(_) => PresentationKind::Sheet,
            Self::FullScreenCover => PresentationKind::FullScreenCover,
        }
    }
}

/// Lifecycle phase of a presentation layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationPhase {
    /// Not in the hierarchy
    #[default]
    Absent,
    /// Inserted, host transition in flight
    Presenting,
    /// Fully on screen
    Presented,
    /// Dismiss requested, host transition in flight
    Dismissing,
}

/// Event driving a [`PresentationPhase`] transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseEvent {
    /// `present()` accepted
    Present,
    /// Host finished the present transition
    PresentFinished,
    /// `dismiss()` accepted
    Dismiss,
    /// Host finished the dismiss transition
    DismissFinished,
}

impl fmt::Display for PhaseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
            Self::PresentFinished => write!(f, "present finished"),
            Self::Dismiss => write!(f, "dismiss"),
            Self::DismissFinished => write!(f, "dismiss finished"),
        }
    }
}

impl PresentationPhase {
    /// Next phase for `event`, or `None` if the move is not allowed.
    pub fn transition(self, event: PhaseEvent) -> Option<PresentationPhase> {
        match (self, event) {
            (Self::Absent, PhaseEvent::Present) => Some(Self::Presenting),
            (Self::Presenting, PhaseEvent::PresentFinished) => Some(Self::Presented),
            (Self::Presented, PhaseEvent::Dismiss) => Some(Self::Dismissing),
            (Self::Dismissing, PhaseEvent::DismissFinished) => Some(Self::Absent),
            _ => None,
        }
    }

    /// Event that settles the animation in flight, `None` at rest.
    pub fn finish_event(self) -> Option<PhaseEvent> {
        match self {
            Self::Presenting => Some(PhaseEvent::PresentFinished),
            Self::Dismissing => Some(PhaseEvent::DismissFinished),
            Self::Absent | Self::Presented => None,
        }
    }

    /// Host animation in flight.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Presenting | Self::Dismissing)
    }

    /// Push/pop are accepted while presenting or presented, not once dismissal began.
    pub fn accepts_stack_ops(&self) -> bool {
        matches!(self, Self::Presenting | Self::Presented)
    }
}

impl fmt::Display for PresentationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "absent"),
            Self::Presenting => write!(f, "presenting"),
            Self::Presented => write!(f, "presented"),
            Self::Dismissing => write!(f, "dismissing"),
        }
    }
}

/// Callback run once a layer has left the hierarchy.
pub type Completion = Box<dyn FnOnce() + Send>;

/// One layer of the modal hierarchy.
///
/// Owns its [`ScreenStack`]. `parent` is `None` only for the root layer, and
/// a layer has at most one active `child`.
pub struct PresentationNode<V> {
    pub(crate) id: LayerId,
    pub(crate) stack: ScreenStack<V>,
    pub(crate) parent: Option<LayerId>,
    pub(crate) child: Option<LayerId>,
    pub(crate) style: Option<PresentationStyle>,
    pub(crate) phase: PresentationPhase,
    pub(crate) on_dismissed: Vec<Completion>,
}

impl<V> PresentationNode<V> {
    pub(crate) fn root(id: LayerId, stack: ScreenStack<V>) -> Self {
        Self {
            id,
            stack,
            parent: None,
            child: None,
            style: None,
            phase: PresentationPhase::Presented,
            on_dismissed: Vec::new(),
        }
    }

    pub(crate) fn modal(
        id: LayerId,
        stack: ScreenStack<V>,
        parent: LayerId,
        style: PresentationStyle,
    ) -> Self {
        Self {
            id,
            stack,
            parent: Some(parent),
            child: None,
            style: Some(style),
            phase: PresentationPhase::Absent,
            on_dismissed: Vec::new(),
        }
    }

    /// Layer id.
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// The layer's stack.
    pub fn stack(&self) -> &ScreenStack<V> {
        &self.stack
    }

    /// Layer that presented this one.
    pub fn parent(&self) -> Option<LayerId> {
        self.parent
    }

    /// Layer presented on top of this one.
    pub fn child(&self) -> Option<LayerId> {
        self.child
    }

    /// How this layer is presented (`None` for the root).
    pub fn style(&self) -> Option<&PresentationStyle> {
        self.style.as_ref()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> PresentationPhase {
        self.phase
    }

    /// Whether this is the root layer.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_lifecycle_is_accepted() {
        let mut phase = PresentationPhase::Absent;
        for event in [
            PhaseEvent::Present,
            PhaseEvent::PresentFinished,
            PhaseEvent::Dismiss,
            PhaseEvent::DismissFinished,
        ] {
            phase = phase.transition(event).unwrap();
        }
        assert_eq!(phase, PresentationPhase::Absent);
    }

    #[test]
    fn test_out_of_order_events_are_rejected() {
        assert_eq!(PresentationPhase::Presenting.transition(PhaseEvent::Present), None);
        assert_eq!(PresentationPhase::Presenting.transition(PhaseEvent::Dismiss), None);
        assert_eq!(PresentationPhase::Absent.transition(PhaseEvent::Dismiss), None);
        assert_eq!(PresentationPhase::Dismissing.transition(PhaseEvent::Dismiss), None);
    }

    #[test]
    fn test_finish_event_only_while_in_flight() {
        for phase in [PresentationPhase::Presenting, PresentationPhase::Dismissing] {
            let event = phase.finish_event().unwrap();
            assert!(phase.transition(event).is_some());
        }
        assert_eq!(PresentationPhase::Presented.finish_event(), None);
        assert_eq!(PresentationPhase::Absent.finish_event(), None);
    }

    #[test]
    fn test_stack_ops_gated_by_phase() {
        assert!(PresentationPhase::Presenting.accepts_stack_ops());
        assert!(PresentationPhase::Presented.accepts_stack_ops());
        assert!(!PresentationPhase::Dismissing.accepts_stack_ops());
        assert!(!PresentationPhase::Absent.accepts_stack_ops());
    }

    #[test]
    fn test_default_sheet_config() {
        let config = SheetConfig::default();
        assert_eq!(config.detents, vec![Detent::Medium, Detent::Large]);
        assert!(!config.prefers_grabber_visible);
    }

    #[test]
    fn test_layer_id_display() {
        assert_eq!(LayerId::ROOT.next().to_string(), "layer-1");
    }
}
