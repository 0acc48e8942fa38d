//! # Presentation Tree
//!
//! Registry owning every layer of one host: the root stack and the chain of
//! modal layers presented above it. Handles never hold a layer directly; they
//! keep a `Weak` reference to the tree plus a [`LayerId`] and look the layer up
//! on every call.
//!
//! Every method mutates logical state first and then forwards the change to
//! the [`PresentationSurface`] before returning, so both agree once the lock
//! is released. Content builders and dismissal completions never run while
//! the lock is held.

use std::collections::HashMap;
use std::sync::Weak;

use futures_signals::signal::Mutable;
use parking_lot::Mutex;

use crate::diagnostics::Diagnostics;
use crate::errors::{NavError, Operation};
use crate::presentation::{
    Completion, LayerId, PhaseEvent, PresentationKind, PresentationNode, PresentationPhase,
    PresentationStyle,
};
use crate::route::AnyRoute;
use crate::stack::{Screen, ScreenStack, StackMutation};
use crate::surface::{PresentationSurface, Transition};

/// Point-in-time view of one layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerSnapshot {
    /// Layer id
    pub id: LayerId,
    /// Presenting layer (`None` for the root)
    pub parent: Option<LayerId>,
    /// Sheet or cover (`None` for the root)
    pub kind: Option<PresentationKind>,
    /// Lifecycle phase
    pub phase: PresentationPhase,
    /// Routes on the layer's stack, root first
    pub routes: Vec<AnyRoute>,
}

impl LayerSnapshot {
    /// Stack depth, root included.
    pub fn depth(&self) -> usize {
        self.routes.len()
    }
}

/// Point-in-time view of the whole hierarchy, root layer first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavSnapshot {
    /// Whether root content is mounted
    pub mounted: bool,
    /// Layers from the root up to the topmost modal
    pub layers: Vec<LayerSnapshot>,
}

impl NavSnapshot {
    /// Look up one layer.
    pub fn layer(&self, id: LayerId) -> Option<&LayerSnapshot> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Topmost layer.
    pub fn top(&self) -> Option<&LayerSnapshot> {
        self.layers.last()
    }

    /// Number of layers (root plus modals).
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

pub(crate) struct PresentationTree<V> {
    nodes: HashMap<LayerId, PresentationNode<V>>,
    root: LayerId,
    mounted: bool,
    next_id: LayerId,
    surface: Box<dyn PresentationSurface<V>>,
    snapshot: Mutable<NavSnapshot>,
}

impl<V: 'static> PresentationTree<V> {
    pub(crate) fn new(
        surface: Box<dyn PresentationSurface<V>>,
        snapshot: Mutable<NavSnapshot>,
    ) -> Self {
        Self {
            nodes: HashMap::new(),
            root: LayerId::ROOT,
            mounted: false,
            next_id: LayerId::ROOT.next(),
            surface,
            snapshot,
        }
    }

    pub(crate) fn is_mounted(&self) -> bool {
        self.mounted
    }

    // ─── Lookup ──────────────────────────────────────────────

    fn node(&self, layer: LayerId) -> Result<&PresentationNode<V>, NavError> {
        if !self.mounted {
            return Err(NavError::NotMounted);
        }
        self.nodes.get(&layer).ok_or(NavError::Unresolved { layer })
    }

    /// A layer that still accepts push/pop.
    fn live(&self, layer: LayerId) -> Result<&PresentationNode<V>, NavError> {
        let node = self.node(layer)?;
        if node.phase.accepts_stack_ops() {
            Ok(node)
        } else {
            Err(NavError::Unresolved { layer })
        }
    }

    pub(crate) fn stack(&self, layer: LayerId) -> Result<&ScreenStack<V>, NavError> {
        self.live(layer).map(|n| &n.stack)
    }

    pub(crate) fn parent_of(&self, layer: LayerId) -> Result<Option<LayerId>, NavError> {
        self.node(layer).map(|n| n.parent)
    }

    /// Topmost presented layer reachable from `layer` through presented children.
    pub(crate) fn topmost_from(&self, layer: LayerId) -> Result<LayerId, NavError> {
        let mut current = self.node(layer)?;
        while let Some(child) = current.child.and_then(|id| self.nodes.get(&id)) {
            if child.phase != PresentationPhase::Presented {
                return Err(NavError::ReentrantPresentation {
                    layer: current.id,
                    phase: child.phase,
                });
            }
            current = child;
        }
        Ok(current.id)
    }

    /// Layers from `layer` upward through its children, `layer` first.
    fn chain_from(&self, layer: LayerId) -> Vec<LayerId> {
        let mut chain = vec![layer];
        let mut cursor = self.nodes.get(&layer).and_then(|n| n.child);
        while let Some(id) = cursor {
            chain.push(id);
            cursor = self.nodes.get(&id).and_then(|n| n.child);
        }
        chain
    }

    // ─── Stack mutations ─────────────────────────────────────

    /// Apply `f` to `layer`'s stack and forward the resulting mutation.
    pub(crate) fn mutate(
        &mut self,
        layer: LayerId,
        animated: bool,
        f: impl FnOnce(&mut ScreenStack<V>) -> Option<StackMutation>,
    ) -> Result<Option<StackMutation>, NavError> {
        self.live(layer)?;
        let Some(node) = self.nodes.get_mut(&layer) else {
            return Err(NavError::Unresolved { layer });
        };
        let Some(mutation) = f(&mut node.stack) else {
            tracing::trace!(%layer, depth = node.stack.depth(), "stack unchanged");
            return Ok(None);
        };
        self.surface
            .update(layer, node.stack.screens(), mutation, animated);
        tracing::debug!(%layer, ?mutation, depth = node.stack.depth(), "stack updated");
        self.publish();
        Ok(Some(mutation))
    }

    // ─── Presentation ────────────────────────────────────────

    /// Validate a present request from `caller` and reserve the new layer's id.
    ///
    /// Returns the layer the modal will cover and the id reserved for it.
    pub(crate) fn begin_present(&mut self, caller: LayerId) -> Result<(LayerId, LayerId), NavError> {
        let node = self.node(caller)?;
        if node.phase != PresentationPhase::Presented {
            return Err(NavError::ReentrantPresentation {
                layer: caller,
                phase: node.phase,
            });
        }
        let target = self.topmost_from(caller)?;
        let id = self.next_id;
        self.next_id = id.next();
        Ok((target, id))
    }

    /// Insert the reserved layer over `target` and hand it to the surface.
    pub(crate) fn finish_present(
        &mut self,
        target: LayerId,
        id: LayerId,
        style: PresentationStyle,
        root: Screen<V>,
        animated: bool,
    ) -> Result<Transition, NavError> {
        let parent = self.node(target)?;
        if let Some(child) = parent.child.and_then(|c| self.nodes.get(&c)) {
            return Err(NavError::ReentrantPresentation {
                layer: target,
                phase: child.phase,
            });
        }
        if parent.phase != PresentationPhase::Presented {
            return Err(NavError::ReentrantPresentation {
                layer: target,
                phase: parent.phase,
            });
        }

        let mut node = PresentationNode::modal(id, ScreenStack::new(root), target, style.clone());
        node.phase = node
            .phase
            .transition(PhaseEvent::Present)
            .ok_or(NavError::InvalidTransition {
                layer: id,
                from: node.phase,
                event: PhaseEvent::Present,
            })?;
        let transition = self
            .surface
            .present(id, target, &style, node.stack.root(), animated);
        if transition == Transition::Immediate {
            node.phase = PresentationPhase::Presented;
        }
        tracing::debug!(
            layer = %id,
            parent = %target,
            kind = %style.kind(),
            ?transition,
            "layer presented"
        );

        self.nodes.insert(id, node);
        if let Some(parent) = self.nodes.get_mut(&target) {
            parent.child = Some(id);
        }
        self.publish();
        Ok(transition)
    }

    /// Dismiss the modal layer `layer` belongs to, along with everything above it.
    ///
    /// Returns completions that are due now. For the root layer nothing is
    /// dismissed and `completion` is returned to run immediately.
    pub(crate) fn dismiss(
        &mut self,
        layer: LayerId,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<Vec<Completion>, NavError> {
        let node = self.node(layer)?;
        if node.is_root() {
            tracing::trace!(%layer, "dismiss on root layer ignored");
            return Ok(completion.into_iter().collect());
        }
        let Some(next) = node.phase.transition(PhaseEvent::Dismiss) else {
            return Err(NavError::InvalidTransition {
                layer,
                from: node.phase,
                event: PhaseEvent::Dismiss,
            });
        };

        let chain = self.chain_from(layer);
        if let Some(busy) = chain[1..]
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .find(|n| n.phase.is_transient())
        {
            return Err(NavError::ReentrantPresentation {
                layer: busy.id,
                phase: busy.phase,
            });
        }

        for id in &chain {
            if let Some(n) = self.nodes.get_mut(id) {
                n.phase = next;
            }
        }
        if let (Some(n), Some(completion)) = (self.nodes.get_mut(&layer), completion) {
            n.on_dismissed.push(completion);
        }

        let transition = self.surface.dismiss(layer, animated);
        tracing::debug!(%layer, layers = chain.len(), ?transition, "layer dismissing");
        let due = match transition {
            Transition::Immediate => self.remove_chain(layer),
            Transition::Animated => Vec::new(),
        };
        self.publish();
        Ok(due)
    }

    /// Host finished the animation started for `layer`.
    pub(crate) fn transition_completed(&mut self, layer: LayerId) -> Result<Vec<Completion>, NavError> {
        let phase = self.node(layer)?.phase;
        let Some(event) = phase.finish_event() else {
            return Err(NavError::NoTransitionInFlight { layer, phase });
        };
        let Some(next) = phase.transition(event) else {
            return Err(NavError::InvalidTransition {
                layer,
                from: phase,
                event,
            });
        };
        if let Some(n) = self.nodes.get_mut(&layer) {
            n.phase = next;
        }
        tracing::debug!(%layer, %event, %next, "transition settled");

        match event {
            PhaseEvent::DismissFinished => {
                let mut origin = layer;
                while let Some(parent) = self
                    .nodes
                    .get(&origin)
                    .and_then(|n| n.parent)
                    .and_then(|p| self.nodes.get(&p))
                    .filter(|p| p.phase == PresentationPhase::Dismissing)
                {
                    origin = parent.id;
                }
                let due = self.remove_chain(origin);
                self.publish();
                Ok(due)
            }
            _ => {
                self.publish();
                Ok(Vec::new())
            }
        }
    }

    /// Drop `layer` and every layer above it; unlink it from its parent.
    fn remove_chain(&mut self, layer: LayerId) -> Vec<Completion> {
        let chain = self.chain_from(layer);
        let mut due = Vec::new();
        for id in chain.iter().rev() {
            if let Some(mut node) = self.nodes.remove(id) {
                due.append(&mut node.on_dismissed);
            }
        }
        if let Some(parent) = self
            .nodes
            .values_mut()
            .find(|n| n.child == Some(layer))
        {
            parent.child = None;
        }
        tracing::debug!(%layer, removed = chain.len(), "layer dismissed");
        due
    }

    // ─── Host lifecycle ──────────────────────────────────────

    /// Install root content, replacing any previous hierarchy.
    pub(crate) fn mount(&mut self, root: Screen<V>) -> Vec<Completion> {
        let due = self.clear();
        let stack = ScreenStack::new(root);
        self.surface.mount(self.root, stack.root());
        self.nodes
            .insert(self.root, PresentationNode::root(self.root, stack));
        self.mounted = true;
        tracing::debug!(layer = %self.root, "root mounted");
        self.publish();
        due
    }

    /// Tear everything down; every handle degrades to a no-op.
    pub(crate) fn unmount(&mut self) -> Vec<Completion> {
        let due = self.clear();
        self.mounted = false;
        self.surface.unmount();
        tracing::debug!("navigation unmounted");
        self.publish();
        due
    }

    fn clear(&mut self) -> Vec<Completion> {
        let mut due = Vec::new();
        for (_, mut node) in self.nodes.drain() {
            due.append(&mut node.on_dismissed);
        }
        due
    }

    // ─── Snapshots ───────────────────────────────────────────

    pub(crate) fn snapshot(&self) -> NavSnapshot {
        let layers = if self.mounted {
            self.chain_from(self.root)
                .into_iter()
                .filter_map(|id| self.nodes.get(&id))
                .map(|n| LayerSnapshot {
                    id: n.id,
                    parent: n.parent,
                    kind: n.style.as_ref().map(PresentationStyle::kind),
                    phase: n.phase,
                    routes: n.stack.routes(),
                })
                .collect()
        } else {
            Vec::new()
        };
        NavSnapshot {
            mounted: self.mounted,
            layers,
        }
    }

    fn publish(&self) {
        self.snapshot.set(self.snapshot());
    }
}

/// Lock the tree behind `tree` and run `f`, reporting any failure.
///
/// The UI thread is the only caller, so a held lock means the call came
/// from inside another navigation call.
pub(crate) fn with_tree<V: 'static, T>(
    tree: &Weak<Mutex<PresentationTree<V>>>,
    diagnostics: &Diagnostics,
    operation: Operation,
    layer: Option<LayerId>,
    f: impl FnOnce(&mut PresentationTree<V>) -> Result<T, NavError>,
) -> Option<T> {
    let Some(tree) = tree.upgrade() else {
        diagnostics.report(operation, layer, NavError::HostUnavailable);
        return None;
    };
    let Some(mut guard) = tree.try_lock() else {
        diagnostics.report(operation, layer, NavError::ReentrantCall { operation });
        return None;
    };
    match f(&mut guard) {
        Ok(value) => Some(value),
        Err(error) => {
            drop(guard);
            diagnostics.report(operation, layer, error);
            None
        }
    }
}

/// Read-only access for queries; failures are not reported.
pub(crate) fn peek_tree<V: 'static, T>(
    tree: &Weak<Mutex<PresentationTree<V>>>,
    f: impl FnOnce(&PresentationTree<V>) -> Result<T, NavError>,
) -> Option<T> {
    let tree = tree.upgrade()?;
    let guard = tree.try_lock()?;
    f(&guard).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::SheetConfig;
    use crate::surface::HeadlessSurface;

    fn mounted(surface: HeadlessSurface) -> PresentationTree<&'static str> {
        let mut tree = PresentationTree::new(Box::new(surface), Mutable::new(NavSnapshot::default()));
        tree.mount(Screen::root("home"));
        tree
    }

    fn present(tree: &mut PresentationTree<&'static str>, caller: LayerId) -> LayerId {
        let (target, id) = tree.begin_present(caller).unwrap();
        tree.finish_present(
            target,
            id,
            PresentationStyle::Sheet(SheetConfig::default()),
            Screen::root("sheet"),
            false,
        )
        .unwrap();
        id
    }

    #[test]
    fn test_unmounted_tree_rejects_everything() {
        let mut tree: PresentationTree<()> =
            PresentationTree::new(Box::new(HeadlessSurface::new()), Mutable::new(NavSnapshot::default()));
        assert_eq!(tree.begin_present(LayerId::ROOT), Err(NavError::NotMounted));
        assert_eq!(
            tree.mutate(LayerId::ROOT, false, |s| Some(s.push((), AnyRoute::new(1u8)))),
            Err(NavError::NotMounted)
        );
    }

    #[test]
    fn test_present_walks_to_topmost() {
        let mut tree = mounted(HeadlessSurface::new());
        let sheet = present(&mut tree, LayerId::ROOT);
        let (target, _) = tree.begin_present(LayerId::ROOT).unwrap();
        assert_eq!(target, sheet);
    }

    #[test]
    fn test_present_rejected_while_presenting() {
        let mut tree = mounted(HeadlessSurface::animated());
        let (target, id) = tree.begin_present(LayerId::ROOT).unwrap();
        let transition = tree
            .finish_present(target, id, PresentationStyle::FullScreenCover, Screen::root("cover"), true)
            .unwrap();
        assert_eq!(transition, Transition::Animated);

        assert_eq!(
            tree.begin_present(LayerId::ROOT),
            Err(NavError::ReentrantPresentation {
                layer: LayerId::ROOT,
                phase: PresentationPhase::Presenting,
            })
        );

        tree.transition_completed(id).unwrap();
        assert!(tree.begin_present(LayerId::ROOT).is_ok());
    }

    #[test]
    fn test_dismiss_removes_chain_above() {
        let mut tree = mounted(HeadlessSurface::new());
        let sheet = present(&mut tree, LayerId::ROOT);
        let cover = present(&mut tree, sheet);
        tree.dismiss(sheet, false, None).unwrap();

        assert_eq!(tree.node(sheet).err(), Some(NavError::Unresolved { layer: sheet }));
        assert_eq!(tree.node(cover).err(), Some(NavError::Unresolved { layer: cover }));
        assert_eq!(tree.node(LayerId::ROOT).unwrap().child, None);
    }

    #[test]
    fn test_dismiss_twice_is_invalid_while_animating() {
        let mut tree = mounted(HeadlessSurface::animated());
        let sheet = present(&mut tree, LayerId::ROOT);
        tree.dismiss(sheet, true, None).unwrap();
        assert!(matches!(
            tree.dismiss(sheet, true, None),
            Err(NavError::InvalidTransition { from: PresentationPhase::Dismissing, .. })
        ));
        assert_eq!(tree.stack(sheet).err(), Some(NavError::Unresolved { layer: sheet }));

        tree.transition_completed(sheet).unwrap();
        assert_eq!(tree.snapshot().layer_count(), 1);
    }

    #[test]
    fn test_completion_settles_through_phase_table() {
        let mut tree = mounted(HeadlessSurface::animated());
        let (target, id) = tree.begin_present(LayerId::ROOT).unwrap();
        tree.finish_present(target, id, PresentationStyle::FullScreenCover, Screen::root("cover"), true)
            .unwrap();

        tree.transition_completed(id).unwrap();
        assert_eq!(tree.node(id).unwrap().phase, PresentationPhase::Presented);
        assert_eq!(
            tree.transition_completed(id).err(),
            Some(NavError::NoTransitionInFlight {
                layer: id,
                phase: PresentationPhase::Presented,
            })
        );

        tree.dismiss(id, true, None).unwrap();
        assert!(tree.transition_completed(id).unwrap().is_empty());
        assert_eq!(tree.transition_completed(id).err(), Some(NavError::Unresolved { layer: id }));
    }

    #[test]
    fn test_snapshot_lists_chain() {
        let mut tree = mounted(HeadlessSurface::new());
        let sheet = present(&mut tree, LayerId::ROOT);
        let snapshot = tree.snapshot();
        assert!(snapshot.mounted);
        assert_eq!(snapshot.layer_count(), 2);
        assert_eq!(snapshot.top().map(|l| l.id), Some(sheet));
        assert_eq!(snapshot.layer(sheet).and_then(|l| l.kind), Some(PresentationKind::Sheet));
    }
}
