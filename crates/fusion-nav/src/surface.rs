//! # Rendering Surface
//!
//! The seam between the navigation core and the host platform.
//!
//! The core mutates its logical stacks first and then hands the result to a
//! [`PresentationSurface`] before the call returns. Presentation and dismissal
//! report whether the host finished synchronously ([`Transition::Immediate`])
//! or started an animation ([`Transition::Animated`]). In the animated case the
//! host later calls [`NavHost::transition_completed`](crate::NavHost::transition_completed).
//!
//! Surfaces are invoked while the navigator is mid-update and must not call
//! back into navigation handles synchronously. Such calls are dropped and
//! reported as re-entrant.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::presentation::{LayerId, PresentationKind, PresentationStyle};
use crate::route::AnyRoute;
use crate::stack::{Screen, StackMutation};

/// How the host carried out a presentation change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Done by the time the call returned
    Immediate,
    /// Animation started; completion reported later
    Animated,
}

/// Host-side renderer of stacks and modal layers.
pub trait PresentationSurface<V> {
    /// Show the root layer with its root screen.
    fn mount(&mut self, layer: LayerId, root: &Screen<V>);

    /// Reconcile `layer` after `mutation`; `screens` is the new logical stack.
    fn update(
        &mut self,
        layer: LayerId,
        screens: &[Screen<V>],
        mutation: StackMutation,
        animated: bool,
    );

    /// Present `layer` over `parent` with `root` as its first screen.
    fn present(
        &mut self,
        layer: LayerId,
        parent: LayerId,
        style: &PresentationStyle,
        root: &Screen<V>,
        animated: bool,
    ) -> Transition;

    /// Remove `layer` and everything presented above it.
    fn dismiss(&mut self, layer: LayerId, animated: bool) -> Transition;

    /// The host is tearing the whole navigation surface down.
    fn unmount(&mut self) {}
}

/// Command received by a [`HeadlessSurface`], in arrival order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceCommand {
    /// Root mounted
    Mount {
        /// Root layer
        layer: LayerId,
    },
    /// Stack reconciled
    Update {
        /// Layer updated
        layer: LayerId,
        /// Mutation applied
        mutation: StackMutation,
        /// Depth after the mutation
        depth: usize,
        /// Animation requested
        animated: bool,
    },
    /// Modal presented
    Present {
        /// New layer
        layer: LayerId,
        /// Layer it covers
        parent: LayerId,
        /// Sheet or cover
        kind: PresentationKind,
        /// Animation requested
        animated: bool,
    },
    /// Modal dismissed
    Dismiss {
        /// Layer removed
        layer: LayerId,
        /// Animation requested
        animated: bool,
    },
    /// Surface torn down
    Unmount,
}

#[derive(Debug, Default)]
struct HeadlessState {
    layers: BTreeMap<LayerId, Vec<AnyRoute>>,
    parents: BTreeMap<LayerId, LayerId>,
    log: Vec<SurfaceCommand>,
    animate: bool,
}

/// In-memory surface for hosts without a UI and for tests.
///
/// Keeps a mirror of each layer's routes, rebuilt only from the mutations
/// it receives, plus a log of every command. Clones share state, so one
/// clone can be handed to the host and another kept for inspection.
#[derive(Clone, Debug, Default)]
pub struct HeadlessSurface {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessSurface {
    /// Surface that completes every transition synchronously.
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface that reports animated transitions whenever animation is requested.
    pub fn animated() -> Self {
        let surface = Self::default();
        surface.state.lock().animate = true;
        surface
    }

    /// Mirrored routes of `layer`, root first.
    pub fn routes(&self, layer: LayerId) -> Option<Vec<AnyRoute>> {
        self.state.lock().layers.get(&layer).cloned()
    }

    /// Mirrored depth of `layer`.
    pub fn depth(&self, layer: LayerId) -> Option<usize> {
        self.state.lock().layers.get(&layer).map(Vec::len)
    }

    /// Layers currently shown.
    pub fn layers(&self) -> Vec<LayerId> {
        self.state.lock().layers.keys().copied().collect()
    }

    /// Every command received so far.
    pub fn commands(&self) -> Vec<SurfaceCommand> {
        self.state.lock().log.clone()
    }

    /// Forget the command log, keeping the mirror.
    pub fn clear_commands(&self) {
        self.state.lock().log.clear();
    }

    fn transition(state: &HeadlessState, animated: bool) -> Transition {
        if state.animate && animated {
            Transition::Animated
        } else {
            Transition::Immediate
        }
    }
}

impl<V> PresentationSurface<V> for HeadlessSurface {
    fn mount(&mut self, layer: LayerId, root: &Screen<V>) {
        let mut state = self.state.lock();
        state.layers.clear();
        state.parents.clear();
        state.layers.insert(layer, vec![root.route.clone()]);
        state.log.push(SurfaceCommand::Mount { layer });
    }

    fn update(
        &mut self,
        layer: LayerId,
        screens: &[Screen<V>],
        mutation: StackMutation,
        animated: bool,
    ) {
        let mut state = self.state.lock();
        let Some(mirror) = state.layers.get_mut(&layer) else {
            return;
        };
        match mutation {
            StackMutation::Push => {
                if let Some(top) = screens.last() {
                    mirror.push(top.route.clone());
                }
            }
            StackMutation::Pop => {
                mirror.pop();
            }
            StackMutation::PopToRoot => mirror.truncate(1),
            StackMutation::TruncateTo(index) => mirror.truncate(index + 1),
        }
        let depth = mirror.len();
        state.log.push(SurfaceCommand::Update {
            layer,
            mutation,
            depth,
            animated,
        });
    }

    fn present(
        &mut self,
        layer: LayerId,
        parent: LayerId,
        style: &PresentationStyle,
        root: &Screen<V>,
        animated: bool,
    ) -> Transition {
        let mut state = self.state.lock();
        state.layers.insert(layer, vec![root.route.clone()]);
        state.parents.insert(layer, parent);
        state.log.push(SurfaceCommand::Present {
            layer,
            parent,
            kind: style.kind(),
            animated,
        });
        Self::transition(&state, animated)
    }

    fn dismiss(&mut self, layer: LayerId, animated: bool) -> Transition {
        let mut state = self.state.lock();
        let mut doomed = vec![layer];
        while let Some(&above) = doomed.last().and_then(|top| {
            state
                .parents
                .iter()
                .find(|(_, parent)| *parent == top)
                .map(|(child, _)| child)
        }) {
            doomed.push(above);
        }
        for id in doomed {
            state.layers.remove(&id);
            state.parents.remove(&id);
        }
        state.log.push(SurfaceCommand::Dismiss { layer, animated });
        Self::transition(&state, animated)
    }

    fn unmount(&mut self) {
        let mut state = self.state.lock();
        state.layers.clear();
        state.parents.clear();
        state.log.push(SurfaceCommand::Unmount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::SheetConfig;
    use crate::stack::ScreenStack;

    #[test]
    fn test_mirror_follows_mutations() {
        let mut surface = HeadlessSurface::new();
        let mut stack = ScreenStack::new(Screen::root(()));
        let root = LayerId::ROOT;
        PresentationSurface::<()>::mount(&mut surface, root, stack.root());

        for i in 0..4u32 {
            let mutation = stack.push((), AnyRoute::new(i));
            surface.update(root, stack.screens(), mutation, false);
        }
        let mutation = stack.pop_levels(2).unwrap();
        surface.update(root, stack.screens(), mutation, false);

        assert_eq!(surface.routes(root), Some(stack.routes()));
    }

    #[test]
    fn test_dismiss_removes_layers_above() {
        let mut surface = HeadlessSurface::animated();
        let root = LayerId::ROOT;
        let sheet = root.next();
        let cover = sheet.next();
        let screen = Screen::root(());
        surface.mount(root, &screen);
        let style = PresentationStyle::Sheet(SheetConfig::default());
        assert_eq!(
            surface.present(sheet, root, &style, &screen, true),
            Transition::Animated
        );
        surface.present(cover, sheet, &PresentationStyle::FullScreenCover, &screen, false);

        assert_eq!(PresentationSurface::<()>::dismiss(&mut surface, sheet, false), Transition::Immediate);
        assert_eq!(surface.layers(), vec![root]);
    }
}
