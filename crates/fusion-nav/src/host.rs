//! # Navigation Host
//!
//! Owns the presentation tree for one window or scene. Handles only hold weak
//! references to it, so dropping the host turns every outstanding handle into
//! a reported no-op.

use std::sync::Arc;

use futures_signals::signal::{Mutable, Signal};
use parking_lot::Mutex;

use crate::config::NavConfig;
use crate::diagnostics::Diagnostics;
use crate::erased::AnyNavigator;
use crate::errors::Operation;
use crate::handle::{NavigationHandle, StackHandle};
use crate::presentation::LayerId;
use crate::route::Route;
use crate::stack::Screen;
use crate::surface::PresentationSurface;
use crate::tree::{with_tree, NavSnapshot, PresentationTree};

/// Root of one navigation hierarchy.
pub struct NavHost<V: 'static> {
    tree: Arc<Mutex<PresentationTree<V>>>,
    config: Arc<NavConfig>,
    diagnostics: Diagnostics,
    snapshot: Mutable<NavSnapshot>,
}

impl<V: 'static> NavHost<V> {
    /// Create an unmounted host rendering through `surface`.
    pub fn new(config: NavConfig, surface: impl PresentationSurface<V> + 'static) -> Self {
        let snapshot = Mutable::new(NavSnapshot::default());
        let tree = PresentationTree::new(Box::new(surface), snapshot.clone());
        let diagnostics = Diagnostics::with_capacity(config.diagnostics_capacity);
        tracing::debug!(animated = config.animated, "navigation host created");
        Self {
            tree: Arc::new(Mutex::new(tree)),
            config: Arc::new(config),
            diagnostics,
            snapshot,
        }
    }

    fn core(&self, layer: LayerId) -> StackHandle<V> {
        StackHandle::new(
            Arc::downgrade(&self.tree),
            layer,
            self.config.clone(),
            self.diagnostics.clone(),
        )
    }

    /// Handle for the root stack.
    ///
    /// Usable before [`mount`](Self::mount); calls made before then are
    /// reported as `NotMounted`.
    pub fn handle<R: Route>(&self) -> NavigationHandle<R, V> {
        NavigationHandle::from_core(self.core(LayerId::ROOT))
    }

    /// Type-erased navigator for the root stack, accepting only `R`.
    pub fn navigator<R: Route>(&self) -> AnyNavigator<V> {
        self.handle::<R>().erase()
    }

    /// Install root content built by `content`, replacing any existing
    /// hierarchy. Completions of replaced layers run before this returns.
    pub fn mount<R: Route>(&self, content: impl FnOnce(NavigationHandle<R, V>) -> V) {
        let view = content(self.handle::<R>());
        let due = with_tree(
            &Arc::downgrade(&self.tree),
            &self.diagnostics,
            Operation::Mount,
            None,
            |tree| Ok(tree.mount(Screen::root(view))),
        )
        .unwrap_or_default();
        for completion in due {
            completion();
        }
    }

    /// Tear down every layer. Handles stay valid but resolve to nothing
    /// until the host is mounted again.
    pub fn unmount(&self) {
        let due = with_tree(
            &Arc::downgrade(&self.tree),
            &self.diagnostics,
            Operation::Unmount,
            None,
            |tree| Ok(tree.unmount()),
        )
        .unwrap_or_default();
        for completion in due {
            completion();
        }
    }

    /// Report that the animation started for `layer` has finished.
    pub fn transition_completed(&self, layer: LayerId) {
        let due = with_tree(
            &Arc::downgrade(&self.tree),
            &self.diagnostics,
            Operation::TransitionCompleted,
            Some(layer),
            |tree| tree.transition_completed(layer),
        )
        .unwrap_or_default();
        for completion in due {
            completion();
        }
    }

    /// Whether root content is mounted.
    pub fn is_mounted(&self) -> bool {
        self.snapshot.lock_ref().mounted
    }

    /// Layers from the root to the topmost modal, with their routes.
    pub fn snapshot(&self) -> NavSnapshot {
        self.snapshot.get_cloned()
    }

    /// Signal of snapshots, updated after every change.
    pub fn snapshot_signal(&self) -> impl Signal<Item = NavSnapshot> {
        self.snapshot.signal_cloned()
    }

    /// Topmost layer, `None` when unmounted.
    pub fn top_layer(&self) -> Option<LayerId> {
        self.snapshot.lock_ref().top().map(|l| l.id)
    }

    /// Settings the host was created with.
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Channel receiving every dropped call made through this host's handles.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

impl<V: 'static> std::fmt::Debug for NavHost<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavHost")
            .field("mounted", &self.is_mounted())
            .field("layers", &self.snapshot.lock_ref().layer_count())
            .finish()
    }
}

impl<V: 'static> Drop for NavHost<V> {
    fn drop(&mut self) {
        if let Some(mut tree) = self.tree.try_lock() {
            if tree.is_mounted() {
                // Completions belong to layers that no longer exist.
                drop(tree.unmount());
            }
        }
        tracing::debug!("navigation host dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NavError;
    use crate::presentation::PresentationPhase;
    use crate::surface::HeadlessSurface;

    #[test]
    fn test_handle_before_mount() {
        let host: NavHost<&str> = NavHost::new(NavConfig::default(), HeadlessSurface::new());
        let handle = host.handle::<u32>();
        handle.push("early", 1);
        assert_eq!(host.diagnostics().last().map(|d| d.error), Some(NavError::NotMounted));

        host.mount::<u32>(|_| "home");
        handle.push("detail", 1);
        assert_eq!(handle.depth(), Some(2));
        assert_eq!(handle.path(), vec![1]);
    }

    #[test]
    fn test_snapshot_tracks_phases() {
        let surface = HeadlessSurface::animated();
        let host: NavHost<&str> = NavHost::new(NavConfig::default(), surface);
        host.mount::<u32>(|_| "home");
        host.handle::<u32>().present_sheet::<u32>(|_| "sheet");

        let top = host.snapshot().top().cloned();
        assert_eq!(top.as_ref().map(|l| l.phase), Some(PresentationPhase::Presenting));

        if let Some(layer) = top.map(|l| l.id) {
            host.transition_completed(layer);
        }
        assert_eq!(
            host.snapshot().top().map(|l| l.phase),
            Some(PresentationPhase::Presented)
        );
    }

    #[test]
    fn test_stray_transition_completed_is_reported() {
        let host: NavHost<()> = NavHost::new(NavConfig::default(), HeadlessSurface::new());
        host.mount::<u32>(|_| ());
        host.transition_completed(LayerId::ROOT);
        let last = host.diagnostics().last();
        assert_eq!(last.as_ref().map(|d| d.operation), Some(Operation::TransitionCompleted));
        assert_eq!(
            last.map(|d| d.error),
            Some(NavError::NoTransitionInFlight {
                layer: LayerId::ROOT,
                phase: PresentationPhase::Presented,
            })
        );
    }

    #[test]
    fn test_unmount_reports_as_unmount() {
        let host: NavHost<()> = NavHost::new(NavConfig::default(), HeadlessSurface::new());
        host.mount::<u32>(|_| ());
        let guard = host.tree.lock();
        host.unmount();
        drop(guard);

        let last = host.diagnostics().last();
        assert_eq!(last.as_ref().map(|d| d.operation), Some(Operation::Unmount));
        assert_eq!(
            last.map(|d| d.error),
            Some(NavError::ReentrantCall { operation: Operation::Unmount })
        );
        assert!(host.is_mounted());
    }
}
