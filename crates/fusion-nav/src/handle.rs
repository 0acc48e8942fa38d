//! # Navigation Handles
//!
//! A handle is bound to exactly one layer and never owns it. Each call
//! upgrades a `Weak` reference to the host's tree and looks the layer up by
//! id, so a handle may be created before its stack exists and degrades to a
//! no-op once the host or the layer is gone.
//!
//! Failed calls are reported to the host's [`Diagnostics`] and otherwise
//! ignored; navigation never returns errors to the caller.

use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::config::NavConfig;
use crate::diagnostics::Diagnostics;
use crate::erased::AnyNavigator;
use crate::errors::{NavError, Operation};
use crate::presentation::{Completion, LayerId, PresentationStyle, SheetConfig};
use crate::route::{AnyRoute, Route, RouteType};
use crate::stack::{Screen, ScreenStack};
use crate::tree::{peek_tree, with_tree, PresentationTree};

/// Untyped resolver shared by [`NavigationHandle`] and [`AnyNavigator`].
pub(crate) struct StackHandle<V> {
    tree: Weak<Mutex<PresentationTree<V>>>,
    layer: LayerId,
    config: Arc<NavConfig>,
    diagnostics: Diagnostics,
    animated: Option<bool>,
}

impl<V> Clone for StackHandle<V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
            layer: self.layer,
            config: self.config.clone(),
            diagnostics: self.diagnostics.clone(),
            animated: self.animated,
        }
    }
}

impl<V: 'static> StackHandle<V> {
    pub(crate) fn new(
        tree: Weak<Mutex<PresentationTree<V>>>,
        layer: LayerId,
        config: Arc<NavConfig>,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            tree,
            layer,
            config,
            diagnostics,
            animated: None,
        }
    }

    /// Handle whose resolver never finds a stack.
    pub(crate) fn detached() -> Self {
        let config = NavConfig::default();
        let diagnostics = Diagnostics::with_capacity(config.diagnostics_capacity);
        Self::new(Weak::new(), LayerId::ROOT, Arc::new(config), diagnostics)
    }

    /// Same host, different layer. The animation override is not inherited.
    fn at(&self, layer: LayerId) -> Self {
        Self {
            layer,
            animated: None,
            ..self.clone()
        }
    }

    pub(crate) fn with_animation(&self, animated: bool) -> Self {
        Self {
            animated: Some(animated),
            ..self.clone()
        }
    }

    /// Per-handle override, else the host setting.
    fn animated(&self) -> bool {
        self.animated.unwrap_or(self.config.animated)
    }

    pub(crate) fn layer(&self) -> LayerId {
        self.layer
    }

    pub(crate) fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub(crate) fn sheet_defaults(&self) -> SheetConfig {
        self.config.sheet.clone()
    }

    fn run<T>(
        &self,
        operation: Operation,
        f: impl FnOnce(&mut PresentationTree<V>) -> Result<T, NavError>,
    ) -> Option<T> {
        with_tree(&self.tree, &self.diagnostics, operation, Some(self.layer), f)
    }

    pub(crate) fn push(&self, view: V, route: AnyRoute) {
        let animated = self.animated();
        self.run(Operation::Push, |tree| {
            tree.mutate(self.layer, animated, |stack| Some(stack.push(view, route)))
        });
    }

    pub(crate) fn pop(&self) {
        let animated = self.animated();
        self.run(Operation::Pop, |tree| {
            tree.mutate(self.layer, animated, |stack| stack.pop().map(|(_, m)| m))
        });
    }

    pub(crate) fn pop_to_root(&self) {
        let animated = self.animated();
        self.run(Operation::PopToRoot, |tree| {
            tree.mutate(self.layer, animated, ScreenStack::pop_to_root)
        });
    }

    pub(crate) fn pop_levels(&self, levels: isize) {
        let animated = self.animated();
        self.run(Operation::PopLevels, |tree| {
            tree.mutate(self.layer, animated, |stack| stack.pop_levels(levels))
        });
    }

    /// Present a new layer over the topmost one above this handle's layer.
    ///
    /// `content` runs exactly once, outside the tree lock, with a handle bound
    /// to the new layer. It does not run if the request is rejected up front.
    pub(crate) fn present(&self, style: PresentationStyle, content: impl FnOnce(Self) -> V) {
        let Some((target, id)) = self.run(Operation::Present, |tree| tree.begin_present(self.layer))
        else {
            return;
        };
        let view = content(self.at(id));
        let animated = self.animated();
        self.run(Operation::Present, |tree| {
            tree.finish_present(target, id, style, Screen::root(view), animated)
        });
    }

    pub(crate) fn dismiss(&self, completion: Option<Completion>) {
        let animated = self.animated();
        let due = self
            .run(Operation::Dismiss, |tree| {
                tree.dismiss(self.layer, animated, completion)
            })
            .unwrap_or_default();
        for completion in due {
            completion();
        }
    }

    pub(crate) fn depth(&self) -> Option<usize> {
        peek_tree(&self.tree, |tree| tree.stack(self.layer).map(ScreenStack::depth))
    }

    pub(crate) fn routes(&self) -> Vec<AnyRoute> {
        peek_tree(&self.tree, |tree| tree.stack(self.layer).map(ScreenStack::routes))
            .unwrap_or_default()
    }

    pub(crate) fn parent(&self) -> Option<LayerId> {
        peek_tree(&self.tree, |tree| tree.parent_of(self.layer)).flatten()
    }

    pub(crate) fn is_resolved(&self) -> bool {
        self.depth().is_some()
    }
}

impl<V> fmt::Debug for StackHandle<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackHandle")
            .field("layer", &self.layer)
            .field("animated", &self.animated)
            .field("attached", &(self.tree.strong_count() > 0))
            .finish()
    }
}

/// Typed handle bound to one stack whose pushed routes are `R`.
///
/// Cheap to clone. Obtain one from [`NavHost::handle`](crate::NavHost::handle)
/// for the root layer, or from the builder passed to a `present_*` call for
/// a modal layer.
pub struct NavigationHandle<R, V> {
    core: StackHandle<V>,
    _route: PhantomData<fn() -> R>,
}

impl<R, V> Clone for NavigationHandle<R, V> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            _route: PhantomData,
        }
    }
}

impl<R, V> fmt::Debug for NavigationHandle<R, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationHandle")
            .field("route", &std::any::type_name::<R>())
            .field("core", &self.core)
            .finish()
    }
}

impl<R: Route, V: 'static> Default for NavigationHandle<R, V> {
    fn default() -> Self {
        Self::detached()
    }
}

impl<R: Route, V: 'static> NavigationHandle<R, V> {
    pub(crate) fn from_core(core: StackHandle<V>) -> Self {
        Self {
            core,
            _route: PhantomData,
        }
    }

    /// Handle bound to nothing. Every call is a no-op reported on a
    /// private diagnostics channel.
    pub fn detached() -> Self {
        Self::from_core(StackHandle::detached())
    }

    /// Same stack, with calls made through the returned handle animating
    /// (or not) regardless of [`NavConfig::animated`].
    ///
    /// ```rust,ignore
    /// nav.with_animation(false).pop_to_root();
    /// ```
    ///
    /// Handles passed to `present_*` builders start from the host setting.
    #[must_use]
    pub fn with_animation(&self, animated: bool) -> Self {
        Self::from_core(self.core.with_animation(animated))
    }

    // ─── Stack ───────────────────────────────────────────────

    /// Push `view` under `route`.
    pub fn push(&self, view: V, route: R) {
        self.core.push(view, AnyRoute::new(route));
    }

    /// Pop the top screen. No-op at the root.
    pub fn pop(&self) {
        self.core.pop();
    }

    /// Pop everything above the root.
    pub fn pop_to_root(&self) {
        self.core.pop_to_root();
    }

    /// Pop `levels` screens in one step, clamped at the root.
    ///
    /// `levels <= 0` does nothing.
    pub fn pop_levels(&self, levels: isize) {
        self.core.pop_levels(levels);
    }

    // ─── Presentation ────────────────────────────────────────

    /// Present a modal layer with its own stack of `M` routes.
    ///
    /// `content` is called once with the new layer's handle and returns the
    /// layer's root screen. The request is dropped and reported if another
    /// presentation above this layer is still in flight.
    pub fn present_modal<M: Route>(
        &self,
        style: PresentationStyle,
        content: impl FnOnce(NavigationHandle<M, V>) -> V,
    ) {
        self.core
            .present(style, |core| content(NavigationHandle::from_core(core)));
    }

    /// Present a sheet using the configured detents.
    pub fn present_sheet<M: Route>(&self, content: impl FnOnce(NavigationHandle<M, V>) -> V) {
        let config = self.core.sheet_defaults();
        self.present_modal(PresentationStyle::Sheet(config), content);
    }

    /// Present a sheet with explicit options.
    pub fn present_sheet_with<M: Route>(
        &self,
        config: SheetConfig,
        content: impl FnOnce(NavigationHandle<M, V>) -> V,
    ) {
        self.present_modal(PresentationStyle::Sheet(config), content);
    }

    /// Present a full-screen cover.
    pub fn present_full_screen<M: Route>(
        &self,
        content: impl FnOnce(NavigationHandle<M, V>) -> V,
    ) {
        self.present_modal(PresentationStyle::FullScreenCover, content);
    }

    /// Present static content as a sheet.
    ///
    /// The content gets no handle of its own, so it cannot push inside the
    /// sheet; use [`present_sheet`](Self::present_sheet) for that.
    pub fn present_sheet_view(&self, view: V) {
        self.present_sheet::<RootOnly>(|_| view);
    }

    /// Present static content as a full-screen cover. Same limitation as
    /// [`present_sheet_view`](Self::present_sheet_view).
    pub fn present_full_screen_view(&self, view: V) {
        self.present_full_screen::<RootOnly>(|_| view);
    }

    /// Dismiss the modal layer this handle belongs to, with everything above it.
    ///
    /// Handles of the root layer have nothing to dismiss.
    pub fn dismiss(&self) {
        self.core.dismiss(None);
    }

    /// Like [`dismiss`](Self::dismiss), then run `completion` once the layer
    /// has left the hierarchy.
    pub fn dismiss_then(&self, completion: impl FnOnce() + Send + 'static) {
        self.core.dismiss(Some(Box::new(completion)));
    }

    // ─── Queries ─────────────────────────────────────────────

    /// Layer this handle is bound to.
    pub fn layer(&self) -> LayerId {
        self.core.layer()
    }

    /// Layer that presented this one, `None` for the root or when unresolved.
    pub fn parent(&self) -> Option<LayerId> {
        self.core.parent()
    }

    /// Stack depth including the root, `None` when unresolved.
    pub fn depth(&self) -> Option<usize> {
        self.core.depth()
    }

    /// Routes pushed above the root, bottom first.
    pub fn path(&self) -> Vec<R> {
        self.core
            .routes()
            .iter()
            .filter_map(AnyRoute::downcast::<R>)
            .collect()
    }

    /// Whether calls would currently reach a live stack.
    pub fn is_resolved(&self) -> bool {
        self.core.is_resolved()
    }

    /// Channel this handle reports dropped calls to.
    pub fn diagnostics(&self) -> &Diagnostics {
        self.core.diagnostics()
    }

    /// Type-erased navigator over the same stack, accepting only `R`.
    pub fn erase(&self) -> AnyNavigator<V> {
        AnyNavigator::tagged(self.core.clone(), RouteType::of::<R>())
    }
}

impl<R: Route, V: 'static> From<NavigationHandle<R, V>> for AnyNavigator<V> {
    fn from(handle: NavigationHandle<R, V>) -> Self {
        handle.erase()
    }
}

/// Route type of stacks whose content has no handle and never pushes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum RootOnly {}
