//! Type-erased navigator.
//!
//! Stacks with different route types can all be stored behind one
//! [`AnyNavigator`], for example in a [`NavContext`](crate::NavContext)
//! handed down a content tree. Routes travel as [`AnyRoute`] and are checked
//! against the navigator's route-type tag before they reach the stack.

use std::fmt;

use crate::diagnostics::Diagnostics;
use crate::errors::{NavError, Operation};
use crate::handle::{NavigationHandle, StackHandle};
use crate::presentation::{LayerId, PresentationStyle};
use crate::route::{AnyRoute, Route, RouteType};

/// Navigator over one stack whose route type is known only at runtime.
///
/// The default value is detached: every call is dropped and reported.
pub struct AnyNavigator<V> {
    core: StackHandle<V>,
    accepts: Option<RouteType>,
}

impl<V> Clone for AnyNavigator<V> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            accepts: self.accepts,
        }
    }
}

impl<V> fmt::Debug for AnyNavigator<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyNavigator")
            .field("accepts", &self.accepts)
            .field("core", &self.core)
            .finish()
    }
}

impl<V: 'static> Default for AnyNavigator<V> {
    fn default() -> Self {
        Self::untagged(StackHandle::detached())
    }
}

impl<V: 'static> AnyNavigator<V> {
    pub(crate) fn tagged(core: StackHandle<V>, accepts: RouteType) -> Self {
        Self {
            core,
            accepts: Some(accepts),
        }
    }

    pub(crate) fn untagged(core: StackHandle<V>) -> Self {
        Self {
            core,
            accepts: None,
        }
    }

    /// Same stack, with calls made through the returned navigator animating
    /// (or not) regardless of the host setting.
    #[must_use]
    pub fn with_animation(&self, animated: bool) -> Self {
        Self {
            core: self.core.with_animation(animated),
            accepts: self.accepts,
        }
    }

    /// Route type this navigator accepts; `None` accepts any.
    pub fn route_type(&self) -> Option<RouteType> {
        self.accepts
    }

    /// Whether `route_type` may be pushed here.
    pub fn accepts(&self, route_type: RouteType) -> bool {
        self.accepts.map_or(true, |expected| expected == route_type)
    }

    /// Push `view` under an erased route.
    ///
    /// A route of the wrong type is dropped and reported as a type mismatch;
    /// the stack is left untouched.
    pub fn push(&self, view: V, route: AnyRoute) {
        let actual = route.route_type();
        match self.accepts {
            Some(expected) if expected != actual => {
                self.core.diagnostics().report(
                    Operation::Push,
                    Some(self.core.layer()),
                    NavError::RouteTypeMismatch { expected, actual },
                );
            }
            _ => self.core.push(view, route),
        }
    }

    /// Push `view` under a concrete route.
    pub fn push_route<R: Route>(&self, view: V, route: R) {
        self.push(view, AnyRoute::new(route));
    }

    /// Push under a route minted by the navigation layer itself, skipping
    /// the route-type check.
    pub(crate) fn push_synthesized(&self, view: V, route: AnyRoute) {
        self.core.push(view, route);
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
    pub fn pop_levels(&self, levels: isize) {
        self.core.pop_levels(levels);
    }

    /// Present a modal layer. The content's navigator accepts any route.
    pub fn present(&self, style: PresentationStyle, content: impl FnOnce(AnyNavigator<V>) -> V) {
        self.core
            .present(style, |core| content(AnyNavigator::untagged(core)));
    }

    /// Present a modal layer whose content gets a typed handle.
    pub fn present_modal<M: Route>(
        &self,
        style: PresentationStyle,
        content: impl FnOnce(NavigationHandle<M, V>) -> V,
    ) {
        self.core
            .present(style, |core| content(NavigationHandle::from_core(core)));
    }

    /// Dismiss the modal layer this navigator belongs to.
    pub fn dismiss(&self) {
        self.core.dismiss(None);
    }

    /// Dismiss, then run `completion` once the layer has left the hierarchy.
    pub fn dismiss_then(&self, completion: impl FnOnce() + Send + 'static) {
        self.core.dismiss(Some(Box::new(completion)));
    }

    /// Typed view of the same stack, if `R` is what it accepts.
    pub fn downcast<R: Route>(&self) -> Option<NavigationHandle<R, V>> {
        self.accepts(RouteType::of::<R>())
            .then(|| NavigationHandle::from_core(self.core.clone()))
    }

    /// Layer this navigator is bound to.
    pub fn layer(&self) -> LayerId {
        self.core.layer()
    }

    /// Stack depth including the root, `None` when unresolved.
    pub fn depth(&self) -> Option<usize> {
        self.core.depth()
    }

    /// Routes on the stack, root first.
    pub fn routes(&self) -> Vec<AnyRoute> {
        self.core.routes()
    }

    /// Whether calls would currently reach a live stack.
    pub fn is_resolved(&self) -> bool {
        self.core.is_resolved()
    }

    /// Channel this navigator reports dropped calls to.
    pub fn diagnostics(&self) -> &Diagnostics {
        self.core.diagnostics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCategory;

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    enum Settings {
        Account,
    }

    #[test]
    fn test_untagged_accepts_everything() {
        let nav: AnyNavigator<()> = AnyNavigator::default();
        assert!(nav.accepts(RouteType::of::<u8>()));
        assert!(nav.downcast::<Settings>().is_some());
    }

    #[test]
    fn test_mismatch_reported_on_tagged_navigator() {
        let nav: AnyNavigator<()> = NavigationHandle::<u32, ()>::detached().erase();
        assert!(nav.downcast::<Settings>().is_none());
        assert!(nav.downcast::<u32>().is_some());

        nav.push_route((), Settings::Account);
        let last = nav.diagnostics().last().map(|d| d.error);
        assert_eq!(
            last,
            Some(NavError::RouteTypeMismatch {
                expected: RouteType::of::<u32>(),
                actual: RouteType::of::<Settings>(),
            })
        );
        assert_eq!(nav.diagnostics().count(ErrorCategory::TypeMismatch), 1);
    }
}
