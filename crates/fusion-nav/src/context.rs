//! Explicit navigation context passed down a content tree.

use crate::erased::AnyNavigator;

/// Carries the navigator that content at this point of the tree should use.
///
/// Builders receive a context from their parent and derive a child context
/// with [`scoped`](Self::scoped) when they present a layer of their own. The
/// default context holds a detached navigator.
pub struct NavContext<V> {
    navigator: AnyNavigator<V>,
}

impl<V> Clone for NavContext<V> {
    fn clone(&self) -> Self {
        Self {
            navigator: self.navigator.clone(),
        }
    }
}

impl<V> std::fmt::Debug for NavContext<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavContext")
            .field("navigator", &self.navigator)
            .finish()
    }
}

impl<V: 'static> Default for NavContext<V> {
    fn default() -> Self {
        Self {
            navigator: AnyNavigator::default(),
        }
    }
}

impl<V: 'static> NavContext<V> {
    /// Context carrying `navigator`.
    pub fn new(navigator: impl Into<AnyNavigator<V>>) -> Self {
        Self {
            navigator: navigator.into(),
        }
    }

    /// Child context for content living on another stack.
    #[must_use]
    pub fn scoped(&self, navigator: impl Into<AnyNavigator<V>>) -> Self {
        Self::new(navigator)
    }

    /// Navigator in scope.
    pub fn navigator(&self) -> &AnyNavigator<V> {
        &self.navigator
    }
}
