//! # Screen Stack
//!
//! Ordered history of one navigable surface.
//!
//! Index 0 is the root and is never popped, so a stack is never empty.
//! Every mutation reports the [`StackMutation`] it performed so the rendering
//! surface can reconcile in a single step.

use crate::route::{AnyRoute, RootRoute, Route};

/// One entry of a stack: the route it was pushed with and its opaque content.
#[derive(Clone, Debug)]
pub struct Screen<V> {
    /// Route the screen was pushed with
    pub route: AnyRoute,
    /// Renderable payload, opaque to the navigation core
    pub view: V,
}

impl<V> Screen<V> {
    /// Create a screen for a typed route.
    pub fn new<R: Route>(view: V, route: R) -> Self {
        Self {
            route: AnyRoute::new(route),
            view,
        }
    }

    /// Create the root screen of a stack.
    pub fn root(view: V) -> Self {
        Self::new(view, RootRoute)
    }
}

/// Change applied to a stack, in the shape the rendering surface consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackMutation {
    /// One screen appended on top
    Push,
    /// Top screen removed
    Pop,
    /// Everything above the root removed
    PopToRoot,
    /// Stack truncated so `index` is the new top
    TruncateTo(usize),
}

/// Ordered, never-empty sequence of screens.
#[derive(Clone, Debug)]
pub struct ScreenStack<V> {
    screens: Vec<Screen<V>>,
}

impl<V> ScreenStack<V> {
    /// Create a stack seeded with its root screen.
    pub fn new(root: Screen<V>) -> Self {
        Self {
            screens: vec![root],
        }
    }

    /// Number of screens, root included. Always at least 1.
    pub fn depth(&self) -> usize {
        self.screens.len()
    }

    /// Whether only the root is left.
    pub fn is_at_root(&self) -> bool {
        self.screens.len() == 1
    }

    /// The root screen.
    pub fn root(&self) -> &Screen<V> {
        &self.screens[0]
    }

    /// The visible screen.
    pub fn top(&self) -> &Screen<V> {
        &self.screens[self.screens.len() - 1]
    }

    /// All screens, root first.
    pub fn screens(&self) -> &[Screen<V>] {
        &self.screens
    }

    /// Iterate screens root first.
    pub fn iter(&self) -> impl Iterator<Item = &Screen<V>> {
        self.screens.iter()
    }

    /// Routes of every screen, root first.
    pub fn routes(&self) -> Vec<AnyRoute> {
        self.screens.iter().map(|s| s.route.clone()).collect()
    }

    // ─── Mutations ───────────────────────────────────────────

    /// Append a screen. Always succeeds.
    pub fn push(&mut self, view: V, route: AnyRoute) -> StackMutation {
        self.screens.push(Screen { route, view });
        StackMutation::Push
    }

    /// Remove the top screen. The root is protected.
    pub fn pop(&mut self) -> Option<(Screen<V>, StackMutation)> {
        if self.is_at_root() {
            return None;
        }
        self.screens.pop().map(|s| (s, StackMutation::Pop))
    }

    /// Remove every screen above the root.
    pub fn pop_to_root(&mut self) -> Option<StackMutation> {
        if self.is_at_root() {
            return None;
        }
        self.screens.truncate(1);
        Some(StackMutation::PopToRoot)
    }

    /// Remove the top `levels` screens in one truncation.
    ///
    /// `levels <= 0` changes nothing. Asking for at least `depth - 1` levels
    /// behaves exactly like [`pop_to_root`](Self::pop_to_root).
    pub fn pop_levels(&mut self, levels: isize) -> Option<StackMutation> {
        if levels <= 0 {
            return None;
        }
        let removable = self.screens.len() - 1;
        if levels.unsigned_abs() >= removable {
            return self.pop_to_root();
        }
        let new_top = removable - levels.unsigned_abs();
        self.screens.truncate(new_top + 1);
        Some(StackMutation::TruncateTo(new_top))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_with(pushes: u32) -> ScreenStack<&'static str> {
        let mut stack = ScreenStack::new(Screen::root("home"));
        for i in 0..pushes {
            stack.push("detail", AnyRoute::new(i));
        }
        stack
    }

    #[test]
    fn test_new_stack_has_root_only() {
        let stack = stack_with(0);
        assert_eq!(stack.depth(), 1);
        assert!(stack.root().route.is::<RootRoute>());
        assert_eq!(stack.top().view, "home");
    }

    #[test]
    fn test_pop_at_root_is_noop() {
        let mut stack = stack_with(0);
        assert!(stack.pop().is_none());
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_pop_returns_top_screen() {
        let mut stack = stack_with(2);
        let (screen, mutation) = stack.pop().unwrap();
        assert_eq!(screen.route.downcast::<u32>(), Some(1));
        assert_eq!(mutation, StackMutation::Pop);
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn test_pop_levels_truncates_once() {
        let mut stack = stack_with(4);
        assert_eq!(stack.pop_levels(2), Some(StackMutation::TruncateTo(2)));
        assert_eq!(stack.depth(), 3);
        assert_eq!(stack.top().route.downcast::<u32>(), Some(1));
    }

    #[test]
    fn test_pop_levels_clamps_to_root() {
        let mut stack = stack_with(3);
        assert_eq!(stack.pop_levels(3), Some(StackMutation::PopToRoot));
        assert_eq!(stack.depth(), 1);

        let mut stack = stack_with(3);
        assert_eq!(stack.pop_levels(50), Some(StackMutation::PopToRoot));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_pop_levels_non_positive_is_noop() {
        let mut stack = stack_with(3);
        assert_eq!(stack.pop_levels(0), None);
        assert_eq!(stack.pop_levels(-5), None);
        assert_eq!(stack.depth(), 4);
    }

    #[test]
    fn test_pop_to_root_at_root_is_noop() {
        let mut stack = stack_with(0);
        assert_eq!(stack.pop_to_root(), None);
    }
}
