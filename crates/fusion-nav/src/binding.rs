//! # State-Driven Navigation
//!
//! Bridges declarative state cells to imperative pushes. A binding watches
//! one cell; when the cell turns from empty to holding an item (or from
//! `false` to `true`) the binding pushes a destination exactly once and
//! schedules the cell's reset on a [`TickQueue`]. The reset never happens
//! inside the observation pass that triggered the push.
//!
//! Whatever the cell holds when the binding is created counts as already
//! seen, so content that renders with a pre-filled cell does not push. The
//! reset also clears the seen state, so a value written after the reset
//! pushes even if no observation ran in between.

use futures_signals::signal::Mutable;

use crate::erased::AnyNavigator;
use crate::route::{ActivationRoute, AnyRoute, Route};
use crate::tick::TickQueue;

/// Item that can name the route it navigates to.
pub trait Identifiable {
    /// Route derived from the item
    type Id: Route;

    /// Route for this item.
    fn id(&self) -> Self::Id;
}

/// Pushes a destination whenever an optional item is set.
pub struct ItemBinding<T, V> {
    cell: Mutable<Option<T>>,
    navigator: AnyNavigator<V>,
    ticks: TickQueue,
    destination: Box<dyn Fn(&T) -> V>,
    seen: Mutable<bool>,
}

impl<T, V> ItemBinding<T, V>
where
    T: Identifiable + Clone + Send + Sync + 'static,
    V: 'static,
{
    /// Bind `cell` to `navigator`; `destination` builds the pushed content.
    pub fn bind(
        cell: Mutable<Option<T>>,
        navigator: AnyNavigator<V>,
        ticks: &TickQueue,
        destination: impl Fn(&T) -> V + 'static,
    ) -> Self {
        let seen = Mutable::new(cell.lock_ref().is_some());
        Self {
            cell,
            navigator,
            ticks: ticks.clone(),
            destination: Box::new(destination),
            seen,
        }
    }

    /// Observe the cell once. Returns whether a push was issued.
    pub fn observe(&mut self) -> bool {
        let current = self.cell.get_cloned();
        let rising = current.is_some() && !self.seen.replace(current.is_some());

        let Some(item) = current.filter(|_| rising) else {
            return false;
        };
        let route = AnyRoute::new(item.id());
        tracing::debug!(?route, "item binding triggered");
        self.navigator.push((self.destination)(&item), route);

        let (cell, seen) = (self.cell.clone(), self.seen.clone());
        self.ticks.schedule(move || {
            cell.set(None);
            seen.set(false);
        });
        true
    }

    /// Cell being observed.
    pub fn cell(&self) -> &Mutable<Option<T>> {
        &self.cell
    }
}

/// Pushes a destination whenever a flag turns on.
///
/// Each activation pushes under a fresh [`ActivationRoute`], so repeated
/// activations of the same destination stay distinct on the stack.
pub struct FlagBinding<V> {
    cell: Mutable<bool>,
    navigator: AnyNavigator<V>,
    ticks: TickQueue,
    destination: Box<dyn Fn() -> V>,
    seen: Mutable<bool>,
}

impl<V: 'static> FlagBinding<V> {
    /// Bind `cell` to `navigator`; `destination` builds the pushed content.
    pub fn bind(
        cell: Mutable<bool>,
        navigator: AnyNavigator<V>,
        ticks: &TickQueue,
        destination: impl Fn() -> V + 'static,
    ) -> Self {
        let seen = Mutable::new(cell.get());
        Self {
            cell,
            navigator,
            ticks: ticks.clone(),
            destination: Box::new(destination),
            seen,
        }
    }

    /// Observe the flag once. Returns whether a push was issued.
    pub fn observe(&mut self) -> bool {
        let current = self.cell.get();
        let rising = current && !self.seen.replace(current);
        if !rising {
            return false;
        }

        let route = ActivationRoute::fresh();
        tracing::debug!(activation = %route.0, "flag binding triggered");
        self.navigator
            .push_synthesized((self.destination)(), AnyRoute::new(route));

        let (cell, seen) = (self.cell.clone(), self.seen.clone());
        self.ticks.schedule(move || {
            cell.set(false);
            seen.set(false);
        });
        true
    }

    /// Cell being observed.
    pub fn cell(&self) -> &Mutable<bool> {
        &self.cell
    }
}
