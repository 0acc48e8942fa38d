//! # Routes
//!
//! Stable identifiers for navigation destinations.
//!
//! Any `Clone + Eq + Hash + Debug + Send + Sync + 'static` type is a [`Route`].
//! Stacks store routes as [`AnyRoute`], a tagged wrapper carrying a
//! [`RouteType`] tag next to the opaque value. Getting the concrete route back
//! is always an explicit, checked downcast that returns `Option`.

use std::any::{Any, TypeId};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use uuid::Uuid;

/// Marker trait for route types.
///
/// Blanket-implemented for every type meeting the bounds, so enums and
/// newtypes used as routes need no extra impl.
pub trait Route: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

impl<T> Route for T where T: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

/// Runtime tag identifying the concrete type behind an [`AnyRoute`].
#[derive(Clone, Copy)]
pub struct RouteType {
    id: TypeId,
    name: &'static str,
}

impl RouteType {
    /// Tag for the route type `R`.
    pub fn of<R: 'static>() -> Self {
        Self {
            id: TypeId::of::<R>(),
            name: std::any::type_name::<R>(),
        }
    }

    /// Fully qualified type name (diagnostics only, not stable).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this tag names `R`.
    pub fn is<R: 'static>(&self) -> bool {
        self.id == TypeId::of::<R>()
    }
}

impl PartialEq for RouteType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RouteType {}

impl Hash for RouteType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RouteType").field(&self.name).finish()
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Type-erased route: a [`RouteType`] tag plus the shared route value.
///
/// Equality and hashing are those of the wrapped value. Two routes of
/// different types are never equal, even if their values look alike.
#[derive(Clone)]
pub struct AnyRoute {
    ty: RouteType,
    value: Arc<dyn Any + Send + Sync>,
    hash: u64,
    eq: fn(&dyn Any, &dyn Any) -> bool,
    debug: fn(&dyn Any, &mut fmt::Formatter<'_>) -> fmt::Result,
}

fn eq_as<R: Route>(a: &dyn Any, b: &dyn Any) -> bool {
    match (a.downcast_ref::<R>(), b.downcast_ref::<R>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn debug_as<R: Route>(value: &dyn Any, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value.downcast_ref::<R>() {
        Some(route) => fmt::Debug::fmt(route, f),
        None => f.write_str("<route>"),
    }
}

impl AnyRoute {
    /// Wrap a concrete route.
    ///
    /// Wrapping an `AnyRoute` returns it unchanged rather than nesting it.
    pub fn new<R: Route>(route: R) -> Self {
        if let Some(already) = (&route as &dyn Any).downcast_ref::<AnyRoute>() {
            return already.clone();
        }
        let mut hasher = DefaultHasher::new();
        route.hash(&mut hasher);
        Self {
            ty: RouteType::of::<R>(),
            hash: hasher.finish(),
            value: Arc::new(route),
            eq: eq_as::<R>,
            debug: debug_as::<R>,
        }
    }

    /// Tag of the wrapped route type.
    pub fn route_type(&self) -> RouteType {
        self.ty
    }

    /// Whether the wrapped value is an `R`.
    pub fn is<R: Route>(&self) -> bool {
        self.ty.is::<R>()
    }

    /// Borrow the wrapped value as `R`, if that is its type.
    pub fn downcast_ref<R: Route>(&self) -> Option<&R> {
        self.value.downcast_ref::<R>()
    }

    /// Clone the wrapped value out as `R`, if that is its type.
    pub fn downcast<R: Route>(&self) -> Option<R> {
        self.downcast_ref::<R>().cloned()
    }
}

impl PartialEq for AnyRoute {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.hash == other.hash && (self.eq)(&*self.value, &*other.value)
    }
}

impl Eq for AnyRoute {}

impl Hash for AnyRoute {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ty.hash(state);
        state.write_u64(self.hash);
    }
}

impl fmt::Debug for AnyRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.debug)(&*self.value, f)
    }
}

/// Route of the screen at index 0 of every stack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RootRoute;

/// Unique route synthesized for each activation of a boolean binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActivationRoute(pub Uuid);

impl ActivationRoute {
    /// A route no other activation will ever share.
    pub fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    enum Detail {
        Item(u32),
    }

    #[test]
    fn test_same_type_same_value_is_equal() {
        assert_eq!(AnyRoute::new(Detail::Item(1)), AnyRoute::new(Detail::Item(1)));
        assert_ne!(AnyRoute::new(Detail::Item(1)), AnyRoute::new(Detail::Item(2)));
    }

    #[test]
    fn test_different_types_never_equal() {
        assert_ne!(AnyRoute::new(7u32), AnyRoute::new(7u64));
    }

    #[test]
    fn test_downcast_is_checked() {
        let route = AnyRoute::new(Detail::Item(3));
        assert_eq!(route.downcast::<Detail>(), Some(Detail::Item(3)));
        assert!(route.downcast_ref::<u32>().is_none());
        assert!(route.is::<Detail>());
        assert!(route.route_type().is::<Detail>());
    }

    #[test]
    fn test_wrapping_any_route_does_not_nest() {
        let inner = AnyRoute::new(Detail::Item(9));
        let outer = AnyRoute::new(inner.clone());
        assert_eq!(inner, outer);
        assert!(outer.is::<Detail>());
    }

    #[test]
    fn test_hash_set_dedupes_equal_routes() {
        let set: HashSet<AnyRoute> = [
            AnyRoute::new(Detail::Item(1)),
            AnyRoute::new(Detail::Item(1)),
            AnyRoute::new(1u32),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_debug_shows_inner_value() {
        assert_eq!(format!("{:?}", AnyRoute::new(Detail::Item(4))), "Item(4)");
    }

    #[test]
    fn test_activation_routes_are_unique() {
        assert_ne!(ActivationRoute::fresh(), ActivationRoute::fresh());
    }
}
