//! # Fusion Navigation
//!
//! Typed navigation core for mobile UIs. It keeps the logical history of
//! every screen stack and modal layer, and drives a host renderer through the
//! [`PresentationSurface`] trait.
//!
//! ## Overview
//!
//! - [`NavHost`] owns the hierarchy: one root stack plus a chain of sheets and
//!   full-screen covers presented above it.
//! - [`NavigationHandle`] is bound to one stack. It resolves that stack lazily
//!   on every call and turns into a reported no-op once the stack is gone.
//! - [`AnyNavigator`] is the type-erased form, for storing handles of
//!   different route types in one [`NavContext`].
//! - [`ItemBinding`] and [`FlagBinding`] turn state changes into pushes.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fusion_nav::{HeadlessSurface, NavConfig, NavHost};
//!
//! #[derive(Clone, Debug, PartialEq, Eq, Hash)]
//! enum Route { Detail(u32) }
//!
//! let host = NavHost::new(NavConfig::default(), HeadlessSurface::new());
//! host.mount::<Route>(|_nav| "home");
//!
//! let nav = host.handle::<Route>();
//! nav.push("detail", Route::Detail(1));
//! nav.present_sheet::<Route>(|sheet| {
//!     // `sheet` navigates inside the new layer
//!     "sheet root"
//! });
//! ```
//!
//! ## Failure Model
//!
//! Navigation calls never fail at the call site. A call that cannot be applied
//! is dropped and recorded in [`Diagnostics`], and logged through `tracing`.

pub mod binding;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod erased;
pub mod errors;
pub mod handle;
pub mod host;
pub mod presentation;
pub mod route;
pub mod stack;
pub mod surface;
pub mod tick;
mod tree;

pub use binding::{FlagBinding, Identifiable, ItemBinding};
pub use config::NavConfig;
pub use context::NavContext;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use erased::AnyNavigator;
pub use errors::{ConfigError, ErrorCategory, NavError, Operation};
pub use handle::NavigationHandle;
pub use host::NavHost;
pub use presentation::{
    Detent, LayerId, PhaseEvent, PresentationKind, PresentationPhase, PresentationStyle,
    SheetConfig,
};
pub use route::{ActivationRoute, AnyRoute, RootRoute, Route, RouteType};
pub use stack::{Screen, ScreenStack, StackMutation};
pub use surface::{HeadlessSurface, PresentationSurface, SurfaceCommand, Transition};
pub use tick::TickQueue;
pub use tree::{LayerSnapshot, NavSnapshot};

/// Common imports for content code.
pub mod prelude {
    pub use crate::{
        AnyNavigator, AnyRoute, FlagBinding, Identifiable, ItemBinding, NavContext,
        NavigationHandle, PresentationStyle, SheetConfig, TickQueue,
    };
}
