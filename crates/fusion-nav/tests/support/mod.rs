//! Shared fixtures for fusion-nav integration tests.
//!
//! [`TestNav`] wraps a [`NavHost`] rendering into a [`HeadlessSurface`] and
//! keeps a clone of the surface so tests can compare the logical hierarchy
//! with what the renderer was told.

#![allow(dead_code)]

use std::sync::Once;

use fusion_nav::{
    AnyRoute, HeadlessSurface, LayerId, NavConfig, NavHost, NavigationHandle, NavSnapshot,
};

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// Honors `RUST_LOG`; silent by default.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Routes used across the scenarios.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AppRoute {
    Detail(u32),
    Settings,
}

/// Routes pushed inside sheets.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SheetRoute {
    Step(u32),
}

/// Opaque view payload; the label makes failures readable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct View(pub String);

pub fn view(label: impl Into<String>) -> View {
    View(label.into())
}

// ============================================================================
// Test host
// ============================================================================

pub struct TestNav {
    pub host: NavHost<View>,
    pub surface: HeadlessSurface,
}

impl TestNav {
    /// Mounted host with `[Home]` on the root stack, transitions immediate.
    pub fn new() -> Self {
        Self::with(HeadlessSurface::new(), NavConfig::default())
    }

    /// Mounted host whose surface animates; transitions wait for
    /// `transition_completed`.
    pub fn animated() -> Self {
        Self::with(HeadlessSurface::animated(), NavConfig::default())
    }

    pub fn with(surface: HeadlessSurface, config: NavConfig) -> Self {
        init_tracing();
        let host = NavHost::new(config, surface.clone());
        host.mount::<AppRoute>(|_| view("Home"));
        Self { host, surface }
    }

    pub fn root(&self) -> NavigationHandle<AppRoute, View> {
        self.host.handle::<AppRoute>()
    }

    pub fn snapshot(&self) -> NavSnapshot {
        self.host.snapshot()
    }

    /// Logical routes of `layer`, root first.
    pub fn routes(&self, layer: LayerId) -> Vec<AnyRoute> {
        self.snapshot()
            .layer(layer)
            .map(|l| l.routes.clone())
            .unwrap_or_default()
    }

    /// Assert the renderer's mirror matches the logical state of every layer.
    pub fn assert_surface_in_sync(&self) {
        let snapshot = self.snapshot();
        let logical: Vec<LayerId> = snapshot.layers.iter().map(|l| l.id).collect();
        assert_eq!(self.surface.layers(), logical, "layer sets diverged");
        for layer in &snapshot.layers {
            assert_eq!(
                self.surface.routes(layer.id),
                Some(layer.routes.clone()),
                "routes diverged on {}",
                layer.id
            );
        }
    }
}
