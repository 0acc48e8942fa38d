//! Diagnostic channel for dropped navigation calls.
//!
//! Every reported error is logged through `tracing` and kept in a bounded
//! ring buffer that hosts and tests can inspect. The oldest entry is dropped
//! once the buffer is full.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::DEFAULT_DIAGNOSTICS_CAPACITY;
use crate::errors::{ErrorCategory, NavError, Operation};
use crate::presentation::LayerId;

/// One dropped navigation call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Operation that was dropped
    pub operation: Operation,
    /// Layer the caller was bound to, if any
    pub layer: Option<LayerId>,
    /// Why it was dropped
    pub error: NavError,
}

impl Diagnostic {
    /// Category of the underlying error.
    pub fn category(&self) -> ErrorCategory {
        self.error.category()
    }
}

#[derive(Debug)]
struct DiagnosticLog {
    entries: VecDeque<Diagnostic>,
    capacity: usize,
    total: u64,
}

/// Shared, bounded diagnostic sink.
///
/// Cloning is cheap; clones report into the same buffer.
#[derive(Clone, Debug)]
pub struct Diagnostics {
    inner: Arc<Mutex<DiagnosticLog>>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_DIAGNOSTICS_CAPACITY)
    }
}

impl Diagnostics {
    /// Create a sink keeping at most `capacity` entries (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(Mutex::new(DiagnosticLog {
                entries: VecDeque::with_capacity(capacity),
                capacity,
                total: 0,
            })),
        }
    }

    /// Record a dropped call.
    pub fn report(&self, operation: Operation, layer: Option<LayerId>, error: NavError) {
        let category = error.category();
        match layer {
            Some(layer) => tracing::warn!(
                %operation,
                %layer,
                category = %category,
                error = %error,
                "navigation call dropped"
            ),
            None => tracing::warn!(
                %operation,
                category = %category,
                error = %error,
                "navigation call dropped"
            ),
        }

        let mut log = self.inner.lock();
        if log.entries.len() == log.capacity {
            log.entries.pop_front();
        }
        log.entries.push_back(Diagnostic {
            operation,
            layer,
            error,
        });
        log.total += 1;
    }

    /// Retained entries, oldest first.
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.inner.lock().entries.iter().cloned().collect()
    }

    /// Most recent entry.
    pub fn last(&self) -> Option<Diagnostic> {
        self.inner.lock().entries.back().cloned()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Retained entries in `category`.
    pub fn count(&self, category: ErrorCategory) -> usize {
        self.inner
            .lock()
            .entries
            .iter()
            .filter(|d| d.category() == category)
            .count()
    }

    /// Reports since creation, including evicted ones.
    pub fn total_reported(&self) -> u64 {
        self.inner.lock().total
    }

    /// Remove and return every retained entry.
    pub fn drain(&self) -> Vec<Diagnostic> {
        self.inner.lock().entries.drain(..).collect()
    }
}
