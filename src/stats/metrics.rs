//! Delivery counters

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

/// Running counters kept by a registry
///
/// Written while the registry lock is held and read without it, so a
/// renderer may inspect its own registry's statistics mid-delivery.
#[derive(Debug, Default)]
pub struct SinkCounters {
    submitted: AtomicU64,
    buffered: AtomicU64,
    delivered: AtomicU64,
    flushes: AtomicU64,
    render_failures: AtomicU64,
    pending: AtomicUsize,
    live: AtomicBool,
}

impl SinkCounters {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_buffered(&self) {
        self.buffered.fetch_add(1, Ordering::Relaxed);
        self.pending.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delivered(&self, count: u64) {
        self.delivered.fetch_add(count, Ordering::Relaxed);
    }

    /// The buffer was drained and the sink went live
    pub(crate) fn record_flush(&self) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        self.pending.store(0, Ordering::Relaxed);
        self.live.store(true, Ordering::Release);
    }

    pub(crate) fn record_render_failure(&self) {
        self.render_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Mappings currently waiting in the buffer
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Relaxed)
    }

    /// Whether a renderer has been installed
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Take a snapshot
    pub fn snapshot(&self) -> RegistryStats {
        RegistryStats {
            submitted: self.submitted.load(Ordering::Relaxed),
            buffered: self.buffered.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
            render_failures: self.render_failures.load(Ordering::Relaxed),
            pending: self.pending(),
            is_live: self.is_live(),
        }
    }
}

/// Point-in-time registry statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Total `submit` calls
    pub submitted: u64,
    /// Submissions that had to wait for a renderer
    pub buffered: u64,
    /// Mappings the renderer accepted
    pub delivered: u64,
    /// Buffer flushes performed (0 or 1)
    pub flushes: u64,
    /// Renderer errors observed
    pub render_failures: u64,
    /// Mappings currently waiting in the buffer
    pub pending: usize,
    /// Whether a renderer is installed
    pub is_live: bool,
}

impl RegistryStats {
    /// Submissions neither delivered nor waiting, i.e. refused by the renderer
    pub fn undelivered(&self) -> u64 {
        self.submitted
            .saturating_sub(self.delivered)
            .saturating_sub(self.pending as u64)
    }
}
