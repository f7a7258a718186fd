//! Registry sink implementation
//!
//! Fragments call [`ImplementorRegistry::submit`] whenever they finish
//! loading; the page calls [`ImplementorRegistry::install`] once its renderer
//! is ready. Either may come first.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::implementors::LibraryMapping;
use crate::stats::{RegistryStats, SinkCounters};

use super::config::{RegistryConfig, ReinstallPolicy};
use super::error::RegistryError;
use super::renderer::Renderer;
use super::state::SinkState;

static GLOBAL: Lazy<ImplementorRegistry> = Lazy::new(ImplementorRegistry::new);

/// Hand-off point between fragments and the renderer
///
/// Thread-safe via a `Mutex` held across the forward-or-buffer decision and
/// the renderer call, so delivery order always equals `submit` call order.
/// Statistics are read from atomics and never wait on that lock.
pub struct ImplementorRegistry {
    /// Buffering or live
    state: Mutex<SinkState>,

    /// Delivery counters
    counters: SinkCounters,

    /// Configuration
    config: RegistryConfig,
}

impl ImplementorRegistry {
    /// Create a new registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a new registry with custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            state: Mutex::new(SinkState::buffering(config.initial_buffer_capacity)),
            counters: SinkCounters::new(),
            config,
        }
    }

    /// Process-wide registry, created on first use
    ///
    /// Prefer constructing a registry and passing it around; this exists for
    /// call sites that cannot be handed one.
    pub fn global() -> &'static ImplementorRegistry {
        &GLOBAL
    }

    /// Get the registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Hand a fragment's mapping to the registry
    ///
    /// Forwards to the renderer if one is installed, otherwise buffers it.
    /// Only fails if the renderer does; its error is returned unchanged.
    pub fn submit(&self, mapping: LibraryMapping) -> Result<(), RegistryError> {
        let mut state = self.state.lock();
        self.counters.record_submitted();

        match &mut *state {
            SinkState::Buffering { pending } => {
                tracing::debug!(
                    libraries = mapping.len(),
                    implementors = mapping.implementor_count(),
                    pending = pending.len() + 1,
                    "Mapping buffered, no renderer yet"
                );

                pending.push(mapping);
                self.counters.record_buffered();
                debug_assert_eq!(state.pending_len(), self.counters.pending());
                Ok(())
            }
            SinkState::Live { renderer } => {
                let libraries = mapping.len();

                if let Err(e) = renderer.render(mapping) {
                    self.counters.record_render_failure();
                    tracing::warn!(libraries = libraries, error = %e, "Renderer failed");
                    return Err(RegistryError::Render(e));
                }

                self.counters.record_delivered(1);
                tracing::debug!(libraries = libraries, "Mapping forwarded to renderer");
                Ok(())
            }
        }
    }

    /// Install the renderer and flush everything buffered so far
    ///
    /// Returns the number of buffered mappings delivered. After the first
    /// install the registry is live for good; a later install follows
    /// [`RegistryConfig::reinstall_policy`] and never redelivers anything.
    pub fn install<R: Renderer>(&self, renderer: R) -> Result<usize, RegistryError> {
        self.install_shared(Arc::new(renderer))
    }

    /// Install a renderer that is already shared
    pub fn install_shared(&self, renderer: Arc<dyn Renderer>) -> Result<usize, RegistryError> {
        let mut state = self.state.lock();

        let pending = match state.go_live(Arc::clone(&renderer)) {
            Ok(pending) => pending,
            Err(rejected) => {
                return match self.config.reinstall_policy {
                    ReinstallPolicy::Reject => {
                        tracing::warn!("Renderer already installed, rejecting");
                        Err(RegistryError::AlreadyInstalled)
                    }
                    ReinstallPolicy::Ignore => {
                        tracing::debug!("Renderer already installed, ignoring");
                        Ok(0)
                    }
                    ReinstallPolicy::Replace => {
                        state.replace_renderer(rejected);
                        tracing::info!("Renderer replaced");
                        Ok(0)
                    }
                };
            }
        };

        debug_assert!(state.is_live());
        self.counters.record_flush();
        let total = pending.len();
        let mut delivered = 0;
        let mut pending = pending.into_iter();

        while let Some(mapping) = pending.next() {
            if let Err(source) = renderer.render(mapping.clone()) {
                self.counters.record_render_failure();

                let mut undelivered = Vec::with_capacity(total - delivered);
                undelivered.push(mapping);
                undelivered.extend(pending);

                tracing::warn!(
                    delivered = delivered,
                    undelivered = undelivered.len(),
                    error = %source,
                    "Renderer failed during flush"
                );

                return Err(RegistryError::Flush {
                    delivered,
                    undelivered,
                    source,
                });
            }

            delivered += 1;
            self.counters.record_delivered(1);
        }

        tracing::info!(flushed = delivered, "Renderer installed");

        Ok(delivered)
    }

    /// Whether a renderer has been installed
    ///
    /// Like [`pending_count`](Self::pending_count) and [`stats`](Self::stats)
    /// this does not take the registry lock, so a renderer may call it.
    pub fn is_live(&self) -> bool {
        self.counters.is_live()
    }

    /// Number of mappings waiting for a renderer
    pub fn pending_count(&self) -> usize {
        self.counters.pending()
    }

    /// Get registry statistics
    pub fn stats(&self) -> RegistryStats {
        self.counters.snapshot()
    }
}

impl Default for ImplementorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ImplementorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImplementorRegistry")
            .field("stats", &self.counters.snapshot())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use crate::implementors::ImplementorRecord;
    use crate::registry::renderer::{ChannelRenderer, RenderError};

    use super::*;

    /// Renderer that remembers what it saw, optionally failing on one call
    #[derive(Clone, Default)]
    struct Collector {
        seen: Arc<Mutex<Vec<LibraryMapping>>>,
        fail_on: Option<usize>,
    }

    impl Collector {
        fn failing_on(call: usize) -> Self {
            Self {
                fail_on: Some(call),
                ..Default::default()
            }
        }

        fn seen(&self) -> Vec<LibraryMapping> {
            self.seen.lock().clone()
        }

        fn len(&self) -> usize {
            self.seen.lock().len()
        }
    }

    impl Renderer for Collector {
        fn render(&self, mapping: LibraryMapping) -> Result<(), RenderError> {
            let mut seen = self.seen.lock();
            if self.fail_on == Some(seen.len()) {
                return Err("renderer exploded".into());
            }
            seen.push(mapping);
            Ok(())
        }
    }

    fn mapping(library: &str, html: &'static str) -> LibraryMapping {
        LibraryMapping::single(library, vec![ImplementorRecord::new(html).owner("T1")])
    }

    fn names(mappings: &[LibraryMapping]) -> Vec<String> {
        mappings
            .iter()
            .flat_map(|m| m.libraries().map(str::to_string).collect::<Vec<_>>())
            .collect()
    }

    #[test]
    fn test_submit_before_install_preserves_order() {
        let registry = ImplementorRegistry::new();
        for lib in ["m1", "m2", "m3", "m4"] {
            registry.submit(mapping(lib, "<impl>")).unwrap();
        }
        assert_eq!(registry.pending_count(), 4);
        assert!(!registry.is_live());

        let collector = Collector::default();
        let flushed = registry.install(collector.clone()).unwrap();

        assert_eq!(flushed, 4);
        assert_eq!(names(&collector.seen()), vec!["m1", "m2", "m3", "m4"]);
        assert_eq!(registry.pending_count(), 0);
    }

    #[test]
    fn test_submit_after_install_is_synchronous() {
        let registry = ImplementorRegistry::new();
        let collector = Collector::default();
        assert_eq!(registry.install(collector.clone()).unwrap(), 0);
        assert!(registry.is_live());

        registry.submit(mapping("mapA", "<a>")).unwrap();
        assert_eq!(collector.len(), 1);

        registry.submit(mapping("mapB", "<b>")).unwrap();
        assert_eq!(collector.len(), 2);

        assert_eq!(names(&collector.seen()), vec!["mapA", "mapB"]);
        assert_eq!(registry.pending_count(), 0);
    }

    #[test]
    fn test_mixed_order_no_loss() {
        let registry = ImplementorRegistry::new();
        let collector = Collector::default();

        registry.submit(mapping("a", "<a>")).unwrap();
        registry.submit(mapping("b", "<b>")).unwrap();
        registry.install(collector.clone()).unwrap();
        registry.submit(mapping("c", "<c>")).unwrap();

        assert_eq!(names(&collector.seen()), vec!["a", "b", "c"]);

        let stats = registry.stats();
        assert_eq!(stats.submitted, 3);
        assert_eq!(stats.delivered, 3);
        assert_eq!(stats.buffered, 2);
        assert_eq!(stats.flushes, 1);
        assert!(stats.is_live);
        assert_eq!(stats.undelivered(), 0);
    }

    #[test]
    fn test_duplicate_submissions_before_install() {
        let registry = ImplementorRegistry::new();
        let submitted = mapping("libA", "<impl1>");

        registry.submit(submitted.clone()).unwrap();
        registry.submit(submitted.clone()).unwrap();

        let collector = Collector::default();
        registry.install(collector.clone()).unwrap();

        let seen = collector.seen();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|m| *m == submitted));
        assert_eq!(seen[0].get("libA").unwrap()[0].owner_type_refs, vec!["T1"]);
    }

    #[test]
    fn test_install_without_submissions() {
        let registry = ImplementorRegistry::new();
        let collector = Collector::default();

        assert_eq!(registry.install(collector.clone()).unwrap(), 0);
        assert_eq!(collector.len(), 0);
        assert_eq!(registry.stats().flushes, 1);
    }

    #[test]
    fn test_reinstall_rejected_by_default() {
        let registry = ImplementorRegistry::new();
        registry.submit(mapping("a", "<a>")).unwrap();

        let first = Collector::default();
        let second = Collector::default();
        registry.install(first.clone()).unwrap();

        let result = registry.install(second.clone());
        assert!(matches!(result, Err(RegistryError::AlreadyInstalled)));

        registry.submit(mapping("b", "<b>")).unwrap();
        assert_eq!(names(&first.seen()), vec!["a", "b"]);
        assert_eq!(second.len(), 0);
    }

    #[test]
    fn test_reinstall_ignored() {
        let config = RegistryConfig::default().reinstall_policy(ReinstallPolicy::Ignore);
        let registry = ImplementorRegistry::with_config(config);

        let first = Collector::default();
        let second = Collector::default();
        registry.install(first.clone()).unwrap();
        assert_eq!(registry.install(second.clone()).unwrap(), 0);

        registry.submit(mapping("a", "<a>")).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 0);
    }

    #[test]
    fn test_reinstall_replaces_without_redelivery() {
        let config = RegistryConfig::default().reinstall_policy(ReinstallPolicy::Replace);
        let registry = ImplementorRegistry::with_config(config);
        registry.submit(mapping("early", "<e>")).unwrap();

        let first = Collector::default();
        let second = Collector::default();
        assert_eq!(registry.install(first.clone()).unwrap(), 1);
        assert_eq!(registry.install(second.clone()).unwrap(), 0);

        registry.submit(mapping("late", "<l>")).unwrap();

        assert_eq!(names(&first.seen()), vec!["early"]);
        assert_eq!(names(&second.seen()), vec!["late"]);
        assert_eq!(registry.stats().flushes, 1);
    }

    #[test]
    fn test_live_render_error_propagates() {
        let registry = ImplementorRegistry::new();
        registry.install(Collector::failing_on(0)).unwrap();

        let err = registry.submit(mapping("a", "<a>")).unwrap_err();
        assert!(matches!(err, RegistryError::Render(_)));
        assert_eq!(err.to_string(), "Renderer failed: renderer exploded");
        assert_eq!(registry.stats().render_failures, 1);
    }

    #[test]
    fn test_flush_error_hands_back_undelivered() {
        let registry = ImplementorRegistry::new();
        for lib in ["a", "b", "c", "d"] {
            registry.submit(mapping(lib, "<x>")).unwrap();
        }

        let collector = Collector::failing_on(1);
        let err = registry.install(collector.clone()).unwrap_err();

        match err {
            RegistryError::Flush {
                delivered,
                undelivered,
                ..
            } => {
                assert_eq!(delivered, 1);
                assert_eq!(names(&undelivered), vec!["b", "c", "d"]);
            }
            other => panic!("unexpected error: {}", other),
        }

        assert_eq!(names(&collector.seen()), vec!["a"]);
        assert!(registry.is_live());
        assert_eq!(registry.pending_count(), 0);

        let stats = registry.stats();
        assert_eq!(stats.delivered, 1);
        assert_eq!(stats.undelivered(), 3);
    }

    #[test]
    fn test_closure_renderer() {
        let registry = ImplementorRegistry::new();
        let count = Arc::new(Mutex::new(0usize));

        let counter = Arc::clone(&count);
        registry
            .install(move |m: LibraryMapping| -> Result<(), RenderError> {
                *counter.lock() += m.implementor_count();
                Ok(())
            })
            .unwrap();

        registry.submit(mapping("a", "<a>")).unwrap();
        registry.submit(LibraryMapping::default()).unwrap();
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_renderer_can_read_own_stats() {
        let registry = Arc::new(ImplementorRegistry::new());
        registry.submit(mapping("a", "<a>")).unwrap();
        registry.submit(mapping("b", "<b>")).unwrap();

        let observed = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&observed);
        let weak = Arc::downgrade(&registry);
        registry
            .install(move |_: LibraryMapping| -> Result<(), RenderError> {
                if let Some(registry) = weak.upgrade() {
                    let stats = registry.stats();
                    log.lock()
                        .push((stats.delivered, registry.pending_count(), registry.is_live()));
                }
                Ok(())
            })
            .unwrap();

        registry.submit(mapping("c", "<c>")).unwrap();

        assert_eq!(
            *observed.lock(),
            vec![(0, 0, true), (1, 0, true), (2, 0, true)]
        );
        assert!(format!("{:?}", registry).contains("delivered: 3"));
    }

    #[tokio::test]
    async fn test_channel_renderer_receives_in_order() {
        let registry = ImplementorRegistry::new();
        registry.submit(mapping("first", "<1>")).unwrap();

        let (renderer, mut rx) = ChannelRenderer::new();
        registry.install(renderer).unwrap();
        registry.submit(mapping("second", "<2>")).unwrap();

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.libraries().next(), Some("first"));
        assert_eq!(second.libraries().next(), Some("second"));
    }

    #[test]
    fn test_concurrent_submitters_no_loss() {
        let registry = Arc::new(ImplementorRegistry::new());
        let collector = Collector::default();

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for i in 0..50 {
                        let lib = format!("t{}-{}", t, i);
                        registry
                            .submit(LibraryMapping::single(lib, Vec::new()))
                            .unwrap();
                    }
                })
            })
            .collect();

        registry.install(collector.clone()).unwrap();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(collector.len(), 400);
        let stats = registry.stats();
        assert_eq!(stats.submitted, 400);
        assert_eq!(stats.delivered, 400);

        // Per-thread order survives interleaving
        let seen = names(&collector.seen());
        for t in 0..8 {
            let prefix = format!("t{}-", t);
            let order: Vec<usize> = seen
                .iter()
                .filter_map(|n| n.strip_prefix(&prefix))
                .map(|i| i.parse().unwrap())
                .collect();
            assert_eq!(order, (0..50).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_global_is_shared() {
        let a = ImplementorRegistry::global() as *const ImplementorRegistry;
        let b = ImplementorRegistry::global() as *const ImplementorRegistry;
        assert_eq!(a, b);
    }
}
