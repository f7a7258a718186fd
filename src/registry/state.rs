//! Sink state machine
//!
//! Two states and one irreversible transition:
//!
//! ```text
//! Buffering { pending } ──install──► Live { renderer }
//! ```

use std::sync::Arc;

use crate::implementors::LibraryMapping;

use super::renderer::Renderer;

/// State of the registry sink
pub(super) enum SinkState {
    /// No renderer yet; mappings accumulate in arrival order
    Buffering { pending: Vec<LibraryMapping> },
    /// Renderer installed; mappings are forwarded immediately
    Live { renderer: Arc<dyn Renderer> },
}

impl SinkState {
    pub(super) fn buffering(capacity: usize) -> Self {
        SinkState::Buffering {
            pending: Vec::with_capacity(capacity),
        }
    }

    pub(super) fn is_live(&self) -> bool {
        matches!(self, SinkState::Live { .. })
    }

    pub(super) fn pending_len(&self) -> usize {
        match self {
            SinkState::Buffering { pending } => pending.len(),
            SinkState::Live { .. } => 0,
        }
    }

    /// Switch to live mode, returning the drained buffer
    ///
    /// If already live the state is untouched and the renderer is handed back.
    pub(super) fn go_live(
        &mut self,
        renderer: Arc<dyn Renderer>,
    ) -> Result<Vec<LibraryMapping>, Arc<dyn Renderer>> {
        match self {
            SinkState::Live { .. } => Err(renderer),
            SinkState::Buffering { pending } => {
                let pending = std::mem::take(pending);
                *self = SinkState::Live { renderer };
                Ok(pending)
            }
        }
    }

    /// Swap the renderer of a live sink; returns false if still buffering
    pub(super) fn replace_renderer(&mut self, renderer: Arc<dyn Renderer>) -> bool {
        match self {
            SinkState::Live { renderer: current } => {
                *current = renderer;
                true
            }
            SinkState::Buffering { .. } => false,
        }
    }
}

impl std::fmt::Debug for SinkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkState::Buffering { pending } => f
                .debug_struct("Buffering")
                .field("pending", &pending.len())
                .finish(),
            SinkState::Live { .. } => f.debug_struct("Live").finish_non_exhaustive(),
        }
    }
}
