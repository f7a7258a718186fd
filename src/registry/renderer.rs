//! The consumer side of the registry
//!
//! A renderer receives every mapping exactly once, in submission order.
//! Closures of the right shape are renderers, so simple consumers need no
//! dedicated type. [`ChannelRenderer`] bridges into async code.

use tokio::sync::mpsc;

use crate::implementors::LibraryMapping;

/// Error a renderer may return; propagated to the submitter unchanged
pub type RenderError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Consumer of implementor mappings
///
/// Called synchronously from `submit` or `install` while the registry is
/// locked. Implementations may read the registry's statistics but must not
/// `submit` to or `install` on the same registry.
pub trait Renderer: Send + Sync + 'static {
    /// Render one mapping
    fn render(&self, mapping: LibraryMapping) -> Result<(), RenderError>;
}

impl<F> Renderer for F
where
    F: Fn(LibraryMapping) -> Result<(), RenderError> + Send + Sync + 'static,
{
    fn render(&self, mapping: LibraryMapping) -> Result<(), RenderError> {
        self(mapping)
    }
}

/// Renderer forwarding mappings into an unbounded channel
///
/// The receiving half can live in any task. A dropped receiver makes further
/// renders fail.
#[derive(Debug, Clone)]
pub struct ChannelRenderer {
    tx: mpsc::UnboundedSender<LibraryMapping>,
}

impl ChannelRenderer {
    /// Create a renderer and the receiver it feeds
    pub fn new() -> (Self, mpsc::UnboundedReceiver<LibraryMapping>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Whether the receiving half has been dropped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Renderer for ChannelRenderer {
    fn render(&self, mapping: LibraryMapping) -> Result<(), RenderError> {
        self.tx.send(mapping)?;
        Ok(())
    }
}
