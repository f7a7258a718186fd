//! Registry error types
//!
//! Submission and installation only fail when the installed renderer fails,
//! or when a second renderer is refused.

use crate::implementors::LibraryMapping;

use super::renderer::RenderError;

/// Error type for registry operations
#[derive(Debug)]
pub enum RegistryError {
    /// A renderer is already installed and the policy rejects another
    AlreadyInstalled,
    /// The renderer failed on a live submission
    Render(RenderError),
    /// The renderer failed while flushing buffered mappings
    ///
    /// The flush stops at the failing mapping; it and everything after it are
    /// handed back so the caller decides whether to retry or drop them.
    Flush {
        /// Mappings rendered successfully before the failure
        delivered: usize,
        /// The failing mapping followed by the ones never attempted, in
        /// arrival order
        undelivered: Vec<LibraryMapping>,
        /// The renderer's error
        source: RenderError,
    },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::AlreadyInstalled => write!(f, "Renderer already installed"),
            RegistryError::Render(e) => write!(f, "Renderer failed: {}", e),
            RegistryError::Flush {
                delivered,
                undelivered,
                source,
            } => write!(
                f,
                "Renderer failed during flush after {} mappings ({} undelivered): {}",
                delivered,
                undelivered.len(),
                source
            ),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::AlreadyInstalled => None,
            RegistryError::Render(e) => Some(&**e),
            RegistryError::Flush { source, .. } => Some(&**source),
        }
    }
}
