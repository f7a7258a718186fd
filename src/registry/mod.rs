//! Implementor registry
//!
//! The registry merges mappings from independently loaded fragments into a
//! single ordered stream for the page renderer. Fragments and the renderer
//! do not know which of them is ready first, so the registry has two modes:
//!
//! ```text
//!   [Fragment]  [Fragment]  [Fragment]
//!       │           │           │
//!       └─────► submit() ◄──────┘
//!                  │
//!        ┌─────────┴──────────┐
//!        │ Buffering          │ Live
//!        ▼                    ▼
//!   pending: Vec ──install()──► renderer.render(mapping)
//!   (flushed once,
//!    arrival order)
//! ```
//!
//! # Guarantees
//!
//! - Every submitted mapping is either buffered or forwarded; none is dropped.
//! - The renderer sees mappings in `submit` call order, before and after
//!   installation alike.
//! - The buffer is flushed exactly once. Buffering never resumes.
//! - Renderer errors are not swallowed: they surface from `submit` or
//!   `install`.

pub mod config;
pub mod error;
pub mod renderer;
mod state;
pub mod store;

pub use config::{RegistryConfig, ReinstallPolicy};
pub use error::RegistryError;
pub use renderer::{ChannelRenderer, RenderError, Renderer};
pub use store::ImplementorRegistry;
