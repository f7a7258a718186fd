//! Deferred registration of rustdoc trait implementor fragments
//!
//! Documentation pages list "Implementors of Trait X" from per-library data
//! chunks that the browser loads independently. Each chunk (a *fragment*)
//! hands its mapping of library name to implementor records to a single sink;
//! the page renderer may install itself before or after any fragment arrives.
//!
//! This crate provides:
//! - The implementor data model ([`implementors`])
//! - Decoding of generated fragment scripts ([`fragment`])
//! - The buffering/live registry sink ([`registry`])
//! - An async fragment loader ([`loader`])
//!
//! # Example
//!
//! ```
//! use implementors_rs::implementors::{ImplementorRecord, LibraryMapping};
//! use implementors_rs::registry::{ImplementorRegistry, RenderError};
//!
//! let registry = ImplementorRegistry::new();
//!
//! // A fragment arrives before the renderer is ready
//! let mapping = LibraryMapping::builder()
//!     .library("smol_str", vec![ImplementorRecord::new("impl Borrow<str> for SmolStr")])
//!     .build();
//! registry.submit(mapping).unwrap();
//!
//! // Installing the renderer flushes everything buffered so far
//! let flushed = registry
//!     .install(|mapping: LibraryMapping| -> Result<(), RenderError> {
//!         println!("render {} libraries", mapping.len());
//!         Ok(())
//!     })
//!     .unwrap();
//! assert_eq!(flushed, 1);
//! ```

pub mod error;
pub mod fragment;
pub mod implementors;
pub mod loader;
pub mod registry;
pub mod stats;

pub use error::{Error, Result};
pub use fragment::Fragment;
pub use implementors::{ImplementorRecord, LibraryMapping};
pub use loader::FragmentLoader;
pub use registry::{ImplementorRegistry, RegistryConfig, Renderer};
