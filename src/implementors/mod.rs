//! Implementor data model
//!
//! A fragment contributes one [`LibraryMapping`]: for every library (crate)
//! name, the ordered list of [`ImplementorRecord`]s documenting impls of one
//! trait. The records are produced by the documentation generator and are
//! treated as opaque facts here; nothing is parsed, validated or deduplicated.
//!
//! ```text
//! LibraryMapping (Arc, immutable once built)
//! ├── "generic_array" ─► [ImplementorRecord { html, is_synthetic, owner_type_refs }]
//! ├── "serde_bytes"   ─► [ImplementorRecord, ...]
//! └── "sized_chunks"  ─► [ImplementorRecord, ImplementorRecord]
//! ```
//!
//! Both types are cheap to clone: the markup is a reference-counted `Bytes`
//! and the mapping shares its table behind an `Arc`.

pub mod mapping;
pub mod record;

pub use mapping::{LibraryMapping, LibraryMappingBuilder};
pub use record::ImplementorRecord;
