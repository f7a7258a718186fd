//! Library name to implementor list mapping

use std::sync::Arc;

use indexmap::IndexMap;

use super::record::ImplementorRecord;

/// Implementors contributed by one fragment, keyed by library name
///
/// Immutable once built. Clones share the underlying table, so handing a
/// mapping to the registry and keeping a copy costs one reference count.
/// Library order follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryMapping {
    libraries: Arc<IndexMap<String, Vec<ImplementorRecord>>>,
}

impl LibraryMapping {
    /// Start building a mapping
    pub fn builder() -> LibraryMappingBuilder {
        LibraryMappingBuilder::default()
    }

    /// Create a mapping holding a single library
    pub fn single(library: impl Into<String>, records: Vec<ImplementorRecord>) -> Self {
        Self::builder().library(library, records).build()
    }

    /// Records for a library, if present
    pub fn get(&self, library: &str) -> Option<&[ImplementorRecord]> {
        self.libraries.get(library).map(Vec::as_slice)
    }

    /// Library names in insertion order
    pub fn libraries(&self) -> impl Iterator<Item = &str> {
        self.libraries.keys().map(String::as_str)
    }

    /// Iterate `(library, records)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ImplementorRecord])> {
        self.libraries
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    /// Number of libraries
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    /// Whether the mapping holds no libraries
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// Total number of records across all libraries
    pub fn implementor_count(&self) -> usize {
        self.libraries.values().map(Vec::len).sum()
    }

    /// Whether two handles share the same underlying table
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.libraries, &other.libraries)
    }
}

impl From<IndexMap<String, Vec<ImplementorRecord>>> for LibraryMapping {
    fn from(libraries: IndexMap<String, Vec<ImplementorRecord>>) -> Self {
        Self {
            libraries: Arc::new(libraries),
        }
    }
}

impl FromIterator<(String, Vec<ImplementorRecord>)> for LibraryMapping {
    fn from_iter<T: IntoIterator<Item = (String, Vec<ImplementorRecord>)>>(iter: T) -> Self {
        let mut builder = Self::builder();
        for (library, records) in iter {
            builder = builder.library(library, records);
        }
        builder.build()
    }
}

/// Builder for [`LibraryMapping`]
#[derive(Debug, Default)]
pub struct LibraryMappingBuilder {
    libraries: IndexMap<String, Vec<ImplementorRecord>>,
}

impl LibraryMappingBuilder {
    /// Set the records for a library
    ///
    /// Library names are unique within a mapping: setting a name twice
    /// replaces the earlier records but keeps its original position.
    pub fn library(mut self, library: impl Into<String>, records: Vec<ImplementorRecord>) -> Self {
        self.insert(library, records);
        self
    }

    /// Non-consuming form of [`library`](Self::library)
    pub fn insert(&mut self, library: impl Into<String>, records: Vec<ImplementorRecord>) {
        self.libraries.insert(library.into(), records);
    }

    /// Number of libraries added so far
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    /// Whether nothing has been added yet
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// Freeze into an immutable mapping
    pub fn build(self) -> LibraryMapping {
        LibraryMapping::from(self.libraries)
    }
}
