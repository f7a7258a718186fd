//! A single documented implementation

use bytes::Bytes;

/// One documented implementation of a trait
///
/// Cloning shares the rendered markup; the payload is never copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplementorRecord {
    /// Rendered markup of the impl signature, generics and where-clauses
    pub html: Bytes,
    /// Whether the impl was synthesized by the compiler (e.g. auto traits)
    pub is_synthetic: bool,
    /// Paths of the types owning the impl, in generator order
    pub owner_type_refs: Vec<String>,
}

impl ImplementorRecord {
    /// Create an explicit (non-synthetic) record without owner references
    pub fn new(html: impl Into<Bytes>) -> Self {
        Self {
            html: html.into(),
            is_synthetic: false,
            owner_type_refs: Vec::new(),
        }
    }

    /// Mark the record as compiler-synthesized
    pub fn synthetic(mut self, is_synthetic: bool) -> Self {
        self.is_synthetic = is_synthetic;
        self
    }

    /// Append an owning type reference
    pub fn owner(mut self, type_ref: impl Into<String>) -> Self {
        self.owner_type_refs.push(type_ref.into());
        self
    }

    /// Replace the owning type references
    pub fn owners<I, S>(mut self, type_refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.owner_type_refs = type_refs.into_iter().map(Into::into).collect();
        self
    }

    /// View the markup as text, if it is valid UTF-8
    pub fn html_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.html).ok()
    }

    /// Size of the markup payload in bytes
    pub fn size(&self) -> usize {
        self.html.len()
    }

    /// Check whether `type_ref` is one of the owning types
    ///
    /// Renderers use this to hide impls already listed on the owning type's
    /// own page.
    pub fn is_owned_by(&self, type_ref: &str) -> bool {
        self.owner_type_refs.iter().any(|t| t == type_ref)
    }
}
