//! Record shape emitted by the documentation generator

use serde::Deserialize;

use crate::implementors::ImplementorRecord;

/// One implementor as it appears in a fragment
///
/// `{"text": "...", "synthetic": false, "types": ["crate::Type"]}`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireRecord {
    pub text: String,
    #[serde(default)]
    pub synthetic: bool,
    #[serde(default)]
    pub types: Vec<String>,
}

impl From<WireRecord> for ImplementorRecord {
    fn from(wire: WireRecord) -> Self {
        ImplementorRecord {
            html: wire.text.into(),
            is_synthetic: wire.synthetic,
            owner_type_refs: wire.types,
        }
    }
}
