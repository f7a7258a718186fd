//! Fragment decoding
//!
//! The documentation generator writes one script per trait and crate set:
//!
//! ```text
//! (function() {var implementors = {};
//! implementors["generic_array"] = [{"text":"...","synthetic":false,"types":["generic_array::GenericArray"]}];
//! implementors["smol_str"] = [{"text":"...","synthetic":false,"types":["smol_str::SmolStr"]}];
//! if (window.register_implementors) {window.register_implementors(implementors);} else {window.pending_implementors = implementors;}})()
//! ```
//!
//! Only the `implementors[...] = [...];` assignments carry data. The trailing
//! line is the hand-off: call [`REGISTER_HOOK`] if the renderer is ready,
//! otherwise park the mapping in [`PENDING_SLOT`]. In this crate that branch
//! is [`ImplementorRegistry::submit`](crate::registry::ImplementorRegistry::submit).

mod wire;

use std::path::{Component, Path};

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::implementors::{ImplementorRecord, LibraryMapping};

use self::wire::WireRecord;

/// Name of the hook a ready renderer exposes to fragments
pub const REGISTER_HOOK: &str = "register_implementors";

/// Name of the slot fragments fill when no renderer is ready yet
pub const PENDING_SLOT: &str = "pending_implementors";

/// Directory under the documentation root that holds fragments
pub const IMPLEMENTORS_DIR: &str = "implementors";

const ASSIGNMENT_PREFIX: &str = "implementors[";

/// A decoded fragment
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    /// Path of the trait the implementors belong to (e.g. `core::borrow::Borrow`),
    /// when known from the fragment's location
    pub trait_path: Option<String>,
    /// Implementors keyed by library name
    pub mapping: LibraryMapping,
}

impl Fragment {
    /// Decode a generated fragment script
    ///
    /// Lines that are not `implementors[...]` assignments are skipped. A
    /// fragment without any assignment decodes to an empty mapping.
    pub fn parse(source: &str) -> Result<Self> {
        let mut libraries = IndexMap::new();

        for (idx, line) in source.lines().enumerate() {
            let line = line.trim();
            let Some(rest) = line.strip_prefix(ASSIGNMENT_PREFIX) else {
                continue;
            };

            let (library, records) = parse_assignment(rest).map_err(|reason| Error::Fragment {
                line: idx + 1,
                reason,
            })?;

            libraries.insert(library, records);
        }

        tracing::trace!(libraries = libraries.len(), "Fragment decoded");

        Ok(Self {
            trait_path: None,
            mapping: LibraryMapping::from(libraries),
        })
    }

    /// Decode the bare JSON form `{"<library>": [<record>, ...], ...}`
    ///
    /// Library order follows the document order.
    pub fn from_json(json: &str) -> Result<Self> {
        let wire: IndexMap<String, Vec<WireRecord>> = serde_json::from_str(json)?;

        let libraries = wire
            .into_iter()
            .map(|(library, records)| (library, records.into_iter().map(Into::into).collect()))
            .collect::<IndexMap<String, Vec<ImplementorRecord>>>();

        Ok(Self {
            trait_path: None,
            mapping: LibraryMapping::from(libraries),
        })
    }

    /// Attach the trait path
    pub fn with_trait_path(mut self, trait_path: impl Into<String>) -> Self {
        self.trait_path = Some(trait_path.into());
        self
    }

    /// Take the mapping out of the fragment
    pub fn into_mapping(self) -> LibraryMapping {
        self.mapping
    }
}

/// Derive the trait path from a fragment's location
///
/// `doc/implementors/core/borrow/trait.Borrow.js` becomes `core::borrow::Borrow`.
/// Returns `None` if the path is not below an `implementors` directory, the
/// file name is not `trait.<Name>.js`, or any component is not UTF-8.
pub fn trait_path_from_path(path: &Path) -> Option<String> {
    let components = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_str()),
            _ => None,
        })
        .collect::<Option<Vec<&str>>>()?;

    let start = components.iter().rposition(|c| *c == IMPLEMENTORS_DIR)?;
    let (file, modules) = components[start + 1..].split_last()?;

    let name = file.strip_prefix("trait.")?.strip_suffix(".js")?;
    if name.is_empty() {
        return None;
    }

    let mut segments: Vec<&str> = modules.to_vec();
    segments.push(name);
    Some(segments.join("::"))
}

/// Parse `"<library>"] = [<records>];` (the part after `implementors[`)
fn parse_assignment(rest: &str) -> std::result::Result<(String, Vec<ImplementorRecord>), String> {
    let mut keys = serde_json::Deserializer::from_str(rest).into_iter::<String>();
    let library = match keys.next() {
        Some(Ok(library)) => library,
        Some(Err(e)) => return Err(format!("invalid library name: {}", e)),
        None => return Err("missing library name".into()),
    };
    let rest = &rest[keys.byte_offset()..];

    let rest = rest
        .trim_start()
        .strip_prefix(']')
        .ok_or_else(|| "expected ']' after library name".to_string())?;
    let rest = rest
        .trim_start()
        .strip_prefix('=')
        .ok_or_else(|| "expected '=' after library key".to_string())?;

    let mut values = serde_json::Deserializer::from_str(rest).into_iter::<Vec<WireRecord>>();
    let records = match values.next() {
        Some(Ok(records)) => records,
        Some(Err(e)) => return Err(format!("invalid implementor list: {}", e)),
        None => return Err("missing implementor list".into()),
    };
    let trailing = rest[values.byte_offset()..].trim();

    if !(trailing.is_empty() || trailing == ";") {
        return Err(format!("unexpected trailing input: {}", trailing));
    }

    Ok((library, records.into_iter().map(Into::into).collect()))
}
