//! Asynchronous fragment loading
//!
//! Reads generated fragment scripts and submits their mappings to a shared
//! [`ImplementorRegistry`]. When several fragments are loaded at once each is
//! submitted as soon as its read completes, so arrival order at the registry
//! is whatever order the reads finish in, as with scripts fetched by a
//! browser.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::error::{Error, Result};
use crate::fragment::{trait_path_from_path, Fragment};
use crate::registry::ImplementorRegistry;

/// Loads fragments and submits them to a registry
#[derive(Debug, Clone)]
pub struct FragmentLoader {
    registry: Arc<ImplementorRegistry>,
}

impl FragmentLoader {
    /// Create a loader feeding `registry`
    pub fn new(registry: Arc<ImplementorRegistry>) -> Self {
        Self { registry }
    }

    /// Get a reference to the registry
    pub fn registry(&self) -> &Arc<ImplementorRegistry> {
        &self.registry
    }

    /// Decode a fragment from source text and submit it
    pub fn load_str(&self, source: &str) -> Result<()> {
        let fragment = Fragment::parse(source)?;
        self.submit(fragment)
    }

    /// Read a fragment file and submit it
    pub async fn load_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let fragment = read_fragment(path.as_ref().to_path_buf()).await?;
        self.submit(fragment)
    }

    /// Load many fragments concurrently
    ///
    /// Each fragment is submitted when its read completes. Read and decode
    /// failures do not stop the other loads; the first one is returned once
    /// all loads have finished. A renderer failure is returned immediately
    /// and aborts the reads still in flight; their fragments are not
    /// submitted. Returns the number of fragments submitted.
    pub async fn load_all<I, P>(&self, paths: I) -> Result<usize>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut tasks = JoinSet::new();
        for path in paths {
            let path = path.as_ref().to_path_buf();
            tasks.spawn(async move {
                let result = read_fragment(path.clone()).await;
                (path, result)
            });
        }

        let mut submitted = 0;
        let mut first_error = None;

        while let Some(joined) = tasks.join_next().await {
            let (path, result) = match joined {
                Ok(done) => done,
                Err(e) => {
                    tracing::error!(error = %e, "Fragment load task failed");
                    first_error.get_or_insert(Error::Io(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        e,
                    )));
                    continue;
                }
            };

            match result {
                Ok(fragment) => {
                    self.submit(fragment)?;
                    submitted += 1;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to load fragment");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(submitted),
        }
    }

    /// Find fragment scripts (`*.js`) below `dir`, sorted by path
    pub async fn discover(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        let mut dirs = vec![dir.as_ref().to_path_buf()];

        while let Some(dir) = dirs.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    dirs.push(path);
                } else if path.extension().is_some_and(|ext| ext == "js") {
                    found.push(path);
                }
            }
        }

        found.sort();
        Ok(found)
    }

    fn submit(&self, fragment: Fragment) -> Result<()> {
        tracing::debug!(
            trait_path = fragment.trait_path.as_deref().unwrap_or("<unknown>"),
            libraries = fragment.mapping.len(),
            "Submitting fragment"
        );

        self.registry.submit(fragment.into_mapping())?;
        Ok(())
    }
}

async fn read_fragment(path: PathBuf) -> Result<Fragment> {
    let source = tokio::fs::read_to_string(&path).await?;
    let fragment = Fragment::parse(&source)?;

    Ok(match trait_path_from_path(&path) {
        Some(trait_path) => fragment.with_trait_path(trait_path),
        None => fragment,
    })
}
