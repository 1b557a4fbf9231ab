//! Crash-safe storage for the session credential bundle.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use courier_models::CredentialBundle;
use tracing::debug;

use crate::error::{PersistenceError, Result};

/// File name of the persisted bundle inside the store directory.
const BUNDLE_FILE: &str = "creds.json";

/// Persists and reloads the credential bundle needed to re-establish a
/// session without interactive re-pairing.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    /// Creates a store rooted at the given directory. The directory is
    /// created lazily on the first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the persisted bundle file.
    pub fn bundle_path(&self) -> PathBuf {
        self.dir.join(BUNDLE_FILE)
    }

    /// Reloads the persisted bundle, or `None` if nothing has ever been
    /// saved (the transport must pair interactively).
    pub fn load(&self) -> Result<Option<CredentialBundle>> {
        let path = self.bundle_path();
        if !path.exists() {
            return Ok(None);
        }

        let data = fs::read_to_string(&path).map_err(|source| PersistenceError::Read {
            path: path.clone(),
            source,
        })?;
        let bundle = serde_json::from_str(&data)?;
        Ok(Some(bundle))
    }

    /// Persists the bundle atomically.
    ///
    /// Called for every credential update the transport reports. Invariant:
    /// the bundle on disk always reflects the most recent accepted update,
    /// otherwise the session may become unrecoverable.
    pub fn save(&self, bundle: &CredentialBundle) -> Result<()> {
        let path = self.bundle_path();
        let json = serde_json::to_string_pretty(bundle)?;
        self.write_atomic(&path, json.as_bytes())?;
        debug!(path = %path.display(), "credential bundle persisted");
        Ok(())
    }

    // Write to a temp file in the store directory, then rename over the
    // target. Same-directory temp keeps the rename on one filesystem, which
    // is what makes it atomic.
    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| PersistenceError::Directory {
            path: self.dir.clone(),
            source,
        })?;

        let write_err = |source| PersistenceError::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        tmp.write_all(data).map_err(write_err)?;
        tmp.flush().map_err(write_err)?;
        tmp.persist(path).map_err(|e| PersistenceError::Write {
            path: path.to_path_buf(),
            source: e.error,
        })?;

        Ok(())
    }
}
