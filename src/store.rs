//! Local single-key store for the technician identity.
//!
//! The store is a small JSON file holding the technician category the user
//! chose the first time they ran the server.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::FieldworkError;

#[derive(Debug, Serialize, Deserialize)]
struct StoredIdentity {
    technician: String,
}

/// File-backed store for the technician identity.
#[derive(Debug, Clone)]
pub struct TechnicianStore {
    path: PathBuf,
}

impl TechnicianStore {
    /// Creates a store backed by `path`. The file is not touched until used.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored technician, if any.
    ///
    /// A missing file or a blank stored value both yield `None`.
    pub fn load(&self) -> Result<Option<String>, FieldworkError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(FieldworkError::Storage(e)),
        };

        let stored: StoredIdentity =
            serde_json::from_str(&content).map_err(FieldworkError::StoreFormat)?;
        let technician = stored.technician.trim().to_string();

        Ok(Some(technician).filter(|t| !t.is_empty()))
    }

    /// Writes the technician, creating parent directories as needed.
    pub fn save(&self, technician: &str) -> Result<(), FieldworkError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let stored = StoredIdentity {
            technician: technician.to_string(),
        };
        let content = serde_json::to_string_pretty(&stored).map_err(FieldworkError::StoreFormat)?;
        fs::write(&self.path, content)?;

        tracing::debug!(path = %self.path.display(), "Technician identity saved");
        Ok(())
    }
}
