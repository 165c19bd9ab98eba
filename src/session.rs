//! Technician identity and the per-run session built from it.
//!
//! The technician category doubles as the remote filter value and as the
//! technician's identity. It is read once at startup and never changes
//! for the lifetime of a [`Session`].

use std::fmt;

use crate::error::FieldworkError;
use crate::store::TechnicianStore;

/// A non-empty technician category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnicianCategory(String);

impl TechnicianCategory {
    /// Creates a category from user or stored input.
    ///
    /// # Errors
    ///
    /// Returns `FieldworkError::Config` if the value is empty after trimming.
    pub fn new(value: impl AsRef<str>) -> Result<Self, FieldworkError> {
        let value = value.as_ref().trim();
        if value.is_empty() {
            return Err(FieldworkError::missing_technician());
        }
        Ok(Self(value.to_string()))
    }

    /// Returns the category as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TechnicianCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Explicit session context handed to the fetcher and submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    technician: TechnicianCategory,
}

impl Session {
    /// Creates a session for a technician.
    pub fn new(technician: TechnicianCategory) -> Self {
        Self { technician }
    }

    /// Returns the technician this session belongs to.
    pub fn technician(&self) -> &TechnicianCategory {
        &self.technician
    }

    /// Resolves the startup session from the local store.
    ///
    /// The stored identity wins. When the store is empty and `preset` is
    /// given, the preset is persisted and used. Returns `Ok(None)` when
    /// neither exists; the caller must then ask the technician once.
    pub fn resolve(
        store: &TechnicianStore,
        preset: Option<&str>,
    ) -> Result<Option<Self>, FieldworkError> {
        if let Some(stored) = store.load()? {
            if let Some(preset) = preset.filter(|p| p.trim() != stored) {
                tracing::warn!(
                    stored = %stored,
                    preset = %preset.trim(),
                    "Ignoring FIELDWORK_TECHNICIAN, a technician is already stored"
                );
            }
            return Ok(Some(Self::new(TechnicianCategory::new(stored)?)));
        }

        match preset {
            Some(preset) => {
                let technician = TechnicianCategory::new(preset)?;
                store.save(technician.as_str())?;
                Ok(Some(Self::new(technician)))
            }
            None => Ok(None),
        }
    }
}
