//! Configuration management for fieldwork.
//!
//! This module handles loading configuration from environment variables,
//! with validation to ensure all required values are present.

use crate::error::FieldworkError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default Movidesk public API root.
pub const DEFAULT_BASE_URL: &str = "https://api.movidesk.com/public/v1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Action status sent with every work report unless overridden.
pub const DEFAULT_ACTION_STATUS: &str = "Resolvido";

/// The person a submitted report is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerConfig {
    /// Movidesk person ID.
    pub id: String,
    /// Movidesk person type (1 = person).
    pub person_type: u8,
    /// Movidesk profile type (3 = agent and client).
    pub profile_type: u8,
    /// Display name.
    pub business_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
}

/// Configuration for connecting to Movidesk and for the local session.
///
/// The token is stored but never logged or exposed in error messages.
#[derive(Clone)]
pub struct Config {
    /// Base URL for the Movidesk API (e.g., `https://api.movidesk.com/public/v1`).
    pub base_url: String,

    /// Movidesk API token.
    /// This value must never be logged or included in error messages.
    pub token: String,

    /// Owner attributed to submitted reports; omitted from the payload when `None`.
    pub owner: Option<OwnerConfig>,

    /// Owner team attributed to submitted reports; omitted when `None`.
    pub owner_team: Option<String>,

    /// Status written on the ticket action of every report.
    pub action_status: String,

    /// Technician identity to persist when the local store is still empty.
    pub technician: Option<String>,

    /// Location of the technician store file.
    pub state_file: PathBuf,

    /// HTTP request timeout.
    pub timeout: Duration,
}

impl Config {
    /// Creates a configuration with defaults for everything but the endpoint and token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            owner: None,
            owner_team: None,
            action_status: DEFAULT_ACTION_STATUS.to_string(),
            technician: None,
            state_file: Self::default_state_file(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// # Required Environment Variables
    ///
    /// - `MOVIDESK_TOKEN`: The Movidesk API token
    ///
    /// Everything else is optional; see the crate documentation for the list.
    ///
    /// # Errors
    ///
    /// Returns `FieldworkError::Config` if a required variable is missing
    /// or if values fail validation.
    pub fn from_env() -> Result<Self, FieldworkError> {
        let token = Self::get_required_env("MOVIDESK_TOKEN")?;
        Self::validate_token(&token)?;

        let base_url = Self::get_optional_env("MOVIDESK_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Self::validate_base_url(base_url)?;

        let owner = match Self::get_optional_env("MOVIDESK_OWNER_ID") {
            Some(id) => Some(OwnerConfig {
                id,
                person_type: Self::parse_env_or("MOVIDESK_OWNER_PERSON_TYPE", 1)?,
                profile_type: Self::parse_env_or("MOVIDESK_OWNER_PROFILE_TYPE", 3)?,
                business_name: Self::get_optional_env("MOVIDESK_OWNER_NAME").unwrap_or_default(),
                email: Self::get_optional_env("MOVIDESK_OWNER_EMAIL").unwrap_or_default(),
                phone: Self::get_optional_env("MOVIDESK_OWNER_PHONE").unwrap_or_default(),
            }),
            None => None,
        };

        let state_file = Self::get_optional_env("FIELDWORK_STATE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_state_file);

        let timeout_secs: u64 =
            Self::parse_env_or("FIELDWORK_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(FieldworkError::invalid_config(
                "FIELDWORK_HTTP_TIMEOUT_SECS must be greater than zero",
            ));
        }

        Ok(Config {
            base_url,
            token,
            owner,
            owner_team: Self::get_optional_env("MOVIDESK_OWNER_TEAM"),
            action_status: Self::get_optional_env("MOVIDESK_ACTION_STATUS")
                .unwrap_or_else(|| DEFAULT_ACTION_STATUS.to_string()),
            technician: Self::get_optional_env("FIELDWORK_TECHNICIAN"),
            state_file,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Returns the platform location of the technician store.
    pub fn default_state_file() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fieldwork")
            .join("technician.json")
    }

    /// Gets a required environment variable, returning an error if missing or empty.
    fn get_required_env(name: &str) -> Result<String, FieldworkError> {
        Self::get_optional_env(name).ok_or_else(|| FieldworkError::missing_env(name))
    }

    /// Gets an optional environment variable, treating blank values as unset.
    fn get_optional_env(name: &str) -> Option<String> {
        env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn parse_env_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T, FieldworkError> {
        match Self::get_optional_env(name) {
            Some(raw) => raw
                .parse()
                .map_err(|_| FieldworkError::invalid_config(format!("{} is not a valid number", name))),
            None => Ok(default),
        }
    }

    /// Validates and normalizes the base URL.
    fn validate_base_url(url: String) -> Result<String, FieldworkError> {
        let url = url.trim().trim_end_matches('/').to_string();

        let parsed = url::Url::parse(&url).map_err(|e| {
            FieldworkError::invalid_config(format!("MOVIDESK_BASE_URL is not a valid URL: {}", e))
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(FieldworkError::invalid_config(
                "MOVIDESK_BASE_URL must start with http:// or https://",
            ));
        }

        Ok(url)
    }

    /// Validates the token is not a placeholder value.
    fn validate_token(token: &str) -> Result<(), FieldworkError> {
        let token_lower = token.to_lowercase();
        let placeholder_patterns = ["your_token", "your-token", "placeholder", "xxx", "changeme"];

        for pattern in placeholder_patterns {
            if token_lower.contains(pattern) {
                return Err(FieldworkError::invalid_config(
                    "MOVIDESK_TOKEN appears to be a placeholder value",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_base_url_removes_trailing_slash() {
        let result = Config::validate_base_url("https://example.com/public/v1/".to_string()).unwrap();
        assert_eq!(result, "https://example.com/public/v1");
    }

    #[test]
    fn test_validate_base_url_requires_scheme() {
        assert!(Config::validate_base_url("example.com".to_string()).is_err());
        assert!(Config::validate_base_url("ftp://example.com".to_string()).is_err());
    }

    #[test]
    fn test_validate_token_rejects_placeholder() {
        assert!(Config::validate_token("your_token_here").is_err());
    }

    #[test]
    fn test_validate_token_accepts_real_token() {
        assert!(Config::validate_token("1a59394e-9992-48cc").is_ok());
    }

    #[test]
    fn test_new_uses_defaults() {
        let config = Config::new("http://localhost:8080/", "abc");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.action_status, "Resolvido");
        assert!(config.owner.is_none());
        assert!(config.owner_team.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_default_state_file_name() {
        let path = Config::default_state_file();
        assert!(path.ends_with("fieldwork/technician.json"));
    }
}
