//! Application configuration
//!
//! Base URLs are fixed at construction time; the session identifier is
//! read-or-created once at startup and never mutated afterwards.

use crate::{NimbusError, Result};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};
use uuid::Uuid;

/// Default base path of the weather-advisory backend.
pub const DEFAULT_API_BASE_URL: &str = "https://zainattiq-climeai.hf.space/api";

/// Default base path of the geocoding service (Nominatim).
pub const DEFAULT_GEOCODE_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Configuration for the complete application
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Base URL of the weather-advisory backend
    pub api_base_url: String,

    /// Base URL of the geocoding service
    pub geocode_base_url: String,

    /// Stable per-user session identifier
    pub user_id: String,

    /// Default latitude for location pickers (New York)
    pub default_latitude: f64,

    /// Default longitude for location pickers
    pub default_longitude: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            geocode_base_url: DEFAULT_GEOCODE_BASE_URL.to_string(),
            user_id: Uuid::new_v4().to_string(),
            default_latitude: 40.7128,
            default_longitude: -74.0060,
        }
    }
}

impl AppConfig {
    /// Load the configuration, reading or creating the persisted session id
    pub fn load() -> Self {
        let user_id = load_or_create_user_id().unwrap_or_else(|e| {
            debug!("Falling back to ephemeral session id: {}", e);
            Uuid::new_v4().to_string()
        });

        Self {
            user_id,
            ..Default::default()
        }
    }

    /// Override the backend base URL
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Override the geocoding base URL
    pub fn with_geocode_base_url(mut self, url: impl Into<String>) -> Self {
        self.geocode_base_url = url.into();
        self
    }

    /// Override the session identifier
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.is_empty() {
            return Err(NimbusError::ConfigError("API base URL is required".into()));
        }
        if self.user_id.is_empty() {
            return Err(NimbusError::ConfigError("Session id is required".into()));
        }
        Ok(())
    }
}

fn user_id_path() -> Result<PathBuf> {
    let base = dirs::data_dir()
        .ok_or_else(|| NimbusError::ConfigError("No data directory available".into()))?;
    Ok(base.join("nimbus").join("user_id"))
}

/// Read the persisted session id, creating and persisting a fresh one if absent
fn load_or_create_user_id() -> Result<String> {
    let path = user_id_path()?;

    if let Ok(existing) = fs::read_to_string(&path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            debug!("Loaded session id from {:?}", path);
            return Ok(trimmed.to_string());
        }
    }

    let fresh = Uuid::new_v4().to_string();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, &fresh)?;
    info!("Created new session id at {:?}", path);
    Ok(fresh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert!(!config.user_id.is_empty());
        assert_eq!(config.default_latitude, 40.7128);
    }

    #[test]
    fn test_config_builder() {
        let config = AppConfig::default()
            .with_api_base_url("http://localhost:8080/api")
            .with_user_id("test-user");

        assert_eq!(config.api_base_url, "http://localhost:8080/api");
        assert_eq!(config.user_id, "test-user");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_base_url() {
        let config = AppConfig::default().with_api_base_url("");
        assert!(config.validate().is_err());
    }
}
