//! Configuration management for the aerodesk service
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings. The flight
//! provider credential in particular must come from here; it never
//! appears as a literal in source.

use crate::AerodeskError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the aerodesk service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AerodeskConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Flight-data provider settings
    #[serde(default)]
    pub flights: FlightsConfig,
    /// Airport reference-dataset settings
    #[serde(default)]
    pub airports: AirportsConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the web server listens on
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Flight-data provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightsConfig {
    /// Provider access key; live flight lookups are disabled when absent
    pub access_key: Option<String>,
    /// Base URL for the flight-data provider
    #[serde(default = "default_flights_base_url")]
    pub base_url: String,
    /// Request timeout in seconds for the outbound call
    #[serde(default = "default_flights_timeout")]
    pub timeout_seconds: u32,
    /// Result-count cap requested from the provider
    #[serde(default = "default_flights_max_results")]
    pub max_results: u32,
}

/// Airport reference-dataset settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirportsConfig {
    /// Where to fetch the dataset from when no local copy exists
    #[serde(default = "default_airports_data_url")]
    pub data_url: String,
    /// Local path of the cached dataset
    #[serde(default = "default_airports_data_path")]
    pub data_path: String,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_server_port() -> u16 {
    8080
}

fn default_flights_base_url() -> String {
    "http://api.aviationstack.com/v1".to_string()
}

fn default_flights_timeout() -> u32 {
    10
}

fn default_flights_max_results() -> u32 {
    25
}

fn default_airports_data_url() -> String {
    "https://raw.githubusercontent.com/jpatokal/openflights/master/data/airports.dat".to_string()
}

fn default_airports_data_path() -> String {
    dirs::cache_dir()
        .map(|dir| dir.join("aerodesk").join("airports.dat"))
        .map_or_else(
            || "airports.dat".to_string(),
            |p| p.to_string_lossy().into_owned(),
        )
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
        }
    }
}

impl Default for FlightsConfig {
    fn default() -> Self {
        Self {
            access_key: None,
            base_url: default_flights_base_url(),
            timeout_seconds: default_flights_timeout(),
            max_results: default_flights_max_results(),
        }
    }
}

impl Default for AirportsConfig {
    fn default() -> Self {
        Self {
            data_url: default_airports_data_url(),
            data_path: default_airports_data_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for AerodeskConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            flights: FlightsConfig::default(),
            airports: AirportsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AerodeskConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. AERODESK_FLIGHTS__ACCESS_KEY
        builder = builder.add_source(
            Environment::with_prefix("AERODESK")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: AerodeskConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("aerodesk").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_access_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the flight provider credential, when present
    pub fn validate_access_key(&self) -> Result<()> {
        if let Some(access_key) = &self.flights.access_key {
            if access_key.is_empty() {
                return Err(AerodeskError::config(
                    "Flight provider access key cannot be empty if provided. Either remove it or provide a valid key."
                ).into());
            }

            if access_key.len() < 8 {
                return Err(AerodeskError::config(
                    "Flight provider access key appears to be invalid (too short). Please check your key."
                ).into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.flights.timeout_seconds == 0 || self.flights.timeout_seconds > 120 {
            return Err(
                AerodeskError::config("Flight provider timeout must be between 1 and 120 seconds")
                    .into(),
            );
        }

        if self.flights.max_results == 0 || self.flights.max_results > 100 {
            return Err(
                AerodeskError::config("Flight provider max results must be between 1 and 100")
                    .into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AerodeskError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        if !self.flights.base_url.starts_with("http://")
            && !self.flights.base_url.starts_with("https://")
        {
            return Err(AerodeskError::config(
                "Flight provider base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        if !self.airports.data_url.starts_with("http://")
            && !self.airports.data_url.starts_with("https://")
        {
            return Err(
                AerodeskError::config("Airport dataset URL must be a valid HTTP or HTTPS URL")
                    .into(),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AerodeskConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.flights.base_url, "http://api.aviationstack.com/v1");
        assert_eq!(config.flights.timeout_seconds, 10);
        assert_eq!(config.flights.max_results, 25);
        assert_eq!(config.logging.level, "info");
        assert!(config.flights.access_key.is_none());
        assert!(config.airports.data_url.contains("airports.dat"));
    }

    #[test]
    fn test_config_validation_missing_access_key() {
        // The credential is optional; only live flight lookups need it
        let config = AerodeskConfig::default();
        assert!(config.validate_access_key().is_ok());
    }

    #[test]
    fn test_config_validation_short_access_key() {
        let mut config = AerodeskConfig::default();
        config.flights.access_key = Some("short".to_string());
        let result = config.validate_access_key();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too short"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = AerodeskConfig::default();
        config.logging.level = "loud".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = AerodeskConfig::default();
        config.flights.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("between 1 and 120 seconds")
        );
    }

    #[test]
    fn test_config_validation_bad_base_url() {
        let mut config = AerodeskConfig::default();
        config.flights.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_path_generation() {
        let path = AerodeskConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("aerodesk"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }
}
