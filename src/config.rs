//! Configuration management for the Meshcast assistant
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings. Configuration
//! is loaded once at startup and passed into each component by value;
//! nothing reads it from ambient global state.

use crate::MeshcastError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the Meshcast assistant
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MeshcastConfig {
    /// Upstream API endpoints and timeouts
    #[serde(default)]
    pub api: ApiConfig,
    /// Bot identity and storage settings
    #[serde(default)]
    pub bot: BotConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Upstream API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the weather forecast API
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    /// Base URL of the air-quality API
    #[serde(default = "default_air_quality_url")]
    pub air_quality_url: String,
    /// Base URL of the geocoding API
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    /// URL of the latest GOES CONUS geocolor image
    #[serde(default = "default_imagery_url")]
    pub imagery_url: String,
    /// Request timeout for data APIs, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Request timeout for the satellite image fetch, in seconds
    #[serde(default = "default_image_timeout")]
    pub image_timeout_seconds: u64,
}

/// Bot identity and storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Display name announced to peers
    #[serde(default = "default_bot_name")]
    pub name: String,
    /// Directory for messenger storage (attachments, identity files)
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_air_quality_url() -> String {
    "https://air-quality-api.open-meteo.com/v1/air-quality".to_string()
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}

fn default_imagery_url() -> String {
    "https://cdn.star.nesdis.noaa.gov/GOES16/ABI/CONUS/GEOCOLOR/latest.jpg".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_image_timeout() -> u64 {
    20
}

fn default_bot_name() -> String {
    "Meshcast Weather".to_string()
}

fn default_storage_path() -> String {
    "data/weather".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            forecast_url: default_forecast_url(),
            air_quality_url: default_air_quality_url(),
            geocoding_url: default_geocoding_url(),
            imagery_url: default_imagery_url(),
            timeout_seconds: default_timeout(),
            image_timeout_seconds: default_image_timeout(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            storage_path: default_storage_path(),
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

impl MeshcastConfig {
    /// Load configuration from the default file location and environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from the specified path, falling back to the
    /// default location when none is given
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

        // Environment variable overrides with MESHCAST_ prefix
        builder = builder.add_source(
            Environment::with_prefix("MESHCAST")
                .separator("_")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: MeshcastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("meshcast").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_urls()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_urls(&self) -> Result<()> {
        for (label, url) in [
            ("forecast", &self.api.forecast_url),
            ("air quality", &self.api.air_quality_url),
            ("geocoding", &self.api.geocoding_url),
            ("imagery", &self.api.imagery_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(MeshcastError::config(format!(
                    "The {label} URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.api.timeout_seconds == 0 || self.api.timeout_seconds > 300 {
            return Err(
                MeshcastError::config("API timeout must be between 1 and 300 seconds").into(),
            );
        }

        if self.api.image_timeout_seconds == 0 || self.api.image_timeout_seconds > 300 {
            return Err(
                MeshcastError::config("Image timeout must be between 1 and 300 seconds").into(),
            );
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(MeshcastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        if self.bot.name.is_empty() {
            return Err(MeshcastError::config("Bot name cannot be empty").into());
        }

        Ok(())
    }
}
