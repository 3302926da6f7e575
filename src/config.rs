//! Configuration management for the `TravelCompanion` service
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings.

use crate::TravelCompanionError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "TRAVEL_COMPANION_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "config/default.toml";

/// Root configuration structure for the `TravelCompanion` service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelCompanionConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Geocoding API configuration
    pub location: LocationConfig,
    /// Weather API configuration
    pub weather: WeatherConfig,
    /// Points-of-interest API configuration
    pub landmarks: LandmarkConfig,
    /// Aggregation behaviour
    pub aggregation: AggregationConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Maximum accepted request body size
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

/// Geocoding API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_location_base_url")]
    pub base_url: String,
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    pub api_key: Option<String>,
    /// Unit system requested from the API (standard, metric, imperial)
    #[serde(default = "default_weather_units")]
    pub units: String,
    #[serde(default = "default_weather_language")]
    pub language: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Points-of-interest API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkConfig {
    #[serde(default = "default_landmarks_base_url")]
    pub base_url: String,
    pub api_key: Option<String>,
    /// Maximum number of places requested
    #[serde(default = "default_landmarks_limit")]
    pub limit: u32,
    /// Response fields requested from the API
    #[serde(default = "default_landmarks_fields")]
    pub fields: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// What to do with the dependent calls when geocoding fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationFallback {
    /// Still search landmarks around (0, 0); weather is skipped
    #[default]
    DefaultCoordinates,
    /// Skip weather and landmarks entirely
    Skip,
}

/// Aggregation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregationConfig {
    #[serde(default)]
    pub location_fallback: LocationFallback,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_body_limit() -> usize {
    64 * 1024
}

fn default_location_base_url() -> String {
    "https://api.geoapify.com/v1/geocode/search".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/3.0/onecall/timemachine".to_string()
}

fn default_weather_units() -> String {
    "metric".to_string()
}

fn default_weather_language() -> String {
    "en".to_string()
}

fn default_landmarks_base_url() -> String {
    "https://api.foursquare.com/v3/places/nearby".to_string()
}

fn default_landmarks_limit() -> u32 {
    50
}

fn default_landmarks_fields() -> String {
    "fsq_id,name,categories,location,link".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            base_url: default_location_base_url(),
            api_key: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            api_key: None,
            units: default_weather_units(),
            language: default_weather_language(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for LandmarkConfig {
    fn default() -> Self {
        Self {
            base_url: default_landmarks_base_url(),
            api_key: None,
            limit: default_landmarks_limit(),
            fields: default_landmarks_fields(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl TravelCompanionConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path
            .or_else(Self::get_config_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. TRAVEL_COMPANION_WEATHER__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("TRAVEL_COMPANION")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TravelCompanionConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Config file named by the environment, if any
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from)
    }

    /// Apply default values to blank configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.server.body_limit_bytes == 0 {
            self.server.body_limit_bytes = default_body_limit();
        }
        if self.location.base_url.is_empty() {
            self.location.base_url = default_location_base_url();
        }
        if self.location.timeout_seconds == 0 {
            self.location.timeout_seconds = default_timeout();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.units.is_empty() {
            self.weather.units = default_weather_units();
        }
        if self.weather.language.is_empty() {
            self.weather.language = default_weather_language();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_timeout();
        }
        if self.landmarks.base_url.is_empty() {
            self.landmarks.base_url = default_landmarks_base_url();
        }
        if self.landmarks.fields.is_empty() {
            self.landmarks.fields = default_landmarks_fields();
        }
        if self.landmarks.timeout_seconds == 0 {
            self.landmarks.timeout_seconds = default_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        let keys = [
            ("Location", &self.location.api_key),
            ("Weather", &self.weather.api_key),
            ("Landmark", &self.landmarks.api_key),
        ];

        for (name, key) in keys {
            if let Some(api_key) = key {
                if api_key.trim().is_empty() {
                    return Err(TravelCompanionError::config(format!(
                        "{name} API key cannot be empty if provided. Either remove it or provide a valid key."
                    ))
                    .into());
                }
            } else {
                tracing::warn!("{} API key is not configured; requests will likely be rejected", name);
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(TravelCompanionError::config("Server port cannot be 0").into());
        }

        let timeouts = [
            ("Location", self.location.timeout_seconds),
            ("Weather", self.weather.timeout_seconds),
            ("Landmark", self.landmarks.timeout_seconds),
        ];
        for (name, timeout) in timeouts {
            if timeout > 300 {
                return Err(TravelCompanionError::config(format!(
                    "{name} API timeout cannot exceed 300 seconds"
                ))
                .into());
            }
        }

        if !(1..=50).contains(&self.landmarks.limit) {
            return Err(
                TravelCompanionError::config("Landmark limit must be between 1 and 50").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TravelCompanionError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TravelCompanionError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("Location", &self.location.base_url),
            ("Weather", &self.weather.base_url),
            ("Landmark", &self.landmarks.base_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(TravelCompanionError::config(format!(
                    "{name} API base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Socket address the server binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Resolve the config file path from the first CLI argument, if given
#[must_use]
pub fn path_from_args(args: &[String]) -> Option<PathBuf> {
    args.get(1).map(PathBuf::from)
}
