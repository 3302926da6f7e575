//! Error types and handling for the `TravelCompanion` service

use std::fmt;

use thiserror::Error;

/// Main error type for the `TravelCompanion` application
#[derive(Error, Debug)]
pub enum TravelCompanionError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },
}

impl TravelCompanionError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TravelCompanionError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            TravelCompanionError::Validation { message } => {
                format!("Invalid input: {message}")
            }
        }
    }
}

/// The remote API a [`ProviderError`] originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Location,
    Weather,
    Landmark,
}

impl ProviderKind {
    /// Lowercase noun used inside sentences, e.g. "weather data"
    #[must_use]
    pub fn noun(self) -> &'static str {
        match self {
            ProviderKind::Location => "location",
            ProviderKind::Weather => "weather",
            ProviderKind::Landmark => "landmark",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProviderKind::Location => "Location",
            ProviderKind::Weather => "Weather",
            ProviderKind::Landmark => "Landmark",
        };
        f.write_str(label)
    }
}

/// Failure taxonomy shared by every provider adapter.
///
/// The `Display` output is the message surfaced verbatim to callers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Network, timeout, connection or body decoding failure
    #[error("{0}")]
    Transport(String),

    /// The provider answered with a non-success HTTP status
    #[error("{provider} API error: {status}")]
    UpstreamStatus { provider: ProviderKind, status: u16 },

    /// The provider answered successfully but without usable records
    #[error("No {provider} data found")]
    EmptyResult { provider: ProviderKind },
}

impl ProviderError {
    /// Wrap an underlying transport cause, prefixed with the provider it came from
    pub fn transport(provider: ProviderKind, cause: impl fmt::Display) -> Self {
        Self::Transport(format!(
            "An error occurred fetching {} data: {cause}",
            provider.noun()
        ))
    }

    pub fn upstream_status(provider: ProviderKind, status: u16) -> Self {
        Self::UpstreamStatus { provider, status }
    }

    pub fn empty(provider: ProviderKind) -> Self {
        Self::EmptyResult { provider }
    }
}
