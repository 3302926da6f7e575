//! `TravelCompanion` - one merged view of a place
//!
//! This library geocodes a place description, then combines the weather at
//! that spot with nearby landmarks into a single response, degrading
//! gracefully when any upstream service fails.

pub mod aggregation;
pub mod api;
pub mod config;
pub mod envelope;
pub mod error;
pub mod landmarks;
pub mod models;
pub mod providers;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use aggregation::AggregationService;
pub use config::TravelCompanionConfig;
pub use envelope::Envelope;
pub use error::{ProviderError, ProviderKind, TravelCompanionError};
pub use models::{AggregatedRequest, AggregatedResult, Landmark, PlaceQuery};
pub use providers::{LandmarkProvider, LocationProvider, Outcome, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
