//! Data models for the TravelCompanion service
//!
//! This module contains the request and response types organized by concern:
//! - Location: place queries, coordinates and resolved addresses
//! - Weather: point-in-time weather snapshots
//! - Landmark: points of interest and how to filter/sort them
//! - Aggregate: the merged request and response of the aggregation endpoint

pub mod aggregate;
pub mod landmark;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use aggregate::{AggregatedRequest, AggregatedResult};
pub use landmark::{Landmark, LandmarkQuery, SortDirection, SortField};
pub use location::{AddressInfo, Coordinates, PlaceQuery};
pub use weather::{WeatherQuery, WeatherSnapshot};
