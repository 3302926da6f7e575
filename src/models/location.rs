//! Location models: what the caller asks for and what the geocoder resolves

use serde::{Deserialize, Serialize};

/// Structured address used verbatim as geocoding parameters
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlaceQuery {
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub street: Option<String>,
}

impl PlaceQuery {
    /// True when no field carries anything but whitespace
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.fields()
            .into_iter()
            .all(|(_, value)| value.is_none_or(|v| v.trim().is_empty()))
    }

    /// Geocoder parameter names paired with their values
    #[must_use]
    pub fn fields(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("country", self.country.as_deref()),
            ("state", self.state.as_deref()),
            ("city", self.city.as_deref()),
            ("postcode", self.postal_code.as_deref()),
            ("street", self.street.as_deref()),
        ]
    }
}

/// Latitude/longitude pair in decimal degrees.
///
/// `Default` is the (0, 0) sentinel used when geocoding failed.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format as `lat,lon`, the shape point-of-interest APIs expect
    #[must_use]
    pub fn to_lat_lon(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// A successfully resolved place
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddressInfo {
    pub formatted_address: String,
    pub coordinates: Coordinates,
}
