//! Point-of-interest models and the knobs that shape the landmark list

use serde::{Deserialize, Serialize};

use super::Coordinates;

/// One nearby point of interest
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Landmark {
    pub name: String,
    /// Short name of the primary category, e.g. "Museum"
    pub short_category: String,
    pub formatted_address: String,
}

impl Landmark {
    pub fn new(
        name: impl Into<String>,
        short_category: impl Into<String>,
        formatted_address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            short_category: short_category.into(),
            formatted_address: formatted_address.into(),
        }
    }
}

/// Sort order for the landmark list. Anything unrecognized means ascending.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl From<&str> for SortDirection {
    fn from(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

impl From<Option<String>> for SortDirection {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(SortDirection::from).unwrap_or_default()
    }
}

/// Landmark fields the list can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
}

impl SortField {
    /// Recognize a field name; `None` for anything unsupported
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Some(SortField::Name),
            _ => None,
        }
    }
}

/// Landmark search around a set of coordinates plus post-processing options
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkQuery {
    #[serde(flatten)]
    pub coordinates: Coordinates,
    /// Provider category filter, passed through untouched
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub name_filter: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: SortDirection,
}
