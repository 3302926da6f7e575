//! Landmark post-processing
//!
//! Pure transformations applied to the list returned by the landmark
//! provider: an optional case-insensitive name filter followed by an
//! optional sort. Both stages are stable and compose independently.

use std::cmp::Reverse;

use tracing::debug;

use crate::models::{Landmark, LandmarkQuery, SortDirection, SortField};

/// Output of [`process`]: the shaped list plus an optional note for the caller
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedLandmarks {
    pub landmarks: Vec<Landmark>,
    pub note: Option<String>,
}

/// Apply the name filter, then the sort, as requested by `query`
#[must_use]
pub fn process(landmarks: Vec<Landmark>, query: &LandmarkQuery) -> ProcessedLandmarks {
    let (filtered, note) = match query.name_filter.as_deref() {
        Some(filter) => filter_by_name(landmarks, filter),
        None => (landmarks, None),
    };

    let landmarks = match query.sort_by.as_deref() {
        Some(field) => sort_landmarks(filtered, field, query.sort_order),
        None => filtered,
    };

    ProcessedLandmarks { landmarks, note }
}

/// Keep landmarks whose name contains `filter`, ignoring case.
///
/// A blank filter is a no-op. When nothing matches, the unfiltered list is
/// returned together with a note saying so.
#[must_use]
pub fn filter_by_name(landmarks: Vec<Landmark>, filter: &str) -> (Vec<Landmark>, Option<String>) {
    if filter.trim().is_empty() {
        return (landmarks, None);
    }

    let needle = filter.to_lowercase();
    let matches: Vec<Landmark> = landmarks
        .iter()
        .filter(|landmark| landmark.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    if matches.is_empty() {
        debug!("Name filter '{}' matched none of {} landmarks", filter, landmarks.len());
        let note =
            format!("No landmarks found with the name '{filter}'. Returning full landmark list.");
        (landmarks, Some(note))
    } else {
        debug!("Name filter '{}' kept {} of {} landmarks", filter, matches.len(), landmarks.len());
        (matches, Some(format!("Landmarks filtered by name '{filter}'.")))
    }
}

/// Sort by a named field. Unknown fields leave the order untouched.
#[must_use]
pub fn sort_landmarks(
    mut landmarks: Vec<Landmark>,
    field: &str,
    direction: SortDirection,
) -> Vec<Landmark> {
    let Some(field) = SortField::parse(field) else {
        debug!("Ignoring unsupported landmark sort field '{}'", field);
        return landmarks;
    };

    match (field, direction) {
        (SortField::Name, SortDirection::Asc) => {
            landmarks.sort_by_cached_key(|landmark| landmark.name.to_lowercase());
        }
        (SortField::Name, SortDirection::Desc) => {
            landmarks.sort_by_cached_key(|landmark| Reverse(landmark.name.to_lowercase()));
        }
    }
    landmarks
}
