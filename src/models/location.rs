//! Resolved location model

use crate::models::openmeteo::GeocodedPlace;
use serde::{Deserialize, Serialize};

/// A location resolved to valid WGS84 coordinates.
///
/// `display_name` is present only when resolution went through geocoding;
/// coordinate and grid-reference inputs leave it empty and reports fall
/// back to the formatted coordinates.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResolvedLocation {
    /// Latitude in decimal degrees, in [-90, 90]
    pub latitude: f64,
    /// Longitude in decimal degrees, in [-180, 180]
    pub longitude: f64,
    /// Human-readable name from geocoding, when available
    pub display_name: Option<String>,
}

impl ResolvedLocation {
    /// Create a location with no display name
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            display_name: None,
        }
    }

    /// Format the coordinates for report headers
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.2}, {:.2}", self.latitude, self.longitude)
    }

    /// The name to print in report headers: the geocoded display name when
    /// present, formatted coordinates otherwise
    #[must_use]
    pub fn label(&self) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| self.format_coordinates())
    }
}

impl From<GeocodedPlace> for ResolvedLocation {
    fn from(place: GeocodedPlace) -> Self {
        let mut display_name = place.name.clone();
        if let Some(admin1) = place
            .admin1
            .as_ref()
            .filter(|a| !a.is_empty() && **a != place.name)
        {
            display_name.push_str(&format!(", {admin1}"));
        }
        if let Some(country) = place.country.as_ref().filter(|c| !c.is_empty()) {
            display_name.push_str(&format!(", {country}"));
        }

        Self {
            latitude: place.latitude,
            longitude: place.longitude,
            display_name: Some(display_name),
        }
    }
}
