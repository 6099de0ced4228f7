//! Location resolution
//!
//! Walks the classifier's output to a final [`ResolvedLocation`]:
//! coordinate pairs pass straight through, grid references go through the
//! grid transform, and everything else (including grid strings that fail
//! to convert) is geocoded as a place name. Only the place-name path
//! costs a network round-trip.

use crate::api::WeatherApiClient;
use crate::classifier::{LocationQuery, classify};
use crate::models::ResolvedLocation;
use crate::{MeshcastError, Result, mgrs};
use tracing::debug;

/// Resolve raw query text into coordinates, geocoding only when needed.
pub async fn resolve_location(api: &WeatherApiClient, input: &str) -> Result<ResolvedLocation> {
    match classify(input) {
        LocationQuery::Coordinates {
            latitude,
            longitude,
        } => {
            debug!("Parsed as lat/lon: {latitude}, {longitude}");
            Ok(ResolvedLocation::new(latitude, longitude))
        }
        LocationQuery::GridReference(reference) => match mgrs::to_lat_lon(&reference) {
            Ok((latitude, longitude)) => {
                debug!("Parsed grid reference {reference} to lat/lon: {latitude}, {longitude}");
                Ok(ResolvedLocation::new(latitude, longitude))
            }
            Err(e) => {
                // Digit-heavy place queries can look like grid references;
                // a conversion error is not terminal.
                debug!("Grid conversion error for '{reference}': {e}; retrying as place name");
                geocode_place(api, input).await
            }
        },
        LocationQuery::PlaceName(name) => geocode_place(api, &name).await,
    }
}

async fn geocode_place(api: &WeatherApiClient, query: &str) -> Result<ResolvedLocation> {
    match api.geocode(query).await? {
        Some(place) => {
            let location: ResolvedLocation = place.into();
            debug!(
                "Geocoded '{query}' to '{}' at {:.4}, {:.4}",
                location.label(),
                location.latitude,
                location.longitude
            );
            Ok(location)
        }
        None => Err(MeshcastError::classification(query)),
    }
}
