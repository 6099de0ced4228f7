//! Input classification for inbound location queries
//!
//! Classifies the raw text of a message into one of three query shapes:
//! a decimal latitude/longitude pair, a military grid reference, or a
//! free-text place name. Classification is an ordered cascade of pure
//! checks over the input; unambiguous numeric shapes win before anything
//! that would cost a geocoding round-trip.

use regex::Regex;
use std::sync::LazyLock;

static LAT_LON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(-?\d{1,3}(?:\.\d+)?)\s*,\s*(-?\d{1,3}(?:\.\d+)?)\s*$")
        .expect("valid lat/lon pattern")
});

static GRID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*\d{1,2}[C-HJ-NP-X][A-Z]{2}\d{2,10}\s*$").expect("valid grid pattern")
});

/// A classified location query, ready for resolution
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// A decimal coordinate pair, already range-checked against WGS84
    Coordinates { latitude: f64, longitude: f64 },
    /// A string shaped like a military grid reference (not yet converted)
    GridReference(String),
    /// Anything else: a place-name candidate for geocoding
    PlaceName(String),
}

/// Classify raw query text into a [`LocationQuery`].
///
/// Precedence: decimal pair, then grid reference, then place name. A pair
/// that parses but fails the WGS84 range check is not a terminal failure;
/// it continues down the cascade so that number-heavy place queries still
/// reach geocoding. The place-name variant carries the original untrimmed
/// text, which is what the geocoding API receives.
#[must_use]
pub fn classify(input: &str) -> LocationQuery {
    let trimmed = input.trim();

    if let Some(captures) = LAT_LON_RE.captures(trimmed) {
        let lat = captures[1].parse::<f64>();
        let lon = captures[2].parse::<f64>();
        if let (Ok(latitude), Ok(longitude)) = (lat, lon) {
            if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
                return LocationQuery::Coordinates {
                    latitude,
                    longitude,
                };
            }
        }
    }

    if GRID_RE.is_match(trimmed) {
        return LocationQuery::GridReference(trimmed.to_string());
    }

    LocationQuery::PlaceName(input.to_string())
}
