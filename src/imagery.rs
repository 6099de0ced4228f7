//! Regional satellite-image gate
//!
//! Locations inside the continental United States get the latest GOES
//! CONUS geocolor image attached to their weather report. The region is
//! approximated by a fixed bounding box; the fetch is best-effort and
//! every failure degrades to a text-only reply.

use crate::messaging::Attachment;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

const CONUS_LAT_MIN: f64 = 24.0;
const CONUS_LAT_MAX: f64 = 53.0;
const CONUS_LON_MIN: f64 = -125.0;
const CONUS_LON_MAX: f64 = -67.0;

const IMAGE_NAME: &str = "goes_conus_latest.jpg";
const IMAGE_FORMAT: &str = "jpg";

/// Whether the coordinates fall within the approximate CONUS bounding box
#[must_use]
pub fn is_in_conus(latitude: f64, longitude: f64) -> bool {
    (CONUS_LAT_MIN..=CONUS_LAT_MAX).contains(&latitude)
        && (CONUS_LON_MIN..=CONUS_LON_MAX).contains(&longitude)
}

/// Fetch the latest GOES CONUS geocolor image.
///
/// Returns `None` on any failure (transport, status, wrong content type);
/// the caller sends the report without an attachment.
pub async fn fetch_conus_image(client: &Client, url: &str, timeout: Duration) -> Option<Attachment> {
    let response = match client.get(url).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("Satellite image fetch failed: {e}");
            return None;
        }
    };

    if !response.status().is_success() {
        warn!("Satellite image fetch returned status {}", response.status());
        return None;
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    if !content_type.contains("image/jpeg") {
        warn!("Satellite image endpoint returned content type '{content_type}', not JPEG");
        return None;
    }

    match response.bytes().await {
        Ok(bytes) => {
            debug!("Fetched satellite image ({} bytes)", bytes.len());
            Some(Attachment {
                name: IMAGE_NAME.to_string(),
                format: IMAGE_FORMAT.to_string(),
                data: bytes.to_vec(),
            })
        }
        Err(e) => {
            warn!("Failed to read satellite image body: {e}");
            None
        }
    }
}
