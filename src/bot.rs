//! Request orchestration
//!
//! One inbound message runs classify → resolve → fetch → format →
//! region gate → reply, strictly in order, with no retries. Failures
//! degrade to one of two fixed replies; raw errors only ever reach the
//! logs.

use crate::api::WeatherApiClient;
use crate::config::MeshcastConfig;
use crate::imagery::{fetch_conus_image, is_in_conus};
use crate::location_resolver::resolve_location;
use crate::messaging::{InboundMessage, Messenger};
use crate::models::ResolvedLocation;
use crate::{MeshcastError, Result, report};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Reply when no classification path produced a usable location
const UNRESOLVED_REPLY: &str =
    "I couldn't understand that location. Type 'help' for format examples.";

/// Reply when the weather data could not be fetched or formatted
const FETCH_FAILED_REPLY: &str = "Sorry, I couldn't fetch the weather for that location.";

const HELP_TEXT: &str = "Weather Bot Commands:\n\n\
Basic usage: Send a location to get current weather\n\
- City name (e.g., London)\n\
- Latitude,Longitude (e.g., 40.71,-74.01)\n\
- Grid coordinates (e.g., 18TWL123456)\n\n\
Advanced commands:\n\
- 'current <location>' - Detailed current weather\n\
- 'hourly <location>' - 12-hour forecast\n\
- 'forecast <location>' - 7-day forecast\n\
- 'air <location>' - Air quality index\n\
- 'detailed <location>' - Everything at once\n\n\
For US locations, I'll include a GOES satellite image!";

/// Report variant selected by the leading command keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Current,
    Hourly,
    Forecast,
    Air,
    Detailed,
    /// No keyword: the whole message is the location
    Default,
}

impl Command {
    fn keyword(self) -> Option<&'static str> {
        match self {
            Command::Current => Some("current"),
            Command::Hourly => Some("hourly"),
            Command::Forecast => Some("forecast"),
            Command::Air => Some("air"),
            Command::Detailed => Some("detailed"),
            Command::Default => None,
        }
    }
}

/// Split an inbound message into its command keyword and location text.
///
/// A keyword counts only when followed by a space; a bare keyword or an
/// unknown prefix leaves the whole message as the location.
#[must_use]
pub fn parse_command(content: &str) -> (Command, String) {
    let lowered = content.to_lowercase();
    for command in [
        Command::Current,
        Command::Hourly,
        Command::Forecast,
        Command::Detailed,
        Command::Air,
    ] {
        let keyword = command.keyword().unwrap_or_default();
        if lowered.starts_with(&format!("{keyword} ")) {
            let location = content[keyword.len()..].trim().to_string();
            return (command, location);
        }
    }
    (Command::Default, content.to_string())
}

/// The weather assistant: resolves locations, fetches and formats
/// reports, and replies through the injected messenger capability.
pub struct WeatherBot {
    config: MeshcastConfig,
    api: WeatherApiClient,
}

impl WeatherBot {
    /// Create the assistant from its configuration
    pub fn new(config: MeshcastConfig) -> Result<Self> {
        let api = WeatherApiClient::new(config.api.clone())?;
        Ok(Self { config, api })
    }

    /// Handle one inbound message from start to finish.
    ///
    /// Returns an error only when the reply itself could not be sent;
    /// resolution and fetch failures are degraded to fixed reply texts.
    pub async fn handle_message(
        &self,
        message: &InboundMessage,
        messenger: &dyn Messenger,
    ) -> Result<()> {
        let content = message.content.trim();
        info!("Handling message from {}", message.sender);

        if content.to_lowercase() == "help" {
            return messenger.send_text(&message.sender, HELP_TEXT).await;
        }

        let (command, location_str) = parse_command(content);
        debug!("Command {command:?}, location query '{location_str}'");

        let location = match resolve_location(&self.api, &location_str).await {
            Ok(location) => location,
            Err(e) => {
                warn!("Could not resolve '{location_str}': {e}");
                return messenger.send_text(&message.sender, UNRESOLVED_REPLY).await;
            }
        };

        let report = match self.build_report(command, &location).await {
            Ok(report) => report,
            Err(e) => {
                warn!("Could not build report for '{}': {e}", location.label());
                return messenger
                    .send_text(&message.sender, e.user_message())
                    .await;
            }
        };

        match self.regional_attachment(&location).await {
            Some(attachment) => {
                messenger
                    .send_text_with_attachment(&message.sender, &report, &attachment)
                    .await
            }
            None => messenger.send_text(&message.sender, &report).await,
        }
    }

    /// Build the report for the selected variant. Every variant is one
    /// upstream request except `Detailed`, which issues one per section
    /// and skips the sections that fail.
    async fn build_report(&self, command: Command, location: &ResolvedLocation) -> Result<String> {
        let (lat, lon) = (location.latitude, location.longitude);
        match command {
            Command::Current | Command::Default => {
                let current = self.api.current_detail(lat, lon).await?;
                Ok(report::current_detail(location, &current))
            }
            Command::Hourly => {
                let series = self.api.hourly_forecast(lat, lon).await?;
                Ok(report::hourly_forecast(location, &series))
            }
            Command::Forecast => {
                let series = self.api.daily_forecast(lat, lon).await?;
                Ok(report::daily_forecast(location, &series))
            }
            Command::Air => {
                let readings = self.api.air_quality(lat, lon).await?;
                Ok(report::air_quality(location, &readings))
            }
            Command::Detailed => {
                let current = self
                    .section(self.api.current_detail(lat, lon).await, "current")
                    .map(|c| report::current_detail(location, &c));
                let air = self
                    .section(self.api.air_quality(lat, lon).await, "air quality")
                    .map(|a| report::air_quality(location, &a));
                let hourly = self
                    .section(self.api.hourly_forecast(lat, lon).await, "hourly")
                    .map(|h| report::hourly_forecast(location, &h));
                let daily = self
                    .section(self.api.daily_forecast(lat, lon).await, "daily")
                    .map(|d| report::daily_forecast(location, &d));

                report::detailed(current, air, hourly, daily)
                    .ok_or_else(|| MeshcastError::malformed("every detailed section failed"))
            }
        }
    }

    fn section<T>(&self, result: Result<T>, label: &str) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Skipping {label} section: {e}");
                None
            }
        }
    }

    /// Fetch the satellite image when the location is inside the CONUS
    /// box. Fetch failures degrade to a text-only reply.
    async fn regional_attachment(
        &self,
        location: &ResolvedLocation,
    ) -> Option<crate::messaging::Attachment> {
        if !is_in_conus(location.latitude, location.longitude) {
            debug!(
                "Location ({:.2}, {:.2}) is outside CONUS; skipping image fetch",
                location.latitude, location.longitude
            );
            return None;
        }

        debug!(
            "Location ({:.2}, {:.2}) is in CONUS; fetching satellite image",
            location.latitude, location.longitude
        );
        fetch_conus_image(
            self.api.http_client(),
            &self.config.api.imagery_url,
            Duration::from_secs(self.config.api.image_timeout_seconds),
        )
        .await
    }
}
