//! HTTP client for the Open-Meteo weather, air-quality, and geocoding APIs
//!
//! One `reqwest::Client` with a bounded timeout serves every request.
//! Calls are single attempts: a timeout or a non-success status surfaces
//! as a transport failure for the orchestrator to degrade, never a retry.

use crate::config::ApiConfig;
use crate::models::openmeteo::{
    AirQualityConditions, AirQualityResponse, BriefCurrent, BriefWeatherResponse,
    CurrentConditions, CurrentWeatherResponse, DailyForecastResponse, DailySeries, GeocodedPlace,
    GeocodingResponse, HourlyForecastResponse, HourlySeries,
};
use crate::{MeshcastError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,\
precipitation,weather_code,cloud_cover,pressure_msl,surface_pressure,wind_speed_10m,\
wind_direction_10m,wind_gusts_10m,uv_index";

const HOURLY_FIELDS: &str =
    "temperature_2m,precipitation_probability,precipitation,weather_code,wind_speed_10m,uv_index";

const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,\
precipitation_sum,precipitation_probability_max,wind_speed_10m_max,wind_gusts_10m_max,\
sunrise,sunset,uv_index_max";

const AIR_QUALITY_FIELDS: &str =
    "european_aqi,us_aqi,pm10,pm2_5,carbon_monoxide,nitrogen_dioxide,sulphur_dioxide,ozone";

/// Client for the upstream weather, air-quality, and geocoding APIs
pub struct WeatherApiClient {
    client: Client,
    config: ApiConfig,
}

impl WeatherApiClient {
    /// Create a new API client with the configured timeout
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("Meshcast/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    /// The shared HTTP client, for collaborators with their own endpoints
    #[must_use]
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    /// Geocode a place name, returning the single best match if any
    pub async fn geocode(&self, name: &str) -> Result<Option<GeocodedPlace>> {
        info!("Geocoding location: '{name}'");
        let url = format!(
            "{}?name={}&count=1&language=en&format=json",
            self.config.geocoding_url,
            urlencoding::encode(name)
        );

        let response: GeocodingResponse = self.fetch(&url).await?;
        let place = response.results.unwrap_or_default().into_iter().next();
        match &place {
            Some(result) => debug!(
                "Geocoded '{name}' to '{}' at {:.4}, {:.4}",
                result.name, result.latitude, result.longitude
            ),
            None => warn!("No geocoding results found for '{name}'"),
        }
        Ok(place)
    }

    /// Fetch the compact current-weather block
    pub async fn current_brief(&self, latitude: f64, longitude: f64) -> Result<BriefCurrent> {
        let url = format!(
            "{}?latitude={latitude}&longitude={longitude}&current_weather=true\
             &temperature_unit=celsius&windspeed_unit=kmh&precipitation_unit=mm",
            self.config.forecast_url
        );

        let response: BriefWeatherResponse = self.fetch(&url).await?;
        response
            .current_weather
            .ok_or_else(|| MeshcastError::malformed("no current_weather block in response"))
    }

    /// Fetch detailed current conditions
    pub async fn current_detail(&self, latitude: f64, longitude: f64) -> Result<CurrentConditions> {
        let url = format!(
            "{}?latitude={latitude}&longitude={longitude}&current={CURRENT_FIELDS}\
             &temperature_unit=celsius&wind_speed_unit=kmh&precipitation_unit=mm",
            self.config.forecast_url
        );

        let response: CurrentWeatherResponse = self.fetch(&url).await?;
        response
            .current
            .ok_or_else(|| MeshcastError::malformed("no current block in response"))
    }

    /// Fetch the hourly forecast series (two days of slots)
    pub async fn hourly_forecast(&self, latitude: f64, longitude: f64) -> Result<HourlySeries> {
        let url = format!(
            "{}?latitude={latitude}&longitude={longitude}&hourly={HOURLY_FIELDS}\
             &temperature_unit=celsius&wind_speed_unit=kmh&precipitation_unit=mm\
             &forecast_days=2&timezone=auto",
            self.config.forecast_url
        );

        let response: HourlyForecastResponse = self.fetch(&url).await?;
        response
            .hourly
            .ok_or_else(|| MeshcastError::malformed("no hourly block in response"))
    }

    /// Fetch the seven-day daily forecast series
    pub async fn daily_forecast(&self, latitude: f64, longitude: f64) -> Result<DailySeries> {
        let url = format!(
            "{}?latitude={latitude}&longitude={longitude}&daily={DAILY_FIELDS}\
             &temperature_unit=celsius&wind_speed_unit=kmh&precipitation_unit=mm\
             &forecast_days=7&timezone=auto",
            self.config.forecast_url
        );

        let response: DailyForecastResponse = self.fetch(&url).await?;
        response
            .daily
            .ok_or_else(|| MeshcastError::malformed("no daily block in response"))
    }

    /// Fetch current air-quality readings
    pub async fn air_quality(&self, latitude: f64, longitude: f64) -> Result<AirQualityConditions> {
        let url = format!(
            "{}?latitude={latitude}&longitude={longitude}&current={AIR_QUALITY_FIELDS}",
            self.config.air_quality_url
        );

        let response: AirQualityResponse = self.fetch(&url).await?;
        response
            .current
            .ok_or_else(|| MeshcastError::malformed("no current block in air-quality response"))
    }

    /// One GET request, decoded as JSON. Non-success statuses surface as
    /// transport failures, undecodable bodies as malformed responses.
    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {url}");
        let response = self.client.get(url).send().await?.error_for_status()?;
        response
            .json()
            .await
            .map_err(|e| MeshcastError::malformed(format!("failed to decode response: {e}")))
    }
}
