//! Open-Meteo API response projections
//!
//! Serde projections of the upstream JSON into exactly the fields the
//! report formatter consumes. Every numeric field is individually
//! optional: the upstream omits values it cannot provide and reports
//! must omit them too rather than zero-fill. Series arrays carry
//! per-slot `Option`s because the API returns explicit nulls.

use serde::Deserialize;

/// Geocoding search response
#[derive(Debug, Deserialize)]
pub struct GeocodingResponse {
    pub results: Option<Vec<GeocodedPlace>>,
}

/// A single geocoding result
#[derive(Debug, Deserialize, Clone)]
pub struct GeocodedPlace {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub admin1: Option<String>,
    pub country: Option<String>,
}

/// Response for the basic `current_weather=true` lookup
#[derive(Debug, Deserialize)]
pub struct BriefWeatherResponse {
    pub current_weather: Option<BriefCurrent>,
}

/// The compact current-weather block
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BriefCurrent {
    pub temperature: Option<f64>,
    #[serde(rename = "windspeed")]
    pub wind_speed: Option<f64>,
    #[serde(rename = "winddirection")]
    pub wind_direction: Option<f64>,
    #[serde(rename = "weathercode")]
    pub weather_code: Option<u32>,
    pub is_day: Option<u8>,
}

/// Response for the detailed `current` field list
#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    pub current: Option<CurrentConditions>,
}

/// Detailed current conditions
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CurrentConditions {
    #[serde(rename = "temperature_2m")]
    pub temperature: Option<f64>,
    #[serde(rename = "relative_humidity_2m")]
    pub humidity: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub precipitation: Option<f64>,
    pub weather_code: Option<u32>,
    pub cloud_cover: Option<f64>,
    pub pressure_msl: Option<f64>,
    pub surface_pressure: Option<f64>,
    #[serde(rename = "wind_speed_10m")]
    pub wind_speed: Option<f64>,
    #[serde(rename = "wind_direction_10m")]
    pub wind_direction: Option<f64>,
    #[serde(rename = "wind_gusts_10m")]
    pub wind_gusts: Option<f64>,
    pub uv_index: Option<f64>,
}

/// Response for the hourly forecast
#[derive(Debug, Deserialize)]
pub struct HourlyForecastResponse {
    pub hourly: Option<HourlySeries>,
}

/// Hourly forecast series
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct HourlySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m")]
    pub temperature: Option<Vec<Option<f64>>>,
    pub precipitation_probability: Option<Vec<Option<f64>>>,
    pub precipitation: Option<Vec<Option<f64>>>,
    pub weather_code: Option<Vec<Option<u32>>>,
    #[serde(rename = "wind_speed_10m")]
    pub wind_speed: Option<Vec<Option<f64>>>,
    pub uv_index: Option<Vec<Option<f64>>>,
}

/// Response for the daily forecast
#[derive(Debug, Deserialize)]
pub struct DailyForecastResponse {
    pub daily: Option<DailySeries>,
}

/// Daily forecast series
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct DailySeries {
    #[serde(default)]
    pub time: Vec<String>,
    pub weather_code: Option<Vec<Option<u32>>>,
    #[serde(rename = "temperature_2m_max")]
    pub temperature_max: Option<Vec<Option<f64>>>,
    #[serde(rename = "temperature_2m_min")]
    pub temperature_min: Option<Vec<Option<f64>>>,
    pub precipitation_sum: Option<Vec<Option<f64>>>,
    pub precipitation_probability_max: Option<Vec<Option<f64>>>,
    #[serde(rename = "wind_speed_10m_max")]
    pub wind_speed_max: Option<Vec<Option<f64>>>,
    #[serde(rename = "wind_gusts_10m_max")]
    pub wind_gusts_max: Option<Vec<Option<f64>>>,
    pub sunrise: Option<Vec<Option<String>>>,
    pub sunset: Option<Vec<Option<String>>>,
    pub uv_index_max: Option<Vec<Option<f64>>>,
}

/// Response for the current air-quality lookup
#[derive(Debug, Deserialize)]
pub struct AirQualityResponse {
    pub current: Option<AirQualityConditions>,
}

/// Current air-quality readings
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct AirQualityConditions {
    pub european_aqi: Option<f64>,
    pub us_aqi: Option<f64>,
    pub pm10: Option<f64>,
    pub pm2_5: Option<f64>,
    pub carbon_monoxide: Option<f64>,
    pub nitrogen_dioxide: Option<f64>,
    pub sulphur_dioxide: Option<f64>,
    pub ozone: Option<f64>,
}

/// Index into a per-slot optional series, treating a missing series, a
/// short series, and an explicit null slot all as absent.
pub fn slot<T: Copy>(series: &Option<Vec<Option<T>>>, index: usize) -> Option<T> {
    series.as_ref().and_then(|values| values.get(index)).copied().flatten()
}
