//! Report formatting
//!
//! Builds the reply text for each report variant from the typed API
//! projections. Rendering is pure: absent upstream values drop their
//! lines (or line segments) instead of printing zeros, so the same
//! projection always formats to byte-identical text.

use crate::interpret::{
    celsius_to_fahrenheit, describe_weather_code, eu_aqi_category, kmh_to_mph, us_aqi_category,
    uv_category,
};
use crate::models::ResolvedLocation;
use crate::models::openmeteo::{
    AirQualityConditions, BriefCurrent, CurrentConditions, DailySeries, HourlySeries, slot,
};
use chrono::NaiveDateTime;

/// Hour slots rendered by the hourly report
const HOURLY_SLOTS: usize = 12;
/// Days rendered by the daily report
const DAILY_SLOTS: usize = 7;
/// Separator between the sections of a detailed report
const SECTION_RULE_WIDTH: usize = 40;

/// Format the compact current-weather report
#[must_use]
pub fn current_brief(location: &ResolvedLocation, current: &BriefCurrent) -> String {
    let temperature = current.temperature.map_or_else(
        || ("N/A".to_string(), "N/A".to_string()),
        |c| {
            (
                format!("{c}°C"),
                format!("{:.1}°F", celsius_to_fahrenheit(c)),
            )
        },
    );
    let wind = current.wind_speed.map_or_else(
        || ("N/A".to_string(), "N/A".to_string()),
        |kmh| {
            (
                format!("{kmh} kmh"),
                format!("{:.1} mph", kmh_to_mph(kmh)),
            )
        },
    );
    let direction = current
        .wind_direction
        .map_or_else(|| "N/A".to_string(), |d| d.to_string());
    let condition = describe_weather_code(current.weather_code, current.is_day.unwrap_or(1) == 1);

    format!(
        "Weather for {}:\n- Temp: {} ({})\n- Wind: {} ({}) from {direction}°\n- Condition: {condition}",
        location.label(),
        temperature.0,
        temperature.1,
        wind.0,
        wind.1,
    )
}

/// Format the detailed current-conditions report
#[must_use]
pub fn current_detail(location: &ResolvedLocation, current: &CurrentConditions) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Weather for {}:\n", location.label()));

    let condition = describe_weather_code(current.weather_code, true);
    lines.push(format!("Condition: {condition}\n"));

    if let Some(temperature) = current.temperature {
        lines.push(format!(
            "Temperature: {temperature:.1}°C ({:.1}°F)",
            celsius_to_fahrenheit(temperature)
        ));
    }
    if let Some(apparent) = current.apparent_temperature {
        lines.push(format!(
            "Feels like: {apparent:.1}°C ({:.1}°F)",
            celsius_to_fahrenheit(apparent)
        ));
    }
    if let Some(humidity) = current.humidity {
        lines.push(format!("Humidity: {humidity}%"));
    }
    if let Some(wind) = current.wind_speed {
        let mut wind_line = format!("Wind: {wind:.1} km/h ({:.1} mph)", kmh_to_mph(wind));
        if let Some(direction) = current.wind_direction {
            wind_line.push_str(&format!(" from {direction}°"));
        }
        lines.push(wind_line);
    }
    if let Some(gusts) = current.wind_gusts {
        lines.push(format!(
            "Gusts: {gusts:.1} km/h ({:.1} mph)",
            kmh_to_mph(gusts)
        ));
    }
    if let Some(cloud_cover) = current.cloud_cover {
        lines.push(format!("Cloud cover: {cloud_cover}%"));
    }
    if let Some(precipitation) = current.precipitation.filter(|p| *p > 0.0) {
        lines.push(format!("Precipitation: {precipitation} mm"));
    }
    if let Some(pressure) = current.pressure_msl {
        lines.push(format!("Pressure: {pressure:.1} hPa"));
    }
    if let Some(uv) = current.uv_index {
        lines.push(format!("UV Index: {uv:.1} ({})", uv_category(uv)));
    }

    lines.join("\n")
}

/// Format the twelve-hour forecast report
#[must_use]
pub fn hourly_forecast(location: &ResolvedLocation, series: &HourlySeries) -> String {
    let mut lines = Vec::new();
    lines.push(format!("12-Hour Forecast for {}:\n", location.label()));

    for index in 0..series.time.len().min(HOURLY_SLOTS) {
        let time_display = pretty_timestamp(&series.time[index]);
        let condition = describe_weather_code(slot(&series.weather_code, index), true);

        let mut entry = match slot(&series.temperature, index) {
            Some(temperature) => format!(
                "{time_display}:\n  {temperature:.1}°C ({:.1}°F), {condition}",
                celsius_to_fahrenheit(temperature)
            ),
            None => format!("{time_display}:\n  {condition}"),
        };

        if let Some(probability) = slot(&series.precipitation_probability, index).filter(|p| *p > 0.0)
        {
            entry.push_str(&format!("\n  Precip: {probability}%"));
            if let Some(amount) = slot(&series.precipitation, index).filter(|a| *a > 0.0) {
                entry.push_str(&format!(" ({amount:.1} mm)"));
            }
        }
        if let Some(wind) = slot(&series.wind_speed, index) {
            entry.push_str(&format!(
                "\n  Wind: {wind:.0} km/h ({:.0} mph)",
                kmh_to_mph(wind)
            ));
        }
        if let Some(uv) = slot(&series.uv_index, index).filter(|u| *u > 0.0) {
            entry.push_str(&format!("\n  UV: {uv:.1}"));
        }

        lines.push(entry);
    }

    lines.join("\n")
}

/// Format the seven-day forecast report
#[must_use]
pub fn daily_forecast(location: &ResolvedLocation, series: &DailySeries) -> String {
    let mut lines = Vec::new();
    lines.push(format!("7-Day Forecast for {}:\n", location.label()));

    for index in 0..series.time.len().min(DAILY_SLOTS) {
        let condition = describe_weather_code(slot(&series.weather_code, index), true);
        let mut entry = format!("{}: {condition}", series.time[index]);

        if let (Some(high), Some(low)) = (
            slot(&series.temperature_max, index),
            slot(&series.temperature_min, index),
        ) {
            entry.push_str(&format!(
                "\n  High: {high:.1}°C ({:.1}°F), Low: {low:.1}°C ({:.1}°F)",
                celsius_to_fahrenheit(high),
                celsius_to_fahrenheit(low)
            ));
        }
        if let (Some(sunrise), Some(sunset)) = (
            text_slot(&series.sunrise, index),
            text_slot(&series.sunset, index),
        ) {
            entry.push_str(&format!(
                "\n  Sun: {} - {}",
                pretty_time_of_day(sunrise),
                pretty_time_of_day(sunset)
            ));
        }
        if let Some(uv) = slot(&series.uv_index_max, index).filter(|u| *u > 0.0) {
            entry.push_str(&format!("\n  Max UV: {uv:.1} ({})", uv_category(uv)));
        }
        if let Some(probability) =
            slot(&series.precipitation_probability_max, index).filter(|p| *p > 0.0)
        {
            entry.push_str(&format!("\n  Precip: {probability}%"));
            if let Some(total) = slot(&series.precipitation_sum, index).filter(|t| *t > 0.0) {
                entry.push_str(&format!(" ({total:.1} mm)"));
            }
        }
        if let Some(wind) = slot(&series.wind_speed_max, index) {
            entry.push_str(&format!(
                "\n  Max wind: {wind:.0} km/h ({:.0} mph)",
                kmh_to_mph(wind)
            ));
        }

        lines.push(entry);
    }

    lines.join("\n")
}

/// Format the air-quality report
#[must_use]
pub fn air_quality(location: &ResolvedLocation, current: &AirQualityConditions) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Air Quality for {}:\n", location.label()));

    if let Some(us_aqi) = current.us_aqi {
        lines.push(format!("US AQI: {us_aqi} ({})", us_aqi_category(us_aqi)));
    }
    if let Some(eu_aqi) = current.european_aqi {
        lines.push(format!(
            "European AQI: {eu_aqi} ({})",
            eu_aqi_category(eu_aqi)
        ));
    }

    lines.push("\nPollutants:".to_string());
    if let Some(pm2_5) = current.pm2_5 {
        lines.push(format!("  PM2.5: {pm2_5:.1} μg/m³"));
    }
    if let Some(pm10) = current.pm10 {
        lines.push(format!("  PM10: {pm10:.1} μg/m³"));
    }
    if let Some(no2) = current.nitrogen_dioxide {
        lines.push(format!("  NO₂: {no2:.1} μg/m³"));
    }
    if let Some(so2) = current.sulphur_dioxide {
        lines.push(format!("  SO₂: {so2:.1} μg/m³"));
    }
    if let Some(ozone) = current.ozone {
        lines.push(format!("  O₃: {ozone:.1} μg/m³"));
    }
    if let Some(co) = current.carbon_monoxide {
        lines.push(format!("  CO: {co:.0} μg/m³"));
    }

    lines.join("\n")
}

/// Concatenate the detailed report from its constituent sections.
///
/// The current-conditions section leads; every later section is prefixed
/// with a horizontal rule. Sections whose fetch failed are skipped, and
/// the report is `None` only when every section is missing.
#[must_use]
pub fn detailed(
    current: Option<String>,
    air: Option<String>,
    hourly: Option<String>,
    daily: Option<String>,
) -> Option<String> {
    let rule = "=".repeat(SECTION_RULE_WIDTH);
    let mut parts = Vec::new();

    if let Some(section) = current {
        parts.push(section);
    }
    for section in [air, hourly, daily].into_iter().flatten() {
        parts.push(format!("\n{rule}\n{section}"));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}

/// "2025-06-01T14:00" becomes "2025-06-01 14:00"; anything unparseable is
/// passed through untouched.
fn pretty_timestamp(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .map_or_else(|_| raw.to_string(), |dt| dt.format("%Y-%m-%d %H:%M").to_string())
}

/// "2025-06-01T05:32" becomes "05:32"; anything unparseable is passed
/// through untouched.
fn pretty_time_of_day(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .map_or_else(|_| raw.to_string(), |dt| dt.format("%H:%M").to_string())
}

fn text_slot<'a>(series: &'a Option<Vec<Option<String>>>, index: usize) -> Option<&'a str> {
    series
        .as_ref()
        .and_then(|values| values.get(index))
        .and_then(|value| value.as_deref())
}
