//! Interpretation tables for upstream numeric codes
//!
//! Pure, total classification functions: WMO weather codes, UV index and
//! US/EU air-quality categories, plus the metric-to-imperial conversions
//! used throughout the reports.

/// km/h to mph conversion factor
const KMH_TO_MPH: f64 = 0.621_371;

/// Describe a WMO weather code.
///
/// The `is_day` flag is accepted for interface symmetry with the upstream
/// payload but does not change the description; descriptions are the same
/// day and night.
#[must_use]
pub fn describe_weather_code(code: Option<u32>, _is_day: bool) -> String {
    let Some(code) = code else {
        return "Unknown".to_string();
    };
    let description = match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 | 53 | 55 => "Drizzle",
        56 | 57 => "Freezing Drizzle",
        61 | 63 | 65 => "Rain",
        66 | 67 => "Freezing Rain",
        71 | 73 | 75 => "Snow fall",
        77 => "Snow grains",
        80 | 81 | 82 => "Rain showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        other => return format!("Unknown code ({other})"),
    };
    description.to_string()
}

/// Categorize a UV index value
#[must_use]
pub fn uv_category(uv: f64) -> &'static str {
    if uv < 3.0 {
        "Low"
    } else if uv < 6.0 {
        "Moderate"
    } else if uv < 8.0 {
        "High"
    } else if uv < 11.0 {
        "Very High"
    } else {
        "Extreme"
    }
}

/// Categorize a US AQI value
#[must_use]
pub fn us_aqi_category(aqi: f64) -> &'static str {
    if aqi <= 50.0 {
        "Good"
    } else if aqi <= 100.0 {
        "Moderate"
    } else if aqi <= 150.0 {
        "Unhealthy for Sensitive Groups"
    } else if aqi <= 200.0 {
        "Unhealthy"
    } else if aqi <= 300.0 {
        "Very Unhealthy"
    } else {
        "Hazardous"
    }
}

/// Categorize a European AQI value
#[must_use]
pub fn eu_aqi_category(aqi: f64) -> &'static str {
    if aqi <= 20.0 {
        "Good"
    } else if aqi <= 40.0 {
        "Fair"
    } else if aqi <= 60.0 {
        "Moderate"
    } else if aqi <= 80.0 {
        "Poor"
    } else if aqi <= 100.0 {
        "Very Poor"
    } else {
        "Extremely Poor"
    }
}

/// Convert Celsius to Fahrenheit
#[must_use]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Convert km/h to mph
#[must_use]
pub fn kmh_to_mph(kmh: f64) -> f64 {
    kmh * KMH_TO_MPH
}
