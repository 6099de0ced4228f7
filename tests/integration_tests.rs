//! Integration tests for the Meshcast assistant
//!
//! Drives the full orchestrator (classify → resolve → fetch → format →
//! region gate → reply) against wiremock HTTP doubles and a recording
//! messenger, asserting on the exact reply traffic.

use async_trait::async_trait;
use meshcast::WeatherBot;
use meshcast::config::MeshcastConfig;
use meshcast::messaging::{Attachment, InboundMessage, Messenger};
use serde_json::json;
use std::sync::Mutex;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,\
precipitation,weather_code,cloud_cover,pressure_msl,surface_pressure,wind_speed_10m,\
wind_direction_10m,wind_gusts_10m,uv_index";

const HOURLY_FIELDS: &str =
    "temperature_2m,precipitation_probability,precipitation,weather_code,wind_speed_10m,uv_index";

const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,\
precipitation_sum,precipitation_probability_max,wind_speed_10m_max,wind_gusts_10m_max,\
sunrise,sunset,uv_index_max";

const UNRESOLVED_REPLY: &str =
    "I couldn't understand that location. Type 'help' for format examples.";
const FETCH_FAILED_REPLY: &str = "Sorry, I couldn't fetch the weather for that location.";

/// One captured outbound reply
#[derive(Debug, Clone, PartialEq)]
enum Sent {
    Text {
        destination: String,
        text: String,
    },
    TextWithAttachment {
        destination: String,
        text: String,
        attachment_name: String,
    },
}

/// Messenger double that records every reply
#[derive(Default)]
struct RecordingMessenger {
    sent: Mutex<Vec<Sent>>,
}

impl RecordingMessenger {
    fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_text(&self, destination: &str, text: &str) -> meshcast::Result<()> {
        self.sent.lock().unwrap().push(Sent::Text {
            destination: destination.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_text_with_attachment(
        &self,
        destination: &str,
        text: &str,
        attachment: &Attachment,
    ) -> meshcast::Result<()> {
        self.sent.lock().unwrap().push(Sent::TextWithAttachment {
            destination: destination.to_string(),
            text: text.to_string(),
            attachment_name: attachment.name.clone(),
        });
        Ok(())
    }
}

fn config_for(server: &MockServer) -> MeshcastConfig {
    let mut config = MeshcastConfig::default();
    config.api.forecast_url = format!("{}/v1/forecast", server.uri());
    config.api.air_quality_url = format!("{}/v1/air-quality", server.uri());
    config.api.geocoding_url = format!("{}/v1/search", server.uri());
    config.api.imagery_url = format!("{}/imagery/latest.jpg", server.uri());
    config
}

async fn handle(bot: &WeatherBot, messenger: &RecordingMessenger, content: &str) {
    let message = InboundMessage {
        sender: "tester".to_string(),
        content: content.to_string(),
    };
    bot.handle_message(&message, messenger)
        .await
        .expect("reply delivery should succeed");
}

fn detailed_current_body() -> serde_json::Value {
    json!({
        "current": {
            "temperature_2m": 21.4,
            "relative_humidity_2m": 65,
            "apparent_temperature": 22.0,
            "precipitation": 0.0,
            "weather_code": 2,
            "cloud_cover": 40,
            "pressure_msl": 1013.2,
            "wind_speed_10m": 14.0,
            "wind_direction_10m": 230,
            "wind_gusts_10m": 28.5,
            "uv_index": 4.2
        }
    })
}

fn hourly_body() -> serde_json::Value {
    json!({
        "hourly": {
            "time": ["2025-06-01T00:00", "2025-06-01T01:00", "2025-06-01T02:00"],
            "temperature_2m": [12.5, 12.0, null],
            "precipitation_probability": [30, 0, 10],
            "precipitation": [0.2, 0.0, 0.1],
            "weather_code": [61, 3, 2],
            "wind_speed_10m": [15.0, 12.0, 10.0],
            "uv_index": [0.0, 0.0, 1.5]
        }
    })
}

fn daily_body() -> serde_json::Value {
    json!({
        "daily": {
            "time": ["2025-06-01", "2025-06-02"],
            "weather_code": [80, 3],
            "temperature_2m_max": [24.0, 22.0],
            "temperature_2m_min": [13.5, 12.0],
            "precipitation_sum": [1.8, 0.0],
            "precipitation_probability_max": [55, 0],
            "wind_speed_10m_max": [22.0, 18.0],
            "wind_gusts_10m_max": [40.0, 30.0],
            "sunrise": ["2025-06-01T05:32", "2025-06-02T05:31"],
            "sunset": ["2025-06-01T21:04", "2025-06-02T21:05"],
            "uv_index_max": [6.5, 5.0]
        }
    })
}

fn air_quality_body() -> serde_json::Value {
    json!({
        "current": {
            "european_aqi": 35,
            "us_aqi": 51,
            "pm10": 18.0,
            "pm2_5": 9.5,
            "carbon_monoxide": 250.0,
            "nitrogen_dioxide": 12.0,
            "sulphur_dioxide": 2.0,
            "ozone": 80.0
        }
    })
}

fn jpeg_response() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "image/jpeg")
        .set_body_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0])
}

#[tokio::test]
async fn coordinate_query_gets_report_with_attachment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("current", CURRENT_FIELDS))
        .respond_with(ResponseTemplate::new(200).set_body_json(detailed_current_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/imagery/latest.jpg"))
        .respond_with(jpeg_response())
        .expect(1)
        .mount(&server)
        .await;
    // A plain coordinate pair must never trigger geocoding.
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(0)
        .mount(&server)
        .await;

    let bot = WeatherBot::new(config_for(&server)).unwrap();
    let messenger = RecordingMessenger::default();
    handle(&bot, &messenger, "40.71,-74.01").await;

    let sent = messenger.sent();
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        Sent::TextWithAttachment {
            destination,
            text,
            attachment_name,
        } => {
            assert_eq!(destination, "tester");
            assert_eq!(attachment_name, "goes_conus_latest.jpg");
            assert!(text.starts_with("Weather for 40.71, -74.01:\n"));
            assert!(text.contains("Condition: Partly cloudy"));
            assert!(text.contains("Temperature: 21.4°C (70.5°F)"));
        }
        other => panic!("expected attachment reply, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_place_gets_fixed_unresolved_reply() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Unknown City Name Xyzabc"))
        .and(query_param("count", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"generationtime_ms": 0.3})))
        .expect(1)
        .mount(&server)
        .await;
    // No weather or image fetch may happen for an unresolvable location.
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/imagery/latest.jpg"))
        .respond_with(jpeg_response())
        .expect(0)
        .mount(&server)
        .await;

    let bot = WeatherBot::new(config_for(&server)).unwrap();
    let messenger = RecordingMessenger::default();
    handle(&bot, &messenger, "Unknown City Name Xyzabc").await;

    assert_eq!(
        messenger.sent(),
        vec![Sent::Text {
            destination: "tester".to_string(),
            text: UNRESOLVED_REPLY.to_string(),
        }]
    );
}

#[tokio::test]
async fn geocoded_location_outside_conus_gets_text_only_reply() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "latitude": 51.5074,
                "longitude": -0.1278,
                "name": "London",
                "admin1": "England",
                "country": "United Kingdom"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("current", CURRENT_FIELDS))
        .respond_with(ResponseTemplate::new(200).set_body_json(detailed_current_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/imagery/latest.jpg"))
        .respond_with(jpeg_response())
        .expect(0)
        .mount(&server)
        .await;

    let bot = WeatherBot::new(config_for(&server)).unwrap();
    let messenger = RecordingMessenger::default();
    handle(&bot, &messenger, "London").await;

    let sent = messenger.sent();
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        Sent::Text { text, .. } => {
            assert!(text.starts_with("Weather for London, England, United Kingdom:\n"));
        }
        other => panic!("expected text reply, got {other:?}"),
    }
}

#[tokio::test]
async fn grid_reference_resolves_without_geocoding() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("current", CURRENT_FIELDS))
        .respond_with(ResponseTemplate::new(200).set_body_json(detailed_current_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(0)
        .mount(&server)
        .await;

    let bot = WeatherBot::new(config_for(&server)).unwrap();
    let messenger = RecordingMessenger::default();
    // Square WN in zone 33 sits near Graz, Austria: outside CONUS.
    handle(&bot, &messenger, "33TWN0000000000").await;

    let sent = messenger.sent();
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        Sent::Text { text, .. } => {
            assert!(text.starts_with("Weather for 46.95, 15.00:\n"));
        }
        other => panic!("expected text reply, got {other:?}"),
    }
}

#[tokio::test]
async fn hourly_command_renders_hourly_report() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("hourly", HOURLY_FIELDS))
        .and(query_param("forecast_days", "2"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hourly_body()))
        .expect(1)
        .mount(&server)
        .await;

    let bot = WeatherBot::new(config_for(&server)).unwrap();
    let messenger = RecordingMessenger::default();
    handle(&bot, &messenger, "hourly 48.21,16.37").await;

    let sent = messenger.sent();
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        Sent::Text { text, .. } => {
            assert!(text.starts_with("12-Hour Forecast for 48.21, 16.37:\n"));
            assert!(text.contains("2025-06-01 00:00:\n  12.5°C (54.5°F), Rain"));
            assert!(text.contains("Precip: 30% (0.2 mm)"));
            // The third slot has a null temperature but keeps its condition.
            assert!(text.contains("2025-06-01 02:00:\n  Partly cloudy"));
        }
        other => panic!("expected text reply, got {other:?}"),
    }
}

#[tokio::test]
async fn forecast_command_renders_daily_report() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("daily", DAILY_FIELDS))
        .and(query_param("forecast_days", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(daily_body()))
        .expect(1)
        .mount(&server)
        .await;

    let bot = WeatherBot::new(config_for(&server)).unwrap();
    let messenger = RecordingMessenger::default();
    handle(&bot, &messenger, "forecast 48.21,16.37").await;

    let sent = messenger.sent();
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        Sent::Text { text, .. } => {
            assert!(text.starts_with("7-Day Forecast for 48.21, 16.37:\n"));
            assert!(text.contains("2025-06-01: Rain showers"));
            assert!(text.contains("High: 24.0°C (75.2°F), Low: 13.5°C (56.3°F)"));
            assert!(text.contains("Sun: 05:32 - 21:04"));
        }
        other => panic!("expected text reply, got {other:?}"),
    }
}

#[tokio::test]
async fn air_command_renders_air_quality_report() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/air-quality"))
        .respond_with(ResponseTemplate::new(200).set_body_json(air_quality_body()))
        .expect(1)
        .mount(&server)
        .await;

    let bot = WeatherBot::new(config_for(&server)).unwrap();
    let messenger = RecordingMessenger::default();
    handle(&bot, &messenger, "air 48.21,16.37").await;

    let sent = messenger.sent();
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        Sent::Text { text, .. } => {
            assert!(text.starts_with("Air Quality for 48.21, 16.37:\n"));
            assert!(text.contains("US AQI: 51 (Moderate)"));
            assert!(text.contains("European AQI: 35 (Fair)"));
            assert!(text.contains("  PM2.5: 9.5 μg/m³"));
        }
        other => panic!("expected text reply, got {other:?}"),
    }
}

#[tokio::test]
async fn detailed_command_concatenates_sections_and_skips_failures() {
    let server = MockServer::start().await;

    // The current-conditions request fails; the other three succeed.
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("current", CURRENT_FIELDS))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/air-quality"))
        .respond_with(ResponseTemplate::new(200).set_body_json(air_quality_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("hourly", HOURLY_FIELDS))
        .respond_with(ResponseTemplate::new(200).set_body_json(hourly_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("daily", DAILY_FIELDS))
        .respond_with(ResponseTemplate::new(200).set_body_json(daily_body()))
        .expect(1)
        .mount(&server)
        .await;

    let bot = WeatherBot::new(config_for(&server)).unwrap();
    let messenger = RecordingMessenger::default();
    handle(&bot, &messenger, "detailed 48.21,16.37").await;

    let sent = messenger.sent();
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        Sent::Text { text, .. } => {
            assert!(!text.contains("Condition:"));
            assert!(text.contains("Air Quality for 48.21, 16.37:"));
            assert!(text.contains("12-Hour Forecast for 48.21, 16.37:"));
            assert!(text.contains("7-Day Forecast for 48.21, 16.37:"));
            assert!(text.contains(&"=".repeat(40)));
            // Sections appear in air → hourly → daily order.
            let air_at = text.find("Air Quality").unwrap();
            let hourly_at = text.find("12-Hour").unwrap();
            let daily_at = text.find("7-Day").unwrap();
            assert!(air_at < hourly_at && hourly_at < daily_at);
        }
        other => panic!("expected text reply, got {other:?}"),
    }
}

#[tokio::test]
async fn upstream_failure_gets_fixed_fetch_failed_reply() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/imagery/latest.jpg"))
        .respond_with(jpeg_response())
        .expect(0)
        .mount(&server)
        .await;

    let bot = WeatherBot::new(config_for(&server)).unwrap();
    let messenger = RecordingMessenger::default();
    handle(&bot, &messenger, "40.71,-74.01").await;

    assert_eq!(
        messenger.sent(),
        vec![Sent::Text {
            destination: "tester".to_string(),
            text: FETCH_FAILED_REPLY.to_string(),
        }]
    );
}

#[tokio::test]
async fn missing_current_block_gets_fixed_fetch_failed_reply() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"latitude": 48.21})))
        .expect(1)
        .mount(&server)
        .await;

    let bot = WeatherBot::new(config_for(&server)).unwrap();
    let messenger = RecordingMessenger::default();
    handle(&bot, &messenger, "48.21,16.37").await;

    assert_eq!(
        messenger.sent(),
        vec![Sent::Text {
            destination: "tester".to_string(),
            text: FETCH_FAILED_REPLY.to_string(),
        }]
    );
}

#[tokio::test]
async fn non_jpeg_image_degrades_to_text_reply() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("current", CURRENT_FIELDS))
        .respond_with(ResponseTemplate::new(200).set_body_json(detailed_current_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/imagery/latest.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string("<html>maintenance</html>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let bot = WeatherBot::new(config_for(&server)).unwrap();
    let messenger = RecordingMessenger::default();
    handle(&bot, &messenger, "40.71,-74.01").await;

    let sent = messenger.sent();
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        Sent::Text { text, .. } => {
            assert!(text.contains("Condition: Partly cloudy"));
        }
        other => panic!("expected text-only reply, got {other:?}"),
    }
}

#[tokio::test]
async fn help_returns_usage_without_any_http_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let bot = WeatherBot::new(config_for(&server)).unwrap();
    let messenger = RecordingMessenger::default();
    handle(&bot, &messenger, "help").await;

    let sent = messenger.sent();
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        Sent::Text { text, .. } => {
            assert!(text.starts_with("Weather Bot Commands:"));
            assert!(text.contains("'detailed <location>'"));
        }
        other => panic!("expected text reply, got {other:?}"),
    }
}

#[tokio::test]
async fn brief_current_lookup_round_trips() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("current_weather", "true"))
        .and(query_param("temperature_unit", "celsius"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current_weather": {
                "temperature": 20.5,
                "windspeed": 10.0,
                "winddirection": 180,
                "weathercode": 0,
                "is_day": 1
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = meshcast::WeatherApiClient::new(config_for(&server).api).unwrap();
    let current = client.current_brief(40.71, -74.01).await.unwrap();
    let location = meshcast::ResolvedLocation::new(40.71, -74.01);

    assert_eq!(
        meshcast::report::current_brief(&location, &current),
        "Weather for 40.71, -74.01:\n- Temp: 20.5°C (68.9°F)\n- Wind: 10 kmh (6.2 mph) from 180°\n- Condition: Clear sky"
    );
}

#[tokio::test]
async fn out_of_range_pair_still_attempts_geocoding() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "95,200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let bot = WeatherBot::new(config_for(&server)).unwrap();
    let messenger = RecordingMessenger::default();
    handle(&bot, &messenger, "95,200").await;

    assert_eq!(
        messenger.sent(),
        vec![Sent::Text {
            destination: "tester".to_string(),
            text: UNRESOLVED_REPLY.to_string(),
        }]
    );
}
