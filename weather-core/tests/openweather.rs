//! OpenWeatherClient against a mock HTTP server.

use std::time::Duration;

use weather_core::{OpenWeatherClient, WeatherError, WeatherProvider};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::builder("TEST_KEY".into())
        .base_url(&server.uri())
        .timeout(Duration::from_millis(500))
        .build()
        .unwrap()
}

fn current_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Moscow",
        "dt": 1714536000,
        "main": { "temp": 17.44, "feels_like": 16.9, "pressure": 1013, "humidity": 52 },
        "weather": [{ "id": 800, "main": "Clear", "description": "ясно", "icon": "01d" }],
        "wind": { "speed": 3.1, "deg": 200 }
    })
}

fn forecast_body() -> serde_json::Value {
    serde_json::json!({
        "cod": "200",
        "cnt": 3,
        "city": { "name": "Tokyo", "country": "JP" },
        "list": [
            {
                "dt": 1714532400,
                "dt_txt": "2024-05-01 03:00:00",
                "main": { "temp": 10.2, "pressure": 1008, "humidity": 80 },
                "weather": [{ "description": "облачно", "icon": "04n" }]
            },
            {
                "dt": 1714543200,
                "dt_txt": "2024-05-01 06:00:00",
                "main": { "temp": 12.0, "pressure": 1008, "humidity": 70 },
                "weather": [{ "description": "ясно", "icon": "01d" }]
            },
            {
                "dt": 1714618800,
                "dt_txt": "2024-05-02 03:00:00",
                "main": { "temp": 8.0, "pressure": 1004, "humidity": 91 },
                "weather": []
            }
        ]
    })
}

#[tokio::test]
async fn test_fetch_current_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Москва"))
        .and(query_param("units", "metric"))
        .and(query_param("lang", "ru"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let current = client(&mock_server).fetch_current("Москва").await.unwrap();

    assert_eq!(current.location_name, "Moscow");
    assert_eq!(current.condition, "ясно");
    assert_eq!(current.humidity_pct, 52);
    assert_eq!(current.pressure_mmhg(), 760);
    assert_eq!(current.temperature_display(), 17);
    assert!((current.wind_speed_mps - 3.1).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_fetch_forecast_keeps_provider_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "Токио"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&mock_server)
        .await;

    let forecast = client(&mock_server).fetch_forecast("Токио").await.unwrap();

    assert_eq!(forecast.city_name, "Tokyo");
    assert_eq!(forecast.country, "JP");
    let stamps: Vec<_> = forecast.entries.iter().map(|e| e.timestamp.as_str()).collect();
    assert_eq!(stamps, ["2024-05-01 03:00:00", "2024-05-01 06:00:00", "2024-05-02 03:00:00"]);

    assert_eq!(forecast.entries[0].icon_code, "04n");
    assert_eq!(forecast.entries[2].condition, "Unknown");
    assert_eq!(forecast.entries[2].icon_code, "");
}

#[tokio::test]
async fn test_unknown_city_is_status_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).fetch_current("Нигдеград").await.unwrap_err();

    match err {
        WeatherError::Status { status, ref body, .. } => {
            assert_eq!(status.as_u16(), 404);
            assert!(body.contains("city not found"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_payload_is_decode_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).fetch_forecast("Париж").await.unwrap_err();

    assert!(matches!(err, WeatherError::Decode { endpoint: "forecast", .. }));
    assert!(err.is_network());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_body())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).fetch_current("Лондон").await.unwrap_err();

    assert!(matches!(err, WeatherError::Transport { endpoint: "weather", .. }));
}

#[tokio::test]
async fn test_empty_city_is_rejected_without_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).fetch_current("  ").await.unwrap_err();

    assert!(matches!(err, WeatherError::EmptyCity));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_failure() {
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    drop(mock_server);

    let client = OpenWeatherClient::builder("TEST_KEY".into())
        .base_url(&uri)
        .timeout(Duration::from_millis(500))
        .build()
        .unwrap();

    let err = client.fetch_forecast("Москва").await.unwrap_err();
    assert!(matches!(err, WeatherError::Transport { .. }));
}
