//! Integration tests for the remote provider adapters using wiremock.
//!
//! These verify the adapters' request shape, response mapping, and error
//! classification against a mock HTTP server.

use skycast_core::ProviderError;
use skycast_core::provider::WeatherProvider;
use skycast_core::provider::openweather::OpenWeatherProvider;
use skycast_core::provider::visualcrossing::VisualCrossingProvider;
use skycast_core::provider::weatherapi::WeatherApiProvider;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn weatherapi_body() -> serde_json::Value {
    serde_json::json!({
        "location": { "name": "London", "country": "United Kingdom" },
        "current": {
            "temp_c": 15.0,
            "feelslike_c": 13.5,
            "humidity": 72,
            "pressure_mb": 1012.0,
            "wind_kph": 18.0,
            "wind_degree": 40,
            "condition": { "text": "Partly Cloudy" },
            "last_updated_epoch": 1_700_000_000i64
        }
    })
}

#[tokio::test]
async fn weatherapi_maps_a_successful_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("key", "TESTKEY"))
        .and(query_param("q", "London"))
        .and(query_param("aqi", "no"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weatherapi_body()))
        .mount(&server)
        .await;

    let provider = WeatherApiProvider::new("TESTKEY".to_string())
        .expect("client builds")
        .with_base_url(server.uri());

    let record = provider.fetch("London").await.expect("fetch succeeds");
    assert_eq!(record.city_name, "London");
    assert_eq!(record.country_code, "United Kingdom");
    assert_eq!(record.temperature_c, 15.0);
    assert!((record.wind_speed_mps - 5.0).abs() < 1e-9);
    assert_eq!(record.wind_direction_deg, 40);
    assert_eq!(record.icon_code, "01d");
    assert_eq!(record.observed_at.timestamp(), 1_700_000_000);
}

#[tokio::test]
async fn weatherapi_non_success_status_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let provider = WeatherApiProvider::new("TESTKEY".to_string())
        .expect("client builds")
        .with_base_url(server.uri());

    let err = provider.fetch("London").await.unwrap_err();
    assert!(matches!(err, ProviderError::Unavailable { status: 503 }), "got: {err:?}");
}

#[tokio::test]
async fn weatherapi_garbage_body_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let provider = WeatherApiProvider::new("TESTKEY".to_string())
        .expect("client builds")
        .with_base_url(server.uri());

    let err = provider.fetch("London").await.unwrap_err();
    assert!(matches!(err, ProviderError::MalformedResponse(_)), "got: {err:?}");
}

#[tokio::test]
async fn unreachable_host_is_classified_as_unreachable() {
    // nothing listens on port 9 (discard)
    let provider = WeatherApiProvider::new("TESTKEY".to_string())
        .expect("client builds")
        .with_base_url("http://127.0.0.1:9");

    let err = provider.fetch("London").await.unwrap_err();
    assert!(matches!(err, ProviderError::Unreachable(_)), "got: {err:?}");
}

#[tokio::test]
async fn openweather_passes_a_full_payload_through() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", "OWKEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "London",
            "dt": 1_700_000_000i64,
            "main": { "temp": 15.0, "feels_like": 14.0, "humidity": 72, "pressure": 1012 },
            "weather": [{ "main": "Clouds", "description": "overcast clouds", "icon": "04d" }],
            "wind": { "speed": 4.1, "deg": 250 },
            "clouds": { "all": 90 },
            "visibility": 8000,
            "sys": { "country": "GB" },
            "coord": { "lat": 51.51, "lon": -0.13 }
        })))
        .mount(&server)
        .await;

    let provider = OpenWeatherProvider::new("OWKEY".to_string())
        .expect("client builds")
        .with_base_url(server.uri());

    let record = provider.fetch("London").await.expect("fetch succeeds");
    assert_eq!(record.city_name, "London");
    assert_eq!(record.country_code, "GB");
    assert_eq!(record.condition_main, "Clouds");
    assert_eq!(record.icon_code, "04d");
    assert_eq!(record.wind_speed_mps, 4.1);
    assert_eq!(record.cloudiness_pct, 90);
    assert_eq!(record.visibility_meters, 8000);
    assert_eq!(record.coordinates.lat, 51.51);
}

#[tokio::test]
async fn openweather_city_not_found_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404", "message": "city not found"
        })))
        .mount(&server)
        .await;

    let provider = OpenWeatherProvider::new("OWKEY".to_string())
        .expect("client builds")
        .with_base_url(server.uri());

    let err = provider.fetch("Nowhereville").await.unwrap_err();
    assert!(matches!(err, ProviderError::Unavailable { status: 404 }), "got: {err:?}");
}

#[tokio::test]
async fn visualcrossing_maps_the_timeline_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/VisualCrossingWebServices/rest/services/timeline/London/today"))
        .and(query_param("unitGroup", "metric"))
        .and(query_param("include", "current"))
        .and(query_param("key", "VCKEY"))
        .and(query_param("contentType", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "resolvedAddress": "London, England, United Kingdom",
            "currentConditions": {
                "temp": 15.2,
                "feelslike": 14.1,
                "humidity": 71.6,
                "pressure": 1012.4,
                "conditions": "Overcast",
                "windspeed": 18.0,
                "winddir": 250.0
            }
        })))
        .mount(&server)
        .await;

    let provider = VisualCrossingProvider::new("VCKEY".to_string())
        .expect("client builds")
        .with_base_url(server.uri());

    let record = provider.fetch("London").await.expect("fetch succeeds");
    assert_eq!(record.city_name, "London");
    assert_eq!(record.country_code, "XX");
    assert_eq!(record.condition_main, "Overcast");
    assert_eq!(record.condition_description, "overcast");
    assert!((record.wind_speed_mps - 5.0).abs() < 1e-9);
    assert_eq!(record.humidity_pct, 72);
}

#[tokio::test]
async fn visualcrossing_missing_current_conditions_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/VisualCrossingWebServices/rest/services/timeline/London/today"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "resolvedAddress": "London, England, United Kingdom"
        })))
        .mount(&server)
        .await;

    let provider = VisualCrossingProvider::new("VCKEY".to_string())
        .expect("client builds")
        .with_base_url(server.uri());

    let err = provider.fetch("London").await.unwrap_err();
    assert!(matches!(err, ProviderError::MalformedResponse(_)), "got: {err:?}");
}
