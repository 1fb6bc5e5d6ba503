//! Minimal geocoding, weather and contact-mail client.
//!
//! This crate provides a focused async client for the external
//! services the shell talks to:
//! - Place search (Open-Meteo geocoding API)
//! - Current conditions (Open-Meteo forecast API, imperial units)
//! - Caller geolocation from the requesting IP
//! - Contact-form delivery to a configured JSON endpoint

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const DEFAULT_GEOCODE_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const DEFAULT_GEOIP_URL: &str = "https://ipapi.co/json/";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const CURRENT_FIELDS: &str =
    "temperature_2m,apparent_temperature,relative_humidity_2m,weather_code,wind_speed_10m";

/// Errors that can occur when using the lookup client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout
        } else if e.is_decode() {
            Error::Parse(e.to_string())
        } else {
            Error::Network(e.to_string())
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Endpoints and timeouts for the lookup client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub geocode_url: String,
    pub forecast_url: String,
    pub geoip_url: String,
    /// Contact delivery endpoint. Mail is unavailable when unset.
    pub contact_url: Option<String>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            geocode_url: DEFAULT_GEOCODE_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            geoip_url: DEFAULT_GEOIP_URL.to_string(),
            contact_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl ClientConfig {
    /// Build a configuration from `LOOKUP_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("LOOKUP_GEOCODE_URL") {
            config.geocode_url = url;
        }
        if let Ok(url) = std::env::var("LOOKUP_FORECAST_URL") {
            config.forecast_url = url;
        }
        if let Ok(url) = std::env::var("LOOKUP_GEOIP_URL") {
            config.geoip_url = url;
        }
        config.contact_url = std::env::var("LOOKUP_CONTACT_URL").ok();
        if let Ok(secs) = std::env::var("LOOKUP_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) => config.timeout = Duration::from_secs(secs),
                Err(_) => warn!(value = %secs, "ignoring unparseable LOOKUP_TIMEOUT_SECS"),
            }
        }
        config
    }

    pub fn with_contact_url(mut self, url: impl Into<String>) -> Self {
        self.contact_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ============================================================================
// Client
// ============================================================================

/// Lookup API client.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    config: ClientConfig,
}

impl Client {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Create a client from the `LOOKUP_*` environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::new(ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Search for places matching a free-text query.
    ///
    /// An unknown place is an empty list, not an error.
    pub async fn geocode(&self, query: &str, count: usize) -> Result<Vec<Place>, Error> {
        debug!(query, count, "geocode request");
        let count = count.to_string();
        let response = self
            .http
            .get(&self.config.geocode_url)
            .query(&[
                ("name", query),
                ("count", count.as_str()),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await?;

        let body: GeocodeResponse = Self::parse_json(response).await?;
        Ok(body.results.unwrap_or_default())
    }

    /// Fetch current conditions at a coordinate.
    pub async fn current_weather(&self, latitude: f64, longitude: f64) -> Result<Conditions, Error> {
        debug!(latitude, longitude, "forecast request");
        let response = self
            .http
            .get(&self.config.forecast_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("temperature_unit", "fahrenheit".to_string()),
                ("wind_speed_unit", "mph".to_string()),
            ])
            .send()
            .await?;

        let body: ForecastResponse = Self::parse_json(response).await?;
        Ok(body.current)
    }

    /// Resolve the caller's approximate location from their IP address.
    pub async fn locate(&self) -> Result<GeoIp, Error> {
        debug!("geoip request");
        let response = self.http.get(&self.config.geoip_url).send().await?;
        let body: GeoIp = Self::parse_json(response).await?;
        if body.latitude.is_none() || body.longitude.is_none() {
            return Err(Error::Parse("geolocation response has no coordinates".to_string()));
        }
        Ok(body)
    }

    /// Deliver a contact message.
    pub async fn send_contact(&self, message: &ContactRequest) -> Result<Delivery, Error> {
        let url = self
            .config
            .contact_url
            .as_deref()
            .ok_or_else(|| Error::Config("no contact endpoint configured".to_string()))?;

        debug!(url, "contact delivery");
        let response = self.http.post(url).json(message).send().await?;
        let status = response.status();

        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<DeliveryBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| rejection_reason(status, &body));
            return Ok(Delivery::Rejected(reason));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        // An empty success body counts as delivered.
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<DeliveryBody>(&body) {
            Ok(DeliveryBody { ok: Some(false), error }) => Ok(Delivery::Rejected(
                error.unwrap_or_else(|| "message was not accepted".to_string()),
            )),
            _ => Ok(Delivery::Delivered),
        }
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, Error> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status,
                message: body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))
    }
}

fn rejection_reason(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request rejected")
            .to_string()
    } else {
        body.to_string()
    }
}

// ============================================================================
// Public types
// ============================================================================

/// A place returned by the geocoding API.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub admin1: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

impl Place {
    /// Human-readable label such as "Portland, Oregon, United States".
    pub fn label(&self) -> String {
        let mut parts = vec![self.name.as_str()];
        if let Some(admin) = self.admin1.as_deref() {
            if admin != self.name {
                parts.push(admin);
            }
        }
        if let Some(country) = self.country.as_deref().or(self.country_code.as_deref()) {
            parts.push(country);
        }
        parts.join(", ")
    }
}

/// Current conditions in imperial units.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Conditions {
    #[serde(rename = "temperature_2m")]
    pub temperature_f: f64,
    #[serde(rename = "apparent_temperature")]
    pub feels_like_f: f64,
    #[serde(rename = "relative_humidity_2m")]
    pub humidity_pct: f64,
    pub weather_code: u8,
    #[serde(rename = "wind_speed_10m")]
    pub wind_mph: f64,
}

impl Conditions {
    pub fn condition_text(&self) -> &'static str {
        weather_code_text(self.weather_code)
    }
}

/// The caller's approximate location.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeoIp {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl GeoIp {
    pub fn label(&self) -> String {
        let parts: Vec<&str> = [
            self.city.as_deref(),
            self.region.as_deref(),
            self.country_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            "your location".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Payload posted to the contact endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Outcome of a contact delivery that reached the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    Rejected(String),
}

/// Describe a WMO weather interpretation code.
pub fn weather_code_text(code: u8) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        56 | 57 => "Freezing drizzle",
        61 => "Light rain",
        63 => "Rain",
        65 => "Heavy rain",
        66 | 67 => "Freezing rain",
        71 => "Light snow",
        73 => "Snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80..=82 => "Rain showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        _ => "Unknown conditions",
    }
}

// ============================================================================
// Internal API wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Option<Vec<Place>>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Conditions,
}

#[derive(Debug, Deserialize)]
struct DeliveryBody {
    #[serde(default)]
    ok: Option<bool>,
    #[serde(default)]
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.geocode_url, DEFAULT_GEOCODE_URL);
        assert!(config.contact_url.is_none());
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::default()
            .with_contact_url("https://example.com/contact")
            .with_timeout(Duration::from_secs(3));
        assert_eq!(config.contact_url.as_deref(), Some("https://example.com/contact"));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_parse_geocode_results() {
        let body = r#"{
            "results": [
                {"id": 1, "name": "Portland", "latitude": 45.52, "longitude": -122.68,
                 "country_code": "US", "admin1": "Oregon", "country": "United States"},
                {"id": 2, "name": "Portland", "latitude": 43.66, "longitude": -70.25,
                 "country_code": "US", "admin1": "Maine", "country": "United States"}
            ],
            "generationtime_ms": 0.5
        }"#;
        let parsed: GeocodeResponse = serde_json::from_str(body).unwrap();
        let places = parsed.results.unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].label(), "Portland, Oregon, United States");
        assert_eq!(places[1].admin1.as_deref(), Some("Maine"));
    }

    #[test]
    fn test_parse_geocode_no_results() {
        // The API omits `results` entirely when nothing matches
        let parsed: GeocodeResponse = serde_json::from_str(r#"{"generationtime_ms": 0.2}"#).unwrap();
        assert!(parsed.results.unwrap_or_default().is_empty());
    }

    #[test]
    fn test_parse_forecast() {
        let body = r#"{
            "latitude": 45.5, "longitude": -122.7,
            "current": {
                "time": "2024-05-01T12:00", "interval": 900,
                "temperature_2m": 61.3, "apparent_temperature": 59.0,
                "relative_humidity_2m": 72, "weather_code": 3, "wind_speed_10m": 8.4
            }
        }"#;
        let parsed: ForecastResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.current.temperature_f, 61.3);
        assert_eq!(parsed.current.humidity_pct, 72.0);
        assert_eq!(parsed.current.condition_text(), "Overcast");
    }

    #[test]
    fn test_place_label_skips_duplicate_region() {
        let place = Place {
            name: "Berlin".to_string(),
            latitude: 52.52,
            longitude: 13.41,
            admin1: Some("Berlin".to_string()),
            country: Some("Germany".to_string()),
            country_code: Some("DE".to_string()),
        };
        assert_eq!(place.label(), "Berlin, Germany");
    }

    #[test]
    fn test_geoip_label() {
        let geo: GeoIp = serde_json::from_str(
            r#"{"city": "Austin", "region": "Texas", "country_name": "United States",
                "latitude": 30.27, "longitude": -97.74}"#,
        )
        .unwrap();
        assert_eq!(geo.label(), "Austin, Texas, United States");

        let empty: GeoIp = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.label(), "your location");
    }

    #[test]
    fn test_weather_codes() {
        assert_eq!(weather_code_text(0), "Clear sky");
        assert_eq!(weather_code_text(81), "Rain showers");
        assert_eq!(weather_code_text(99), "Thunderstorm with hail");
        assert_eq!(weather_code_text(42), "Unknown conditions");
    }

    #[test]
    fn test_rejection_reason() {
        assert_eq!(rejection_reason(StatusCode::BAD_REQUEST, ""), "Bad Request");
        assert_eq!(rejection_reason(StatusCode::BAD_REQUEST, " invalid email "), "invalid email");
    }

    #[tokio::test]
    async fn test_send_contact_without_endpoint() {
        let client = Client::new(ClientConfig::default()).unwrap();
        let request = ContactRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            message: "Hello".to_string(),
        };
        let result = client.send_contact(&request).await;
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
