//! The lookup collaborator: geocoding, weather and contact mail.
//!
//! The shell only ever talks to [`Lookup`]. [`HttpLookup`] backs it with the
//! `lookup` HTTP client; tests use [`crate::testing::MockLookup`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Maximum candidates requested from the geocoder.
pub const GEOCODE_LIMIT: usize = 5;

/// A lookup failure. Every variant is rendered as one error line.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("network error: {0}")]
    Network(String),

    #[error("the request timed out")]
    Timeout,

    #[error("the service returned HTTP {status}")]
    Http { status: u16 },

    #[error("unexpected response: {0}")]
    Malformed(String),

    #[error("{0}")]
    Unavailable(String),
}

impl From<::lookup::Error> for LookupError {
    fn from(e: ::lookup::Error) -> Self {
        match e {
            ::lookup::Error::Network(msg) => LookupError::Network(msg),
            ::lookup::Error::Timeout => LookupError::Timeout,
            ::lookup::Error::Api { status, .. } => LookupError::Http { status },
            ::lookup::Error::Parse(msg) => LookupError::Malformed(msg),
            ::lookup::Error::Config(msg) => LookupError::Unavailable(msg),
        }
    }
}

/// One disambiguation option. `index` is 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub index: usize,
    pub display_name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub temp_f: f64,
    pub feels_like_f: f64,
    pub condition: String,
    pub humidity_pct: f64,
    pub wind_mph: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailStatus {
    Delivered,
    Rejected(String),
}

/// External calls the shell awaits.
#[async_trait]
pub trait Lookup: Send + Sync {
    /// Places matching `query`. An empty list means nothing was found.
    async fn geocode(&self, query: &str) -> Result<Vec<Candidate>, LookupError>;

    async fn current_weather(&self, lat: f64, lon: f64) -> Result<WeatherReport, LookupError>;

    async fn submit_contact_message(
        &self,
        message: &ContactMessage,
    ) -> Result<MailStatus, LookupError>;

    /// Approximate location of the caller, for `weather` with no argument.
    async fn locate_caller(&self) -> Result<Candidate, LookupError>;
}

/// [`Lookup`] over HTTP.
pub struct HttpLookup {
    client: ::lookup::Client,
}

impl HttpLookup {
    pub fn new(client: ::lookup::Client) -> Self {
        Self { client }
    }

    /// Build a client from `LOOKUP_*` environment variables.
    pub fn from_env() -> Result<Self, LookupError> {
        Ok(Self::new(::lookup::Client::from_env()?))
    }
}

#[async_trait]
impl Lookup for HttpLookup {
    async fn geocode(&self, query: &str) -> Result<Vec<Candidate>, LookupError> {
        let places = self.client.geocode(query, GEOCODE_LIMIT).await.map_err(|e| {
            warn!(query, error = %e, "geocode failed");
            LookupError::from(e)
        })?;
        debug!(query, results = places.len(), "geocoded");

        Ok(places
            .iter()
            .enumerate()
            .map(|(i, place)| Candidate {
                index: i + 1,
                display_name: place.label(),
                lat: place.latitude,
                lon: place.longitude,
            })
            .collect())
    }

    async fn current_weather(&self, lat: f64, lon: f64) -> Result<WeatherReport, LookupError> {
        let conditions = self.client.current_weather(lat, lon).await.map_err(|e| {
            warn!(lat, lon, error = %e, "weather lookup failed");
            LookupError::from(e)
        })?;

        Ok(WeatherReport {
            temp_f: conditions.temperature_f,
            feels_like_f: conditions.feels_like_f,
            condition: conditions.condition_text().to_string(),
            humidity_pct: conditions.humidity_pct,
            wind_mph: conditions.wind_mph,
        })
    }

    async fn submit_contact_message(
        &self,
        message: &ContactMessage,
    ) -> Result<MailStatus, LookupError> {
        let request = ::lookup::ContactRequest {
            name: message.name.clone(),
            email: message.email.clone(),
            message: message.message.clone(),
        };

        match self.client.send_contact(&request).await {
            Ok(::lookup::Delivery::Delivered) => {
                info!(from = %message.email, "contact message delivered");
                Ok(MailStatus::Delivered)
            }
            Ok(::lookup::Delivery::Rejected(reason)) => {
                warn!(%reason, "contact message rejected");
                Ok(MailStatus::Rejected(reason))
            }
            Err(e) => {
                warn!(error = %e, "contact delivery failed");
                Err(e.into())
            }
        }
    }

    async fn locate_caller(&self) -> Result<Candidate, LookupError> {
        let geo = self.client.locate().await.map_err(|e| {
            warn!(error = %e, "geolocation failed");
            LookupError::from(e)
        })?;
        match (geo.latitude, geo.longitude) {
            (Some(lat), Some(lon)) => Ok(Candidate {
                index: 1,
                display_name: geo.label(),
                lat,
                lon,
            }),
            _ => Err(LookupError::Malformed(
                "geolocation response has no coordinates".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_lookup_errors() {
        assert_eq!(
            LookupError::from(::lookup::Error::Timeout),
            LookupError::Timeout
        );
        assert_eq!(
            LookupError::from(::lookup::Error::Api {
                status: 503,
                message: "down".to_string()
            }),
            LookupError::Http { status: 503 }
        );
        assert!(matches!(
            LookupError::from(::lookup::Error::Config("no endpoint".to_string())),
            LookupError::Unavailable(_)
        ));
    }

    #[tokio::test]
    async fn test_missing_contact_endpoint_is_unavailable() {
        let client = ::lookup::Client::new(::lookup::ClientConfig::default()).unwrap();
        let lookup = HttpLookup::new(client);
        let message = ContactMessage {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            message: "Hi".to_string(),
        };
        let result = lookup.submit_contact_message(&message).await;
        assert!(matches!(result, Err(LookupError::Unavailable(_))));
    }
}
