//! RapidAPI client for the IRCTC travel-data surface.
//!
//! One GET per operation; slot values travel as query parameters. Non-2xx
//! statuses and network errors both classify as the single "unavailable"
//! kind at this boundary. No retries are performed here by design.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use std::time::Duration;

use crate::config::RailApiConfig;
use crate::ports::{TravelApiError, TravelDataApi};

/// Configuration for the rail API client.
#[derive(Debug, Clone)]
pub struct RailClientConfig {
    /// RapidAPI key.
    api_key: Secret<String>,
    /// RapidAPI host header value.
    pub host: String,
    /// Base URL of the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl RailClientConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            host: "irctc1.p.rapidapi.com".to_string(),
            base_url: "https://irctc1.p.rapidapi.com".to_string(),
            timeout: Duration::from_secs(20),
        }
    }

    /// Builds a client configuration from the application config section.
    pub fn from_app_config(config: &RailApiConfig) -> Self {
        Self {
            api_key: Secret::new(config.api_key.clone()),
            host: config.host.clone(),
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the RapidAPI host header value.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// RapidAPI IRCTC client.
pub struct RailApiClient {
    config: RailClientConfig,
    client: Client,
}

impl RailApiClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: RailClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<Value, TravelApiError> {
        let url = format!("{}{}", self.config.base_url, path);

        let response = self
            .client
            .get(&url)
            .header("x-rapidapi-key", self.config.api_key())
            .header("x-rapidapi-host", &self.config.host)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                TravelApiError::network(format!("Network error while calling travel API: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TravelApiError::status(status.as_u16(), &url, &body));
        }

        response
            .json()
            .await
            .map_err(|e| TravelApiError::network(format!("Invalid JSON from travel API: {e}")))
    }
}

#[async_trait]
impl TravelDataApi for RailApiClient {
    async fn trains_between_stations(
        &self,
        source: &str,
        destination: &str,
        date: &str,
    ) -> Result<Value, TravelApiError> {
        self.get(
            "/api/v3/trainBetweenStations",
            &[
                ("fromStationCode", source),
                ("toStationCode", destination),
                ("dateOfJourney", date),
            ],
        )
        .await
    }

    async fn train_live_status(
        &self,
        train_no: &str,
        date: &str,
    ) -> Result<Value, TravelApiError> {
        self.get(
            "/api/v1/GetTrainLiveStatus",
            &[("trainNo", train_no), ("startDay", date)],
        )
        .await
    }

    async fn train_schedule(&self, train_no: &str) -> Result<Value, TravelApiError> {
        self.get("/api/v1/GetTrainSchedule", &[("trainNo", train_no)])
            .await
    }

    async fn pnr_status(&self, pnr: &str) -> Result<Value, TravelApiError> {
        self.get("/api/v3/GetPNRStatus", &[("pnr", pnr)]).await
    }

    async fn seat_availability(
        &self,
        train_no: &str,
        source: &str,
        destination: &str,
        date: &str,
        travel_class: &str,
    ) -> Result<Value, TravelApiError> {
        self.get(
            "/api/v1/CheckSeatAvailability",
            &[
                ("trainNo", train_no),
                ("fromStationCode", source),
                ("toStationCode", destination),
                ("dateOfJourney", date),
                ("class", travel_class),
            ],
        )
        .await
    }

    async fn live_station(&self, hours: u32) -> Result<Value, TravelApiError> {
        let hours = hours.to_string();
        self.get("/api/v3/getLiveStation", &[("hours", hours.as_str())])
            .await
    }

    async fn search_train(&self, query: &str) -> Result<Value, TravelApiError> {
        self.get("/api/v1/SearchTrain", &[("query", query)]).await
    }

    async fn search_station(&self, query: &str) -> Result<Value, TravelApiError> {
        self.get("/api/v1/SearchStation", &[("query", query)]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_match_rapidapi_surface() {
        let config = RailClientConfig::new("key");
        assert_eq!(config.host, "irctc1.p.rapidapi.com");
        assert_eq!(config.base_url, "https://irctc1.p.rapidapi.com");
        assert_eq!(config.timeout, Duration::from_secs(20));
    }

    #[test]
    fn config_builder_works() {
        let config = RailClientConfig::new("key")
            .with_base_url("http://localhost:9999")
            .with_host("localhost")
            .with_timeout(Duration::from_secs(2));

        assert_eq!(config.base_url, "http://localhost:9999");
        assert_eq!(config.host, "localhost");
        assert_eq!(config.api_key(), "key");
    }

    #[test]
    fn config_from_app_config() {
        let app = RailApiConfig {
            api_key: "rapid-key".to_string(),
            ..Default::default()
        };
        let config = RailClientConfig::from_app_config(&app);

        assert_eq!(config.api_key(), "rapid-key");
        assert_eq!(config.host, app.host);
    }

    // HTTP behavior is covered through the port mock; live-API integration
    // tests require a RapidAPI key and are not run in CI.
}
