//! Travel Data API Port - Downstream Indian Railways data operations.
//!
//! One operation per domain intent. All failures — non-2xx statuses and
//! network errors alike — classify as a single "unavailable" kind at this
//! boundary; the dispatcher renders them as user-facing diagnostics. No
//! retries are performed here by design.

use async_trait::async_trait;
use serde_json::Value;

/// Port for the downstream travel-data API.
#[async_trait]
pub trait TravelDataApi: Send + Sync {
    /// Trains running between two stations on a date.
    async fn trains_between_stations(
        &self,
        source: &str,
        destination: &str,
        date: &str,
    ) -> Result<Value, TravelApiError>;

    /// Live running status of a train.
    async fn train_live_status(
        &self,
        train_no: &str,
        date: &str,
    ) -> Result<Value, TravelApiError>;

    /// Full schedule of a train.
    async fn train_schedule(&self, train_no: &str) -> Result<Value, TravelApiError>;

    /// PNR booking status.
    async fn pnr_status(&self, pnr: &str) -> Result<Value, TravelApiError>;

    /// Seat availability for a class on a train between two stations.
    async fn seat_availability(
        &self,
        train_no: &str,
        source: &str,
        destination: &str,
        date: &str,
        travel_class: &str,
    ) -> Result<Value, TravelApiError>;

    /// Departure board for the next `hours` hours.
    async fn live_station(&self, hours: u32) -> Result<Value, TravelApiError>;

    /// Free-text train search.
    async fn search_train(&self, query: &str) -> Result<Value, TravelApiError>;

    /// Free-text station search.
    async fn search_station(&self, query: &str) -> Result<Value, TravelApiError>;
}

/// Travel-data API errors.
#[derive(Debug, thiserror::Error)]
pub enum TravelApiError {
    /// The downstream API returned a non-2xx status or was unreachable.
    #[error("travel data API unavailable: {0}")]
    Unavailable(String),
}

impl TravelApiError {
    /// Creates an error from a non-2xx response.
    pub fn status(status: u16, url: &str, body: &str) -> Self {
        Self::Unavailable(format!("[{status}] {url}: {body}"))
    }

    /// Creates an error from a network failure.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_carries_context() {
        let err = TravelApiError::status(502, "https://api.example/pnr", "bad gateway");
        assert_eq!(
            err.to_string(),
            "travel data API unavailable: [502] https://api.example/pnr: bad gateway"
        );
    }
}
