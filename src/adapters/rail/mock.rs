//! Mock travel-data API for testing.
//!
//! Records every call with its operation name and positional arguments, and
//! serves queued responses or errors.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{TravelApiError, TravelDataApi};

/// Mock travel-data API.
///
/// Responses are consumed in queue order; an exhausted queue reports the
/// downstream as unavailable so a test that under-queues fails loudly.
#[derive(Debug, Clone, Default)]
pub struct MockTravelApi {
    responses: Arc<Mutex<VecDeque<Result<Value, String>>>>,
    calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl MockTravelApi {
    /// Creates a new mock with an empty response queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful JSON response.
    pub fn with_response(self, value: Value) -> Self {
        self.responses.lock().unwrap().push_back(Ok(value));
        self
    }

    /// Queues a downstream failure.
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(Err(message.into()));
        self
    }

    /// All calls received so far as (operation, arguments).
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, operation: &str, args: &[&str]) -> Result<Value, TravelApiError> {
        self.calls.lock().unwrap().push((
            operation.to_string(),
            args.iter().map(|a| a.to_string()).collect(),
        ));
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(TravelApiError::network(message)),
            None => Err(TravelApiError::network("mock: response queue exhausted")),
        }
    }
}

#[async_trait]
impl TravelDataApi for MockTravelApi {
    async fn trains_between_stations(
        &self,
        source: &str,
        destination: &str,
        date: &str,
    ) -> Result<Value, TravelApiError> {
        self.record("trains_between_stations", &[source, destination, date])
    }

    async fn train_live_status(
        &self,
        train_no: &str,
        date: &str,
    ) -> Result<Value, TravelApiError> {
        self.record("train_live_status", &[train_no, date])
    }

    async fn train_schedule(&self, train_no: &str) -> Result<Value, TravelApiError> {
        self.record("train_schedule", &[train_no])
    }

    async fn pnr_status(&self, pnr: &str) -> Result<Value, TravelApiError> {
        self.record("pnr_status", &[pnr])
    }

    async fn seat_availability(
        &self,
        train_no: &str,
        source: &str,
        destination: &str,
        date: &str,
        travel_class: &str,
    ) -> Result<Value, TravelApiError> {
        self.record(
            "seat_availability",
            &[train_no, source, destination, date, travel_class],
        )
    }

    async fn live_station(&self, hours: u32) -> Result<Value, TravelApiError> {
        let hours = hours.to_string();
        self.record("live_station", &[hours.as_str()])
    }

    async fn search_train(&self, query: &str) -> Result<Value, TravelApiError> {
        self.record("search_train", &[query])
    }

    async fn search_station(&self, query: &str) -> Result<Value, TravelApiError> {
        self.record("search_station", &[query])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn records_calls_with_arguments() {
        let mock = MockTravelApi::new().with_response(json!({"ok": true}));

        mock.pnr_status("1234567890").await.unwrap();

        assert_eq!(
            mock.calls(),
            vec![("pnr_status".to_string(), vec!["1234567890".to_string()])]
        );
    }

    #[tokio::test]
    async fn queued_error_surfaces_as_unavailable() {
        let mock = MockTravelApi::new().with_error("boom");

        let err = mock.search_train("rajdhani").await.unwrap_err();

        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn exhausted_queue_is_unavailable() {
        let mock = MockTravelApi::new();

        let err = mock.live_station(2).await.unwrap_err();

        assert!(err.to_string().contains("queue exhausted"));
    }
}
