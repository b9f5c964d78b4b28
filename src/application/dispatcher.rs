//! Dispatch of completed intents to the travel-data API.
//!
//! A fixed table maps each domain intent to one downstream operation with
//! parameters pulled from the session's slot map. Downstream failures never
//! escape: they are rendered as user-facing diagnostic strings and the turn
//! completes normally.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::domain::{Intent, SlotValues};
use crate::ports::{TravelApiError, TravelDataApi};

/// Travel class used when the caller did not specify one.
const DEFAULT_TRAVEL_CLASS: &str = "SL";

/// Maps a completed intent + params to one downstream call.
pub struct Dispatcher {
    api: Arc<dyn TravelDataApi>,
}

/// Internal dispatch failures; always rendered into the reply string.
#[derive(Debug, Error)]
enum DispatchError {
    #[error("missing required parameter: {0}")]
    MissingParam(&'static str),

    #[error("invalid value for {slot}: {value}")]
    InvalidParam {
        slot: &'static str,
        value: String,
    },

    #[error(transparent)]
    Api(#[from] TravelApiError),
}

impl Dispatcher {
    /// Creates a dispatcher backed by the given API client.
    pub fn new(api: Arc<dyn TravelDataApi>) -> Self {
        Self { api }
    }

    /// Execute the downstream operation for `intent`.
    ///
    /// Returns the raw JSON payload serialized to a string on success, or a
    /// diagnostic string on failure — never an error.
    pub async fn dispatch(&self, intent: Intent, params: &SlotValues) -> String {
        match self.call(intent, params).await {
            Ok(value) => value.to_string(),
            Err(DispatchError::Api(err)) => format!("IRCTC API error: {err}"),
            Err(err) => format!("Unexpected error: {err}"),
        }
    }

    async fn call(&self, intent: Intent, params: &SlotValues) -> Result<Value, DispatchError> {
        let slot = |name: &'static str| {
            params
                .get(name)
                .map(String::as_str)
                .ok_or(DispatchError::MissingParam(name))
        };

        let value = match intent {
            Intent::TrainBetweenStations => {
                self.api
                    .trains_between_stations(slot("source")?, slot("destination")?, slot("date")?)
                    .await?
            }
            Intent::LiveStatus => {
                self.api
                    .train_live_status(slot("train_no")?, slot("date")?)
                    .await?
            }
            Intent::TrainSchedule => self.api.train_schedule(slot("train_no")?).await?,
            Intent::PnrStatus => self.api.pnr_status(slot("pnr")?).await?,
            Intent::SeatAvailability => {
                let travel_class = params
                    .get("class")
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_TRAVEL_CLASS);
                self.api
                    .seat_availability(
                        slot("train_no")?,
                        slot("source")?,
                        slot("destination")?,
                        slot("date")?,
                        travel_class,
                    )
                    .await?
            }
            Intent::LiveStation => {
                let raw = slot("hours")?;
                let hours: u32 = raw.parse().map_err(|_| DispatchError::InvalidParam {
                    slot: "hours",
                    value: raw.to_string(),
                })?;
                self.api.live_station(hours).await?
            }
            Intent::SearchTrain => self.api.search_train(slot("query")?).await?,
            Intent::SearchStation => self.api.search_station(slot("query")?).await?,
        };

        Ok(value)
    }
}
