//! Flight-status provider gateway
//!
//! Thin adapter over the live flight-data provider. Each request makes
//! exactly one outbound attempt under the configured timeout; there is no
//! retry. Outcomes are explicit so callers branch on kind: transport
//! failure, non-success status, empty success and populated success are
//! all distinct.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::FlightsConfig;

/// How the board query filters flights
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Flights departing from the given airport code
    Departures,
    /// Flights arriving at the given airport code
    Arrivals,
}

impl Direction {
    /// Provider endpoint path segment and display word
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Departures => "departures",
            Direction::Arrivals => "arrivals",
        }
    }
}

/// Non-fatal gateway failure, reported inline in the answer text
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The outbound call exceeded the configured timeout
    #[error("flight provider timed out")]
    Timeout,
    /// Connection-level failure before any HTTP status arrived
    #[error("flight provider unreachable: {0}")]
    Transport(String),
    /// The provider answered with a non-success status
    #[error("flight provider error {status}: {body}")]
    Status { status: u16, body: String },
    /// The provider answered 2xx with a body we could not decode
    #[error("flight provider returned an unreadable payload: {0}")]
    Payload(String),
}

/// One flight, already reduced to the fields the answer needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightRecord {
    pub airline: String,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub status: String,
}

impl FlightRecord {
    /// One-line summary used in the chat answer
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "{} ({}) {}->{} [{}]",
            self.flight_number, self.airline, self.origin, self.destination, self.status
        )
    }
}

/// Flight-data provider client
pub struct FlightStatusClient {
    client: Client,
    access_key: String,
    base_url: String,
    max_results: u32,
}

impl FlightStatusClient {
    /// Build a client when a credential is configured; None disables live
    /// flight lookups without failing startup.
    #[must_use]
    pub fn from_config(config: &FlightsConfig) -> Option<Self> {
        let access_key = config.access_key.clone()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .user_agent(concat!("aerodesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Some(Self {
            client,
            access_key,
            base_url: config.base_url.clone(),
            max_results: config.max_results,
        })
    }

    /// Query the live board for one airport code.
    ///
    /// `Ok` with an empty vec means the provider had no flights, which is
    /// not an error; callers word it differently from gateway trouble.
    pub async fn board(
        &self,
        direction: Direction,
        airport_code: &str,
    ) -> Result<Vec<FlightRecord>, GatewayError> {
        let url = format!("{}/{}", self.base_url, direction.as_str());

        let response = self
            .client
            .get(&url)
            .query(&[
                ("access_key", self.access_key.as_str()),
                ("airport_iata", airport_code),
                ("limit", &self.max_results.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::Transport(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!("Flight provider returned status {status} for {airport_code}");
            return Err(GatewayError::Status { status, body });
        }

        let board: provider::BoardResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Payload(e.to_string()))?;

        let flights: Vec<FlightRecord> = board.data.into_iter().map(FlightRecord::from).collect();
        info!(
            "Provider returned {} {} for {airport_code}",
            flights.len(),
            direction.as_str()
        );
        Ok(flights)
    }
}

/// Provider API response structures and conversion defaults
mod provider {
    use super::FlightRecord;
    use serde::Deserialize;

    /// Top-level board response; `data` defaults to empty when omitted
    #[derive(Debug, Deserialize)]
    pub struct BoardResponse {
        #[serde(default)]
        pub data: Vec<ProviderFlight>,
    }

    /// One flight record as the provider shapes it. Every field is
    /// optional on the wire; conversion fills documented defaults.
    #[derive(Debug, Deserialize)]
    pub struct ProviderFlight {
        pub airline: Option<NamedEntity>,
        pub flight: Option<FlightIdent>,
        pub departure: Option<Endpoint>,
        pub arrival: Option<Endpoint>,
        pub flight_status: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct NamedEntity {
        pub name: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct FlightIdent {
        pub iata: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Endpoint {
        pub iata: Option<String>,
    }

    impl From<ProviderFlight> for FlightRecord {
        fn from(raw: ProviderFlight) -> Self {
            Self {
                airline: raw
                    .airline
                    .and_then(|a| a.name)
                    .unwrap_or_else(|| "Unknown Airline".to_string()),
                flight_number: raw
                    .flight
                    .and_then(|f| f.iata)
                    .unwrap_or_else(|| "N/A".to_string()),
                origin: raw
                    .departure
                    .and_then(|d| d.iata)
                    .unwrap_or_else(|| "???".to_string()),
                destination: raw
                    .arrival
                    .and_then(|a| a.iata)
                    .unwrap_or_else(|| "???".to_string()),
                status: raw.flight_status.unwrap_or_else(|| "scheduled".to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FlightsConfig;

    #[test]
    fn client_requires_a_credential() {
        let config = FlightsConfig::default();
        assert!(FlightStatusClient::from_config(&config).is_none());

        let mut config = FlightsConfig::default();
        config.access_key = Some("test_key_1234567890".to_string());
        let client = FlightStatusClient::from_config(&config).unwrap();
        assert_eq!(client.base_url, "http://api.aviationstack.com/v1");
        assert_eq!(client.max_results, 25);
    }

    #[test]
    fn direction_paths() {
        assert_eq!(Direction::Departures.as_str(), "departures");
        assert_eq!(Direction::Arrivals.as_str(), "arrivals");
    }

    #[test]
    fn provider_payload_defaults() {
        let payload = r#"{
            "data": [
                {
                    "airline": {"name": "United Airlines"},
                    "flight": {"iata": "UA123"},
                    "departure": {"iata": "LAX"},
                    "arrival": {"iata": "SFO"},
                    "flight_status": "active"
                },
                {
                    "airline": null,
                    "flight": {},
                    "departure": null,
                    "arrival": {"iata": null}
                }
            ]
        }"#;

        let board: provider::BoardResponse = serde_json::from_str(payload).unwrap();
        let flights: Vec<FlightRecord> = board.data.into_iter().map(FlightRecord::from).collect();

        assert_eq!(flights[0].describe(), "UA123 (United Airlines) LAX->SFO [active]");
        assert_eq!(flights[1].airline, "Unknown Airline");
        assert_eq!(flights[1].flight_number, "N/A");
        assert_eq!(flights[1].origin, "???");
        assert_eq!(flights[1].destination, "???");
        assert_eq!(flights[1].status, "scheduled");
    }

    #[test]
    fn empty_and_missing_data_both_parse() {
        let board: provider::BoardResponse = serde_json::from_str("{\"data\": []}").unwrap();
        assert!(board.data.is_empty());
        let board: provider::BoardResponse = serde_json::from_str("{}").unwrap();
        assert!(board.data.is_empty());
    }
}
