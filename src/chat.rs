//! Chat pipeline: normalization, classification, resolution, composition
//!
//! Each inbound message flows through exactly one domain handler and
//! always produces a well-formed response; lookup misses and gateway
//! trouble are worded into the answer, never surfaced as errors. No
//! state survives a request.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::airlines;
use crate::airports::AirportDirectory;
use crate::flights::{FlightStatusClient, GatewayError};
use crate::intent::{self, Intent};
use crate::powerbank::{self, FAA_LITHIUM_URL};
use crate::text;

/// TSA travel-size toiletries guidance
const TSA_LIQUIDS_URL: &str =
    "https://www.tsa.gov/travel/security-screening/whatcanibring/items/travel-size-toiletries";

const TSA_LIQUIDS_SUMMARY: &str = "TSA liquids rule (3-1-1): containers <= 3.4 oz / 100 mL; \
     all containers fit in one quart-size transparent bag; one bag per passenger; \
     place in bin for screening. Larger volumes go in a checked bag.";

const FAA_POWERBANK_SUMMARY: &str = "Power banks (lithium batteries): carry-on only (no checked). \
     <=100 Wh allowed without airline approval; 100-160 Wh requires airline approval; \
     protect terminals from short circuit.";

/// Stable capability list returned for every unrecognized message
const FALLBACK_ANSWER: &str = "I can help with:\n\
     - Live flights (departures & arrivals by IATA code)\n\
     - Airline baggage links\n\
     - TSA liquids & FAA power banks\n\
     - Airport info by code/name/city";

/// Inbound chat request body
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Outbound chat response: an answer and at most one citation URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ChatResponse {
    fn plain<S: Into<String>>(answer: S) -> Self {
        Self {
            answer: answer.into(),
            source: None,
        }
    }

    fn cited<S: Into<String>, U: Into<String>>(answer: S, source: U) -> Self {
        Self {
            answer: answer.into(),
            source: Some(source.into()),
        }
    }
}

/// Everything a request handler needs; all of it read-only
#[derive(Clone)]
pub struct ChatService {
    airports: Arc<AirportDirectory>,
    flights: Option<Arc<FlightStatusClient>>,
}

impl ChatService {
    #[must_use]
    pub fn new(airports: Arc<AirportDirectory>, flights: Option<FlightStatusClient>) -> Self {
        Self {
            airports,
            flights: flights.map(Arc::new),
        }
    }

    /// Answer one message end to end
    pub async fn respond(&self, raw_message: &str) -> ChatResponse {
        let normalized = text::normalize(raw_message);
        let codes = text::extract_iata_tokens(raw_message, self.airports.iata_codes());
        let intent = intent::classify(&normalized, !codes.is_empty());
        debug!("Classified message as {intent:?} with codes {codes:?}");

        match intent {
            Intent::Liquids => ChatResponse::cited(TSA_LIQUIDS_SUMMARY, TSA_LIQUIDS_URL),
            Intent::PowerBank => self.answer_powerbank(&normalized),
            Intent::Baggage => self.answer_baggage(&normalized),
            Intent::LiveFlights => self.answer_live_flights(&normalized, &codes).await,
            Intent::AirportLookup => self.answer_airport_lookup(&normalized, &codes),
            Intent::Fallback => ChatResponse::plain(FALLBACK_ANSWER),
        }
    }

    fn answer_powerbank(&self, normalized: &str) -> ChatResponse {
        match powerbank::parse_capacity(normalized) {
            Some(capacity) => {
                let verdict = powerbank::classify(capacity.watt_hours).verdict();
                let voltage_note = capacity
                    .voltage
                    .map(|v| format!(" using {v} V,"))
                    .unwrap_or_default();
                ChatResponse::cited(
                    format!(
                        "Estimated capacity is about {:.1} Wh{voltage_note} which falls under: {verdict}",
                        capacity.watt_hours
                    ),
                    FAA_LITHIUM_URL,
                )
            }
            // No numeric value found: fall back to the regulatory summary
            None => ChatResponse::cited(FAA_POWERBANK_SUMMARY, FAA_LITHIUM_URL),
        }
    }

    fn answer_baggage(&self, normalized: &str) -> ChatResponse {
        match airlines::resolve(normalized) {
            Some(airline) => ChatResponse::cited(
                format!("Here's the official baggage policy for {}:", airline.name),
                airline.baggage_url,
            ),
            None => ChatResponse::plain(
                "Tell me the airline (e.g., 'United baggage', 'AA baggage allowance').",
            ),
        }
    }

    async fn answer_live_flights(&self, normalized: &str, codes: &[String]) -> ChatResponse {
        let direction = intent::flight_direction(normalized);

        let Some(code) = codes.first() else {
            return ChatResponse::plain(
                "Which airport? Give me a 3-letter IATA code, e.g. 'flights from LAX'.",
            );
        };

        let Some(client) = &self.flights else {
            return ChatResponse::plain(
                "Live flight lookups are not configured on this server (no provider access key).",
            );
        };

        match client.board(direction, code).await {
            Ok(flights) if flights.is_empty() => ChatResponse::plain(format!(
                "No {} found for {code} at this time.",
                direction.as_str()
            )),
            Ok(flights) => {
                let examples: Vec<String> =
                    flights.iter().take(5).map(|f| f.describe()).collect();
                ChatResponse::plain(format!(
                    "Found {} {} for {code}. Examples: {}",
                    flights.len(),
                    direction.as_str(),
                    examples.join(", ")
                ))
            }
            Err(GatewayError::Status { status, body }) => ChatResponse::plain(format!(
                "Flight provider error {status}: {body}"
            )),
            Err(err) => {
                debug!("Gateway failure for {code}: {err}");
                ChatResponse::plain(
                    "Couldn't reach the flight data provider right now. Please try again later.",
                )
            }
        }
    }

    fn answer_airport_lookup(&self, normalized: &str, codes: &[String]) -> ChatResponse {
        if let Some(record) = codes.first().and_then(|c| self.airports.lookup_code(c)) {
            return ChatResponse::plain(format!(
                "{} = {} in {}, {} (ICAO {}).",
                record.iata_display(),
                record.name,
                record.city,
                record.country,
                record.icao_display()
            ));
        }

        let phrase = text::extract_location_phrase(normalized);

        if let Some(record) = self.airports.search_city(phrase) {
            return ChatResponse::plain(format!(
                "Airport in {}: {} (IATA {}, ICAO {}).",
                record.city,
                record.name,
                record.iata_display(),
                record.icao_display()
            ));
        }

        if let Some(record) = self.airports.search_name(phrase) {
            return ChatResponse::plain(format!(
                "{} is in {}, {} (IATA {}, ICAO {}).",
                record.name,
                record.city,
                record.country,
                record.iata_display(),
                record.icao_display()
            ));
        }

        ChatResponse::plain(format!(
            "I couldn't find an airport matching '{phrase}'. Try a 3-letter IATA code or a city name."
        ))
    }
}

/// The verbatim fallback capability list
#[must_use]
pub fn fallback_answer() -> &'static str {
    FALLBACK_ANSWER
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airports::AirportDirectory;

    const SAMPLE: &str = concat!(
        "3670,\"Dallas Fort Worth International Airport\",\"Dallas-Fort Worth\",\"United States\",\"DFW\",\"KDFW\",32.896801,-97.038002,607,-6,\"A\",\"America/Chicago\",\"airport\",\"OurAirports\"\n",
        "3484,\"Los Angeles International Airport\",\"Los Angeles\",\"United States\",\"LAX\",\"KLAX\",33.94250107,-118.4079971,125,-8,\"A\",\"America/Los_Angeles\",\"airport\",\"OurAirports\"\n",
        "2359,\"Haneda Airport\",\"Tokyo\",\"Japan\",\"HND\",\"RJTT\",35.552299,139.779999,35,9,\"U\",\"Asia/Tokyo\",\"airport\",\"OurAirports\"\n",
    );

    fn service() -> ChatService {
        let directory = AirportDirectory::from_reader(SAMPLE.as_bytes()).unwrap();
        ChatService::new(Arc::new(directory), None)
    }

    #[tokio::test]
    async fn liquids_answer_cites_tsa() {
        let response = service().respond("can I bring liquids on board?").await;
        assert!(response.answer.contains("3-1-1"));
        assert_eq!(response.source.as_deref(), Some(TSA_LIQUIDS_URL));
    }

    #[tokio::test]
    async fn powerbank_capacity_is_computed() {
        let response = service().respond("is 20000mAh allowed").await;
        assert!(response.answer.contains("74.0 Wh"));
        assert!(response.answer.contains("without airline approval"));
        assert_eq!(response.source.as_deref(), Some(FAA_LITHIUM_URL));
    }

    #[tokio::test]
    async fn oversized_powerbank_is_rejected() {
        let response = service().respond("500 Wh battery").await;
        assert!(response.answer.contains("exceeds 160 Wh"));
    }

    #[tokio::test]
    async fn powerbank_without_number_gets_summary() {
        let response = service().respond("power bank rules please").await;
        assert!(response.answer.contains("carry-on only"));
        assert_eq!(response.source.as_deref(), Some(FAA_LITHIUM_URL));
    }

    #[tokio::test]
    async fn baggage_resolves_airline() {
        let response = service().respond("United baggage").await;
        assert!(response.answer.contains("United Airlines"));
        assert_eq!(
            response.source.as_deref(),
            Some("https://www.united.com/en/us/fly/travel/baggage.html")
        );
    }

    #[tokio::test]
    async fn baggage_without_airline_prompts() {
        let response = service().respond("baggage allowance").await;
        assert!(response.answer.contains("Tell me the airline"));
        assert!(response.source.is_none());
    }

    #[tokio::test]
    async fn airport_code_lookup_is_case_insensitive() {
        let upper = service().respond("DFW").await;
        let lower = service().respond("dfw").await;
        assert_eq!(upper, lower);
        assert!(upper.answer.contains("Dallas Fort Worth International Airport"));
        assert!(upper.answer.contains("ICAO KDFW"));
    }

    #[tokio::test]
    async fn airport_lookup_by_city_phrase() {
        let response = service().respond("airport in tokyo").await;
        assert!(response.answer.contains("Haneda Airport"));
    }

    #[tokio::test]
    async fn airport_lookup_miss_is_informative() {
        let response = service().respond("airport in atlantis").await;
        assert!(response.answer.contains("couldn't find an airport"));
    }

    #[tokio::test]
    async fn live_flights_without_credential_hints_configuration() {
        let response = service().respond("flights from LAX").await;
        assert!(response.answer.contains("not configured"));
    }

    #[tokio::test]
    async fn live_flights_without_code_prompts() {
        let response = service().respond("flights from nowhere").await;
        assert!(response.answer.contains("Which airport?"));
    }

    #[tokio::test]
    async fn fallback_is_stable_and_verbatim() {
        let first = service().respond("tell me a joke").await;
        let second = service().respond("what's the meaning of life").await;
        assert_eq!(first.answer, fallback_answer());
        assert_eq!(first, second);
        assert!(first.source.is_none());
    }
}
