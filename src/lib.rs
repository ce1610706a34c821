//! Aerodesk - travel help desk service
//!
//! Answers free-text travel questions (airport identity, airline baggage
//! policy, TSA liquids rule, power-bank limits, live flight status) by
//! classifying intent from keyword rules and resolving it against static
//! reference tables or a live flight-data provider.

pub mod airlines;
pub mod airports;
pub mod chat;
pub mod config;
pub mod error;
pub mod flights;
pub mod intent;
pub mod powerbank;
pub mod text;
pub mod web;

// Re-export core types for public API
pub use airports::{AirportDirectory, AirportRecord};
pub use chat::{ChatRequest, ChatResponse, ChatService};
pub use config::AerodeskConfig;
pub use error::AerodeskError;
pub use flights::{Direction, FlightStatusClient, GatewayError};
pub use intent::Intent;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
