//! Streaming client for the `/api/generate` wire contract.
//!
//! - [`decoder::NdjsonDecoder`] turns raw body chunks into text deltas
//! - [`gateway::OllamaGateway`] implements the
//!   [`GenerationGateway`](roundtable_application::GenerationGateway) port

pub mod decoder;
pub mod gateway;

pub use decoder::{DecoderEvent, NdjsonDecoder};
pub use gateway::OllamaGateway;
