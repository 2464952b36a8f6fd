//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! implement.

pub mod conversation_logger;
pub mod dialogue_observer;
pub mod generation_gateway;
