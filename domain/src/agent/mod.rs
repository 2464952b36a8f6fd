//! Agent domain.
//!
//! - [`value_objects::AgentId`] / [`value_objects::Endpoint`]: identity and address
//! - [`entities::AgentDescriptor`]: one configured agent
//! - [`entities::Roster`]: the ordered set of enabled agents in a dialogue
//! - [`validation`]: structured issues reported by config validation

pub mod entities;
pub mod validation;
pub mod value_objects;
