//! Core domain concepts shared across all subdomains.
//!
//! - [`question::Question`]: the validated opening prompt of a dialogue
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: small text helpers used by the tag scanner and logging

pub mod error;
pub mod question;
pub mod string;
