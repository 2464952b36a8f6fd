//! Quorum to stop: termination voting.
//!
//! A dialogue ends on its own once the agents' end votes reach the roster
//! size. See [`vote::TerminationVotes`] for how votes are tallied.

pub mod vote;

pub use vote::{TerminationVotes, VotePolicy};
