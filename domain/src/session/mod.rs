//! Message log and stream domain.
//!
//! - [`entities::MessageRecord`]: a finalized, immutable message
//! - [`log::MessageLog`]: the append-only ordered record
//! - [`stream::StreamEvent`]: incremental events of one generation stream

pub mod entities;
pub mod log;
pub mod stream;
