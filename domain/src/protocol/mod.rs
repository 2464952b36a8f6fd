//! Text protocol embedded in agent output.
//!
//! - [`think`]: the tag scanner separating reasoning from the visible answer
//! - [`markers`]: termination votes and clarification requests

pub mod markers;
pub mod think;

pub use markers::{ControlSignal, contains_end_marker, extract_clarification, parse_control_signal};
pub use think::{ThinkSplit, extract_think};
