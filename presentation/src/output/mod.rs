//! Console rendering of messages and outcomes

pub mod console;
