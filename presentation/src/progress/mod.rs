//! Live progress display while a dialogue runs

pub mod reporter;
