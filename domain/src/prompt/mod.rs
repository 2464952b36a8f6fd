//! Prompt domain
//!
//! Templates and the builder that turns roster, opening prompt and message
//! log into the text sent to one agent.

mod builder;
mod template;

pub use builder::PromptBuilder;
pub use template::PromptTemplate;
