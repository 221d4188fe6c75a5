pub mod orchestrator;
pub mod parse;
pub mod prompt;

pub use orchestrator::Orchestrator;
