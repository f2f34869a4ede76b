pub mod keyboard_input;

mod orchestrator;
mod runtime;
mod shutdown;
mod startup;
mod types;

#[cfg(test)]
mod tests;

pub use orchestrator::GesturecamOrchestrator;
pub use types::{RunOptions, RunOutcome, ShutdownReason};
