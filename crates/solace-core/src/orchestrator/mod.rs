//! Orchestrator - the per-utterance control loop
//!
//! Ties the signal extractors, the conversation context, the assessment
//! scorer, the recommendation selector and the reply generator together.
//!
//! # Module Structure
//!
//! - `config`: `OrchestratorConfig`, `TurnInput`, `RecommendationQuery`
//! - `types`: `TurnResult`
//! - `core`: `Orchestrator` struct, builders, per-session lanes
//! - `process`: `submit_message`, the turn pipeline
//! - `lifecycle`: session start, summary, continuation and end
//! - `assessment`: assessment flow
//! - `recommendations`: recommendation requests and follow-up flags

mod assessment;
mod config;
mod core;
mod lifecycle;
mod process;
mod recommendations;
mod types;

#[cfg(test)]
mod tests;

pub use config::{OrchestratorConfig, RecommendationQuery, TurnInput};
pub use self::core::Orchestrator;
pub use types::TurnResult;
