//! Pipeline orchestration

pub mod orchestrator;

pub use orchestrator::{initialize_project, run, RunOutcome, RunSummary};
