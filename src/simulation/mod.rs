//! Monte Carlo simulation over random answer sets.
//!
//! - [`engine`]: Random answer generation and parallel batch runs
//! - [`statistics`]: Winner and weighting frequencies over a batch

pub mod engine;
pub mod statistics;

pub use engine::{
    simulate_batch, simulate_batch_with_progress, simulate_trial, RandomAnswers,
    SimulationResult, TrialOutcome,
};
pub use statistics::{summarize, Frequency, SimulationSummary, SummaryRecord};
