//! # dKI — Digital Key Infrastructure Scheme Assessment
//!
//! Recommends a digital key infrastructure scheme from a three-stage
//! questionnaire, and stress-tests the recommendation logic with a Monte Carlo
//! driver that feeds random answer sets through the same pipeline.
//!
//! ## Pipeline
//!
//! | Step | Module | Description |
//! |------|--------|-------------|
//! | 0 | [`catalog`] | Load schemes, criteria, weightings, baselines and stage-3 questions from JSON |
//! | 1 | [`assessment`] | Record the criteria ranking (kept, not used in scoring) |
//! | 2 | [`weighting`] | Map the three context answers to one of four weighting profiles |
//! | 3 | [`validator`] | Gate stage-3 answers: abort on the 3rd "not sure" or below 77% definite |
//! | 4 | [`adjust`] | Apply per-question deltas for every "y" answer, clamped to [1, 6] |
//! | 5 | [`aggregate`] | Weighted totals (criteria D and E inverted) and a stable ranking |
//!
//! [`assessment::run_assessment`] drives steps 1-5 from any
//! [`assessment::AnswerSource`]: [`prompt::ConsolePrompter`] for the
//! interactive runner, [`simulation::RandomAnswers`] for Monte Carlo trials.
//!
//! ## Criteria
//!
//! Scores live in [1, 6]. A, B and C are benefit-like (higher is better). D
//! (cost) and E (complexity) are cost-like and contribute `7 - raw`.

pub mod adjust;
pub mod aggregate;
pub mod assessment;
pub mod catalog;
pub mod constants;
pub mod env_config;
pub mod error;
pub mod prompt;
pub mod report;
pub mod simulation;
pub mod storage;
pub mod types;
pub mod validator;
pub mod weighting;
