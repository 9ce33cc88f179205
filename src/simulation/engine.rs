//! Monte Carlo engine: run the assessment pipeline on random answer sets.
//!
//! Each trial draws a random criteria ranking, random context answers and a
//! random stage-3 answer sheet with 0, 1 or 2 "not sure" answers at uniformly
//! chosen positions (the rest are y/n with equal probability). The answers go
//! through exactly the same [`run_assessment`] path as an interactive run.
//! Aborted trials have no winner and are dropped.
//!
//! Trial `i` uses its own `SmallRng` seeded with `seed + i`, so a batch is
//! reproducible regardless of how rayon schedules the trials.

use rand::rngs::SmallRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::assessment::{run_assessment, AnswerSource, Stage};
use crate::catalog::{Catalog, Question};
use crate::constants::{CONTEXT_QUESTION_COUNT, MAX_UNSURE_ANSWERS};
use crate::error::StageError;
use crate::types::{Answer, ContextAnswers, Ranking, WeightingId};

/// A complete random answer sheet for one trial.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomAnswers {
    pub ranking: Ranking,
    pub context: ContextAnswers,
    pub stage3: Vec<Answer>,
}

impl RandomAnswers {
    /// Draw an answer sheet for `num_questions` stage-3 questions.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, num_questions: usize) -> Self {
        let ranking = Ranking::shuffled(rng);

        let mut context = ContextAnswers::default();
        for i in 0..CONTEXT_QUESTION_COUNT {
            context.0[i] = rng.random_bool(0.5);
        }

        let unsure_count = rng.random_range(0..=MAX_UNSURE_ANSWERS).min(num_questions);
        let mut stage3: Vec<Answer> = (0..num_questions)
            .map(|_| {
                if rng.random_bool(0.5) {
                    Answer::Yes
                } else {
                    Answer::No
                }
            })
            .collect();
        for i in index::sample(rng, num_questions, unsure_count) {
            stage3[i] = Answer::Unsure;
        }

        Self {
            ranking,
            context,
            stage3,
        }
    }
}

impl AnswerSource for RandomAnswers {
    type Error = StageError;

    fn rank_criteria(&mut self, _catalog: &Catalog) -> Result<Ranking, StageError> {
        Ok(self.ranking)
    }

    fn context_answers(&mut self, _catalog: &Catalog) -> Result<ContextAnswers, StageError> {
        Ok(self.context)
    }

    fn answer(&mut self, _question: &Question, index: usize) -> Result<Answer, StageError> {
        self.stage3
            .get(index)
            .copied()
            .ok_or(StageError::NotFinished(Stage::Questionnaire))
    }
}

/// Outcome of one valid (non-aborted) trial.
#[derive(Clone, Debug, PartialEq)]
pub struct TrialOutcome {
    pub ranking: Ranking,
    pub context: ContextAnswers,
    pub weighting: WeightingId,
    /// Catalog index of the winning scheme.
    pub winner: usize,
}

/// Results of a batch simulation.
pub struct SimulationResult {
    pub num_trials: usize,
    pub seed: u64,
    /// Valid trials only.
    pub outcomes: Vec<TrialOutcome>,
    pub elapsed: Duration,
}

impl SimulationResult {
    pub fn valid_trials(&self) -> usize {
        self.outcomes.len()
    }
}

/// Run one trial. `None` when the answer sheet aborts the assessment.
pub fn simulate_trial<R: Rng + ?Sized>(catalog: &Catalog, rng: &mut R) -> Option<TrialOutcome> {
    let mut answers = RandomAnswers::generate(rng, catalog.questions().len());
    let (ranking, context) = (answers.ranking, answers.context);
    let result = match run_assessment(catalog, &mut answers) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(error = %e, "trial failed");
            return None;
        }
    };
    if result.assessment_aborted {
        tracing::trace!(reason = ?result.abort_reason, "trial aborted");
        return None;
    }
    Some(TrialOutcome {
        ranking,
        context,
        weighting: result.selected_weighting,
        winner: result.winner_index()?,
    })
}

/// Simulate `num_trials` trials in parallel.
pub fn simulate_batch(catalog: &Catalog, num_trials: usize, seed: u64) -> SimulationResult {
    simulate_batch_with_progress(catalog, num_trials, seed, |_| {})
}

/// Like [`simulate_batch`], calling `on_progress(done)` every 10% of trials.
pub fn simulate_batch_with_progress<F>(
    catalog: &Catalog,
    num_trials: usize,
    seed: u64,
    on_progress: F,
) -> SimulationResult
where
    F: Fn(usize) + Sync,
{
    let start = Instant::now();
    let step = (num_trials / 10).max(1);
    let done = AtomicUsize::new(0);

    let outcomes: Vec<TrialOutcome> = (0..num_trials)
        .into_par_iter()
        .filter_map(|i| {
            let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(i as u64));
            let outcome = simulate_trial(catalog, &mut rng);
            let n = done.fetch_add(1, Ordering::Relaxed) + 1;
            if n % step == 0 {
                on_progress(n);
            }
            outcome
        })
        .collect();

    SimulationResult {
        num_trials,
        seed,
        outcomes,
        elapsed: start.elapsed(),
    }
}
