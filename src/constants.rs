//! Fixed business constants: criterion set, score bounds, questionnaire gates.
//!
//! These are not configuration. The criterion set, the [1,6] score range and the
//! stage-3 answer budget are part of the assessment method itself; the catalog
//! files only supply names, weights, baselines and adjustment deltas.

/// Number of evaluation criteria (A..E).
pub const CRITERION_COUNT: usize = 5;

/// Criterion codes in catalog order.
pub const CRITERION_CODES: [&str; CRITERION_COUNT] = ["A", "B", "C", "D", "E"];

/// Lowest score a scheme may hold on any criterion.
pub const SCORE_MIN: i32 = 1;

/// Highest score a scheme may hold on any criterion.
pub const SCORE_MAX: i32 = 6;

/// Inverted criteria contribute `INVERSION_BASE - raw`. Tied to the [1,6] range:
/// 1 maps to 6 and 6 maps to 1.
pub const INVERSION_BASE: i32 = SCORE_MIN + SCORE_MAX;

/// Number of stage-2 organisational context questions.
pub const CONTEXT_QUESTION_COUNT: usize = 3;

/// Number of named weighting profiles (`weighting0`..`weighting3`).
pub const WEIGHTING_COUNT: usize = 4;

/// Maximum number of "not sure" answers tolerated in stage 3. The next one aborts.
pub const MAX_UNSURE_ANSWERS: usize = 2;

/// Minimum share of stage-3 questions that must receive a definite (y/n) answer.
/// With 9 questions this requires 7 definite answers.
pub const MIN_DEFINITE_RATIO: f64 = 0.77;

/// Default number of Monte Carlo trials.
pub const DEFAULT_TRIALS: usize = 1000;

/// Default RNG seed for Monte Carlo batches.
pub const DEFAULT_SEED: u64 = 42;

/// Catalog file names, resolved relative to the base path.
pub const SCHEMES_FILE: &str = "schemes.json";
pub const CRITERIA_FILE: &str = "criteria.json";
pub const WEIGHTINGS_FILE: &str = "weightings.json";
pub const BASELINE_SCORES_FILE: &str = "baseline_scheme_scores.json";
pub const STAGE3_QUESTIONS_FILE: &str = "stage3_questions.json";

/// All catalog files required before any computation starts.
pub const REQUIRED_CATALOG_FILES: [&str; 5] = [
    SCHEMES_FILE,
    CRITERIA_FILE,
    WEIGHTINGS_FILE,
    BASELINE_SCORES_FILE,
    STAGE3_QUESTIONS_FILE,
];

/// Stage-2 organisational context questions, in asking order.
pub const CONTEXT_QUESTIONS: [&str; CONTEXT_QUESTION_COUNT] = [
    "My organization has dedicated IT personnel capable of operating and maintaining\n a complex digital key infrastructure system.\n",
    "The digital key infrastructure system selected must support more than 10,000\n users or service more than 10,000 authorizations per minute.\n",
    "My organization operates in a highly-regulated industry and has legal or statutory\n requirements regarding information processing.\n",
];

/// Clamp a score into [`SCORE_MIN`, `SCORE_MAX`].
#[inline(always)]
pub fn clamp_score(score: i32) -> i32 {
    score.clamp(SCORE_MIN, SCORE_MAX)
}

/// Whether `score` lies inside the valid range.
#[inline(always)]
pub fn is_valid_score(score: i32) -> bool {
    (SCORE_MIN..=SCORE_MAX).contains(&score)
}
