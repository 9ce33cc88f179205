//! Stage 3 score adjustment: apply "yes"-triggered deltas to baseline scores.
//!
//! Questions are applied in catalog order, not answer order, and every single
//! delta is clamped into [1,6] before the next one is applied. Clamping per step
//! is not equivalent to summing the deltas and clamping once: a scheme at 6 that
//! receives +2 then -2 ends at 4, not 6.

use crate::catalog::Catalog;
use crate::constants::clamp_score;
use crate::types::{Answer, AnswerSet, Criterion, ScoreVector};

/// Apply one signed delta and clamp the result.
#[inline(always)]
pub fn apply_delta(scores: &mut ScoreVector, criterion: Criterion, delta: i32) {
    let next = clamp_score(scores.get(criterion).saturating_add(delta));
    scores.set(criterion, next);
}

/// Adjusted score vectors for every scheme, in catalog scheme order.
///
/// Starts from a fresh copy of the baseline; the catalog is never modified.
pub fn adjust_scores(catalog: &Catalog, answers: &AnswerSet) -> Vec<ScoreVector> {
    let mut scores = catalog.baseline_scores();
    for question in catalog.questions() {
        if answers.stage3_answer(question.number) != Some(Answer::Yes) {
            continue;
        }
        for rule in &question.adjustments {
            let target = &mut scores[rule.scheme];
            for &(criterion, delta) in &rule.deltas {
                apply_delta(target, criterion, delta);
            }
        }
    }
    scores
}
