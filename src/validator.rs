//! Stage 3 answer validation: the "not sure" budget and the definite-answer gate.
//!
//! Two gates, checked at different times:
//!
//! - **Unsure budget**: at most [`MAX_UNSURE_ANSWERS`] "not sure" answers. The
//!   answer that exceeds the budget aborts immediately; it is kept in the
//!   partial responses and no further question is asked.
//! - **Definite ratio**: once all questions are answered, the number of y/n
//!   answers must be at least `MIN_DEFINITE_RATIO * N`. Checked only after the
//!   last answer.
//!
//! A sheet that stops short of N answers never completes: it aborts with
//! [`AbortReason::Incomplete`].

use serde::Serialize;
use std::fmt;

use crate::constants::{MAX_UNSURE_ANSWERS, MIN_DEFINITE_RATIO};
use crate::types::{Answer, Stage3Response};

/// Why an assessment stopped without producing scores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbortReason {
    /// A third "not sure" answer was given.
    ExcessiveUnsure,
    /// All questions answered, but too few of them definitely.
    InsufficientDefinite { definite: usize, total: usize },
    /// The answer source ran out before every question was answered.
    Incomplete { answered: usize, total: usize },
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::ExcessiveUnsure => write!(
                f,
                "excessive undecided answers: more than {} 'not sure' responses",
                MAX_UNSURE_ANSWERS
            ),
            AbortReason::InsufficientDefinite { definite, total } => write!(
                f,
                "insufficient definite-answer ratio: {} of {} questions answered definitely, at least {:.0}% required",
                definite,
                total,
                MIN_DEFINITE_RATIO * 100.0
            ),
            AbortReason::Incomplete { answered, total } => write!(
                f,
                "incomplete answer sheet: {} of {} questions answered",
                answered, total
            ),
        }
    }
}

impl Serialize for AbortReason {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A terminal abort together with every answer recorded up to that point.
#[derive(Clone, Debug, PartialEq)]
pub struct Abort {
    pub reason: AbortReason,
    pub responses: Vec<Stage3Response>,
}

/// Outcome of recording one answer.
#[derive(Debug)]
pub enum ValidationStep {
    /// More questions remain.
    Pending(ResponseValidator),
    /// All questions answered and both gates passed.
    Complete(Vec<Stage3Response>),
    Aborted(Abort),
}

/// Incremental stage-3 validator for a fixed question count.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseValidator {
    total: usize,
    responses: Vec<Stage3Response>,
    unsure: usize,
}

impl ResponseValidator {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            responses: Vec::with_capacity(total),
            unsure: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of answers recorded so far; also the index of the next question.
    pub fn answered(&self) -> usize {
        self.responses.len()
    }

    pub fn responses(&self) -> &[Stage3Response] {
        &self.responses
    }

    /// Record the next answer and advance.
    ///
    /// With zero questions there is nothing to record; use [`Self::finish`].
    pub fn record(mut self, response: Stage3Response) -> ValidationStep {
        if response.answer == Answer::Unsure {
            self.unsure += 1;
        }
        self.responses.push(response);

        if self.unsure > MAX_UNSURE_ANSWERS {
            tracing::debug!(
                question = response.question,
                unsure = self.unsure,
                "unsure budget exceeded"
            );
            return ValidationStep::Aborted(Abort {
                reason: AbortReason::ExcessiveUnsure,
                responses: self.responses,
            });
        }

        if self.responses.len() < self.total {
            ValidationStep::Pending(self)
        } else {
            self.finish()
        }
    }

    /// Close the sheet. Short of `total` answers it aborts as incomplete;
    /// otherwise the definite-answer gate decides.
    pub fn finish(self) -> ValidationStep {
        if self.responses.len() < self.total {
            return ValidationStep::Aborted(Abort {
                reason: AbortReason::Incomplete {
                    answered: self.responses.len(),
                    total: self.total,
                },
                responses: self.responses,
            });
        }
        let definite = self
            .responses
            .iter()
            .filter(|r| r.answer.is_definite())
            .count();
        if (definite as f64) < MIN_DEFINITE_RATIO * self.total as f64 {
            return ValidationStep::Aborted(Abort {
                reason: AbortReason::InsufficientDefinite {
                    definite,
                    total: self.total,
                },
                responses: self.responses,
            });
        }
        ValidationStep::Complete(self.responses)
    }
}

/// Validate a full answer sequence for `total` questions.
///
/// The iterator is consumed lazily: after an unsure-budget abort no further
/// answer is pulled from it.
pub fn validate_responses<I>(total: usize, responses: I) -> Result<Vec<Stage3Response>, Abort>
where
    I: IntoIterator<Item = Stage3Response>,
{
    let mut validator = ResponseValidator::new(total);
    if total == 0 {
        return into_result(validator.finish());
    }
    for response in responses {
        match validator.record(response) {
            ValidationStep::Pending(v) => validator = v,
            done => return into_result(done),
        }
    }
    into_result(validator.finish())
}

fn into_result(step: ValidationStep) -> Result<Vec<Stage3Response>, Abort> {
    match step {
        ValidationStep::Complete(responses) => Ok(responses),
        ValidationStep::Aborted(abort) => Err(abort),
        ValidationStep::Pending(v) => into_result(v.finish()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn responses(answers: &[Answer]) -> Vec<Stage3Response> {
        answers
            .iter()
            .enumerate()
            .map(|(i, &answer)| Stage3Response {
                question: i as u32 + 1,
                answer,
            })
            .collect()
    }

    use Answer::{No as N, Unsure as U, Yes as Y};

    #[test]
    fn test_all_definite_completes() {
        let r = responses(&[Y, N, Y, N, Y, N, Y, N, Y]);
        assert_eq!(validate_responses(9, r.clone()), Ok(r));
    }

    #[test]
    fn test_two_unsure_allowed_for_nine_questions() {
        let r = responses(&[U, N, Y, N, U, N, Y, N, Y]);
        assert_eq!(validate_responses(9, r.clone()).unwrap().len(), 9);
    }

    #[test]
    fn test_third_unsure_aborts_immediately() {
        let r = responses(&[U, U, Y, U, N, N, N, N, N]);
        let mut pulled = 0;
        let counted = r.iter().copied().inspect(|_| pulled += 1);
        let abort = validate_responses(9, counted).unwrap_err();
        assert_eq!(abort.reason, AbortReason::ExcessiveUnsure);
        // The third unsure is retained for audit, nothing after it is read.
        assert_eq!(abort.responses.len(), 4);
        assert_eq!(abort.responses[3].answer, Answer::Unsure);
        assert_eq!(pulled, 4);
    }

    #[test]
    fn test_ratio_gate_applies_after_full_collection() {
        // Four questions, two unsure: within the unsure budget but 2 < 0.77 * 4.
        let r = responses(&[Y, U, N, U]);
        let abort = validate_responses(4, r).unwrap_err();
        assert_eq!(
            abort.reason,
            AbortReason::InsufficientDefinite {
                definite: 2,
                total: 4
            }
        );
        assert_eq!(abort.responses.len(), 4);
    }

    #[test]
    fn test_ratio_threshold_for_nine_questions() {
        // 7/9 definite is enough: 7 >= 6.93.
        let mut v = ResponseValidator::new(9);
        for r in responses(&[Y, Y, Y, Y, Y, Y, Y, U, U]) {
            v = match v.record(r) {
                ValidationStep::Pending(v) => v,
                ValidationStep::Complete(all) => {
                    assert_eq!(all.len(), 9);
                    return;
                }
                ValidationStep::Aborted(a) => panic!("unexpected abort: {}", a.reason),
            };
        }
        panic!("validator never completed");
    }

    #[test]
    fn test_zero_questions_completes_empty() {
        assert_eq!(validate_responses(0, Vec::new()), Ok(Vec::new()));
    }

    #[test]
    fn test_short_source_aborts_incomplete() {
        let abort = validate_responses(9, responses(&[Y, Y, Y])).unwrap_err();
        assert_eq!(
            abort.reason,
            AbortReason::Incomplete {
                answered: 3,
                total: 9
            }
        );
        assert_eq!(abort.responses.len(), 3);
    }

    #[test]
    fn test_seven_definite_of_nine_with_exhausted_source_not_accepted() {
        // Enough definite answers for the ratio, but two questions never answered.
        let abort = validate_responses(9, responses(&[Y; 7])).unwrap_err();
        assert_eq!(
            abort.reason,
            AbortReason::Incomplete {
                answered: 7,
                total: 9
            }
        );

        let mut v = ResponseValidator::new(9);
        for r in responses(&[Y; 7]) {
            v = match v.record(r) {
                ValidationStep::Pending(v) => v,
                other => panic!("finished early: {:?}", other),
            };
        }
        assert!(matches!(
            v.finish(),
            ValidationStep::Aborted(Abort {
                reason: AbortReason::Incomplete { answered: 7, total: 9 },
                ..
            })
        ));
    }

    #[test]
    fn test_reason_strings() {
        assert!(AbortReason::ExcessiveUnsure
            .to_string()
            .starts_with("excessive undecided answers"));
        assert!(AbortReason::InsufficientDefinite {
            definite: 5,
            total: 9
        }
        .to_string()
        .starts_with("insufficient definite-answer ratio"));
        assert!(AbortReason::Incomplete {
            answered: 7,
            total: 9
        }
        .to_string()
        .starts_with("incomplete answer sheet"));
    }
}
