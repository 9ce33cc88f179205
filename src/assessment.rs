//! The assessment state machine and the pipeline shared by both runners.
//!
//! ```text
//!   Ranking ──► Context ──► Questionnaire ──┬──► Scored
//!                                           └──► Aborted
//! ```
//!
//! Every transition consumes the current [`Assessment`] and returns the next
//! one, so an answer set is never edited in place. `Aborted` and `Scored` are
//! terminal; [`Assessment::into_result`] turns them into an immutable
//! [`AssessmentResult`].
//!
//! [`run_assessment`] drives the machine from any [`AnswerSource`]. The
//! interactive runner uses a console prompter and the Monte Carlo driver uses
//! randomly generated answers; the scoring path is identical.

use serde::Serialize;

use crate::adjust::adjust_scores;
use crate::aggregate::{aggregate, SchemeScore, Scoreboard};
use crate::catalog::{Catalog, Question};
use crate::error::StageError;
use crate::types::{Answer, AnswerSet, ContextAnswers, Ranking, Stage3Response, WeightingId};
use crate::validator::{AbortReason, ResponseValidator, ValidationStep};
use crate::weighting::select_weighting;

/// Externally visible stage of an assessment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Stage {
    Ranking,
    Context,
    Questionnaire,
    Aborted,
    Scored,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Aborted | Stage::Scored)
    }
}

#[derive(Debug)]
enum State {
    Ranking,
    Context,
    Questionnaire(ResponseValidator, WeightingId),
    Aborted(AbortReason, WeightingId),
    Scored(Scoreboard, WeightingId),
}

/// One assessment in progress.
#[derive(Debug)]
pub struct Assessment<'c> {
    catalog: &'c Catalog,
    answers: AnswerSet,
    state: State,
}

impl<'c> Assessment<'c> {
    pub fn start(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            answers: AnswerSet::default(),
            state: State::Ranking,
        }
    }

    pub fn stage(&self) -> Stage {
        match self.state {
            State::Ranking => Stage::Ranking,
            State::Context => Stage::Context,
            State::Questionnaire(..) => Stage::Questionnaire,
            State::Aborted(..) => Stage::Aborted,
            State::Scored(..) => Stage::Scored,
        }
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// Profile selected in stage 2. `None` before the context is submitted.
    pub fn weighting(&self) -> Option<WeightingId> {
        match self.state {
            State::Ranking | State::Context => None,
            State::Questionnaire(_, w) | State::Aborted(_, w) | State::Scored(_, w) => Some(w),
        }
    }

    fn require_stage(&self, expected: Stage) -> Result<(), StageError> {
        let actual = self.stage();
        if actual == expected {
            Ok(())
        } else {
            Err(StageError::OutOfOrder { expected, actual })
        }
    }

    /// Stage 1: record the importance ranking.
    pub fn submit_ranking(self, ranking: Ranking) -> Result<Self, StageError> {
        self.require_stage(Stage::Ranking)?;
        Ok(Self {
            answers: self.answers.with_ranking(ranking),
            state: State::Context,
            ..self
        })
    }

    /// Stage 2: record context answers and select the weighting profile.
    pub fn submit_context(self, context: ContextAnswers) -> Result<Self, StageError> {
        self.require_stage(Stage::Context)?;
        let weighting = select_weighting(context);
        tracing::debug!(?context, weighting = weighting.as_str(), "weighting selected");
        let validator = ResponseValidator::new(self.catalog.questions().len());
        let step = if validator.total() == 0 {
            // Nothing to ask: go straight to the final gate.
            validator.finish()
        } else {
            ValidationStep::Pending(validator)
        };
        Ok(Self::settle(
            self.catalog,
            self.answers.with_context(context),
            weighting,
            step,
        ))
    }

    /// The next stage-3 question to ask, with its zero-based position.
    pub fn next_question(&self) -> Option<(usize, &'c Question)> {
        match &self.state {
            State::Questionnaire(v, _) => {
                let i = v.answered();
                self.catalog.questions().get(i).map(|q| (i, q))
            }
            _ => None,
        }
    }

    /// Stage 3: answer the next question.
    pub fn submit_answer(self, answer: Answer) -> Result<Self, StageError> {
        let out_of_order = StageError::OutOfOrder {
            expected: Stage::Questionnaire,
            actual: self.stage(),
        };
        let Some((_, question)) = self.next_question() else {
            return Err(out_of_order);
        };
        let State::Questionnaire(validator, weighting) = self.state else {
            return Err(out_of_order);
        };
        let step = validator.record(Stage3Response {
            question: question.number,
            answer,
        });
        Ok(Self::settle(self.catalog, self.answers, weighting, step))
    }

    /// Build the assessment that follows a validation step.
    fn settle(
        catalog: &'c Catalog,
        answers: AnswerSet,
        weighting: WeightingId,
        step: ValidationStep,
    ) -> Self {
        let (answers, state) = match step {
            ValidationStep::Pending(v) => (answers, State::Questionnaire(v, weighting)),
            ValidationStep::Aborted(abort) => {
                tracing::info!(reason = %abort.reason, "assessment aborted");
                (
                    answers.with_stage3(abort.responses),
                    State::Aborted(abort.reason, weighting),
                )
            }
            ValidationStep::Complete(responses) => {
                let answers = answers.with_stage3(responses);
                let adjusted = adjust_scores(catalog, &answers);
                let board = aggregate(catalog, &adjusted, catalog.weighting(weighting));
                (answers, State::Scored(board, weighting))
            }
        };
        Self {
            catalog,
            answers,
            state,
        }
    }

    /// Finish a terminal assessment.
    pub fn into_result(self) -> Result<AssessmentResult, StageError> {
        let stage = self.stage();
        match self.state {
            State::Scored(board, weighting) => {
                Ok(AssessmentResult::scored(self.answers, weighting, board))
            }
            State::Aborted(reason, weighting) => {
                Ok(AssessmentResult::aborted(self.answers, weighting, reason))
            }
            _ => Err(StageError::NotFinished(stage)),
        }
    }
}

/// Immutable outcome of one assessment run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AssessmentResult {
    #[serde(flatten)]
    pub answers: AnswerSet,
    /// Always set: a result exists only after stage 2 selected a profile.
    pub selected_weighting: WeightingId,
    /// Catalog scheme order. Empty when aborted.
    pub final_scores: Vec<SchemeScore>,
    /// Scheme ids, best first.
    pub ranking: Vec<String>,
    pub recommended_scheme: Option<String>,
    pub assessment_aborted: bool,
    pub abort_reason: Option<AbortReason>,
    #[serde(skip)]
    winner: Option<usize>,
}

impl AssessmentResult {
    fn scored(answers: AnswerSet, weighting: WeightingId, board: Scoreboard) -> Self {
        let winner = board.winner_index();
        Self {
            answers,
            selected_weighting: weighting,
            ranking: board.ranked().map(|s| s.scheme_id.clone()).collect(),
            recommended_scheme: board.winner().map(|s| s.name.clone()),
            final_scores: board.scores,
            assessment_aborted: false,
            abort_reason: None,
            winner,
        }
    }

    fn aborted(answers: AnswerSet, weighting: WeightingId, reason: AbortReason) -> Self {
        Self {
            answers,
            selected_weighting: weighting,
            final_scores: Vec::new(),
            ranking: Vec::new(),
            recommended_scheme: None,
            assessment_aborted: true,
            abort_reason: Some(reason),
            winner: None,
        }
    }

    /// Catalog index of the recommended scheme. `None` when aborted.
    pub fn winner_index(&self) -> Option<usize> {
        self.winner
    }

    pub fn winner(&self) -> Option<&SchemeScore> {
        self.winner.map(|i| &self.final_scores[i])
    }

    /// Scores in rank order.
    pub fn ranked_scores(&self) -> Vec<&SchemeScore> {
        self.ranking
            .iter()
            .filter_map(|id| self.final_scores.iter().find(|s| &s.scheme_id == id))
            .collect()
    }
}

/// Supplies answers to an assessment, stage by stage.
pub trait AnswerSource {
    type Error: From<StageError>;

    /// Stage 1 ranking of criteria A..E.
    fn rank_criteria(&mut self, catalog: &Catalog) -> Result<Ranking, Self::Error>;

    /// Stage 2 organisational context.
    fn context_answers(&mut self, catalog: &Catalog) -> Result<ContextAnswers, Self::Error>;

    /// Stage 3 answer for `question`, at zero-based position `index`.
    fn answer(&mut self, question: &Question, index: usize) -> Result<Answer, Self::Error>;
}

/// Run one assessment from start to a terminal stage.
pub fn run_assessment<S: AnswerSource>(
    catalog: &Catalog,
    source: &mut S,
) -> Result<AssessmentResult, S::Error> {
    let mut assessment = Assessment::start(catalog);
    assessment = assessment.submit_ranking(source.rank_criteria(catalog)?)?;
    assessment = assessment.submit_context(source.context_answers(catalog)?)?;
    while let Some((index, question)) = assessment.next_question() {
        let answer = source.answer(question, index)?;
        assessment = assessment.submit_answer(answer)?;
    }
    Ok(assessment.into_result()?)
}
