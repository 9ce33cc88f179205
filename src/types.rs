//! Core value types: criteria, score vectors, weighting profiles and answers.
//!
//! Everything here is a plain value. Stage transitions in
//! [`crate::assessment`] consume and return these rather than mutating shared
//! fields, so every Monte Carlo trial owns its own copy.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::constants::*;
use crate::error::RankingError;

// ── Criteria ────────────────────────────────────────────────────────

/// Whether a higher raw score is better (`Direct`) or worse (`Inverted`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Direct,
    Inverted,
}

/// One of the five fixed evaluation criteria.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Criterion {
    A,
    B,
    C,
    D,
    E,
}

impl Criterion {
    pub const ALL: [Criterion; CRITERION_COUNT] =
        [Criterion::A, Criterion::B, Criterion::C, Criterion::D, Criterion::E];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn code(self) -> &'static str {
        CRITERION_CODES[self.index()]
    }

    /// Key used for this criterion in the weighting and score catalogs.
    pub fn catalog_key(self) -> &'static str {
        match self {
            Criterion::A => "criterionA",
            Criterion::B => "criterionB",
            Criterion::C => "criterionC",
            Criterion::D => "criterionD",
            Criterion::E => "criterionE",
        }
    }

    /// D and E are cost-like criteria: a high raw score counts against the scheme.
    pub fn polarity(self) -> Polarity {
        match self {
            Criterion::A | Criterion::B | Criterion::C => Polarity::Direct,
            Criterion::D | Criterion::E => Polarity::Inverted,
        }
    }

    pub fn from_code(code: &str) -> Option<Criterion> {
        Criterion::ALL.into_iter().find(|c| c.code() == code)
    }

    pub fn from_catalog_key(key: &str) -> Option<Criterion> {
        Criterion::ALL.into_iter().find(|c| c.catalog_key() == key)
    }
}

// ── Scores ──────────────────────────────────────────────────────────

/// One scheme's score on every criterion, indexed by [`Criterion::index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ScoreVector(pub [i32; CRITERION_COUNT]);

impl ScoreVector {
    #[inline(always)]
    pub fn get(&self, criterion: Criterion) -> i32 {
        self.0[criterion.index()]
    }

    #[inline(always)]
    pub fn set(&mut self, criterion: Criterion, score: i32) {
        self.0[criterion.index()] = score;
    }

    pub fn is_in_range(&self) -> bool {
        self.0.iter().all(|&s| is_valid_score(s))
    }
}

impl Serialize for ScoreVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CRITERION_COUNT))?;
        for c in Criterion::ALL {
            map.serialize_entry(c.catalog_key(), &self.get(c))?;
        }
        map.end()
    }
}

// ── Weighting profiles ──────────────────────────────────────────────

/// Identifier of one of the four named weighting profiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WeightingId {
    /// No special organisational context.
    Weighting0,
    /// Dedicated IT personnel.
    Weighting1,
    /// Large scale.
    Weighting2,
    /// Regulated industry.
    Weighting3,
}

impl WeightingId {
    pub const ALL: [WeightingId; WEIGHTING_COUNT] = [
        WeightingId::Weighting0,
        WeightingId::Weighting1,
        WeightingId::Weighting2,
        WeightingId::Weighting3,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeightingId::Weighting0 => "weighting0",
            WeightingId::Weighting1 => "weighting1",
            WeightingId::Weighting2 => "weighting2",
            WeightingId::Weighting3 => "weighting3",
        }
    }

    pub fn from_name(name: &str) -> Option<WeightingId> {
        WeightingId::ALL.into_iter().find(|w| w.as_str() == name)
    }
}

impl Serialize for WeightingId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Non-negative weight per criterion. Weights are not normalised.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct WeightingProfile(pub [f64; CRITERION_COUNT]);

impl WeightingProfile {
    #[inline(always)]
    pub fn weight(&self, criterion: Criterion) -> f64 {
        self.0[criterion.index()]
    }

    pub fn uniform(weight: f64) -> Self {
        Self([weight; CRITERION_COUNT])
    }
}

// ── Answers ─────────────────────────────────────────────────────────

/// A stage-3 answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Answer {
    #[serde(rename = "y")]
    Yes,
    #[serde(rename = "n")]
    No,
    #[serde(rename = "not sure")]
    Unsure,
}

impl Answer {
    /// Token as typed and stored: `y`, `n` or `not sure`.
    pub fn as_str(self) -> &'static str {
        match self {
            Answer::Yes => "y",
            Answer::No => "n",
            Answer::Unsure => "not sure",
        }
    }

    pub fn is_definite(self) -> bool {
        !matches!(self, Answer::Unsure)
    }
}

/// Stage-3 answer tagged with the catalog question number it answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Stage3Response {
    pub question: u32,
    pub answer: Answer,
}

/// Stage-1 importance ranking: a permutation of 1..=5 over criteria A..E.
///
/// Recorded with the result but not used in scoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ranking([u8; CRITERION_COUNT]);

impl Ranking {
    /// Build from ranks in criterion order A..E, rejecting anything that is not a
    /// permutation of 1..=5.
    pub fn new(ranks: [u8; CRITERION_COUNT]) -> Result<Self, RankingError> {
        let mut seen = [false; CRITERION_COUNT];
        for &r in &ranks {
            if r < 1 || r as usize > CRITERION_COUNT {
                return Err(RankingError::OutOfRange(r));
            }
            if seen[r as usize - 1] {
                return Err(RankingError::Duplicate(r));
            }
            seen[r as usize - 1] = true;
        }
        Ok(Self(ranks))
    }

    /// A uniformly random permutation.
    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        use rand::seq::SliceRandom;
        let mut ranks: [u8; CRITERION_COUNT] = [1, 2, 3, 4, 5];
        ranks.shuffle(rng);
        Self(ranks)
    }

    pub fn rank(&self, criterion: Criterion) -> u8 {
        self.0[criterion.index()]
    }

    pub fn ranks(&self) -> [u8; CRITERION_COUNT] {
        self.0
    }
}

impl Serialize for Ranking {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CRITERION_COUNT))?;
        for c in Criterion::ALL {
            map.serialize_entry(c.code(), &self.rank(c))?;
        }
        map.end()
    }
}

/// Stage-2 organisational context answers (`ctx1`, `ctx2`, `ctx3`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ContextAnswers(pub [bool; CONTEXT_QUESTION_COUNT]);

impl ContextAnswers {
    pub fn new(ctx1: bool, ctx2: bool, ctx3: bool) -> Self {
        Self([ctx1, ctx2, ctx3])
    }
}

impl Serialize for ContextAnswers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CONTEXT_QUESTION_COUNT))?;
        for (i, &v) in self.0.iter().enumerate() {
            map.serialize_entry(&(i + 1).to_string(), &v)?;
        }
        map.end()
    }
}

/// Answers collected so far. Each stage returns an extended copy.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AnswerSet {
    pub criteria_rankings: Option<Ranking>,
    pub stage2_responses: Option<ContextAnswers>,
    pub stage3_responses: Vec<Stage3Response>,
}

impl AnswerSet {
    pub fn with_ranking(self, ranking: Ranking) -> Self {
        Self {
            criteria_rankings: Some(ranking),
            ..self
        }
    }

    pub fn with_context(self, context: ContextAnswers) -> Self {
        Self {
            stage2_responses: Some(context),
            ..self
        }
    }

    pub fn with_stage3(self, responses: Vec<Stage3Response>) -> Self {
        Self {
            stage3_responses: responses,
            ..self
        }
    }

    /// Answer recorded for `question`, if any.
    pub fn stage3_answer(&self, question: u32) -> Option<Answer> {
        self.stage3_responses
            .iter()
            .find(|r| r.question == question)
            .map(|r| r.answer)
    }
}
