//! Weighted aggregation and ranking.
//!
//! Total for one scheme = Σ weight(c) · value(c), where value(c) is the raw
//! score for direct criteria and `7 - raw` for inverted ones. Totals are raw
//! weighted sums; profiles are not normalised.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::constants::INVERSION_BASE;
use crate::types::{Criterion, Polarity, ScoreVector, WeightingProfile};

/// Contribution of one raw score after applying the criterion's polarity.
#[inline(always)]
pub fn polarized_value(criterion: Criterion, raw: i32) -> i32 {
    match criterion.polarity() {
        Polarity::Direct => raw,
        Polarity::Inverted => INVERSION_BASE - raw,
    }
}

/// Weighted total for one adjusted score vector.
pub fn weighted_total(scores: &ScoreVector, profile: &WeightingProfile) -> f64 {
    Criterion::ALL
        .iter()
        .map(|&c| polarized_value(c, scores.get(c)) as f64 * profile.weight(c))
        .sum()
}

/// Final score of one scheme.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SchemeScore {
    pub scheme_id: String,
    pub name: String,
    pub adjusted_scores: ScoreVector,
    pub weighted_score: f64,
}

/// Per-scheme totals in catalog order plus the ranking over them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scoreboard {
    /// Catalog scheme order.
    pub scores: Vec<SchemeScore>,
    /// Indices into `scores`, best first. Ties keep catalog order.
    pub ranking: Vec<usize>,
}

impl Scoreboard {
    /// The recommended (top-ranked) scheme.
    pub fn winner(&self) -> Option<&SchemeScore> {
        self.ranking.first().map(|&i| &self.scores[i])
    }

    pub fn winner_index(&self) -> Option<usize> {
        self.ranking.first().copied()
    }

    /// Schemes in rank order.
    pub fn ranked(&self) -> impl Iterator<Item = &SchemeScore> {
        self.ranking.iter().map(move |&i| &self.scores[i])
    }
}

/// Indices of `totals` sorted by descending value. Stable, so equal totals keep
/// their original order.
pub fn rank_totals(totals: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..totals.len()).collect();
    order.sort_by(|&a, &b| totals[b].total_cmp(&totals[a]));
    order
}

/// Score and rank every scheme from its adjusted scores.
pub fn aggregate(
    catalog: &Catalog,
    adjusted: &[ScoreVector],
    profile: &WeightingProfile,
) -> Scoreboard {
    let scores: Vec<SchemeScore> = catalog
        .schemes()
        .iter()
        .zip(adjusted)
        .map(|(scheme, adj)| SchemeScore {
            scheme_id: scheme.id.clone(),
            name: scheme.name.clone(),
            adjusted_scores: *adj,
            weighted_score: weighted_total(adj, profile),
        })
        .collect();
    let totals: Vec<f64> = scores.iter().map(|s| s.weighted_score).collect();
    let ranking = rank_totals(&totals);
    Scoreboard { scores, ranking }
}
