//! Aggregate statistics over a Monte Carlo batch.
//!
//! Percentages are relative to the number of valid (non-aborted) trials.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::catalog::Catalog;
use crate::types::WeightingId;

use super::engine::SimulationResult;

/// Count and share of one scheme or weighting profile.
#[derive(Clone, Debug, PartialEq)]
pub struct Frequency {
    pub key: String,
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

/// Summary of a batch: winner frequencies, weighting frequencies and the schemes
/// that never won.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationSummary {
    pub num_trials: usize,
    pub valid_trials: usize,
    pub seed: u64,
    pub elapsed_secs: f64,
    /// Schemes that won at least once, in catalog order.
    pub winners: Vec<Frequency>,
    /// Profiles selected at least once, in profile order.
    pub weightings: Vec<Frequency>,
    /// Names of schemes that never won, in catalog order.
    pub never_selected: Vec<String>,
}

/// Persisted form of a [`SimulationSummary`]. Maps are keyed by scheme name
/// and profile name.
#[derive(Serialize)]
pub struct SummaryRecord<'a> {
    pub num_trials: usize,
    pub valid_trials: usize,
    pub seed: u64,
    pub scheme_counts: BTreeMap<&'a str, usize>,
    pub scheme_percentages: BTreeMap<&'a str, f64>,
    pub weighting_counts: BTreeMap<&'a str, usize>,
    pub weighting_percentages: BTreeMap<&'a str, f64>,
    pub never_selected: &'a [String],
}

impl SimulationSummary {
    /// True when every trial aborted.
    pub fn is_empty(&self) -> bool {
        self.valid_trials == 0
    }

    pub fn record(&self) -> SummaryRecord<'_> {
        SummaryRecord {
            num_trials: self.num_trials,
            valid_trials: self.valid_trials,
            seed: self.seed,
            scheme_counts: by_label(&self.winners, |f| f.count),
            scheme_percentages: by_label(&self.winners, |f| f.percentage),
            weighting_counts: by_label(&self.weightings, |f| f.count),
            weighting_percentages: by_label(&self.weightings, |f| f.percentage),
            never_selected: &self.never_selected,
        }
    }
}

fn by_label<T>(freqs: &[Frequency], value: impl Fn(&Frequency) -> T) -> BTreeMap<&str, T> {
    freqs.iter().map(|f| (f.label.as_str(), value(f))).collect()
}

#[inline(always)]
fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Tally winners and selected profiles.
pub fn summarize(catalog: &Catalog, result: &SimulationResult) -> SimulationSummary {
    let schemes = catalog.schemes();
    let mut scheme_counts = vec![0usize; schemes.len()];
    let mut weighting_counts = [0usize; WeightingId::ALL.len()];
    for outcome in &result.outcomes {
        scheme_counts[outcome.winner] += 1;
        weighting_counts[outcome.weighting.index()] += 1;
    }

    let valid = result.valid_trials();
    let winners = schemes
        .iter()
        .zip(&scheme_counts)
        .filter(|(_, &n)| n > 0)
        .map(|(s, &n)| Frequency {
            key: s.id.clone(),
            label: s.name.clone(),
            count: n,
            percentage: percentage(n, valid),
        })
        .collect();
    let weightings = WeightingId::ALL
        .iter()
        .zip(&weighting_counts)
        .filter(|(_, &n)| n > 0)
        .map(|(w, &n)| Frequency {
            key: w.as_str().to_string(),
            label: w.as_str().to_string(),
            count: n,
            percentage: percentage(n, valid),
        })
        .collect();
    let never_selected = schemes
        .iter()
        .zip(&scheme_counts)
        .filter(|(_, &n)| n == 0)
        .map(|(s, _)| s.name.clone())
        .collect();

    SimulationSummary {
        num_trials: result.num_trials,
        valid_trials: valid,
        seed: result.seed,
        elapsed_secs: result.elapsed.as_secs_f64(),
        winners,
        weightings,
        never_selected,
    }
}
