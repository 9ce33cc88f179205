//! Catalog loading: schemes, criteria, weighting profiles, baselines and
//! stage-3 questions.
//!
//! The five JSON files are read once per run. Every missing file is reported
//! together before anything is parsed. After parsing, the catalog is checked
//! against the fixed criterion set and score range so the engine never sees a
//! baseline outside [1,6] or a weighting profile with a missing criterion.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::constants::*;
use crate::error::CatalogError;
use crate::types::{Criterion, ScoreVector, WeightingId, WeightingProfile};

/// A candidate scheme with its baseline scores.
#[derive(Clone, Debug, PartialEq)]
pub struct Scheme {
    pub id: String,
    pub name: String,
    pub baseline: ScoreVector,
}

/// Deltas one stage-3 question applies to one scheme when answered "yes".
#[derive(Clone, Debug, PartialEq)]
pub struct AdjustmentRule {
    /// Index into [`Catalog::schemes`].
    pub scheme: usize,
    pub deltas: Vec<(Criterion, i32)>,
}

/// A stage-3 question and the adjustments it triggers.
#[derive(Clone, Debug, PartialEq)]
pub struct Question {
    pub number: u32,
    pub text: String,
    pub adjustments: Vec<AdjustmentRule>,
}

/// Validated, read-only input data for an assessment run.
#[derive(Clone, Debug)]
pub struct Catalog {
    schemes: Vec<Scheme>,
    criterion_names: [String; CRITERION_COUNT],
    weightings: [WeightingProfile; WEIGHTING_COUNT],
    questions: Vec<Question>,
}

impl Catalog {
    /// Build a catalog from already-parsed parts. Schemes keep the given order;
    /// questions keep the given order (the order adjustments are applied in).
    pub fn new(
        schemes: Vec<Scheme>,
        criterion_names: [String; CRITERION_COUNT],
        weightings: [WeightingProfile; WEIGHTING_COUNT],
        questions: Vec<Question>,
    ) -> Result<Self, CatalogError> {
        if schemes.is_empty() {
            return Err(CatalogError::Invalid("no schemes defined".into()));
        }
        for (i, s) in schemes.iter().enumerate() {
            if schemes[..i].iter().any(|o| o.id == s.id) {
                return Err(CatalogError::Invalid(format!("duplicate scheme id {}", s.id)));
            }
            if !s.baseline.is_in_range() {
                return Err(CatalogError::Invalid(format!(
                    "baseline scores for {} must lie in [{}, {}]",
                    s.id, SCORE_MIN, SCORE_MAX
                )));
            }
        }
        for (w, profile) in WeightingId::ALL.iter().zip(weightings.iter()) {
            if profile.0.iter().any(|x| !x.is_finite() || *x < 0.0) {
                return Err(CatalogError::Invalid(format!(
                    "{} has a negative or non-finite weight",
                    w.as_str()
                )));
            }
        }
        for (i, q) in questions.iter().enumerate() {
            if questions[..i].iter().any(|o| o.number == q.number) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate stage 3 question number {}",
                    q.number
                )));
            }
            if let Some(rule) = q.adjustments.iter().find(|r| r.scheme >= schemes.len()) {
                return Err(CatalogError::Invalid(format!(
                    "question {} adjusts unknown scheme index {}",
                    q.number, rule.scheme
                )));
            }
        }
        Ok(Self {
            schemes,
            criterion_names,
            weightings,
            questions,
        })
    }

    /// Load all catalog files from `base`.
    pub fn load(base: &Path) -> Result<Self, CatalogError> {
        let missing = missing_catalog_files(base);
        if !missing.is_empty() {
            return Err(CatalogError::Missing(missing));
        }

        let scheme_names: BTreeMap<String, String> = read_json(&base.join(SCHEMES_FILE))?;
        let raw_criteria: Vec<RawCriterion> = read_json(&base.join(CRITERIA_FILE))?;
        let raw_weightings: BTreeMap<String, BTreeMap<String, f64>> =
            read_json(&base.join(WEIGHTINGS_FILE))?;
        let raw_baselines: BTreeMap<String, BTreeMap<String, i32>> =
            read_json(&base.join(BASELINE_SCORES_FILE))?;
        let raw_questions: Vec<RawQuestion> = read_json(&base.join(STAGE3_QUESTIONS_FILE))?;

        let mut ids: Vec<&String> = scheme_names.keys().collect();
        ids.sort_by_key(|id| natural_key(id));

        let mut schemes = Vec::with_capacity(ids.len());
        for id in ids {
            let scores = raw_baselines.get(id).ok_or_else(|| {
                CatalogError::Invalid(format!("no baseline scores for scheme {}", id))
            })?;
            schemes.push(Scheme {
                id: id.clone(),
                name: scheme_names[id].clone(),
                baseline: ScoreVector(criterion_values(scores, &format!("baseline of {}", id))?),
            });
        }
        if let Some(extra) = raw_baselines.keys().find(|k| !scheme_names.contains_key(*k)) {
            return Err(CatalogError::Invalid(format!(
                "baseline scores given for unknown scheme {}",
                extra
            )));
        }

        let criterion_names = parse_criteria(raw_criteria)?;

        let mut weightings = [WeightingProfile::default(); WEIGHTING_COUNT];
        for w in WeightingId::ALL {
            let raw = raw_weightings.get(w.as_str()).ok_or_else(|| {
                CatalogError::Invalid(format!("weighting profile {} is missing", w.as_str()))
            })?;
            weightings[w.index()] = WeightingProfile(criterion_values(raw, w.as_str())?);
        }
        for name in raw_weightings.keys() {
            if WeightingId::from_name(name).is_none() {
                tracing::warn!(profile = %name, "ignoring unknown weighting profile");
            }
        }

        let questions = raw_questions
            .into_iter()
            .map(|q| q.resolve(&schemes))
            .collect::<Result<Vec<_>, _>>()?;

        let catalog = Self::new(schemes, criterion_names, weightings, questions)?;
        tracing::info!(
            base = %base.display(),
            schemes = catalog.schemes.len(),
            questions = catalog.questions.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn schemes(&self) -> &[Scheme] {
        &self.schemes
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn weighting(&self, id: WeightingId) -> &WeightingProfile {
        &self.weightings[id.index()]
    }

    pub fn criterion_name(&self, criterion: Criterion) -> &str {
        &self.criterion_names[criterion.index()]
    }

    /// Fresh copy of every scheme's baseline, in scheme order.
    pub fn baseline_scores(&self) -> Vec<ScoreVector> {
        self.schemes.iter().map(|s| s.baseline).collect()
    }
}

/// Names of required catalog files absent from `base`, in declaration order.
pub fn missing_catalog_files(base: &Path) -> Vec<String> {
    REQUIRED_CATALOG_FILES
        .iter()
        .filter(|f| !base.join(f).is_file())
        .map(|f| f.to_string())
        .collect()
}

// ── Raw file shapes ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawCriterion {
    code: String,
    name: String,
}

#[derive(Deserialize)]
struct RawQuestion {
    stage3_question_number: u32,
    question_text: String,
    /// `<scheme id>_adjustments` entries live alongside the fixed fields.
    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

impl RawQuestion {
    fn resolve(self, schemes: &[Scheme]) -> Result<Question, CatalogError> {
        let number = self.stage3_question_number;
        let mut adjustments = Vec::new();
        for (key, value) in self.extra {
            let Some(scheme_id) = key.strip_suffix("_adjustments") else {
                tracing::debug!(question = number, field = %key, "ignoring unknown question field");
                continue;
            };
            let scheme = schemes.iter().position(|s| s.id == scheme_id).ok_or_else(|| {
                CatalogError::Invalid(format!(
                    "question {} adjusts unknown scheme {}",
                    number, scheme_id
                ))
            })?;
            let raw: BTreeMap<String, i32> = serde_json::from_value(value).map_err(|e| {
                CatalogError::Invalid(format!("question {} field {}: {}", number, key, e))
            })?;
            let mut deltas = Vec::with_capacity(raw.len());
            for (ckey, delta) in raw {
                let criterion = Criterion::from_catalog_key(&ckey).ok_or_else(|| {
                    CatalogError::Invalid(format!(
                        "question {} uses unknown criterion {}",
                        number, ckey
                    ))
                })?;
                deltas.push((criterion, delta));
            }
            adjustments.push(AdjustmentRule { scheme, deltas });
        }
        adjustments.sort_by_key(|r| r.scheme);
        Ok(Question {
            number,
            text: self.question_text,
            adjustments,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_criteria(raw: Vec<RawCriterion>) -> Result<[String; CRITERION_COUNT], CatalogError> {
    let mut names: [Option<String>; CRITERION_COUNT] = Default::default();
    for item in raw {
        let c = Criterion::from_code(&item.code).ok_or_else(|| {
            CatalogError::Invalid(format!("unknown criterion code {}", item.code))
        })?;
        names[c.index()] = Some(item.name);
    }
    let mut out: [String; CRITERION_COUNT] = Default::default();
    for c in Criterion::ALL {
        out[c.index()] = names[c.index()]
            .take()
            .ok_or_else(|| CatalogError::Invalid(format!("criterion {} is missing", c.code())))?;
    }
    Ok(out)
}

/// Read one value per criterion from a `criterionX`-keyed map.
fn criterion_values<T: Copy + Default>(
    raw: &BTreeMap<String, T>,
    context: &str,
) -> Result<[T; CRITERION_COUNT], CatalogError> {
    let mut out = [T::default(); CRITERION_COUNT];
    for c in Criterion::ALL {
        out[c.index()] = *raw.get(c.catalog_key()).ok_or_else(|| {
            CatalogError::Invalid(format!("{} has no value for {}", context, c.catalog_key()))
        })?;
    }
    Ok(out)
}

/// Sort key that orders `scheme2` before `scheme10`.
fn natural_key(id: &str) -> (String, u64, String) {
    let digits = id.len() - id.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    let (prefix, suffix) = id.split_at(id.len() - digits);
    (
        prefix.to_string(),
        suffix.parse().unwrap_or(0),
        id.to_string(),
    )
}
