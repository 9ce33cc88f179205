//! End-to-end tests: catalog files on disk through scoring, simulation and
//! persistence.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use dki::assessment::{run_assessment, AnswerSource};
use dki::catalog::{Catalog, Question};
use dki::constants::REQUIRED_CATALOG_FILES;
use dki::error::{CatalogError, StageError};
use dki::simulation::{simulate_batch, summarize};
use dki::storage::{assessment_file_name, save_json, simulation_file_name};
use dki::types::{Answer, ContextAnswers, Ranking};

/// Answers read from a fixed script.
struct Scripted {
    ranking: Ranking,
    context: ContextAnswers,
    answers: Vec<Answer>,
}

impl Scripted {
    fn new(context: ContextAnswers, answers: &[Answer]) -> Self {
        Self {
            ranking: Ranking::new([5, 4, 3, 2, 1]).unwrap(),
            context,
            answers: answers.to_vec(),
        }
    }
}

impl AnswerSource for Scripted {
    type Error = StageError;

    fn rank_criteria(&mut self, _: &Catalog) -> Result<Ranking, StageError> {
        Ok(self.ranking)
    }

    fn context_answers(&mut self, _: &Catalog) -> Result<ContextAnswers, StageError> {
        Ok(self.context)
    }

    fn answer(&mut self, _: &Question, index: usize) -> Result<Answer, StageError> {
        Ok(self.answers[index])
    }
}

fn write(dir: &Path, name: &str, value: Value) {
    std::fs::write(dir.join(name), serde_json::to_string_pretty(&value).unwrap()).unwrap();
}

/// Three schemes, three questions. `scheme3` is worst on every criterion and
/// has no adjustments, so it can never win.
fn write_catalog(dir: &Path) {
    write(
        dir,
        "schemes.json",
        json!({"scheme1": "Alpha", "scheme2": "Beta", "scheme3": "Gamma"}),
    );
    write(
        dir,
        "criteria.json",
        json!([
            {"code": "A", "name": "Security"},
            {"code": "B", "name": "Scalability"},
            {"code": "C", "name": "Interoperability"},
            {"code": "D", "name": "Cost"},
            {"code": "E", "name": "Complexity"}
        ]),
    );
    let uniform = json!({"criterionA": 1, "criterionB": 1, "criterionC": 1, "criterionD": 1, "criterionE": 1});
    write(
        dir,
        "weightings.json",
        json!({
            "weighting0": uniform,
            "weighting1": {"criterionA": 2, "criterionB": 1, "criterionC": 1, "criterionD": 1, "criterionE": 0.5},
            "weighting2": {"criterionA": 1, "criterionB": 2, "criterionC": 1, "criterionD": 1, "criterionE": 1},
            "weighting3": {"criterionA": 3, "criterionB": 1, "criterionC": 1, "criterionD": 0.5, "criterionE": 1}
        }),
    );
    write(
        dir,
        "baseline_scheme_scores.json",
        json!({
            "scheme1": {"criterionA": 3, "criterionB": 4, "criterionC": 2, "criterionD": 5, "criterionE": 3},
            "scheme2": {"criterionA": 2, "criterionB": 4, "criterionC": 2, "criterionD": 5, "criterionE": 3},
            "scheme3": {"criterionA": 1, "criterionB": 1, "criterionC": 1, "criterionD": 6, "criterionE": 6}
        }),
    );
    write(
        dir,
        "stage3_questions.json",
        json!([
            {
                "stage3_question_number": 1,
                "question_text": "First?",
                "scheme2_adjustments": {"criterionA": 2}
            },
            {
                "stage3_question_number": 2,
                "question_text": "Second?",
                "scheme1_adjustments": {"criterionD": -4},
                "scheme2_adjustments": {"criterionE": 3}
            },
            {
                "stage3_question_number": 3,
                "question_text": "Third?"
            }
        ]),
    );
}

fn loaded() -> (tempfile::TempDir, Catalog) {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    let catalog = Catalog::load(dir.path()).unwrap();
    (dir, catalog)
}

#[test]
fn test_missing_catalog_files_reported_together() {
    let dir = tempfile::tempdir().unwrap();
    match Catalog::load(dir.path()) {
        Err(CatalogError::Missing(files)) => {
            assert_eq!(files.len(), REQUIRED_CATALOG_FILES.len());
        }
        other => panic!("expected Missing, got {:?}", other.map(|_| ())),
    }

    write_catalog(dir.path());
    std::fs::remove_file(dir.path().join("weightings.json")).unwrap();
    match Catalog::load(dir.path()) {
        Err(CatalogError::Missing(files)) => assert_eq!(files, vec!["weightings.json"]),
        other => panic!("expected Missing, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_reference_example_all_no() {
    let (_dir, catalog) = loaded();
    let no = [Answer::No; 3];
    let result = run_assessment(&catalog, &mut Scripted::new(ContextAnswers::default(), &no)).unwrap();

    assert!(!result.assessment_aborted);
    assert_eq!(result.selected_weighting.as_str(), "weighting0");
    assert_eq!(result.final_scores[0].weighted_score, 15.0);
    assert_eq!(result.final_scores[1].weighted_score, 14.0);
    assert_eq!(result.final_scores[2].weighted_score, 5.0);
    assert_eq!(result.ranking, vec!["scheme1", "scheme2", "scheme3"]);
    assert_eq!(result.recommended_scheme.as_deref(), Some("Alpha"));
}

#[test]
fn test_yes_answers_apply_in_catalog_order_with_clamping() {
    let (_dir, catalog) = loaded();
    let yes = [Answer::Yes, Answer::Yes, Answer::No];
    let result = run_assessment(&catalog, &mut Scripted::new(ContextAnswers::default(), &yes)).unwrap();

    // scheme1 D: 5 - 4 = 1 -> contributes 6. Total 3+4+2+6+4 = 19.
    // scheme2 A: 2 + 2 = 4; E: 3 + 3 = 6 -> contributes 1. Total 4+4+2+2+1 = 13.
    let scores: Vec<f64> = result.final_scores.iter().map(|s| s.weighted_score).collect();
    assert_eq!(scores, vec![19.0, 13.0, 5.0]);
    assert_eq!(result.final_scores[1].adjusted_scores.0, [4, 4, 2, 5, 6]);
}

#[test]
fn test_regulated_context_selects_weighting3() {
    let (_dir, catalog) = loaded();
    let no = [Answer::No; 3];
    let ctx = ContextAnswers::new(true, false, true);
    let result = run_assessment(&catalog, &mut Scripted::new(ctx, &no)).unwrap();
    assert_eq!(result.selected_weighting.as_str(), "weighting3");
}

#[test]
fn test_abort_has_no_scores() {
    let (_dir, catalog) = loaded();
    // One unsure of three: 2/3 definite is below 77%.
    let answers = [Answer::Yes, Answer::Unsure, Answer::No];
    let result =
        run_assessment(&catalog, &mut Scripted::new(ContextAnswers::default(), &answers)).unwrap();
    assert!(result.assessment_aborted);
    assert!(result.final_scores.is_empty());
    assert!(result.recommended_scheme.is_none());
    assert_eq!(result.answers.stage3_responses.len(), 3);
}

#[test]
fn test_assessment_record_persisted() {
    let (dir, catalog) = loaded();
    let no = [Answer::No; 3];
    let result = run_assessment(&catalog, &mut Scripted::new(ContextAnswers::default(), &no)).unwrap();

    let path = dir.path().join("out").join(assessment_file_name(1_700_000_000));
    save_json(&result, &path).unwrap();
    let back: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(back["criteria_rankings"], json!({"A": 5, "B": 4, "C": 3, "D": 2, "E": 1}));
    assert_eq!(back["stage2_responses"], json!({"1": false, "2": false, "3": false}));
    assert_eq!(back["stage3_responses"][0], json!({"question": 1, "answer": "n"}));
    assert_eq!(back["selected_weighting"], "weighting0");
    assert_eq!(back["assessment_aborted"], false);
    assert_eq!(back["abort_reason"], Value::Null);
    assert_eq!(back["recommended_scheme"], "Alpha");
    assert_eq!(back["final_scores"][0]["adjusted_scores"]["criterionD"], 5);
    assert_eq!(back["final_scores"][0]["weighted_score"], 15.0);
}

#[test]
fn test_dominated_scheme_never_selected() {
    let (_dir, catalog) = loaded();
    let result = simulate_batch(&catalog, 10_000, 42);
    let summary = summarize(&catalog, &result);

    assert_eq!(summary.num_trials, 10_000);
    assert!(summary.valid_trials > 0);
    assert!(summary.valid_trials < 10_000, "three questions must sometimes abort");
    assert!(summary.never_selected.contains(&"Gamma".to_string()));
    assert!(summary.winners.iter().all(|f| f.key != "scheme3"));

    let total: usize = summary.winners.iter().map(|f| f.count).sum();
    assert_eq!(total, summary.valid_trials);
    let pct: f64 = summary.winners.iter().map(|f| f.percentage).sum();
    assert!((pct - 100.0).abs() < 1e-6);
}

#[test]
fn test_zero_trials_summary() {
    let (dir, catalog) = loaded();
    let summary = summarize(&catalog, &simulate_batch(&catalog, 0, 42));
    assert!(summary.is_empty());
    assert_eq!(summary.num_trials, 0);
    assert_eq!(summary.valid_trials, 0);

    let path = dir.path().join(simulation_file_name(0, 1));
    save_json(&summary.record(), &path).unwrap();
    let back: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(back["scheme_counts"], json!({}));
    assert_eq!(back["never_selected"], json!(["Alpha", "Beta", "Gamma"]));
}

#[test]
fn test_batch_reproducible_across_runs() {
    let (_dir, catalog) = loaded();
    let a = summarize(&catalog, &simulate_batch(&catalog, 2_000, 7));
    let b = summarize(&catalog, &simulate_batch(&catalog, 2_000, 7));
    assert_eq!(a.winners, b.winners);
    assert_eq!(a.weightings, b.weightings);
}

#[test]
fn test_shipped_sample_catalog() {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data");
    let catalog = Catalog::load(&base).unwrap();
    assert_eq!(catalog.schemes().len(), 6);
    assert_eq!(catalog.questions().len(), 9);

    // Nine questions with at most two "not sure" answers never abort.
    let result = simulate_batch(&catalog, 1_000, 42);
    assert_eq!(result.valid_trials(), 1_000);
}
