//! Plain-text reports for the two binaries.
//!
//! Both writers take any `impl Write` so tests can render into a `Vec<u8>`, and
//! flush before returning so a failed write surfaces as an error.

use std::io::{self, Write};

use crate::assessment::AssessmentResult;
use crate::constants::MIN_DEFINITE_RATIO;
use crate::simulation::SimulationSummary;
use crate::validator::AbortReason;

/// Ranked scores and the recommendation, or the abort notice.
pub fn write_assessment_report<W: Write>(out: &mut W, result: &AssessmentResult) -> io::Result<()> {
    if let Some(reason) = &result.abort_reason {
        writeln!(out, "\nASSESSMENT ABORTED")?;
        match reason {
            AbortReason::ExcessiveUnsure => writeln!(
                out,
                "The assessment was aborted because more than 2 Stage 3 questions were answered 'not sure'."
            )?,
            AbortReason::InsufficientDefinite { definite, total } => {
                writeln!(
                    out,
                    "The assessment was aborted because you did not provide definite answers (y/n) for at least {:.0}% of Stage 3 questions.",
                    MIN_DEFINITE_RATIO * 100.0
                )?;
                writeln!(
                    out,
                    "You have answered {} out of {} questions definitely.",
                    definite, total
                )?;
            }
            AbortReason::Incomplete { answered, total } => writeln!(
                out,
                "The assessment was aborted because only {} of {} Stage 3 questions were answered.",
                answered, total
            )?,
        }
        return out.flush();
    }

    if !result.answers.stage3_responses.is_empty() {
        writeln!(out, "\nResponses to Stage 3 questions:")?;
        for r in &result.answers.stage3_responses {
            writeln!(out, "Q{}: {}", r.question, r.answer.as_str())?;
        }
    }

    writeln!(out, "\nASSESSMENT RESULTS")?;
    writeln!(out, "Selected weighting: {}", result.selected_weighting.as_str())?;
    writeln!(out, "\nFinal scores (weighted and ranked from highest to lowest):")?;
    for (i, s) in result.ranked_scores().iter().enumerate() {
        writeln!(out, "{}. {} (Score: {:.2})", i + 1, s.name, s.weighted_score)?;
    }
    writeln!(out, "\nAssessment Aborted: false")?;
    if let Some(name) = &result.recommended_scheme {
        writeln!(out, "RECOMMENDED SCHEME: {}", name)?;
    }
    out.flush()
}

/// Winner distribution, never-selected schemes and weighting distribution.
pub fn write_simulation_report<W: Write>(out: &mut W, summary: &SimulationSummary) -> io::Result<()> {
    if summary.is_empty() {
        writeln!(out, "No valid results to analyze. All trials were aborted.")?;
        return out.flush();
    }

    writeln!(
        out,
        "\nMONTE CARLO SIMULATION RESULTS ({} valid trials)",
        summary.valid_trials
    )?;
    writeln!(out, "Winning scheme distribution:")?;
    writeln!(out, "{}", "-".repeat(60))?;
    writeln!(out, "{:<30} | {:<10} | {:<10}", "Scheme", "Count", "Percentage")?;
    writeln!(out, "{}", "-".repeat(60))?;
    for f in &summary.winners {
        writeln!(out, "{:<30} | {:<10} | {:.2}%", f.label, f.count, f.percentage)?;
    }

    if summary.never_selected.is_empty() {
        writeln!(out, "\nAll schemes were selected at least once.")?;
    } else {
        writeln!(out, "\nThe following schemes were NEVER selected:")?;
        for name in &summary.never_selected {
            writeln!(out, "- {}", name)?;
        }
    }

    writeln!(out, "\nWeighting distribution:")?;
    writeln!(out, "{}", "-".repeat(40))?;
    writeln!(out, "{:<15} | {:<10} | {:<10}", "Weighting", "Count", "Percentage")?;
    writeln!(out, "{}", "-".repeat(40))?;
    for f in &summary.weightings {
        writeln!(out, "{:<15} | {:<10} | {:.2}%", f.label, f.count, f.percentage)?;
    }
    out.flush()
}
