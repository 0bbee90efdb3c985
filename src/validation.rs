//! Non-fatal validation of oracle line analyses
//!
//! Structural problems (bad JSON, missing fields) are fatal and handled by the
//! adapter. Everything here is a quality issue: it is logged and reported, and
//! the offending data passes through.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::Serialize;

use crate::cues::is_known_cue;
use crate::model::LineAnalysis;
use crate::utils::clamp_unit;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationWarning {
    /// Score is exactly 0.0 but a reason was given
    ZeroScoreWithReason { line: u32 },
    /// Score is exactly 0.0 but cues were tagged
    ZeroScoreWithCues { line: u32 },
    /// Score is above 0.0 with no reason
    MissingReason { line: u32 },
    UnknownCue { line: u32, cue: String },
    /// Score was outside [0,1] (or NaN) and has been clamped
    ScoreClamped { line: u32, original: f64 },
    DuplicateLineNumber { line: u32 },
    ZeroLineNumber { position: usize },
    EmptyText { line: u32 },
    /// Oracle's declared cue union disagrees with the per-line cues
    CueListMismatch {
        missing: Vec<String>,
        extra: Vec<String>,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::ZeroScoreWithReason { line } => {
                write!(f, "line {} has score 0.0 but a non-empty reason", line)
            }
            ValidationWarning::ZeroScoreWithCues { line } => {
                write!(f, "line {} has score 0.0 but triggered cues", line)
            }
            ValidationWarning::MissingReason { line } => {
                write!(f, "line {} is suspicious but has no reason", line)
            }
            ValidationWarning::UnknownCue { line, cue } => {
                write!(f, "line {} uses unknown cue '{}'", line, cue)
            }
            ValidationWarning::ScoreClamped { line, original } => {
                write!(f, "line {} score {} clamped into [0, 1]", line, original)
            }
            ValidationWarning::DuplicateLineNumber { line } => {
                write!(f, "line number {} appears more than once", line)
            }
            ValidationWarning::ZeroLineNumber { position } => {
                write!(f, "entry {} has line number 0", position)
            }
            ValidationWarning::EmptyText { line } => write!(f, "line {} has empty text", line),
            ValidationWarning::CueListMismatch { missing, extra } => write!(
                f,
                "declared cue list differs from line cues (missing: [{}], extra: [{}])",
                missing.join(", "),
                extra.join(", ")
            ),
        }
    }
}

/// Clamp scores, dedupe per-line cues and order lines by line number,
/// then run [`validate_lines`]. Returns every warning raised along the way.
pub fn normalize_lines(lines: &mut [LineAnalysis]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for line in lines.iter_mut() {
        let clamped = clamp_unit(line.suspicion_score);
        if clamped != line.suspicion_score || line.suspicion_score.is_nan() {
            warnings.push(ValidationWarning::ScoreClamped {
                line: line.line_number,
                original: line.suspicion_score,
            });
            line.suspicion_score = clamped;
        }

        let mut seen = HashSet::new();
        line.cues_triggered.retain(|c| seen.insert(c.clone()));
    }

    // Stable, so duplicates keep oracle order
    lines.sort_by_key(|l| l.line_number);

    warnings.extend(validate_lines(lines));
    warnings
}

/// Check the zero-score invariant, cue vocabulary and line numbering.
pub fn validate_lines(lines: &[LineAnalysis]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut seen_numbers = HashSet::new();

    for (position, line) in lines.iter().enumerate() {
        if line.line_number == 0 {
            warnings.push(ValidationWarning::ZeroLineNumber { position });
        } else if !seen_numbers.insert(line.line_number) {
            warnings.push(ValidationWarning::DuplicateLineNumber {
                line: line.line_number,
            });
        }

        if line.text.trim().is_empty() {
            warnings.push(ValidationWarning::EmptyText {
                line: line.line_number,
            });
        }

        if line.suspicion_score == 0.0 {
            if !line.reason.is_empty() {
                warnings.push(ValidationWarning::ZeroScoreWithReason {
                    line: line.line_number,
                });
            }
            if !line.cues_triggered.is_empty() {
                warnings.push(ValidationWarning::ZeroScoreWithCues {
                    line: line.line_number,
                });
            }
        } else if line.reason.trim().is_empty() {
            warnings.push(ValidationWarning::MissingReason {
                line: line.line_number,
            });
        }

        for cue in &line.cues_triggered {
            if !is_known_cue(cue) {
                warnings.push(ValidationWarning::UnknownCue {
                    line: line.line_number,
                    cue: cue.clone(),
                });
            }
        }
    }

    warnings
}

/// Union of all per-line cues
pub fn collect_cues(lines: &[LineAnalysis]) -> BTreeSet<String> {
    lines
        .iter()
        .flat_map(|l| l.cues_triggered.iter().cloned())
        .collect()
}

/// Compare an oracle-declared cue list with the recomputed union
pub fn check_declared_cues(
    declared: &[String],
    computed: &BTreeSet<String>,
) -> Option<ValidationWarning> {
    let declared: BTreeSet<String> = declared.iter().cloned().collect();
    let missing: Vec<String> = computed.difference(&declared).cloned().collect();
    let extra: Vec<String> = declared.difference(computed).cloned().collect();
    if missing.is_empty() && extra.is_empty() {
        None
    } else {
        Some(ValidationWarning::CueListMismatch { missing, extra })
    }
}

pub fn log_warnings(warnings: &[ValidationWarning]) {
    for warning in warnings {
        tracing::warn!(warning = %warning, "Oracle output validation warning");
    }
}
