//! Risk aggregation: per-line suspicion scores to one calibrated probability.
//!
//! Everything in here is pure and total. Scores from the oracle are clamped
//! rather than rejected, and no function in this module returns an error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::model::{LineAnalysis, OracleAnalysis, Recommendation, TranscriptAnalysis};
use crate::utils::clamp_unit;
use crate::validation::collect_cues;

/// Default exponent applied to each suspicious claimant score
pub const DEFAULT_POWER: f64 = 2.0;
/// Default calibration scale applied after normalization
pub const DEFAULT_SCALE: f64 = 4.0;

/// Upper bounds (inclusive) of each recommendation band
pub const NO_RED_FLAGS_MAX: f64 = 0.01;
pub const LOW_RISK_MAX: f64 = 0.35;
pub const MEDIUM_RISK_MAX: f64 = 0.75;

/// Largest f64 below 1.0; `tanh` rounds up to 1.0 once its input passes ~18.7
pub const MAX_PROBABILITY: f64 = 1.0 - f64::EPSILON / 2.0;

/// Tunable aggregation constants.
///
/// The defaults have no derivation beyond calibration against past transcripts
/// and must stay as-is for results to match previously exported analyses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    pub power: f64,
    pub scale: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            power: DEFAULT_POWER,
            scale: DEFAULT_SCALE,
        }
    }
}

impl Calibration {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.power.is_finite() || self.power <= 0.0 {
            anyhow::bail!("calibration.power must be a positive number");
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            anyhow::bail!("calibration.scale must be a positive number");
        }
        Ok(())
    }
}

/// Overall deception probability with the default calibration
pub fn calculate_overall_deception_probability(lines: &[LineAnalysis]) -> f64 {
    calculate_with(&Calibration::default(), lines)
}

/// `tanh(scale * Σ s^power / sqrt(n))` over claimant scores `s > 0`,
/// where `n` counts all claimant lines.
pub fn calculate_with(calibration: &Calibration, lines: &[LineAnalysis]) -> f64 {
    let claimant_scores: Vec<f64> = lines
        .iter()
        .filter(|l| l.is_claimant())
        .map(|l| clamp_unit(l.suspicion_score))
        .collect();

    let n = claimant_scores.len();
    if n == 0 {
        return 0.0;
    }

    let raw: f64 = claimant_scores
        .iter()
        .filter(|&&s| s > 0.0)
        .map(|s| s.powf(calibration.power))
        .sum();
    if raw == 0.0 {
        return 0.0;
    }

    let normalized = (raw / (n as f64).sqrt()) * calibration.scale;
    let probability = normalized.tanh();
    if probability.is_nan() {
        0.0
    } else {
        probability.clamp(0.0, MAX_PROBABILITY)
    }
}

/// Threshold mapping over half-open bands; NaN and negatives count as 0.
pub fn get_recommendation_from_probability(probability: f64) -> Recommendation {
    let p = if probability.is_nan() {
        0.0
    } else {
        probability.max(0.0)
    };
    if p <= NO_RED_FLAGS_MAX {
        Recommendation::NoRedFlags
    } else if p <= LOW_RISK_MAX {
        Recommendation::LowRisk
    } else if p <= MEDIUM_RISK_MAX {
        Recommendation::MediumRisk
    } else {
        Recommendation::HighRisk
    }
}

/// Turn validated oracle output into a final analysis
pub fn finalize(analysis: OracleAnalysis) -> TranscriptAnalysis {
    finalize_with(&Calibration::default(), analysis)
}

pub fn finalize_with(calibration: &Calibration, analysis: OracleAnalysis) -> TranscriptAnalysis {
    let mut result = TranscriptAnalysis {
        analysis_summary: analysis.analysis_summary,
        all_detected_cues: analysis.all_detected_cues,
        analyzed_transcript: analysis.analyzed_transcript,
        calculated_deception_probability: 0.0,
        calculated_final_recommendation: Recommendation::NoRedFlags,
    };
    recompute_with(calibration, &mut result);
    result
}

/// Overwrite the derived fields of an existing analysis
pub fn recompute(analysis: &mut TranscriptAnalysis) {
    recompute_with(&Calibration::default(), analysis);
}

pub fn recompute_with(calibration: &Calibration, analysis: &mut TranscriptAnalysis) {
    let probability = calculate_with(calibration, &analysis.analyzed_transcript);
    let recommendation = get_recommendation_from_probability(probability);

    analysis.all_detected_cues = collect_cues(&analysis.analyzed_transcript);
    analysis.calculated_deception_probability = probability;
    analysis.calculated_final_recommendation = recommendation;

    info!(
        lines = analysis.analyzed_transcript.len(),
        probability,
        recommendation = %recommendation,
        "Deception risk computed"
    );
}

/// Descriptive counts for reports
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisStats {
    pub total_lines: usize,
    pub claimant_lines: usize,
    pub suspicious_claimant_lines: usize,
    pub max_claimant_score: f64,
    pub cue_counts: BTreeMap<String, usize>,
}

impl AnalysisStats {
    pub fn from_lines(lines: &[LineAnalysis]) -> Self {
        let mut stats = AnalysisStats {
            total_lines: lines.len(),
            ..Default::default()
        };
        for line in lines {
            for cue in &line.cues_triggered {
                *stats.cue_counts.entry(cue.clone()).or_insert(0) += 1;
            }
            if !line.is_claimant() {
                continue;
            }
            let score = clamp_unit(line.suspicion_score);
            stats.claimant_lines += 1;
            if score > 0.0 {
                stats.suspicious_claimant_lines += 1;
            }
            stats.max_claimant_score = stats.max_claimant_score.max(score);
        }
        stats
    }
}
