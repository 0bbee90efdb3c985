//! Value objects for transcript analysis results

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::deserializers::{
    de_f64_forgiving, de_string_list_forgiving, de_string_or_empty, de_u32_forgiving,
};
use crate::validation::ValidationWarning;

/// Speaker role in an insurance-claim interview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Speaker {
    Agent,
    Claimant,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::Agent => "Agent",
            Speaker::Claimant => "Claimant",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Case-insensitive: the oracle is not reliable about capitalization.
impl<'de> Deserialize<'de> for Speaker {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_lowercase().as_str() {
            "agent" => Ok(Speaker::Agent),
            "claimant" => Ok(Speaker::Claimant),
            _ => Err(D::Error::custom(format!(
                "unknown speaker '{}'. Expected 'Agent' or 'Claimant'",
                raw
            ))),
        }
    }
}

/// Analysis of a single transcript line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineAnalysis {
    pub speaker: Speaker,
    #[serde(deserialize_with = "de_u32_forgiving")]
    pub line_number: u32,
    pub text: String,
    #[serde(deserialize_with = "de_f64_forgiving")]
    pub suspicion_score: f64,
    #[serde(default, deserialize_with = "de_string_or_empty")]
    pub reason: String,
    #[serde(default, deserialize_with = "de_string_list_forgiving")]
    pub cues_triggered: Vec<String>,
}

impl LineAnalysis {
    pub fn is_claimant(&self) -> bool {
        self.speaker == Speaker::Claimant
    }

    pub fn is_suspicious(&self) -> bool {
        self.suspicion_score > 0.0
    }
}

/// Discrete risk category derived from the deception probability.
///
/// Variants are declared in order of severity so `Ord` compares severity.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Recommendation {
    #[default]
    #[serde(rename = "No Red Flags")]
    NoRedFlags,
    #[serde(rename = "Low Risk")]
    LowRisk,
    #[serde(rename = "Medium Risk")]
    MediumRisk,
    #[serde(rename = "High Risk")]
    HighRisk,
}

impl Recommendation {
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::NoRedFlags => "No Red Flags",
            Recommendation::LowRisk => "Low Risk",
            Recommendation::MediumRisk => "Medium Risk",
            Recommendation::HighRisk => "High Risk",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Wire shape shared by oracle responses and exported analysis files.
///
/// Any aggregate fields present in the source (`overall_deception_probability`,
/// `final_recommendation`, `calculated_*`) are not modelled here,
/// so they are dropped at parse time and can never be surfaced.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisDocument {
    #[serde(default, deserialize_with = "de_string_or_empty")]
    pub analysis_summary: String,
    #[serde(default, deserialize_with = "de_string_list_forgiving")]
    pub all_detected_cues: Vec<String>,
    pub analyzed_transcript: Vec<LineAnalysis>,
}

/// Validated oracle output, before aggregation
#[derive(Debug, Clone, PartialEq)]
pub struct OracleAnalysis {
    pub analysis_summary: String,
    pub all_detected_cues: BTreeSet<String>,
    pub analyzed_transcript: Vec<LineAnalysis>,
    pub warnings: Vec<ValidationWarning>,
}

/// Final whole-transcript result.
///
/// Only constructed by the aggregator, which owns the `calculated_*` fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptAnalysis {
    pub analysis_summary: String,
    pub all_detected_cues: BTreeSet<String>,
    pub analyzed_transcript: Vec<LineAnalysis>,
    pub calculated_deception_probability: f64,
    pub calculated_final_recommendation: Recommendation,
}

impl TranscriptAnalysis {
    pub fn claimant_lines(&self) -> impl Iterator<Item = &LineAnalysis> {
        self.analyzed_transcript.iter().filter(|l| l.is_claimant())
    }

    pub fn line(&self, line_number: u32) -> Option<&LineAnalysis> {
        self.analyzed_transcript
            .iter()
            .find(|l| l.line_number == line_number)
    }
}
