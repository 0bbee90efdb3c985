//! Transcript oracle adapter
//!
//! Sends a transcript plus the fixed cue-tagging instructions to the oracle
//! and turns the returned JSON into validated line analyses. Aggregate fields
//! the oracle may volunteer are discarded here; scoring is the aggregator's job.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info};

use crate::aggregator::{Calibration, finalize_with};
use crate::clients::TranscriptOracle;
use crate::error::OracleError;
use crate::model::{AnalysisDocument, OracleAnalysis, TranscriptAnalysis};
use crate::prompts::build_forensic_instructions;
use crate::validation::{check_declared_cues, collect_cues, log_warnings, normalize_lines};

pub struct TranscriptAdapter {
    oracle: Arc<dyn TranscriptOracle>,
    instructions: String,
}

impl TranscriptAdapter {
    pub fn new(oracle: Arc<dyn TranscriptOracle>) -> Self {
        Self {
            oracle,
            instructions: build_forensic_instructions(),
        }
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// One oracle call, then parse and validate. Never partially populated:
    /// either a full `OracleAnalysis` or an error.
    pub async fn analyze(&self, transcript: &str) -> Result<OracleAnalysis, OracleError> {
        if transcript.trim().is_empty() {
            return Err(OracleError::EmptyTranscript);
        }

        let start = Instant::now();
        info!(
            oracle = self.oracle.name(),
            transcript_chars = transcript.len(),
            "Submitting transcript for analysis"
        );

        let raw = self.oracle.analyze(transcript, &self.instructions).await?;
        let analysis = parse_oracle_response(&raw)?;

        info!(
            oracle = self.oracle.name(),
            lines = analysis.analyzed_transcript.len(),
            warnings = analysis.warnings.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Oracle analysis parsed"
        );
        Ok(analysis)
    }

    /// Analyze and aggregate in one step
    pub async fn analyze_transcript(
        &self,
        transcript: &str,
        calibration: &Calibration,
    ) -> Result<TranscriptAnalysis, OracleError> {
        let analysis = self.analyze(transcript).await?;
        Ok(finalize_with(calibration, analysis))
    }
}

/// Some models wrap JSON output in a markdown fence even in JSON mode
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
        _ => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse raw oracle text into a validated analysis.
///
/// Fatal: non-JSON, non-object, an oracle-reported `error`, or any missing or
/// mistyped required field. Everything else becomes a `ValidationWarning`.
pub fn parse_oracle_response(raw: &str) -> Result<OracleAnalysis, OracleError> {
    let body = strip_code_fences(raw);
    let value: Value = serde_json::from_str(body).map_err(|e| OracleError::InvalidResponse {
        message: format!("response is not valid JSON: {}", e),
    })?;

    let Some(object) = value.as_object() else {
        return Err(OracleError::InvalidResponse {
            message: "response is not a JSON object".to_string(),
        });
    };

    if !object.contains_key("analyzed_transcript")
        && let Some(error) = object.get("error")
    {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(OracleError::InvalidResponse {
            message: format!("oracle reported failure: {}", message),
        });
    }

    let document: AnalysisDocument =
        serde_json::from_value(value).map_err(|e| OracleError::InvalidResponse {
            message: e.to_string(),
        })?;

    Ok(prepare_document(document))
}

/// Normalize and validate a parsed document, recomputing the cue union.
/// Shared by the oracle path and analysis-file import.
pub fn prepare_document(document: AnalysisDocument) -> OracleAnalysis {
    let AnalysisDocument {
        analysis_summary,
        all_detected_cues: declared,
        mut analyzed_transcript,
    } = document;

    let mut warnings = normalize_lines(&mut analyzed_transcript);
    let all_detected_cues = collect_cues(&analyzed_transcript);
    // Omitted lists are not compared
    if !declared.is_empty()
        && let Some(mismatch) = check_declared_cues(&declared, &all_detected_cues)
    {
        debug!(declared = declared.len(), computed = all_detected_cues.len(), "Cue list mismatch");
        warnings.push(mismatch);
    }
    log_warnings(&warnings);

    OracleAnalysis {
        analysis_summary,
        all_detected_cues,
        analyzed_transcript,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Speaker;
    use crate::validation::ValidationWarning;

    const VALID: &str = r#"{
        "analysis_summary": "Claimant hedges on timing.",
        "all_detected_cues": ["Risk Language"],
        "analyzed_transcript": [
            {"speaker": "Claimant", "line_number": 2, "text": "Maybe around nine?",
             "suspicion_score": 0.4, "reason": "Hedged timing", "cues_triggered": ["Risk Language"]},
            {"speaker": "Agent", "line_number": 1, "text": "When did it happen?",
             "suspicion_score": 0.0, "reason": "", "cues_triggered": []}
        ]
    }"#;

    #[test]
    fn parses_and_orders_lines() {
        let analysis = parse_oracle_response(VALID).unwrap();
        assert_eq!(analysis.analysis_summary, "Claimant hedges on timing.");
        assert_eq!(analysis.analyzed_transcript[0].line_number, 1);
        assert_eq!(analysis.analyzed_transcript[0].speaker, Speaker::Agent);
        assert_eq!(analysis.analyzed_transcript[1].suspicion_score, 0.4);
        assert!(analysis.warnings.is_empty());
    }

    #[test]
    fn strips_markdown_fence() {
        let fenced = format!("```json\n{}\n```", VALID);
        assert!(parse_oracle_response(&fenced).is_ok());
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {} "), "{}");
        assert_eq!(strip_code_fences("```JSON\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```Json {}```"), "{}");
        assert!(parse_oracle_response(&format!("```JSON\n{}\n```", VALID)).is_ok());
    }

    #[test]
    fn missing_analyzed_transcript_is_error() {
        let err = parse_oracle_response(r#"{"analysis_summary": "x"}"#).unwrap_err();
        match err {
            OracleError::InvalidResponse { message } => {
                assert!(message.contains("analyzed_transcript"), "{}", message)
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn missing_line_field_is_error() {
        let raw = r#"{"analyzed_transcript": [{"speaker": "Agent", "line_number": 1, "text": "Hi"}]}"#;
        assert!(matches!(
            parse_oracle_response(raw),
            Err(OracleError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn non_json_and_non_object_are_errors() {
        assert!(parse_oracle_response("I cannot help with that.").is_err());
        assert!(parse_oracle_response("[1, 2, 3]").is_err());
    }

    #[test]
    fn oracle_reported_error_is_surfaced() {
        let err = parse_oracle_response(r#"{"error": {"message": "context length exceeded"}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("context length exceeded"));
    }

    #[test]
    fn declared_cues_are_recomputed() {
        let raw = r#"{
            "all_detected_cues": ["Anger"],
            "analyzed_transcript": [
                {"speaker": "Claimant", "line_number": 1, "text": "No.",
                 "suspicion_score": 0.2, "reason": "Flat denial", "cues_triggered": ["Negations"]}
            ]
        }"#;
        let analysis = parse_oracle_response(raw).unwrap();
        assert_eq!(
            analysis.all_detected_cues.iter().collect::<Vec<_>>(),
            vec!["Negations"]
        );
        assert!(analysis
            .warnings
            .iter()
            .any(|w| matches!(w, ValidationWarning::CueListMismatch { .. })));
    }
}
