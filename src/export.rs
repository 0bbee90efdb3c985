//! Analysis file import/export
//!
//! Exported files use the oracle response schema plus the two `calculated_*`
//! fields. On import those fields (and any legacy oracle aggregates) are
//! ignored and recomputed, so a file can never smuggle in a score.

use std::path::Path;

use serde_json::Value;

use crate::adapter::prepare_document;
use crate::aggregator::{Calibration, finalize_with, recompute_with};
use crate::error::{ImportError, Result};
use crate::model::{AnalysisDocument, TranscriptAnalysis};
use crate::utils::clamp_unit;

pub const DEFAULT_EXPORT_FILE: &str = "llm_analysis.json";

/// Pretty JSON with freshly recomputed derived fields
pub fn export_analysis(analysis: &TranscriptAnalysis, calibration: &Calibration) -> Result<String> {
    let mut current = analysis.clone();
    // Non-finite scores would serialize as null and fail re-import
    for line in &mut current.analyzed_transcript {
        line.suspicion_score = clamp_unit(line.suspicion_score);
    }
    recompute_with(calibration, &mut current);
    Ok(serde_json::to_string_pretty(&current)?)
}

pub fn import_analysis(
    content: &str,
    calibration: &Calibration,
) -> std::result::Result<TranscriptAnalysis, ImportError> {
    let value: Value = serde_json::from_str(content).map_err(|e| ImportError::InvalidJson {
        message: e.to_string(),
    })?;
    if !value.is_object() {
        return Err(ImportError::Schema {
            message: "top-level value must be an object".to_string(),
        });
    }
    let document: AnalysisDocument =
        serde_json::from_value(value).map_err(|e| ImportError::Schema {
            message: e.to_string(),
        })?;

    let prepared = prepare_document(document);
    tracing::info!(
        lines = prepared.analyzed_transcript.len(),
        warnings = prepared.warnings.len(),
        "Imported analysis file"
    );
    Ok(finalize_with(calibration, prepared))
}

pub fn write_analysis_file(
    path: impl AsRef<Path>,
    analysis: &TranscriptAnalysis,
    calibration: &Calibration,
) -> Result<()> {
    let json = export_analysis(analysis, calibration)?;
    std::fs::write(path.as_ref(), json)?;
    tracing::info!(path = %path.as_ref().display(), "Exported analysis");
    Ok(())
}

pub fn read_analysis_file(
    path: impl AsRef<Path>,
    calibration: &Calibration,
) -> std::result::Result<TranscriptAnalysis, ImportError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ImportError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    import_analysis(&content, calibration)
}
