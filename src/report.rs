//! Plain-text rendering of a finished analysis for terminal output

use std::fmt::Write;

use crate::aggregator::AnalysisStats;
use crate::heatmap::{CueFilter, SeverityBand, render_strip, timeline};
use crate::model::TranscriptAnalysis;

const STRIP_WIDTH: usize = 60;

pub fn render_report(analysis: &TranscriptAnalysis, filter: &CueFilter) -> String {
    let mut out = String::new();
    let stats = AnalysisStats::from_lines(&analysis.analyzed_transcript);

    let _ = writeln!(out, "Analysis Dashboard");
    let _ = writeln!(
        out,
        "Overall Deception Probability: {:.2}%",
        analysis.calculated_deception_probability * 100.0
    );
    let _ = writeln!(
        out,
        "Final Recommendation: {}",
        analysis.calculated_final_recommendation
    );
    if !analysis.analysis_summary.is_empty() {
        let _ = writeln!(out, "Summary: {}", analysis.analysis_summary);
    }
    let _ = writeln!(
        out,
        "Claimant lines: {} ({} flagged, max score {:.2})",
        stats.claimant_lines, stats.suspicious_claimant_lines, stats.max_claimant_score
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "Deception Timeline");
    let _ = writeln!(out, "[{}]", render_strip(&timeline(analysis), STRIP_WIDTH));

    if !analysis.all_detected_cues.is_empty() {
        let cues: Vec<String> = analysis
            .all_detected_cues
            .iter()
            .map(|c| match stats.cue_counts.get(c) {
                Some(n) => format!("{} ({})", c, n),
                None => c.clone(),
            })
            .collect();
        let _ = writeln!(out, "Detected cues: {}", cues.join(", "));
    }
    if !filter.is_empty() {
        let _ = writeln!(
            out,
            "Highlighting: {}",
            filter.active().collect::<Vec<_>>().join(", ")
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Interactive Transcript");
    for line in &analysis.analyzed_transcript {
        let marker = if filter.is_highlighted(line) { '*' } else { ' ' };
        let band = SeverityBand::from_score(line.suspicion_score);
        let _ = writeln!(
            out,
            "{}{:>4} {:<8} [{}] {}",
            marker,
            line.line_number,
            line.speaker.as_str(),
            band.glyph(),
            line.text
        );
        if line.is_claimant() && line.is_suspicious() {
            let _ = writeln!(
                out,
                "       score {:.2} | {}",
                line.suspicion_score, line.reason
            );
            if !line.cues_triggered.is_empty() {
                let _ = writeln!(out, "       cues: {}", line.cues_triggered.join(", "));
            }
        }
    }
    out
}
