//! Score projections consumed by presentation layers: severity bands,
//! a proportional timeline, and cue-based highlighting.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::{LineAnalysis, TranscriptAnalysis};
use crate::utils::clamp_unit;

/// Timeline weight bounds; keeps very short lines visible and long ones from dominating
pub const MIN_SEGMENT_WEIGHT: usize = 10;
pub const MAX_SEGMENT_WEIGHT: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBand {
    Clear,
    Faint,
    Light,
    Moderate,
    Elevated,
    High,
    Severe,
    Critical,
}

impl SeverityBand {
    pub fn from_score(score: f64) -> Self {
        let score = clamp_unit(score);
        if score == 0.0 {
            SeverityBand::Clear
        } else if score < 0.15 {
            SeverityBand::Faint
        } else if score < 0.3 {
            SeverityBand::Light
        } else if score < 0.45 {
            SeverityBand::Moderate
        } else if score < 0.6 {
            SeverityBand::Elevated
        } else if score < 0.75 {
            SeverityBand::High
        } else if score < 0.9 {
            SeverityBand::Severe
        } else {
            SeverityBand::Critical
        }
    }

    /// Green through red heatmap colour
    pub fn color(&self) -> &'static str {
        match self {
            SeverityBand::Clear => "#b7e4c7",
            SeverityBand::Faint => "#fff9db",
            SeverityBand::Light => "#ffe066",
            SeverityBand::Moderate => "#ffd166",
            SeverityBand::Elevated => "#ffb347",
            SeverityBand::High => "#ff8800",
            SeverityBand::Severe => "#ff704d",
            SeverityBand::Critical => "#ff4d4d",
        }
    }

    /// Single glyph for terminal strips
    pub fn glyph(&self) -> char {
        match self {
            SeverityBand::Clear => '.',
            SeverityBand::Faint => ':',
            SeverityBand::Light => '-',
            SeverityBand::Moderate => '=',
            SeverityBand::Elevated => '+',
            SeverityBand::High => '*',
            SeverityBand::Severe => '#',
            SeverityBand::Critical => '@',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineSegment {
    pub line_number: u32,
    pub weight: usize,
    pub score: f64,
    pub band: SeverityBand,
}

/// One segment per line, weighted by text length
pub fn timeline(analysis: &TranscriptAnalysis) -> Vec<TimelineSegment> {
    analysis
        .analyzed_transcript
        .iter()
        .map(|line| TimelineSegment {
            line_number: line.line_number,
            weight: line
                .text
                .chars()
                .count()
                .clamp(MIN_SEGMENT_WEIGHT, MAX_SEGMENT_WEIGHT),
            score: clamp_unit(line.suspicion_score),
            band: SeverityBand::from_score(line.suspicion_score),
        })
        .collect()
}

/// Render the timeline as a fixed-width strip; each segment gets at least one cell
pub fn render_strip(segments: &[TimelineSegment], width: usize) -> String {
    let total: usize = segments.iter().map(|s| s.weight).sum();
    if total == 0 || width == 0 {
        return String::new();
    }
    segments
        .iter()
        .map(|s| {
            let cells = ((s.weight * width) as f64 / total as f64).round().max(1.0) as usize;
            std::iter::repeat_n(s.band.glyph(), cells).collect::<String>()
        })
        .collect()
}

/// Active cue highlights
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CueFilter {
    active: BTreeSet<String>,
}

impl CueFilter {
    pub fn new<I, S>(cues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            active: cues.into_iter().map(Into::into).collect(),
        }
    }

    /// Selectable cues: whatever the analysis actually detected
    pub fn options(analysis: &TranscriptAnalysis) -> &BTreeSet<String> {
        &analysis.all_detected_cues
    }

    /// Drop active cues the analysis never detected
    pub fn retain_available(&mut self, analysis: &TranscriptAnalysis) {
        self.active
            .retain(|c| analysis.all_detected_cues.contains(c));
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn active(&self) -> impl Iterator<Item = &str> {
        self.active.iter().map(String::as_str)
    }

    pub fn is_highlighted(&self, line: &LineAnalysis) -> bool {
        line.cues_triggered.iter().any(|c| self.active.contains(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::finalize;
    use crate::model::{OracleAnalysis, Speaker};

    fn line(n: u32, text: &str, score: f64, cues: &[&str]) -> LineAnalysis {
        LineAnalysis {
            speaker: Speaker::Claimant,
            line_number: n,
            text: text.to_string(),
            suspicion_score: score,
            reason: String::new(),
            cues_triggered: cues.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn analysis(lines: Vec<LineAnalysis>) -> TranscriptAnalysis {
        finalize(OracleAnalysis {
            analysis_summary: String::new(),
            all_detected_cues: BTreeSet::new(),
            analyzed_transcript: lines,
            warnings: Vec::new(),
        })
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(SeverityBand::from_score(0.0), SeverityBand::Clear);
        assert_eq!(SeverityBand::from_score(0.01), SeverityBand::Faint);
        assert_eq!(SeverityBand::from_score(0.15), SeverityBand::Light);
        assert_eq!(SeverityBand::from_score(0.3), SeverityBand::Moderate);
        assert_eq!(SeverityBand::from_score(0.45), SeverityBand::Elevated);
        assert_eq!(SeverityBand::from_score(0.6), SeverityBand::High);
        assert_eq!(SeverityBand::from_score(0.75), SeverityBand::Severe);
        assert_eq!(SeverityBand::from_score(0.9), SeverityBand::Critical);
        assert_eq!(SeverityBand::from_score(4.0), SeverityBand::Critical);
        assert_eq!(SeverityBand::from_score(-1.0), SeverityBand::Clear);
        assert_eq!(SeverityBand::Critical.color(), "#ff4d4d");
    }

    #[test]
    fn timeline_weights_are_clamped() {
        let long = "x".repeat(400);
        let a = analysis(vec![line(1, "Hi", 0.0, &[]), line(2, &long, 0.5, &[])]);
        let segments = timeline(&a);
        assert_eq!(segments[0].weight, MIN_SEGMENT_WEIGHT);
        assert_eq!(segments[1].weight, MAX_SEGMENT_WEIGHT);
        assert_eq!(segments[1].band, SeverityBand::Elevated);
    }

    #[test]
    fn strip_gives_every_segment_a_cell() {
        let a = analysis(vec![line(1, "Hi", 0.0, &[]), line(2, &"y".repeat(150), 0.95, &[])]);
        let strip = render_strip(&timeline(&a), 20);
        assert!(strip.starts_with('.'));
        assert!(strip.ends_with('@'));
        assert!(render_strip(&[], 20).is_empty());
    }

    #[test]
    fn cue_filter_highlights_matching_lines() {
        let a = analysis(vec![
            line(1, "I think so.", 0.3, &["Cognitive Process"]),
            line(2, "The car was moved.", 0.6, &["Passive Voice Usage"]),
        ]);
        let mut filter = CueFilter::new(["Passive Voice Usage", "Anger"]);
        filter.retain_available(&a);
        assert_eq!(filter.active().collect::<Vec<_>>(), vec!["Passive Voice Usage"]);
        assert!(!filter.is_highlighted(&a.analyzed_transcript[0]));
        assert!(filter.is_highlighted(&a.analyzed_transcript[1]));
        assert_eq!(CueFilter::options(&a).len(), 2);
        assert!(CueFilter::default().is_empty());
    }
}
