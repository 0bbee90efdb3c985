//! End-to-end analysis through the adapter using recorded oracle responses

use std::sync::Arc;

use vclaim::adapter::TranscriptAdapter;
use vclaim::aggregator::Calibration;
use vclaim::clients::FixtureOracle;
use vclaim::error::OracleError;
use vclaim::model::{Recommendation, Speaker};
use vclaim::validation::ValidationWarning;

const TRANSCRIPT: &str = "Agent: Can you tell me what happened?\nClaimant: At some point later, the window was broken.";

fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("missing fixture {}: {}", path, e))
}

#[tokio::test]
async fn recorded_response_is_scored_locally() {
    let oracle = Arc::new(FixtureOracle::new(fixture("oracle_response.json")));
    let adapter = TranscriptAdapter::new(oracle.clone());

    let analysis = adapter
        .analyze_transcript(TRANSCRIPT, &Calibration::default())
        .await
        .unwrap();

    assert_eq!(oracle.calls(), 1);
    assert_eq!(analysis.analyzed_transcript.len(), 6);
    assert_eq!(analysis.claimant_lines().count(), 3);

    // Claimant scores 0.0, 0.7, 0.3 over n = 3
    let expected = ((0.49 + 0.09) / 3f64.sqrt() * 4.0).tanh();
    assert!((analysis.calculated_deception_probability - expected).abs() < 1e-9);
    // The oracle's own "Low Risk" / 0.1 must not leak through
    assert_eq!(
        analysis.calculated_final_recommendation,
        Recommendation::HighRisk
    );
    assert!(analysis.all_detected_cues.contains("Cognitive Process"));
    assert_eq!(analysis.all_detected_cues.len(), 5);
}

#[tokio::test]
async fn declared_cue_mismatch_is_a_warning_only() {
    let adapter = TranscriptAdapter::new(Arc::new(FixtureOracle::new(fixture(
        "oracle_response.json",
    ))));
    let analysis = adapter.analyze(TRANSCRIPT).await.unwrap();
    assert_eq!(
        analysis.warnings,
        vec![ValidationWarning::CueListMismatch {
            missing: vec!["Cognitive Process".to_string()],
            extra: vec![],
        }]
    );
}

#[tokio::test]
async fn untidy_response_is_tolerated() {
    let adapter = TranscriptAdapter::new(Arc::new(FixtureOracle::new(fixture(
        "untidy_response.json",
    ))));
    let analysis = adapter.analyze(TRANSCRIPT).await.unwrap();

    let numbers: Vec<u32> = analysis
        .analyzed_transcript
        .iter()
        .map(|l| l.line_number)
        .collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(analysis.analyzed_transcript[0].speaker, Speaker::Agent);
    assert_eq!(analysis.analyzed_transcript[2].suspicion_score, 1.0);

    assert!(analysis.warnings.contains(&ValidationWarning::ScoreClamped {
        line: 3,
        original: 1.3
    }));
    assert!(analysis.warnings.contains(&ValidationWarning::UnknownCue {
        line: 3,
        cue: "Overly Honest".to_string()
    }));
    assert!(analysis
        .warnings
        .contains(&ValidationWarning::ZeroScoreWithReason { line: 1 }));
    // Unknown cues pass through
    assert!(analysis.all_detected_cues.contains("Overly Honest"));
}

#[tokio::test]
async fn missing_transcript_field_yields_oracle_error() {
    let adapter = TranscriptAdapter::new(Arc::new(FixtureOracle::new(fixture(
        "missing_transcript.json",
    ))));
    let result = adapter
        .analyze_transcript(TRANSCRIPT, &Calibration::default())
        .await;
    match result {
        Err(OracleError::InvalidResponse { message }) => {
            assert!(message.contains("analyzed_transcript"))
        }
        other => panic!("expected InvalidResponse, got {:?}", other),
    }
}

#[tokio::test]
async fn oracle_failure_is_propagated() {
    let oracle = Arc::new(FixtureOracle::failing(OracleError::Timeout {
        timeout_ms: 120_000,
    }));
    let adapter = TranscriptAdapter::new(oracle.clone());
    let err = adapter.analyze(TRANSCRIPT).await.unwrap_err();
    assert_eq!(err, OracleError::Timeout { timeout_ms: 120_000 });
    assert_eq!(oracle.calls(), 1);
}

#[tokio::test]
async fn blank_transcript_never_reaches_the_oracle() {
    let oracle = Arc::new(FixtureOracle::new(fixture("oracle_response.json")));
    let adapter = TranscriptAdapter::new(oracle.clone());
    let err = adapter.analyze("   \n\t").await.unwrap_err();
    assert_eq!(err, OracleError::EmptyTranscript);
    assert_eq!(oracle.calls(), 0);
}

#[test]
fn adapter_instructions_carry_the_vocabulary() {
    let adapter = TranscriptAdapter::new(Arc::new(FixtureOracle::new("{}")));
    assert!(adapter.instructions().contains("`Statement Against Interest`"));
    assert!(adapter.instructions().contains("`Long Words (>6 letters)`"));
}
