use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::clients::traits::TranscriptOracle;
use crate::error::OracleError;

/// Replays a recorded oracle response; no network involved
#[derive(Debug)]
pub struct FixtureOracle {
    outcome: Result<String, OracleError>,
    calls: AtomicUsize,
}

impl FixtureOracle {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            outcome: Ok(response.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, OracleError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| OracleError::Unavailable {
            message: format!("failed to read fixture {}: {}", path.display(), e),
        })?;
        Ok(Self::new(content))
    }

    /// An oracle whose every call fails with `error`
    pub fn failing(error: OracleError) -> Self {
        Self {
            outcome: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranscriptOracle for FixtureOracle {
    async fn analyze(&self, _transcript: &str, _instructions: &str) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }

    fn name(&self) -> &str {
        "fixture"
    }
}
