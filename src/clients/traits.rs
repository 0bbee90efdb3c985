use async_trait::async_trait;

use crate::error::OracleError;

/// External text-understanding system that labels and scores transcript lines.
///
/// Implementations return the raw JSON text the oracle produced; parsing and
/// validation happen in the adapter so every oracle is held to the same rules.
#[async_trait]
pub trait TranscriptOracle: Send + Sync {
    async fn analyze(&self, transcript: &str, instructions: &str) -> Result<String, OracleError>;

    /// Short identifier used in logs
    fn name(&self) -> &str;
}
