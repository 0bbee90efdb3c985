pub mod fixture;
pub mod openai;
pub mod traits;

use std::sync::Arc;

pub use fixture::FixtureOracle;
pub use openai::OpenAiOracle;
pub use traits::TranscriptOracle;

use crate::config::Config;
use crate::error::{Result, VClaimError};

/// Build the oracle selected by `oracle.provider`
pub fn create_oracle(config: &Config) -> Result<Arc<dyn TranscriptOracle>> {
    match config.oracle.provider.as_str() {
        "openai" => {
            let api_key =
                config
                    .runtime
                    .openai_api_key
                    .clone()
                    .ok_or_else(|| VClaimError::Config {
                        message: "OpenAI API key is not set. Add OPENAI_API_KEY to your environment or .env file.".to_string(),
                    })?;
            tracing::info!(model = %config.oracle.model, "Using chat-completions oracle");
            Ok(Arc::new(OpenAiOracle::new(api_key, &config.oracle)?))
        }
        "fixture" => {
            let path = config
                .oracle
                .fixture_path
                .as_deref()
                .ok_or_else(|| VClaimError::Config {
                    message: "fixture provider requires oracle.fixture_path".to_string(),
                })?;
            tracing::info!(path = %path, "Using recorded fixture oracle");
            Ok(Arc::new(FixtureOracle::from_file(path)?))
        }
        other => Err(VClaimError::Config {
            message: format!("Unknown oracle provider '{}'", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OracleError;

    #[test]
    fn openai_without_key_is_config_error() {
        let config = Config::default();
        let err = create_oracle(&config).err().unwrap();
        assert!(matches!(err, VClaimError::Config { .. }));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn openai_with_key_builds() {
        let mut config = Config::default();
        config.runtime.openai_api_key = Some("sk-test".to_string());
        let oracle = create_oracle(&config).unwrap();
        assert_eq!(oracle.name(), "openai");
    }

    #[test]
    fn missing_fixture_file_is_oracle_error() {
        let mut config = Config::default();
        config.oracle.provider = "fixture".to_string();
        config.oracle.fixture_path = Some("/nonexistent/fixture.json".to_string());
        let err = create_oracle(&config).err().unwrap();
        assert!(matches!(err, VClaimError::Oracle(OracleError::Unavailable { .. })));
    }
}
