//! Domain-specific error types for vclaim

use thiserror::Error;

/// Main error type for the vclaim analyzer
#[derive(Error, Debug)]
pub enum VClaimError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Failures of the external analysis call. The analysis state stays at
/// "no result" whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("transcript is empty")]
    EmptyTranscript,

    #[error("oracle request failed: {message}")]
    Transport { message: String },

    #[error("oracle timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("oracle returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("oracle returned an invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("oracle unavailable: {message}")]
    Unavailable { message: String },
}

/// Failures reading a previously exported analysis file
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    #[error("file is not valid JSON: {message}")]
    InvalidJson { message: String },

    #[error("file does not match the analysis schema: {message}")]
    Schema { message: String },

    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
}

impl From<anyhow::Error> for VClaimError {
    fn from(err: anyhow::Error) -> Self {
        VClaimError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for VClaimError {
    fn from(err: serde_json::Error) -> Self {
        VClaimError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for VClaimError {
    fn from(err: std::io::Error) -> Self {
        VClaimError::Io {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for VClaimError {
    fn from(err: toml::de::Error) -> Self {
        VClaimError::Config {
            message: format!("Invalid config file: {}", err),
        }
    }
}

impl From<reqwest::Error> for OracleError {
    fn from(err: reqwest::Error) -> Self {
        OracleError::Transport {
            message: format!("HTTP request failed: {}", err),
        }
    }
}

/// Result type alias for vclaim operations
pub type Result<T> = std::result::Result<T, VClaimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oracle_error_wraps_with_readable_cause() {
        let err: VClaimError = OracleError::Timeout { timeout_ms: 1500 }.into();
        assert_eq!(
            err.to_string(),
            "Oracle error: oracle timed out after 1500ms"
        );
    }

    #[test]
    fn serde_errors_map_to_serialization() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: VClaimError = parse.into();
        assert!(matches!(err, VClaimError::Serialization { .. }));
    }
}
