pub mod adapter;
pub mod aggregator;
pub mod clients;
pub mod config;
pub mod cues;
pub mod deserializers;
pub mod error;
pub mod export;
pub mod heatmap;
pub mod model;
pub mod prompts;
pub mod report;
pub mod utils;
pub mod validation;

pub use adapter::{TranscriptAdapter, parse_oracle_response};
pub use aggregator::{
    Calibration, calculate_overall_deception_probability, get_recommendation_from_probability,
};
pub use error::{ImportError, OracleError, Result, VClaimError};
pub use model::{LineAnalysis, Recommendation, Speaker, TranscriptAnalysis};
