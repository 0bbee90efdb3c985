use serde::{Deserialize, Serialize};

use crate::aggregator::Calibration;

/// Main configuration structure loaded from vclaim.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub calibration: Calibration,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Which oracle to call and how
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OracleConfig {
    /// `openai` or `fixture`
    pub provider: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout_ms: u64,
    /// Recorded response served by the `fixture` provider
    pub fixture_path: Option<String>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: 0.1,
            timeout_ms: 120_000,
            fixture_path: None,
        }
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub openai_api_key: Option<String>,
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            log_level: "vclaim=info".to_string(),
        }
    }
}

impl RuntimeConfig {
    pub fn load_with<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            openai_api_key: get("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()),
            log_level: get("RUST_LOG").unwrap_or_else(|| "vclaim=info".to_string()),
        }
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses VCLAIM_CONFIG environment variable or defaults to "vclaim.toml"
    pub fn load() -> anyhow::Result<Self> {
        if let Ok(env_path) = std::env::var("VCLAIM_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::dotenv();
        }

        let config_path =
            std::env::var("VCLAIM_CONFIG").unwrap_or_else(|_| "vclaim.toml".to_string());

        let mut config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            Self::from_toml_str(&content)?
        } else {
            tracing::warn!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        config.apply_overrides_with(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply env-style overrides; `get` abstracts the environment for tests
    pub fn apply_overrides_with<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = get("VCLAIM_PROVIDER") {
            self.oracle.provider = provider;
        }
        if let Some(model) = get("VCLAIM_MODEL") {
            self.oracle.model = model;
        }
        if let Some(base_url) = get("VCLAIM_BASE_URL") {
            self.oracle.base_url = base_url;
        }
        if let Some(temperature) = get("VCLAIM_TEMPERATURE").and_then(|v| v.parse().ok()) {
            self.oracle.temperature = temperature;
        }
        if let Some(timeout) = get("VCLAIM_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            self.oracle.timeout_ms = timeout;
        }
        if let Some(path) = get("VCLAIM_FIXTURE") {
            self.oracle.fixture_path = Some(path);
        }
        self.runtime = RuntimeConfig::load_with(&get);
    }

    pub fn validate(&mut self) -> anyhow::Result<()> {
        if !(0.0..=2.0).contains(&self.oracle.temperature) {
            tracing::warn!(
                "temperature {} outside [0, 2], clamping",
                self.oracle.temperature
            );
            self.oracle.temperature = if self.oracle.temperature.is_nan() {
                0.1
            } else {
                self.oracle.temperature.clamp(0.0, 2.0)
            };
        }
        if self.oracle.timeout_ms == 0 {
            anyhow::bail!("oracle.timeout_ms must be > 0");
        }
        match self.oracle.provider.as_str() {
            "openai" => {
                if !self.oracle.base_url.starts_with("http://")
                    && !self.oracle.base_url.starts_with("https://")
                {
                    anyhow::bail!(
                        "oracle.base_url '{}' must start with http:// or https://",
                        self.oracle.base_url
                    );
                }
            }
            "fixture" => {
                if self.oracle.fixture_path.is_none() {
                    anyhow::bail!("fixture provider requires oracle.fixture_path or VCLAIM_FIXTURE");
                }
            }
            other => anyhow::bail!("Unknown oracle provider '{}'", other),
        }
        self.calibration.validate()?;
        Ok(())
    }
}
