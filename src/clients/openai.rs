use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clients::traits::TranscriptOracle;
use crate::config::OracleConfig;
use crate::error::OracleError;
use crate::prompts::{FORENSIC_SYSTEM_PROMPT, build_forensic_prompt};

/// Longest slice of an error body kept in `OracleError::Status`
const ERROR_BODY_CAP: usize = 500;

/// Chat-completions oracle (OpenAI or any compatible endpoint)
#[derive(Clone, Debug)]
pub struct OpenAiOracle {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    timeout_ms: u64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

impl OpenAiOracle {
    pub fn new(api_key: String, config: &OracleConfig) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| OracleError::Unavailable {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        let base = config.base_url.trim_end_matches('/');
        let endpoint = if base.ends_with("/chat/completions") {
            base.to_string()
        } else {
            format!("{}/chat/completions", base)
        };

        Ok(Self {
            client,
            endpoint,
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            timeout_ms: config.timeout_ms,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_send_error(&self, err: reqwest::Error) -> OracleError {
        if err.is_timeout() {
            OracleError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            err.into()
        }
    }
}

#[async_trait]
impl TranscriptOracle for OpenAiOracle {
    async fn analyze(&self, transcript: &str, instructions: &str) -> Result<String, OracleError> {
        let prompt = build_forensic_prompt(instructions, transcript);
        debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            "Sending transcript to chat-completions oracle"
        );

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: FORENSIC_SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: self.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        // Single attempt: a failed analysis is reported, never retried
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            return Err(OracleError::Status {
                status: status.as_u16(),
                body: text.chars().take(ERROR_BODY_CAP).collect(),
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                OracleError::Timeout {
                    timeout_ms: self.timeout_ms,
                }
            } else {
                OracleError::InvalidResponse {
                    message: format!("unexpected completion payload: {}", e),
                }
            }
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| OracleError::InvalidResponse {
                message: "completion contained no message content".to_string(),
            })
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_chat_path_once() {
        let mut config = OracleConfig::default();
        config.base_url = "http://localhost:8111/v1/".to_string();
        let oracle = OpenAiOracle::new("k".to_string(), &config).unwrap();
        assert_eq!(oracle.endpoint(), "http://localhost:8111/v1/chat/completions");

        config.base_url = "http://localhost:8111/v1/chat/completions".to_string();
        let oracle = OpenAiOracle::new("k".to_string(), &config).unwrap();
        assert_eq!(oracle.endpoint(), "http://localhost:8111/v1/chat/completions");
    }

    #[test]
    fn request_body_asks_for_json_object() {
        let body = ChatRequest {
            model: "gpt-4-turbo",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            temperature: 0.1,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["messages"][0]["role"], "user");
    }
}
