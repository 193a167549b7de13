//! Chat-completion client for the coach API
//!
//! Talks to an OpenAI-compatible `/v1/chat/completions` endpoint. Provider
//! selection picks sensible base URLs and default models; any compatible
//! endpoint works via `base_url`.

use async_trait::async_trait;
use reqwest::Client;

use super::CoachModel;
use crate::config::LlmConfig;
use crate::error::{JournalError, Result};

const REQUEST_TIMEOUT_SECS: u64 = 60;
const TEMPERATURE: f64 = 0.7;

/// Coach API client
///
/// A single completion attempt per call; no retries.
pub struct CoachClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl CoachClient {
    /// Build a client from configuration
    ///
    /// A hosted provider without an API key is a startup error, never a
    /// per-request one.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let (base_url, model, key_required) = match config.provider.to_lowercase().as_str() {
            "groq" => (
                config
                    .base_url
                    .clone()
                    .unwrap_or_else(|| "https://api.groq.com/openai".to_string()),
                config
                    .model
                    .clone()
                    .unwrap_or_else(|| "llama-3.1-8b-instant".to_string()),
                true,
            ),
            "openai" | "gpt" => (
                config
                    .base_url
                    .clone()
                    .unwrap_or_else(|| "https://api.openai.com".to_string()),
                config
                    .model
                    .clone()
                    .unwrap_or_else(|| "gpt-4o-mini".to_string()),
                true,
            ),
            "ollama" => (
                config
                    .base_url
                    .clone()
                    .unwrap_or_else(|| "http://localhost:11434".to_string()),
                config
                    .model
                    .clone()
                    .unwrap_or_else(|| "qwen2.5:14b".to_string()),
                false,
            ),
            other => {
                let base_url = config.base_url.clone().ok_or_else(|| {
                    JournalError::Config(format!(
                        "unknown LLM provider '{}' requires base_url",
                        other
                    ))
                })?;
                let model = config.model.clone().ok_or_else(|| {
                    JournalError::Config(format!(
                        "unknown LLM provider '{}' requires model",
                        other
                    ))
                })?;
                (base_url, model, false)
            }
        };

        if key_required && config.api_key.is_empty() {
            return Err(JournalError::Config(format!(
                "LLM provider '{}' requires an API key (set JOURNAL__LLM__API_KEY)",
                config.provider
            )));
        }

        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl CoachModel for CoachClient {
    async fn complete(&self, system: &str, prompt: &str, max_tokens: u32) -> Result<String> {
        let request = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": prompt}
            ],
            "temperature": TEMPERATURE,
            "max_tokens": max_tokens
        });

        let mut req = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("content-type", "application/json");

        if !self.api_key.is_empty() {
            req = req.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let resp: serde_json::Value = req.json(&request).send().await?.json().await?;

        if let Some(err) = resp["error"]["message"].as_str() {
            return Err(JournalError::Api(format!("coach API error: {}", err)));
        }

        resp["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| JournalError::Api("empty coach response".into()))
    }

    fn name(&self) -> &str {
        &self.model
    }
}
