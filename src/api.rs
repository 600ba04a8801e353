//! Text-generation API access.
//!
//! A single trait, [`AskAsync`], is the seam between the summarizer and the
//! model backend: one free-text prompt in, one free-text completion out.
//! The production implementation, [`OpenAiChat`], talks to any
//! OpenAI-compatible chat-completions endpoint. No retry or backoff: each
//! run issues exactly one request per batch plus one synthesis request,
//! and a failed request fails the run.

use crate::config::ApiConfig;
use crate::utils::{truncate_for_log, USER_AGENT};
use serde_json::json;
use std::error::Error;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Async LLM interaction: send a prompt, get a completion.
pub trait AskAsync {
    /// Send `prompt` to the model and return its completion text.
    async fn ask(&self, prompt: &str) -> Result<String, Box<dyn Error>>;
}

/// Chat-completions client for an OpenAI-compatible endpoint.
#[derive(Debug)]
pub struct OpenAiChat {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiChat {
    /// Build a client from configuration, reading the API key from the
    /// environment variable the config names.
    pub fn from_config(api: &ApiConfig) -> Result<Self, Box<dyn Error>> {
        let api_key = std::env::var(&api.api_key_env)
            .map_err(|_| format!("{} environment variable not set", api.api_key_env))?;
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            model: api.model.clone(),
            api_key,
        })
    }
}

impl AskAsync for OpenAiChat {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn ask(&self, prompt: &str) -> Result<String, Box<dyn Error>> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let t0 = Instant::now();
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(%status, elapsed_ms = t0.elapsed().as_millis() as u64, "API call failed");
            return Err(format!(
                "chat completion returned {status}: {}",
                truncate_for_log(&detail, 300)
            )
            .into());
        }

        let payload: serde_json::Value = response.json().await?;
        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or("chat completion response had no message content")?;

        info!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            completion_bytes = content.len(),
            "Chat completion succeeded"
        );
        Ok(content.to_string())
    }
}
