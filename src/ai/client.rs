// SPDX-License-Identifier: MIT
//! Model client seam.
//!
//! The hosted text-generation service is an external black box: request
//! in, raw text out, or an error. [`ModelClient`] is the trait the flow
//! runner depends on; [`HostedModelClient`] is the production
//! implementation (HTTP gateway, bearer auth, request timeout). Tests
//! substitute scripted implementations.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::AiConfig;

/// One generation request. The flow runner builds exactly one of these
/// per attempt.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Role/system framing for the model.
    pub system: String,
    /// The rendered prompt.
    pub prompt: String,
    pub max_tokens: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// No API key configured — the call was never attempted.
    #[error("no AI gateway key configured (set ADVISORD_AI_KEY)")]
    MissingKey,

    /// Connect failure, timeout, or any other transport-level fault.
    #[error("gateway request failed: {0}")]
    Transport(String),

    /// The gateway answered with a non-success HTTP status.
    #[error("gateway returned HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The gateway answered 200 but not with the expected envelope.
    #[error("gateway reply was not the expected envelope: {0}")]
    Envelope(String),
}

#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send one generation request and return the raw model text.
    async fn generate(&self, req: &GenerateRequest) -> Result<String, ModelError>;
}

// ─── Hosted implementation ────────────────────────────────────────────────────

/// `{"text": "..."}` — the gateway's reply envelope.
#[derive(Debug, Deserialize)]
struct GenerateReply {
    text: String,
}

pub struct HostedModelClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl HostedModelClient {
    pub fn new(cfg: &AiConfig, api_key: Option<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.api_base_url.trim_end_matches('/').to_string(),
            api_key,
            model: cfg.model.clone(),
        })
    }
}

#[async_trait]
impl ModelClient for HostedModelClient {
    async fn generate(&self, req: &GenerateRequest) -> Result<String, ModelError> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(ModelError::MissingKey);
        };

        let url = format!("{}/v1/generate", self.base_url);
        let payload = serde_json::json!({
            "model": self.model,
            "system": req.system,
            "prompt": req.prompt,
            "maxTokens": req.max_tokens,
        });

        debug!(model = %self.model, prompt_len = req.prompt.len(), "calling model gateway");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            // Keep a short body snippet for the log; gateways put the
            // useful part first.
            let detail = resp
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(200)
                .collect();
            return Err(ModelError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let reply: GenerateReply = resp
            .json()
            .await
            .map_err(|e| ModelError::Envelope(e.to_string()))?;
        Ok(reply.text)
    }
}
