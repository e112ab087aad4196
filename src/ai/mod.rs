// SPDX-License-Identifier: MIT
//! AI flow layer.
//!
//! A flow is one stateless request/response operation: validate the
//! caller's input against the declared input schema, render the prompt by
//! variable substitution, send it to the hosted model, and accept the
//! reply only if it satisfies the declared output schema.
//!
//! Failure policy is uniform across flows: every failure propagates as a
//! typed [`FlowError`] — there are no fallback values. A reply that fails
//! the output schema earns exactly one re-request (configurable attempt
//! cap); service failures are never retried.

pub mod client;
pub mod flows;
pub mod schema;
pub mod template;

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use client::{GenerateRequest, ModelClient, ModelError};
use flows::FlowDef;
use schema::FieldKind;
use template::TemplateError;

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// The caller's input failed the declared input schema. No model call
    /// was made.
    #[error("invalid flow input: {0}")]
    InvalidInput(String),

    /// Prompt rendering failed — a template placeholder had no variable.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The outbound model call failed.
    #[error(transparent)]
    Service(#[from] ModelError),

    /// Every attempt produced a reply that failed the output schema.
    #[error("response did not match the declared schema after {attempts} attempt(s): {detail}")]
    SchemaMismatch { attempts: u32, detail: String },
}

/// Run one flow invocation end to end.
///
/// `max_attempts` bounds the whole invocation: attempt N+1 happens only
/// when attempt N produced a well-formed reply that failed the output
/// schema. Transport and gateway errors return immediately.
pub(crate) async fn run_flow<T: DeserializeOwned>(
    flow: &FlowDef,
    input: &Value,
    model: &dyn ModelClient,
    max_attempts: u32,
    max_tokens: u32,
) -> Result<T, FlowError> {
    flow.input
        .validate(input)
        .map_err(|v| FlowError::InvalidInput(v.join("; ")))?;

    let prompt = template::render(flow.template, &template_vars(flow, input))?;
    let request = GenerateRequest {
        system: flow.system.to_string(),
        prompt,
        max_tokens,
    };

    let mut last_detail = String::new();
    for attempt in 1..=max_attempts {
        let raw = model.generate(&request).await?;
        match accept(flow, &raw) {
            Ok(value) => {
                if attempt > 1 {
                    debug!(flow = flow.name, attempt, "re-request produced a conforming reply");
                }
                // The schema passed, so the typed decode cannot fail for
                // shape reasons; surface anything residual as a mismatch.
                return serde_json::from_value(value).map_err(|e| FlowError::SchemaMismatch {
                    attempts: attempt,
                    detail: e.to_string(),
                });
            }
            Err(detail) => {
                warn!(
                    flow = flow.name,
                    attempt,
                    max_attempts,
                    %detail,
                    "model reply failed the output schema"
                );
                last_detail = detail;
            }
        }
    }

    Err(FlowError::SchemaMismatch {
        attempts: max_attempts,
        detail: last_detail,
    })
}

/// Build template variables from the validated input object. Declared
/// optional text fields that the caller omitted render as "unspecified"
/// so the template never sees an unresolved placeholder.
fn template_vars(flow: &FlowDef, input: &Value) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    for field in flow.input.fields() {
        if !matches!(field.kind, FieldKind::Text { .. }) {
            continue;
        }
        let value = input
            .get(field.name)
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "unspecified".to_string());
        vars.insert(field.name.to_string(), value);
    }
    vars
}

/// Parse and schema-check one raw model reply. Returns the parsed object
/// or a human-readable mismatch detail.
fn accept(flow: &FlowDef, raw: &str) -> Result<Value, String> {
    let body = strip_code_fence(raw);
    let value: Value =
        serde_json::from_str(body).map_err(|e| format!("reply was not JSON: {e}"))?;
    flow.output
        .validate(&value)
        .map_err(|violations| violations.join("; "))?;
    Ok(value)
}

/// Models wrap JSON in Markdown fences often enough that stripping one
/// optional outer fence is part of the contract.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "JSON", …) up to the first newline.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.strip_suffix("```").map(str::trim).unwrap_or(trimmed)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use flows::{FlowRegistry, RiskAssessment};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::config::AiConfig;

    /// Replays a fixed list of replies, one per generate call.
    struct Scripted {
        replies: Vec<Result<String, ()>>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(replies: Vec<Result<String, ()>>) -> Self {
            Self {
                replies,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl ModelClient for Scripted {
        async fn generate(&self, _req: &GenerateRequest) -> Result<String, ModelError> {
            let i = self.calls.fetch_add(1, Ordering::Relaxed);
            match self.replies.get(i) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(())) => Err(ModelError::Status {
                    status: 503,
                    detail: "scripted outage".into(),
                }),
                None => panic!("model called more often than scripted"),
            }
        }
    }

    fn registry() -> FlowRegistry {
        FlowRegistry::new(&AiConfig::default())
    }

    fn risk_input() -> serde_json::Value {
        json!({
            "technicalComplexity": "high",
            "resourceNeeds": "scarce",
            "clientHistory": "new",
            "clientCountryPoliticalExposure": "stable",
        })
    }

    #[tokio::test]
    async fn conforming_reply_is_returned_typed() {
        let model = Scripted::new(vec![Ok(
            r#"{"riskScore": 72, "riskFactors": "New client, scarce staffing."}"#.into(),
        )]);
        let out: RiskAssessment = registry()
            .project_risk(&model, &risk_input())
            .await
            .unwrap();
        assert_eq!(out.risk_score, 72);
        assert!(!out.risk_factors.is_empty());
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn fenced_reply_is_accepted() {
        let model = Scripted::new(vec![Ok(
            "```json\n{\"riskScore\": 10, \"riskFactors\": \"Routine engagement.\"}\n```".into(),
        )]);
        let out = registry().project_risk(&model, &risk_input()).await.unwrap();
        assert_eq!(out.risk_score, 10);
    }

    #[tokio::test]
    async fn invalid_input_makes_no_model_call() {
        let model = Scripted::new(vec![]);
        let err = registry()
            .project_risk(&model, &json!({"technicalComplexity": "high"}))
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::InvalidInput(_)), "{err}");
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn schema_mismatch_earns_exactly_one_re_request() {
        let model = Scripted::new(vec![
            Ok(r#"{"riskScore": 150, "riskFactors": "out of range"}"#.into()),
            Ok(r#"{"riskScore": 60, "riskFactors": "second try conforms"}"#.into()),
        ]);
        let out = registry().project_risk(&model, &risk_input()).await.unwrap();
        assert_eq!(out.risk_score, 60);
        assert_eq!(model.call_count(), 2);
    }

    #[tokio::test]
    async fn persistent_mismatch_errors_after_the_attempt_cap() {
        let model = Scripted::new(vec![
            Ok("not json at all".into()),
            Ok("still not json".into()),
        ]);
        let err = registry().project_risk(&model, &risk_input()).await.unwrap_err();
        match err {
            FlowError::SchemaMismatch { attempts, detail } => {
                assert_eq!(attempts, 2);
                assert!(detail.contains("not JSON"), "{detail}");
            }
            other => panic!("expected SchemaMismatch, got {other}"),
        }
        assert_eq!(model.call_count(), 2);
    }

    #[tokio::test]
    async fn service_failure_is_not_retried() {
        let model = Scripted::new(vec![Err(())]);
        let err = registry().project_risk(&model, &risk_input()).await.unwrap_err();
        assert!(matches!(err, FlowError::Service(_)), "{err}");
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn insight_flow_enforces_recommendation_count() {
        let model = Scripted::new(vec![
            Ok(r#"{"insight": "Margins are thin.", "recommendations": ["Raise rates"]}"#.into()),
            Ok(r#"{"insight": "Margins are thin.", "recommendations": ["Raise rates", "Drop lowest-margin account"], "confidence": 0.7}"#.into()),
        ]);
        let input = json!({
            "businessContext": "Mid-size consultancy, margins shrinking for 3 quarters",
            "focusArea": "pricing",
        });
        let out = registry().business_insight(&model, &input).await.unwrap();
        assert_eq!(out.recommendations.len(), 2);
        assert_eq!(out.confidence, Some(0.7));
        assert_eq!(model.call_count(), 2);
    }

    #[tokio::test]
    async fn omitted_optional_input_renders_as_unspecified() {
        let reg = flows::FlowRegistry::new(&AiConfig::default());
        // Reach the template through a real invocation: the scripted model
        // asserts on the prompt it receives.
        struct PromptCheck;
        #[async_trait]
        impl ModelClient for PromptCheck {
            async fn generate(&self, req: &GenerateRequest) -> Result<String, ModelError> {
                assert!(req.prompt.contains("Timeframe: unspecified"), "{}", req.prompt);
                Ok(r#"{"insight": "x", "recommendations": ["a", "b"]}"#.into())
            }
        }
        let input = json!({"businessContext": "ctx", "focusArea": "ops"});
        reg.business_insight(&PromptCheck, &input).await.unwrap();
    }

    #[test]
    fn fence_stripping_variants() {
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```"), "{\"a\":1}");
        // Unterminated fence falls back to the trimmed original.
        assert_eq!(strip_code_fence("```json\n{\"a\":1}"), "```json\n{\"a\":1}");
    }
}
