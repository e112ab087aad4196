//! Contract tests for the two AI flows, driven through the public flow
//! registry with scripted model clients. Assertions target shape and
//! constraints, never literal model text — the hosted model is free to
//! answer differently for identical input.

use advisord::ai::client::{GenerateRequest, ModelClient, ModelError};
use advisord::ai::flows::FlowRegistry;
use advisord::ai::FlowError;
use advisord::config::AiConfig;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

enum Reply {
    Text(String),
    Outage,
}

struct ScriptedModel {
    replies: Mutex<VecDeque<Reply>>,
}

impl ScriptedModel {
    fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
        }
    }
}

#[async_trait]
impl ModelClient for ScriptedModel {
    async fn generate(&self, _req: &GenerateRequest) -> Result<String, ModelError> {
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Outage) => Err(ModelError::Transport("scripted outage".into())),
            None => panic!("model called more often than scripted"),
        }
    }
}

fn registry() -> FlowRegistry {
    FlowRegistry::new(&AiConfig::default())
}

/// The documented example scenario: high complexity, scarce resources,
/// new client, stable country.
fn example_scenario() -> Value {
    json!({
        "technicalComplexity": "high",
        "resourceNeeds": "scarce",
        "clientHistory": "new",
        "clientCountryPoliticalExposure": "stable",
    })
}

#[tokio::test]
async fn risk_flow_returns_score_in_range_with_non_empty_factors() {
    let model = ScriptedModel::new(vec![Reply::Text(
        r#"{"riskScore": 81, "riskFactors": "Unproven client relationship under tight staffing."}"#
            .into(),
    )]);
    let out = registry()
        .project_risk(&model, &example_scenario())
        .await
        .unwrap();
    assert!(out.risk_score <= 100);
    assert!(!out.risk_factors.trim().is_empty());
}

#[tokio::test]
async fn risk_flow_with_outage_yields_an_error_and_no_result() {
    let model = ScriptedModel::new(vec![Reply::Outage]);
    let err = registry()
        .project_risk(&model, &example_scenario())
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::Service(_)), "{err}");
}

#[tokio::test]
async fn risk_flow_rejects_empty_required_field_without_calling_the_model() {
    // A model scripted with zero replies panics if it is ever called.
    let model = ScriptedModel::new(vec![]);
    let mut input = example_scenario();
    input["resourceNeeds"] = json!("   ");
    let err = registry().project_risk(&model, &input).await.unwrap_err();
    match err {
        FlowError::InvalidInput(detail) => {
            assert!(detail.contains("resourceNeeds"), "{detail}")
        }
        other => panic!("expected InvalidInput, got {other}"),
    }
}

#[tokio::test]
async fn risk_flow_retries_schema_mismatch_exactly_once() {
    let model = ScriptedModel::new(vec![
        Reply::Text(r#"{"riskScore": "very high", "riskFactors": "wrong type"}"#.into()),
        Reply::Text(r#"{"riskScore": 55, "riskFactors": "usable on the second pass"}"#.into()),
    ]);
    let out = registry()
        .project_risk(&model, &example_scenario())
        .await
        .unwrap();
    assert_eq!(out.risk_score, 55);
    // The queue is drained: a third call would have panicked.
}

#[tokio::test]
async fn risk_flow_gives_up_after_two_bad_replies() {
    let model = ScriptedModel::new(vec![
        Reply::Text("I think the risk is about 70 out of 100.".into()),
        Reply::Text(r#"{"riskScore": 170, "riskFactors": "still out of range"}"#.into()),
    ]);
    let err = registry()
        .project_risk(&model, &example_scenario())
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::SchemaMismatch { attempts: 2, .. }), "{err}");
}

#[tokio::test]
async fn insight_flow_returns_two_to_four_recommendations() {
    let model = ScriptedModel::new(vec![Reply::Text(
        r#"{"insight": "Utilization is the binding constraint, not demand.",
            "recommendations": ["Hire two mid-level consultants", "Decline sub-scale work", "Raise junior day rates"]}"#
            .into(),
    )]);
    let out = registry()
        .business_insight(
            &model,
            &json!({
                "businessContext": "Pipeline is full but delivery keeps slipping",
                "focusArea": "staffing",
                "timeframe": "next two quarters",
            }),
        )
        .await
        .unwrap();
    assert!(!out.insight.trim().is_empty());
    assert!((2..=4).contains(&out.recommendations.len()));
    assert!(out.confidence.is_none());
    assert!(out.topics.is_none());
}

#[tokio::test]
async fn insight_confidence_when_present_is_in_unit_range() {
    let model = ScriptedModel::new(vec![Reply::Text(
        r#"{"insight": "x", "recommendations": ["a", "b"], "confidence": 1.0}"#.into(),
    )]);
    let out = registry()
        .business_insight(
            &model,
            &json!({"businessContext": "ctx", "focusArea": "ops"}),
        )
        .await
        .unwrap();
    let confidence = out.confidence.unwrap();
    assert!((0.0..=1.0).contains(&confidence));
}

#[tokio::test]
async fn insight_flow_rejects_out_of_range_confidence() {
    let model = ScriptedModel::new(vec![
        Reply::Text(r#"{"insight": "x", "recommendations": ["a", "b"], "confidence": 1.7}"#.into()),
        Reply::Text(r#"{"insight": "x", "recommendations": ["a", "b"], "confidence": 1.7}"#.into()),
    ]);
    let err = registry()
        .business_insight(
            &model,
            &json!({"businessContext": "ctx", "focusArea": "ops"}),
        )
        .await
        .unwrap_err();
    match err {
        FlowError::SchemaMismatch { detail, .. } => {
            assert!(detail.contains("confidence"), "{detail}")
        }
        other => panic!("expected SchemaMismatch, got {other}"),
    }
}

#[tokio::test]
async fn fenced_json_replies_are_accepted() {
    let model = ScriptedModel::new(vec![Reply::Text(
        "```json\n{\"insight\": \"Fences happen.\", \"recommendations\": [\"a\", \"b\"]}\n```".into(),
    )]);
    let out = registry()
        .business_insight(
            &model,
            &json!({"businessContext": "ctx", "focusArea": "ops"}),
        )
        .await
        .unwrap();
    assert_eq!(out.recommendations.len(), 2);
}
