//! The two AI flows: project risk scoring and business-insight generation.
//!
//! A flow pairs a declared input schema, a prompt template, and a declared
//! output schema (see the runner in [`crate::ai`]). The field names below
//! are the wire contract — clients and the hosted model both see them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::client::ModelClient;
use super::schema::{FieldSpec, Schema};
use super::FlowError;
use crate::config::AiConfig;

// ─── Flow definition ─────────────────────────────────────────────────────────

pub struct FlowDef {
    pub name: &'static str,
    pub system: &'static str,
    pub template: &'static str,
    pub input: Schema,
    pub output: Schema,
}

// ─── Project risk ────────────────────────────────────────────────────────────

const PROJECT_RISK_SYSTEM: &str = "You are the delivery-risk reviewer at a consulting firm. \
You score the delivery risk of proposed engagements. \
Respond with a single JSON object and nothing else — no prose, no code fences.";

const PROJECT_RISK_TEMPLATE: &str = "\
Assess the delivery risk of a proposed consulting engagement.

Technical complexity: {{technicalComplexity}}
Resource needs: {{resourceNeeds}}
Client history: {{clientHistory}}
Political exposure of the client's country: {{clientCountryPoliticalExposure}}

Reply with a JSON object carrying exactly these fields:
  \"riskScore\": an integer from 0 (negligible risk) to 100 (near-certain failure)
  \"riskFactors\": one paragraph naming the main drivers behind the score";

/// Validated output of the project-risk flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// 0 (negligible) … 100 (near-certain failure).
    pub risk_score: u8,
    pub risk_factors: String,
}

fn project_risk_def() -> FlowDef {
    FlowDef {
        name: "project-risk",
        system: PROJECT_RISK_SYSTEM,
        template: PROJECT_RISK_TEMPLATE,
        input: Schema::new(
            "project-risk input",
            vec![
                FieldSpec::text("technicalComplexity"),
                FieldSpec::text("resourceNeeds"),
                FieldSpec::text("clientHistory"),
                FieldSpec::text("clientCountryPoliticalExposure"),
            ],
        ),
        output: Schema::new(
            "project-risk output",
            vec![
                FieldSpec::integer("riskScore", 0, 100),
                FieldSpec::text("riskFactors"),
            ],
        ),
    }
}

// ─── Business insight ────────────────────────────────────────────────────────

const BUSINESS_INSIGHT_SYSTEM: &str = "You are a management-consulting analyst. \
You distill a client's situation into one actionable insight. \
Respond with a single JSON object and nothing else — no prose, no code fences.";

const BUSINESS_INSIGHT_TEMPLATE: &str = "\
Generate a business insight for a consulting client.

Business context: {{businessContext}}
Focus area: {{focusArea}}
Timeframe: {{timeframe}}

Reply with a JSON object carrying these fields:
  \"insight\": one paragraph with the single most useful observation
  \"recommendations\": a list of 2 to 4 short action items
  \"confidence\": optional, your confidence in the insight from 0 to 1
  \"topics\": optional, a list of short topic tags";

/// Validated output of the business-insight flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessInsight {
    pub insight: String,
    /// Always 2–4 items.
    pub recommendations: Vec<String>,
    /// In [0,1] when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
}

fn business_insight_def() -> FlowDef {
    FlowDef {
        name: "business-insight",
        system: BUSINESS_INSIGHT_SYSTEM,
        template: BUSINESS_INSIGHT_TEMPLATE,
        input: Schema::new(
            "business-insight input",
            vec![
                FieldSpec::text("businessContext"),
                FieldSpec::text("focusArea"),
                FieldSpec::text("timeframe").optional(),
            ],
        ),
        output: Schema::new(
            "business-insight output",
            vec![
                FieldSpec::text("insight"),
                FieldSpec::text_list("recommendations", 2, 4),
                FieldSpec::float("confidence", 0.0, 1.0).optional(),
                FieldSpec::text_list("topics", 0, 16).optional(),
            ],
        ),
    }
}

// ─── Registry ────────────────────────────────────────────────────────────────

/// The flows, pre-built once at startup together with the per-invocation
/// attempt cap and token budget from config.
pub struct FlowRegistry {
    project_risk: FlowDef,
    business_insight: FlowDef,
    max_attempts: u32,
    max_tokens: u32,
}

impl FlowRegistry {
    pub fn new(cfg: &AiConfig) -> Self {
        Self {
            project_risk: project_risk_def(),
            business_insight: business_insight_def(),
            max_attempts: cfg.max_attempts.max(1),
            max_tokens: cfg.max_tokens,
        }
    }

    /// Score the delivery risk of an engagement described by `input`.
    pub async fn project_risk(
        &self,
        model: &dyn ModelClient,
        input: &Value,
    ) -> Result<RiskAssessment, FlowError> {
        super::run_flow(
            &self.project_risk,
            input,
            model,
            self.max_attempts,
            self.max_tokens,
        )
        .await
    }

    /// Generate an insight plus recommendations for a business scenario.
    pub async fn business_insight(
        &self,
        model: &dyn ModelClient,
        input: &Value,
    ) -> Result<BusinessInsight, FlowError> {
        super::run_flow(
            &self.business_insight,
            input,
            model,
            self.max_attempts,
            self.max_tokens,
        )
        .await
    }
}
