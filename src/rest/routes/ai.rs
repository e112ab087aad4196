// rest/routes/ai.rs — AI flow routes.
//
// Thin adapters: the flow layer owns input validation, prompt rendering,
// the model call, and output schema checking. Both routes propagate flow
// failures as typed errors — there are no fallback payloads.

use axum::{extract::State, http::HeaderMap, Json};
use serde_json::Value;
use std::sync::Arc;

use crate::ai::flows::{BusinessInsight, RiskAssessment};
use crate::rest::{lang_of, reject, ApiResult};
use crate::AppContext;

pub async fn project_risk(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> ApiResult<RiskAssessment> {
    let lang = lang_of(&headers);
    let assessment = ctx
        .flows
        .project_risk(ctx.model.as_ref(), &input)
        .await
        .map_err(|e| reject(&ctx, lang, e.into()))?;
    Ok(Json(assessment))
}

pub async fn business_insight(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> ApiResult<BusinessInsight> {
    let lang = lang_of(&headers);
    let insight = ctx
        .flows
        .business_insight(ctx.model.as_ref(), &input)
        .await
        .map_err(|e| reject(&ctx, lang, e.into()))?;
    Ok(Json(insight))
}
