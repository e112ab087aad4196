// rest/routes/reports.rs — Dashboard aggregation routes.

use axum::{extract::State, http::HeaderMap, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::AppError;
use crate::reports::Reports;
use crate::rest::{lang_of, reject, ApiResult};
use crate::AppContext;

pub async fn revenue(State(ctx): State<Arc<AppContext>>, headers: HeaderMap) -> ApiResult<Value> {
    let lang = lang_of(&headers);
    let summary = Reports::new(ctx.storage.pool())
        .revenue_summary()
        .await
        .map_err(|e| reject(&ctx, lang, AppError::Storage(e)))?;
    Ok(Json(json!(summary)))
}

pub async fn budget_utilization(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> ApiResult<Value> {
    let lang = lang_of(&headers);
    let lines = Reports::new(ctx.storage.pool())
        .budget_utilization()
        .await
        .map_err(|e| reject(&ctx, lang, AppError::Storage(e)))?;
    Ok(Json(json!({ "budgets": lines })))
}

pub async fn expenses(State(ctx): State<Arc<AppContext>>, headers: HeaderMap) -> ApiResult<Value> {
    let lang = lang_of(&headers);
    let breakdown = Reports::new(ctx.storage.pool())
        .expense_breakdown()
        .await
        .map_err(|e| reject(&ctx, lang, AppError::Storage(e)))?;
    Ok(Json(json!({ "categories": breakdown })))
}

pub async fn tax(State(ctx): State<Arc<AppContext>>, headers: HeaderMap) -> ApiResult<Value> {
    let lang = lang_of(&headers);
    let buckets = Reports::new(ctx.storage.pool())
        .tax_summary()
        .await
        .map_err(|e| reject(&ctx, lang, AppError::Storage(e)))?;
    Ok(Json(json!({ "buckets": buckets })))
}
