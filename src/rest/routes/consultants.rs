// rest/routes/consultants.rs — Consultant CRUD routes.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::domain::{Consultant, ConsultantDraft};
use crate::error::AppError;
use crate::rest::{lang_of, reject, ApiResult};
use crate::AppContext;

pub async fn list(State(ctx): State<Arc<AppContext>>, headers: HeaderMap) -> ApiResult<Value> {
    let lang = lang_of(&headers);
    let consultants = ctx
        .storage
        .list_consultants()
        .await
        .map_err(|e| reject(&ctx, lang, AppError::Storage(e)))?;
    Ok(Json(json!({ "consultants": consultants })))
}

pub async fn get_one(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Consultant> {
    let lang = lang_of(&headers);
    match ctx.storage.get_consultant(&id).await {
        Ok(Some(consultant)) => Ok(Json(consultant)),
        Ok(None) => Err(reject(&ctx, lang, AppError::NotFound("consultant"))),
        Err(e) => Err(reject(&ctx, lang, AppError::Storage(e))),
    }
}

pub async fn create(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(draft): Json<ConsultantDraft>,
) -> ApiResult<Consultant> {
    let lang = lang_of(&headers);
    draft.validate().map_err(|e| reject(&ctx, lang, e))?;
    let consultant = ctx
        .storage
        .create_consultant(&draft)
        .await
        .map_err(|e| reject(&ctx, lang, AppError::Storage(e)))?;
    Ok(Json(consultant))
}

pub async fn update(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(draft): Json<ConsultantDraft>,
) -> ApiResult<Consultant> {
    let lang = lang_of(&headers);
    draft.validate().map_err(|e| reject(&ctx, lang, e))?;
    match ctx.storage.update_consultant(&id, &draft).await {
        Ok(Some(consultant)) => Ok(Json(consultant)),
        Ok(None) => Err(reject(&ctx, lang, AppError::NotFound("consultant"))),
        Err(e) => Err(reject(&ctx, lang, AppError::Storage(e))),
    }
}

pub async fn delete(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let lang = lang_of(&headers);
    match ctx.storage.delete_consultant(&id).await {
        Ok(true) => Ok(Json(json!({ "deleted": true }))),
        Ok(false) => Err(reject(&ctx, lang, AppError::NotFound("consultant"))),
        Err(e) => Err(reject(&ctx, lang, AppError::Storage(e))),
    }
}
