// rest/routes/clients.rs — Client CRUD routes.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::domain::{Client, ClientDraft};
use crate::error::AppError;
use crate::rest::{lang_of, reject, ApiResult};
use crate::AppContext;

pub async fn list(State(ctx): State<Arc<AppContext>>, headers: HeaderMap) -> ApiResult<Value> {
    let lang = lang_of(&headers);
    let clients = ctx
        .storage
        .list_clients()
        .await
        .map_err(|e| reject(&ctx, lang, AppError::Storage(e)))?;
    Ok(Json(json!({ "clients": clients })))
}

pub async fn get_one(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Client> {
    let lang = lang_of(&headers);
    match ctx.storage.get_client(&id).await {
        Ok(Some(client)) => Ok(Json(client)),
        Ok(None) => Err(reject(&ctx, lang, AppError::NotFound("client"))),
        Err(e) => Err(reject(&ctx, lang, AppError::Storage(e))),
    }
}

pub async fn create(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(draft): Json<ClientDraft>,
) -> ApiResult<Client> {
    let lang = lang_of(&headers);
    draft.validate().map_err(|e| reject(&ctx, lang, e))?;
    let client = ctx
        .storage
        .create_client(&draft)
        .await
        .map_err(|e| reject(&ctx, lang, AppError::Storage(e)))?;
    Ok(Json(client))
}

pub async fn update(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(draft): Json<ClientDraft>,
) -> ApiResult<Client> {
    let lang = lang_of(&headers);
    draft.validate().map_err(|e| reject(&ctx, lang, e))?;
    match ctx.storage.update_client(&id, &draft).await {
        Ok(Some(client)) => Ok(Json(client)),
        Ok(None) => Err(reject(&ctx, lang, AppError::NotFound("client"))),
        Err(e) => Err(reject(&ctx, lang, AppError::Storage(e))),
    }
}

pub async fn delete(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let lang = lang_of(&headers);
    match ctx.storage.delete_client(&id).await {
        Ok(true) => Ok(Json(json!({ "deleted": true }))),
        Ok(false) => Err(reject(&ctx, lang, AppError::NotFound("client"))),
        Err(e) => Err(reject(&ctx, lang, AppError::Storage(e))),
    }
}
