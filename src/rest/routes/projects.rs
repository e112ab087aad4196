// rest/routes/projects.rs — Project CRUD routes.
//
// The client name cached on each project is resolved here, at the write
// boundary. A project whose client id matches nothing stores an empty
// name — there is no referential integrity between the tables.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::domain::{Project, ProjectDraft};
use crate::error::AppError;
use crate::rest::{lang_of, reject, ApiResult, Reject};
use crate::AppContext;
use crate::i18n::Lang;

async fn cached_client_name(
    ctx: &Arc<AppContext>,
    lang: Lang,
    client_id: &str,
) -> Result<String, Reject> {
    match ctx.storage.get_client(client_id).await {
        Ok(Some(client)) => Ok(client.name),
        Ok(None) => Ok(String::new()),
        Err(e) => Err(reject(ctx, lang, AppError::Storage(e))),
    }
}

pub async fn list(State(ctx): State<Arc<AppContext>>, headers: HeaderMap) -> ApiResult<Value> {
    let lang = lang_of(&headers);
    let projects = ctx
        .storage
        .list_projects()
        .await
        .map_err(|e| reject(&ctx, lang, AppError::Storage(e)))?;
    Ok(Json(json!({ "projects": projects })))
}

pub async fn get_one(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Project> {
    let lang = lang_of(&headers);
    match ctx.storage.get_project(&id).await {
        Ok(Some(project)) => Ok(Json(project)),
        Ok(None) => Err(reject(&ctx, lang, AppError::NotFound("project"))),
        Err(e) => Err(reject(&ctx, lang, AppError::Storage(e))),
    }
}

pub async fn create(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(draft): Json<ProjectDraft>,
) -> ApiResult<Project> {
    let lang = lang_of(&headers);
    draft.validate().map_err(|e| reject(&ctx, lang, e))?;
    let client_name = cached_client_name(&ctx, lang, &draft.client_id).await?;
    let project = ctx
        .storage
        .create_project(&draft, &client_name)
        .await
        .map_err(|e| reject(&ctx, lang, AppError::Storage(e)))?;
    Ok(Json(project))
}

pub async fn update(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(draft): Json<ProjectDraft>,
) -> ApiResult<Project> {
    let lang = lang_of(&headers);
    draft.validate().map_err(|e| reject(&ctx, lang, e))?;
    let client_name = cached_client_name(&ctx, lang, &draft.client_id).await?;
    match ctx.storage.update_project(&id, &draft, &client_name).await {
        Ok(Some(project)) => Ok(Json(project)),
        Ok(None) => Err(reject(&ctx, lang, AppError::NotFound("project"))),
        Err(e) => Err(reject(&ctx, lang, AppError::Storage(e))),
    }
}

pub async fn delete(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let lang = lang_of(&headers);
    match ctx.storage.delete_project(&id).await {
        Ok(true) => Ok(Json(json!({ "deleted": true }))),
        Ok(false) => Err(reject(&ctx, lang, AppError::NotFound("project"))),
        Err(e) => Err(reject(&ctx, lang, AppError::Storage(e))),
    }
}
