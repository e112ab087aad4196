use crate::rest::lang_of;
use crate::AppContext;
use axum::http::HeaderMap;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

pub async fn health(State(ctx): State<Arc<AppContext>>, headers: HeaderMap) -> Json<Value> {
    let lang = lang_of(&headers);
    let uptime = ctx.started_at.elapsed().as_secs();
    Json(json!({
        "status": ctx.i18n.lookup(lang, "health.ok"),
        "uptimeSecs": uptime,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
