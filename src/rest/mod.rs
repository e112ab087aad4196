// rest/mod.rs — Public REST API server.
//
// Axum HTTP server, JSON in/out, camelCase wire naming.
//
// Endpoints (all under /api/v1):
//   GET  /health
//   CRUD /clients, /consultants, /projects
//   CRUD /expenses, /budgets, /invoices, /tax-rates
//   GET  /reports/revenue | /reports/budget-utilization
//        | /reports/expenses | /reports/tax
//   POST /ai/project-risk, /ai/business-insight

pub mod routes;

use anyhow::Result;
use axum::http::{header, HeaderMap, StatusCode};
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::error::AppError;
use crate::i18n::Lang;
use crate::AppContext;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("REST API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        // Health
        .route("/api/v1/health", get(routes::health::health))
        // Clients
        .route(
            "/api/v1/clients",
            get(routes::clients::list).post(routes::clients::create),
        )
        .route(
            "/api/v1/clients/{id}",
            get(routes::clients::get_one)
                .put(routes::clients::update)
                .delete(routes::clients::delete),
        )
        // Consultants
        .route(
            "/api/v1/consultants",
            get(routes::consultants::list).post(routes::consultants::create),
        )
        .route(
            "/api/v1/consultants/{id}",
            get(routes::consultants::get_one)
                .put(routes::consultants::update)
                .delete(routes::consultants::delete),
        )
        // Projects
        .route(
            "/api/v1/projects",
            get(routes::projects::list).post(routes::projects::create),
        )
        .route(
            "/api/v1/projects/{id}",
            get(routes::projects::get_one)
                .put(routes::projects::update)
                .delete(routes::projects::delete),
        )
        // Finance
        .route(
            "/api/v1/expenses",
            get(routes::finance::list_expenses).post(routes::finance::create_expense),
        )
        .route(
            "/api/v1/expenses/{id}",
            get(routes::finance::get_expense).delete(routes::finance::delete_expense),
        )
        .route(
            "/api/v1/budgets",
            get(routes::finance::list_budgets).post(routes::finance::create_budget),
        )
        .route("/api/v1/budgets/{id}", axum::routing::delete(routes::finance::delete_budget))
        .route(
            "/api/v1/invoices",
            get(routes::finance::list_invoices).post(routes::finance::create_invoice),
        )
        .route(
            "/api/v1/invoices/{id}",
            get(routes::finance::get_invoice)
                .put(routes::finance::update_invoice)
                .delete(routes::finance::delete_invoice),
        )
        .route(
            "/api/v1/tax-rates",
            get(routes::finance::list_tax_rates).post(routes::finance::create_tax_rate),
        )
        .route(
            "/api/v1/tax-rates/{id}",
            axum::routing::delete(routes::finance::delete_tax_rate),
        )
        // Reports
        .route("/api/v1/reports/revenue", get(routes::reports::revenue))
        .route(
            "/api/v1/reports/budget-utilization",
            get(routes::reports::budget_utilization),
        )
        .route("/api/v1/reports/expenses", get(routes::reports::expenses))
        .route("/api/v1/reports/tax", get(routes::reports::tax))
        // AI flows
        .route("/api/v1/ai/project-risk", post(routes::ai::project_risk))
        .route(
            "/api/v1/ai/business-insight",
            post(routes::ai::business_insight),
        )
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

// ─── Shared handler plumbing ──────────────────────────────────────────────────

/// Error half of every handler result: status plus localized payload.
pub(crate) type Reject = (StatusCode, Json<Value>);

pub(crate) type ApiResult<T> = Result<Json<T>, Reject>;

/// Response language from the `Accept-Language` header; English default.
pub(crate) fn lang_of(headers: &HeaderMap) -> Lang {
    headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .map(Lang::from_accept_language)
        .unwrap_or_default()
}

/// Map an [`AppError`] to its HTTP reply. The payload carries a localized
/// headline plus the specific detail; storage details stay in the log.
pub(crate) fn reject(ctx: &AppContext, lang: Lang, err: AppError) -> Reject {
    let status = match &err {
        AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::ServiceCall(_) | AppError::SchemaMismatch(_) => StatusCode::BAD_GATEWAY,
        AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let detail = match &err {
        AppError::Storage(source) => {
            error!(error = ?source, "storage failure in REST handler");
            "storage failure".to_string()
        }
        other => other.to_string(),
    };

    (
        status,
        Json(json!({
            "error": ctx.i18n.lookup(lang, err.message_key()),
            "detail": detail,
        })),
    )
}
