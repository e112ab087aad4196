// rest/routes/finance.rs — Expense, budget, invoice, and tax-rate routes.
//
// Cached display names resolve here at the write boundary, same as
// projects. The one hard reference is `taxRateId` on invoices: the rate
// percentage must exist to do the tax math, so a dangling id is a
// validation error rather than a silent 0%.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::domain::{
    Budget, BudgetDraft, Expense, ExpenseDraft, Invoice, InvoiceDraft, TaxRate, TaxRateDraft,
};
use crate::error::AppError;
use crate::i18n::Lang;
use crate::rest::{lang_of, reject, ApiResult, Reject};
use crate::AppContext;

async fn cached_project_name(
    ctx: &Arc<AppContext>,
    lang: Lang,
    project_id: &str,
) -> Result<String, Reject> {
    match ctx.storage.get_project(project_id).await {
        Ok(Some(project)) => Ok(project.name),
        Ok(None) => Ok(String::new()),
        Err(e) => Err(reject(ctx, lang, AppError::Storage(e))),
    }
}

// ─── Expenses ────────────────────────────────────────────────────────────────

pub async fn list_expenses(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> ApiResult<Value> {
    let lang = lang_of(&headers);
    let expenses = ctx
        .storage
        .list_expenses()
        .await
        .map_err(|e| reject(&ctx, lang, AppError::Storage(e)))?;
    Ok(Json(json!({ "expenses": expenses })))
}

pub async fn get_expense(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Expense> {
    let lang = lang_of(&headers);
    match ctx.storage.get_expense(&id).await {
        Ok(Some(expense)) => Ok(Json(expense)),
        Ok(None) => Err(reject(&ctx, lang, AppError::NotFound("expense"))),
        Err(e) => Err(reject(&ctx, lang, AppError::Storage(e))),
    }
}

pub async fn create_expense(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(draft): Json<ExpenseDraft>,
) -> ApiResult<Expense> {
    let lang = lang_of(&headers);
    draft.validate().map_err(|e| reject(&ctx, lang, e))?;
    let project_name = cached_project_name(&ctx, lang, &draft.project_id).await?;
    let expense = ctx
        .storage
        .create_expense(&draft, &project_name)
        .await
        .map_err(|e| reject(&ctx, lang, AppError::Storage(e)))?;
    Ok(Json(expense))
}

pub async fn delete_expense(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let lang = lang_of(&headers);
    match ctx.storage.delete_expense(&id).await {
        Ok(true) => Ok(Json(json!({ "deleted": true }))),
        Ok(false) => Err(reject(&ctx, lang, AppError::NotFound("expense"))),
        Err(e) => Err(reject(&ctx, lang, AppError::Storage(e))),
    }
}

// ─── Budgets ─────────────────────────────────────────────────────────────────

pub async fn list_budgets(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> ApiResult<Value> {
    let lang = lang_of(&headers);
    let budgets = ctx
        .storage
        .list_budgets()
        .await
        .map_err(|e| reject(&ctx, lang, AppError::Storage(e)))?;
    Ok(Json(json!({ "budgets": budgets })))
}

pub async fn create_budget(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(draft): Json<BudgetDraft>,
) -> ApiResult<Budget> {
    let lang = lang_of(&headers);
    draft.validate().map_err(|e| reject(&ctx, lang, e))?;
    let project_name = cached_project_name(&ctx, lang, &draft.project_id).await?;
    let budget = ctx
        .storage
        .create_budget(&draft, &project_name)
        .await
        .map_err(|e| reject(&ctx, lang, AppError::Storage(e)))?;
    Ok(Json(budget))
}

pub async fn delete_budget(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let lang = lang_of(&headers);
    match ctx.storage.delete_budget(&id).await {
        Ok(true) => Ok(Json(json!({ "deleted": true }))),
        Ok(false) => Err(reject(&ctx, lang, AppError::NotFound("budget"))),
        Err(e) => Err(reject(&ctx, lang, AppError::Storage(e))),
    }
}

// ─── Invoices ────────────────────────────────────────────────────────────────

/// Resolve the cached names and the tax percentage for an invoice write.
async fn resolve_invoice_refs(
    ctx: &Arc<AppContext>,
    lang: Lang,
    draft: &InvoiceDraft,
) -> Result<(String, String, f64), Reject> {
    let (project_name, client_name) = match ctx.storage.get_project(&draft.project_id).await {
        Ok(Some(project)) => (project.name, project.client_name),
        Ok(None) => (String::new(), String::new()),
        Err(e) => return Err(reject(ctx, lang, AppError::Storage(e))),
    };

    let rate_percent = match &draft.tax_rate_id {
        None => 0.0,
        Some(rate_id) => match ctx.storage.get_tax_rate(rate_id).await {
            Ok(Some(rate)) => rate.rate_percent,
            Ok(None) => {
                return Err(reject(
                    ctx,
                    lang,
                    AppError::Validation("taxRateId references a missing tax rate".into()),
                ))
            }
            Err(e) => return Err(reject(ctx, lang, AppError::Storage(e))),
        },
    };

    Ok((project_name, client_name, rate_percent))
}

pub async fn list_invoices(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> ApiResult<Value> {
    let lang = lang_of(&headers);
    let invoices = ctx
        .storage
        .list_invoices()
        .await
        .map_err(|e| reject(&ctx, lang, AppError::Storage(e)))?;
    Ok(Json(json!({ "invoices": invoices })))
}

pub async fn get_invoice(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Invoice> {
    let lang = lang_of(&headers);
    match ctx.storage.get_invoice(&id).await {
        Ok(Some(invoice)) => Ok(Json(invoice)),
        Ok(None) => Err(reject(&ctx, lang, AppError::NotFound("invoice"))),
        Err(e) => Err(reject(&ctx, lang, AppError::Storage(e))),
    }
}

pub async fn create_invoice(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(draft): Json<InvoiceDraft>,
) -> ApiResult<Invoice> {
    let lang = lang_of(&headers);
    draft.validate().map_err(|e| reject(&ctx, lang, e))?;
    let (project_name, client_name, rate_percent) =
        resolve_invoice_refs(&ctx, lang, &draft).await?;
    let invoice = ctx
        .storage
        .create_invoice(&draft, &project_name, &client_name, rate_percent)
        .await
        .map_err(|e| reject(&ctx, lang, AppError::Storage(e)))?;
    Ok(Json(invoice))
}

pub async fn update_invoice(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(draft): Json<InvoiceDraft>,
) -> ApiResult<Invoice> {
    let lang = lang_of(&headers);
    draft.validate().map_err(|e| reject(&ctx, lang, e))?;
    let (project_name, client_name, rate_percent) =
        resolve_invoice_refs(&ctx, lang, &draft).await?;
    match ctx
        .storage
        .update_invoice(&id, &draft, &project_name, &client_name, rate_percent)
        .await
    {
        Ok(Some(invoice)) => Ok(Json(invoice)),
        Ok(None) => Err(reject(&ctx, lang, AppError::NotFound("invoice"))),
        Err(e) => Err(reject(&ctx, lang, AppError::Storage(e))),
    }
}

pub async fn delete_invoice(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let lang = lang_of(&headers);
    match ctx.storage.delete_invoice(&id).await {
        Ok(true) => Ok(Json(json!({ "deleted": true }))),
        Ok(false) => Err(reject(&ctx, lang, AppError::NotFound("invoice"))),
        Err(e) => Err(reject(&ctx, lang, AppError::Storage(e))),
    }
}

// ─── Tax rates ───────────────────────────────────────────────────────────────

pub async fn list_tax_rates(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> ApiResult<Value> {
    let lang = lang_of(&headers);
    let rates = ctx
        .storage
        .list_tax_rates()
        .await
        .map_err(|e| reject(&ctx, lang, AppError::Storage(e)))?;
    Ok(Json(json!({ "taxRates": rates })))
}

pub async fn create_tax_rate(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(draft): Json<TaxRateDraft>,
) -> ApiResult<TaxRate> {
    let lang = lang_of(&headers);
    draft.validate().map_err(|e| reject(&ctx, lang, e))?;
    let rate = ctx
        .storage
        .create_tax_rate(&draft)
        .await
        .map_err(|e| reject(&ctx, lang, AppError::Storage(e)))?;
    Ok(Json(rate))
}

pub async fn delete_tax_rate(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let lang = lang_of(&headers);
    match ctx.storage.delete_tax_rate(&id).await {
        Ok(true) => Ok(Json(json!({ "deleted": true }))),
        Ok(false) => Err(reject(&ctx, lang, AppError::NotFound("tax rate"))),
        Err(e) => Err(reject(&ctx, lang, AppError::Storage(e))),
    }
}
