// SPDX-License-Identifier: MIT
//! Finance records: expenses, budgets, invoices, tax rates.
//!
//! Invoices cache the resolved tax percentage and the client/project names
//! at write time. Tax math happens once, at the write boundary — reports
//! only aggregate stored figures.

use serde::{Deserialize, Serialize};

use super::validate::Violations;
use crate::error::AppError;

/// Spend category shared by expenses and budget lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Travel,
    Software,
    Subcontracting,
    Office,
    Other,
}

// ─── Expense ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub project_id: String,
    /// Cached display field — the project's name at write time.
    pub project_name: String,
    pub category: ExpenseCategory,
    pub description: String,
    pub amount_usd: f64,
    /// `YYYY-MM-DD`.
    pub incurred_on: String,
    pub billable: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub project_id: String,
    pub category: ExpenseCategory,
    pub description: String,
    pub amount_usd: f64,
    pub incurred_on: String,
    /// Defaults to billable.
    pub billable: Option<bool>,
}

impl ExpenseDraft {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut v = Violations::new();
        v.text("projectId", &self.project_id, 64);
        v.text("description", &self.description, 240);
        v.non_negative("amountUsd", self.amount_usd);
        v.date("incurredOn", &self.incurred_on);
        v.finish()
    }

    pub fn billable(&self) -> bool {
        self.billable.unwrap_or(true)
    }
}

// ─── Budget ──────────────────────────────────────────────────────────────────

/// An allocated spend ceiling for one project and category in one period.
/// Utilization is computed by the reports module from matching expenses.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub project_id: String,
    pub project_name: String,
    pub category: ExpenseCategory,
    pub allocated_usd: f64,
    /// Display label for the budgeting window, e.g. `"2026-Q3"`.
    pub period: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetDraft {
    pub project_id: String,
    pub category: ExpenseCategory,
    pub allocated_usd: f64,
    pub period: String,
}

impl BudgetDraft {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut v = Violations::new();
        v.text("projectId", &self.project_id, 64);
        v.non_negative("allocatedUsd", self.allocated_usd);
        v.text("period", &self.period, 16);
        v.finish()
    }
}

// ─── Invoice ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    /// Human-facing invoice number, e.g. `"INV-2026-0042"`.
    pub number: String,
    pub project_id: String,
    pub project_name: String,
    pub client_name: String,
    pub amount_usd: f64,
    /// Tax percentage resolved from the tax-rate record at write time.
    pub tax_rate_percent: f64,
    pub tax_usd: f64,
    pub total_usd: f64,
    pub status: InvoiceStatus,
    pub issued_on: String,
    pub due_on: String,
    pub paid_on: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    pub number: String,
    pub project_id: String,
    pub amount_usd: f64,
    /// References a tax-rate record; omitted means 0% tax.
    pub tax_rate_id: Option<String>,
    pub status: Option<InvoiceStatus>,
    pub issued_on: String,
    pub due_on: String,
    pub paid_on: Option<String>,
}

impl InvoiceDraft {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut v = Violations::new();
        v.text("number", &self.number, 40);
        v.text("projectId", &self.project_id, 64);
        v.non_negative("amountUsd", self.amount_usd);
        v.date("issuedOn", &self.issued_on);
        v.date("dueOn", &self.due_on);
        v.date_opt("paidOn", self.paid_on.as_deref());
        if self.due_on < self.issued_on {
            v.push("dueOn is before issuedOn");
        }
        if self.status() == InvoiceStatus::Paid && self.paid_on.is_none() {
            v.push("paidOn is required when status is paid");
        }
        v.finish()
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status.unwrap_or(InvoiceStatus::Draft)
    }
}

/// Round to whole cents. All stored USD figures go through this.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Compute `(tax, total)` for a net amount at a percentage rate.
pub fn apply_tax(amount_usd: f64, rate_percent: f64) -> (f64, f64) {
    let tax = round_cents(amount_usd * rate_percent / 100.0);
    (tax, round_cents(amount_usd + tax))
}

// ─── TaxRate ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaxRate {
    pub id: String,
    /// Display name, e.g. `"VAT (DE)"`.
    pub name: String,
    pub country: String,
    pub rate_percent: f64,
    pub active: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRateDraft {
    pub name: String,
    pub country: String,
    pub rate_percent: f64,
    pub active: Option<bool>,
}

impl TaxRateDraft {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut v = Violations::new();
        v.text("name", &self.name, 80);
        v.text("country", &self.country, 56);
        v.percent("ratePercent", self.rate_percent);
        v.finish()
    }

    pub fn active(&self) -> bool {
        self.active.unwrap_or(true)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
