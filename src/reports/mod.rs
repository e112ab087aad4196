// SPDX-License-Identifier: MIT
//! Report aggregation — the budget/tax/revenue arithmetic behind the
//! dashboard pages: filtering, summation, percentages.
//!
//! Reads run against the live tables on the shared pool. All percentage
//! math goes through [`percent_of`], which yields 0 (never NaN) on a zero
//! denominator. Draft invoices are excluded everywhere: they are not yet
//! receivables.

use anyhow::{Context as _, Result};
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashMap;

// ─── Models ──────────────────────────────────────────────────────────────────

/// A (month, amount) pair used in time-series data. Month is `"YYYY-MM"`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    pub month: String,
    pub invoiced_usd: f64,
}

/// Top-level receivables summary returned by `reports/revenue`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSummary {
    /// Sum of invoice totals (tax included) with status sent/paid/overdue.
    pub total_invoiced_usd: f64,
    pub total_paid_usd: f64,
    pub total_outstanding_usd: f64,
    /// Paid share of invoiced, 0–100.
    pub collected_percent: f64,
    pub monthly: Vec<MonthlyRevenue>,
}

/// One budget line with its spend to date.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUtilization {
    pub project_id: String,
    pub project_name: String,
    pub category: String,
    pub period: String,
    pub allocated_usd: f64,
    /// Every recorded expense for the project and category, billable or not.
    pub spent_usd: f64,
    pub utilization_percent: f64,
    pub over_budget: bool,
}

/// Per-category expense share returned by `reports/expenses`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseBreakdown {
    pub category: String,
    pub total_usd: f64,
    /// Share of all recorded expenses, 0–100.
    pub share_percent: f64,
}

/// Collected tax grouped by the percentage cached on each invoice.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBucket {
    pub rate_percent: f64,
    /// Net (pre-tax) amount invoiced at this rate.
    pub base_usd: f64,
    pub tax_usd: f64,
}

// ─── Math helpers ────────────────────────────────────────────────────────────

/// `part / whole` as a percentage rounded to 2 decimals; 0 when `whole`
/// is zero or negative.
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        0.0
    } else {
        round2(part / whole * 100.0)
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

// ─── Query layer ─────────────────────────────────────────────────────────────

/// Report query layer. Cheap to construct per request — the pool clone is
/// Arc-backed.
pub struct Reports {
    pool: SqlitePool,
}

impl Reports {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn revenue_summary(&self) -> Result<RevenueSummary> {
        let total_invoiced: f64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_usd), 0.0) FROM invoices WHERE status != 'draft'",
        )
        .fetch_one(&self.pool)
        .await
        .context("total invoiced")?;

        let total_paid: f64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_usd), 0.0) FROM invoices WHERE status = 'paid'",
        )
        .fetch_one(&self.pool)
        .await
        .context("total paid")?;

        let rows: Vec<(String, f64)> = sqlx::query_as(
            "SELECT substr(issued_on, 1, 7) AS month, SUM(total_usd) AS amount
               FROM invoices
              WHERE status != 'draft'
           GROUP BY month
           ORDER BY month ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("monthly invoiced")?;

        let monthly = rows
            .into_iter()
            .map(|(month, amount)| MonthlyRevenue {
                month,
                invoiced_usd: round2(amount),
            })
            .collect();

        Ok(RevenueSummary {
            total_invoiced_usd: round2(total_invoiced),
            total_paid_usd: round2(total_paid),
            total_outstanding_usd: round2(total_invoiced - total_paid),
            collected_percent: percent_of(total_paid, total_invoiced),
            monthly,
        })
    }

    pub async fn budget_utilization(&self) -> Result<Vec<BudgetUtilization>> {
        let budgets: Vec<(String, String, String, String, f64)> = sqlx::query_as(
            "SELECT project_id, project_name, category, period, allocated_usd
               FROM budgets
           ORDER BY period DESC, project_name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("budget lines")?;

        let spent_rows: Vec<(String, String, f64)> = sqlx::query_as(
            "SELECT project_id, category, COALESCE(SUM(amount_usd), 0.0) AS spent
               FROM expenses
           GROUP BY project_id, category",
        )
        .fetch_all(&self.pool)
        .await
        .context("expense sums per project/category")?;

        let mut spent: HashMap<(String, String), f64> = HashMap::new();
        for (project_id, category, amount) in spent_rows {
            spent.insert((project_id, category), amount);
        }

        let result = budgets
            .into_iter()
            .map(|(project_id, project_name, category, period, allocated_usd)| {
                let spent_usd = spent
                    .get(&(project_id.clone(), category.clone()))
                    .copied()
                    .unwrap_or(0.0);
                BudgetUtilization {
                    utilization_percent: percent_of(spent_usd, allocated_usd),
                    over_budget: spent_usd > allocated_usd,
                    project_id,
                    project_name,
                    category,
                    period,
                    allocated_usd,
                    spent_usd: round2(spent_usd),
                }
            })
            .collect();
        Ok(result)
    }

    pub async fn expense_breakdown(&self) -> Result<Vec<ExpenseBreakdown>> {
        let rows: Vec<(String, f64)> = sqlx::query_as(
            "SELECT category, COALESCE(SUM(amount_usd), 0.0) AS total
               FROM expenses
           GROUP BY category
           ORDER BY total DESC",
        )
        .fetch_all(&self.pool)
        .await
        .context("expense totals per category")?;

        let grand_total: f64 = rows.iter().map(|(_, t)| t).sum();
        Ok(rows
            .into_iter()
            .map(|(category, total_usd)| ExpenseBreakdown {
                share_percent: percent_of(total_usd, grand_total),
                category,
                total_usd: round2(total_usd),
            })
            .collect())
    }

    pub async fn tax_summary(&self) -> Result<Vec<TaxBucket>> {
        let rows: Vec<(f64, f64, f64)> = sqlx::query_as(
            "SELECT tax_rate_percent, SUM(amount_usd) AS base, SUM(tax_usd) AS tax
               FROM invoices
              WHERE status != 'draft'
           GROUP BY tax_rate_percent
           ORDER BY tax_rate_percent ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("tax buckets")?;

        Ok(rows
            .into_iter()
            .map(|(rate_percent, base, tax)| TaxBucket {
                rate_percent,
                base_usd: round2(base),
                tax_usd: round2(tax),
            })
            .collect())
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
