pub mod seed;

use anyhow::{Context as _, Result};
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::{path::Path, str::FromStr};

use crate::domain::{
    self, Budget, BudgetDraft, Client, ClientDraft, Consultant, ConsultantDraft, Expense,
    ExpenseDraft, Invoice, InvoiceDraft, Project, ProjectDraft, TaxRate, TaxRateDraft,
};
use crate::domain::finance::apply_tax;

/// Default timeout for individual SQLite queries.
/// Prevents hung queries from blocking the service indefinitely.
const QUERY_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Execute a future with the standard query timeout.
async fn with_timeout<T>(fut: impl std::future::Future<Output = Result<T>>) -> Result<T> {
    match tokio::time::timeout(QUERY_TIMEOUT, fut).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "database query timed out after {}s",
            QUERY_TIMEOUT.as_secs()
        )),
    }
}

#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    /// Open (or create) the database at `{data_dir}/advisord.db`.
    pub async fn open(data_dir: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;
        let db_path = data_dir.join("advisord.db");
        let opts =
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display()))?
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .create_if_missing(true);

        let pool = SqlitePool::connect_with(opts).await?;
        Self::bootstrap(&pool).await?;
        Ok(Self { pool })
    }

    /// Return a clone of the connection pool (cheap — Arc-backed).
    /// The reports module runs its aggregation queries on the same pool.
    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    /// Create every table. `CREATE TABLE IF NOT EXISTS` keeps this
    /// idempotent across restarts.
    async fn bootstrap(pool: &SqlitePool) -> Result<()> {
        let create_stmts = [
            "CREATE TABLE IF NOT EXISTS clients (
                id            TEXT PRIMARY KEY,
                name          TEXT NOT NULL,
                industry      TEXT NOT NULL,
                contact_name  TEXT NOT NULL,
                contact_email TEXT NOT NULL,
                country       TEXT NOT NULL,
                status        TEXT NOT NULL,
                created_at    TEXT NOT NULL,
                updated_at    TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS consultants (
                id             TEXT PRIMARY KEY,
                name           TEXT NOT NULL,
                email          TEXT NOT NULL,
                specialty      TEXT NOT NULL,
                seniority      TEXT NOT NULL,
                daily_rate_usd REAL NOT NULL,
                availability   TEXT NOT NULL,
                created_at     TEXT NOT NULL,
                updated_at     TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS projects (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                client_id   TEXT NOT NULL,
                client_name TEXT NOT NULL,
                status      TEXT NOT NULL,
                start_date  TEXT NOT NULL,
                end_date    TEXT,
                budget_usd  REAL NOT NULL,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS expenses (
                id           TEXT PRIMARY KEY,
                project_id   TEXT NOT NULL,
                project_name TEXT NOT NULL,
                category     TEXT NOT NULL,
                description  TEXT NOT NULL,
                amount_usd   REAL NOT NULL,
                incurred_on  TEXT NOT NULL,
                billable     INTEGER NOT NULL,
                created_at   TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS budgets (
                id            TEXT PRIMARY KEY,
                project_id    TEXT NOT NULL,
                project_name  TEXT NOT NULL,
                category      TEXT NOT NULL,
                allocated_usd REAL NOT NULL,
                period        TEXT NOT NULL,
                created_at    TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS invoices (
                id               TEXT PRIMARY KEY,
                number           TEXT NOT NULL,
                project_id       TEXT NOT NULL,
                project_name     TEXT NOT NULL,
                client_name      TEXT NOT NULL,
                amount_usd       REAL NOT NULL,
                tax_rate_percent REAL NOT NULL,
                tax_usd          REAL NOT NULL,
                total_usd        REAL NOT NULL,
                status           TEXT NOT NULL,
                issued_on        TEXT NOT NULL,
                due_on           TEXT NOT NULL,
                paid_on          TEXT,
                created_at       TEXT NOT NULL,
                updated_at       TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS tax_rates (
                id           TEXT PRIMARY KEY,
                name         TEXT NOT NULL,
                country      TEXT NOT NULL,
                rate_percent REAL NOT NULL,
                active       INTEGER NOT NULL,
                created_at   TEXT NOT NULL
            )",
        ];
        for stmt in create_stmts {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .context("create table")?;
        }

        Ok(())
    }

    // ─── Clients ─────────────────────────────────────────────────────────────

    pub async fn create_client(&self, draft: &ClientDraft) -> Result<Client> {
        let now = domain::now_rfc3339();
        let client = Client {
            id: domain::new_id(),
            name: draft.name.trim().to_string(),
            industry: draft.industry.trim().to_string(),
            contact_name: draft.contact_name.trim().to_string(),
            contact_email: draft.contact_email.trim().to_string(),
            country: draft.country.trim().to_string(),
            status: draft.status(),
            created_at: now.clone(),
            updated_at: now,
        };
        sqlx::query(
            "INSERT INTO clients (id, name, industry, contact_name, contact_email, country, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&client.id)
        .bind(&client.name)
        .bind(&client.industry)
        .bind(&client.contact_name)
        .bind(&client.contact_email)
        .bind(&client.country)
        .bind(client.status)
        .bind(&client.created_at)
        .bind(&client.updated_at)
        .execute(&self.pool)
        .await
        .context("insert client")?;
        Ok(client)
    }

    pub async fn get_client(&self, id: &str) -> Result<Option<Client>> {
        Ok(sqlx::query_as("SELECT * FROM clients WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        with_timeout(async {
            Ok(
                sqlx::query_as("SELECT * FROM clients ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?,
            )
        })
        .await
    }

    /// Full replace. Returns the updated record, or `None` when `id`
    /// does not exist.
    pub async fn update_client(&self, id: &str, draft: &ClientDraft) -> Result<Option<Client>> {
        let now = domain::now_rfc3339();
        let result = sqlx::query(
            "UPDATE clients SET name = ?, industry = ?, contact_name = ?, contact_email = ?,
                    country = ?, status = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(draft.name.trim())
        .bind(draft.industry.trim())
        .bind(draft.contact_name.trim())
        .bind(draft.contact_email.trim())
        .bind(draft.country.trim())
        .bind(draft.status())
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("update client")?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_client(id).await
    }

    pub async fn delete_client(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ─── Consultants ─────────────────────────────────────────────────────────

    pub async fn create_consultant(&self, draft: &ConsultantDraft) -> Result<Consultant> {
        let now = domain::now_rfc3339();
        let consultant = Consultant {
            id: domain::new_id(),
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            specialty: draft.specialty.trim().to_string(),
            seniority: draft.seniority,
            daily_rate_usd: draft.daily_rate_usd,
            availability: draft.availability(),
            created_at: now.clone(),
            updated_at: now,
        };
        sqlx::query(
            "INSERT INTO consultants (id, name, email, specialty, seniority, daily_rate_usd, availability, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&consultant.id)
        .bind(&consultant.name)
        .bind(&consultant.email)
        .bind(&consultant.specialty)
        .bind(consultant.seniority)
        .bind(consultant.daily_rate_usd)
        .bind(consultant.availability)
        .bind(&consultant.created_at)
        .bind(&consultant.updated_at)
        .execute(&self.pool)
        .await
        .context("insert consultant")?;
        Ok(consultant)
    }

    pub async fn get_consultant(&self, id: &str) -> Result<Option<Consultant>> {
        Ok(sqlx::query_as("SELECT * FROM consultants WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn list_consultants(&self) -> Result<Vec<Consultant>> {
        with_timeout(async {
            Ok(
                sqlx::query_as("SELECT * FROM consultants ORDER BY name ASC")
                    .fetch_all(&self.pool)
                    .await?,
            )
        })
        .await
    }

    pub async fn update_consultant(
        &self,
        id: &str,
        draft: &ConsultantDraft,
    ) -> Result<Option<Consultant>> {
        let now = domain::now_rfc3339();
        let result = sqlx::query(
            "UPDATE consultants SET name = ?, email = ?, specialty = ?, seniority = ?,
                    daily_rate_usd = ?, availability = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(draft.name.trim())
        .bind(draft.email.trim())
        .bind(draft.specialty.trim())
        .bind(draft.seniority)
        .bind(draft.daily_rate_usd)
        .bind(draft.availability())
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("update consultant")?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_consultant(id).await
    }

    pub async fn delete_consultant(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM consultants WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ─── Projects ────────────────────────────────────────────────────────────

    /// `client_name` is the cached display copy resolved by the caller;
    /// empty when the referenced client does not exist (no referential
    /// integrity by design).
    pub async fn create_project(&self, draft: &ProjectDraft, client_name: &str) -> Result<Project> {
        let now = domain::now_rfc3339();
        let project = Project {
            id: domain::new_id(),
            name: draft.name.trim().to_string(),
            client_id: draft.client_id.clone(),
            client_name: client_name.to_string(),
            status: draft.status(),
            start_date: draft.start_date.clone(),
            end_date: draft.end_date.clone(),
            budget_usd: draft.budget_usd,
            created_at: now.clone(),
            updated_at: now,
        };
        sqlx::query(
            "INSERT INTO projects (id, name, client_id, client_name, status, start_date, end_date, budget_usd, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&project.id)
        .bind(&project.name)
        .bind(&project.client_id)
        .bind(&project.client_name)
        .bind(project.status)
        .bind(&project.start_date)
        .bind(&project.end_date)
        .bind(project.budget_usd)
        .bind(&project.created_at)
        .bind(&project.updated_at)
        .execute(&self.pool)
        .await
        .context("insert project")?;
        Ok(project)
    }

    pub async fn get_project(&self, id: &str) -> Result<Option<Project>> {
        Ok(sqlx::query_as("SELECT * FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        with_timeout(async {
            Ok(
                sqlx::query_as("SELECT * FROM projects ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?,
            )
        })
        .await
    }

    pub async fn update_project(
        &self,
        id: &str,
        draft: &ProjectDraft,
        client_name: &str,
    ) -> Result<Option<Project>> {
        let now = domain::now_rfc3339();
        let result = sqlx::query(
            "UPDATE projects SET name = ?, client_id = ?, client_name = ?, status = ?,
                    start_date = ?, end_date = ?, budget_usd = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(draft.name.trim())
        .bind(&draft.client_id)
        .bind(client_name)
        .bind(draft.status())
        .bind(&draft.start_date)
        .bind(&draft.end_date)
        .bind(draft.budget_usd)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("update project")?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_project(id).await
    }

    pub async fn delete_project(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ─── Expenses ────────────────────────────────────────────────────────────

    pub async fn create_expense(&self, draft: &ExpenseDraft, project_name: &str) -> Result<Expense> {
        let expense = Expense {
            id: domain::new_id(),
            project_id: draft.project_id.clone(),
            project_name: project_name.to_string(),
            category: draft.category,
            description: draft.description.trim().to_string(),
            amount_usd: draft.amount_usd,
            incurred_on: draft.incurred_on.clone(),
            billable: draft.billable(),
            created_at: domain::now_rfc3339(),
        };
        sqlx::query(
            "INSERT INTO expenses (id, project_id, project_name, category, description, amount_usd, incurred_on, billable, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&expense.id)
        .bind(&expense.project_id)
        .bind(&expense.project_name)
        .bind(expense.category)
        .bind(&expense.description)
        .bind(expense.amount_usd)
        .bind(&expense.incurred_on)
        .bind(expense.billable)
        .bind(&expense.created_at)
        .execute(&self.pool)
        .await
        .context("insert expense")?;
        Ok(expense)
    }

    pub async fn get_expense(&self, id: &str) -> Result<Option<Expense>> {
        Ok(sqlx::query_as("SELECT * FROM expenses WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn list_expenses(&self) -> Result<Vec<Expense>> {
        with_timeout(async {
            Ok(
                sqlx::query_as("SELECT * FROM expenses ORDER BY incurred_on DESC")
                    .fetch_all(&self.pool)
                    .await?,
            )
        })
        .await
    }

    pub async fn delete_expense(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ─── Budgets ─────────────────────────────────────────────────────────────

    pub async fn create_budget(&self, draft: &BudgetDraft, project_name: &str) -> Result<Budget> {
        let budget = Budget {
            id: domain::new_id(),
            project_id: draft.project_id.clone(),
            project_name: project_name.to_string(),
            category: draft.category,
            allocated_usd: draft.allocated_usd,
            period: draft.period.trim().to_string(),
            created_at: domain::now_rfc3339(),
        };
        sqlx::query(
            "INSERT INTO budgets (id, project_id, project_name, category, allocated_usd, period, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&budget.id)
        .bind(&budget.project_id)
        .bind(&budget.project_name)
        .bind(budget.category)
        .bind(budget.allocated_usd)
        .bind(&budget.period)
        .bind(&budget.created_at)
        .execute(&self.pool)
        .await
        .context("insert budget")?;
        Ok(budget)
    }

    pub async fn list_budgets(&self) -> Result<Vec<Budget>> {
        with_timeout(async {
            Ok(
                sqlx::query_as("SELECT * FROM budgets ORDER BY period DESC, created_at DESC")
                    .fetch_all(&self.pool)
                    .await?,
            )
        })
        .await
    }

    pub async fn delete_budget(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM budgets WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ─── Invoices ────────────────────────────────────────────────────────────

    /// Tax math happens here, once: `rate_percent` is the resolved
    /// percentage from the referenced tax-rate record (0 when none).
    pub async fn create_invoice(
        &self,
        draft: &InvoiceDraft,
        project_name: &str,
        client_name: &str,
        rate_percent: f64,
    ) -> Result<Invoice> {
        let (tax_usd, total_usd) = apply_tax(draft.amount_usd, rate_percent);
        let now = domain::now_rfc3339();
        let invoice = Invoice {
            id: domain::new_id(),
            number: draft.number.trim().to_string(),
            project_id: draft.project_id.clone(),
            project_name: project_name.to_string(),
            client_name: client_name.to_string(),
            amount_usd: draft.amount_usd,
            tax_rate_percent: rate_percent,
            tax_usd,
            total_usd,
            status: draft.status(),
            issued_on: draft.issued_on.clone(),
            due_on: draft.due_on.clone(),
            paid_on: draft.paid_on.clone(),
            created_at: now.clone(),
            updated_at: now,
        };
        sqlx::query(
            "INSERT INTO invoices (id, number, project_id, project_name, client_name, amount_usd,
                                   tax_rate_percent, tax_usd, total_usd, status, issued_on, due_on,
                                   paid_on, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&invoice.id)
        .bind(&invoice.number)
        .bind(&invoice.project_id)
        .bind(&invoice.project_name)
        .bind(&invoice.client_name)
        .bind(invoice.amount_usd)
        .bind(invoice.tax_rate_percent)
        .bind(invoice.tax_usd)
        .bind(invoice.total_usd)
        .bind(invoice.status)
        .bind(&invoice.issued_on)
        .bind(&invoice.due_on)
        .bind(&invoice.paid_on)
        .bind(&invoice.created_at)
        .bind(&invoice.updated_at)
        .execute(&self.pool)
        .await
        .context("insert invoice")?;
        Ok(invoice)
    }

    pub async fn get_invoice(&self, id: &str) -> Result<Option<Invoice>> {
        Ok(sqlx::query_as("SELECT * FROM invoices WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn list_invoices(&self) -> Result<Vec<Invoice>> {
        with_timeout(async {
            Ok(
                sqlx::query_as("SELECT * FROM invoices ORDER BY issued_on DESC")
                    .fetch_all(&self.pool)
                    .await?,
            )
        })
        .await
    }

    pub async fn update_invoice(
        &self,
        id: &str,
        draft: &InvoiceDraft,
        project_name: &str,
        client_name: &str,
        rate_percent: f64,
    ) -> Result<Option<Invoice>> {
        let (tax_usd, total_usd) = apply_tax(draft.amount_usd, rate_percent);
        let now = domain::now_rfc3339();
        let result = sqlx::query(
            "UPDATE invoices SET number = ?, project_id = ?, project_name = ?, client_name = ?,
                    amount_usd = ?, tax_rate_percent = ?, tax_usd = ?, total_usd = ?, status = ?,
                    issued_on = ?, due_on = ?, paid_on = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(draft.number.trim())
        .bind(&draft.project_id)
        .bind(project_name)
        .bind(client_name)
        .bind(draft.amount_usd)
        .bind(rate_percent)
        .bind(tax_usd)
        .bind(total_usd)
        .bind(draft.status())
        .bind(&draft.issued_on)
        .bind(&draft.due_on)
        .bind(&draft.paid_on)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("update invoice")?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_invoice(id).await
    }

    pub async fn delete_invoice(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ─── Tax rates ───────────────────────────────────────────────────────────

    pub async fn create_tax_rate(&self, draft: &TaxRateDraft) -> Result<TaxRate> {
        let rate = TaxRate {
            id: domain::new_id(),
            name: draft.name.trim().to_string(),
            country: draft.country.trim().to_string(),
            rate_percent: draft.rate_percent,
            active: draft.active(),
            created_at: domain::now_rfc3339(),
        };
        sqlx::query(
            "INSERT INTO tax_rates (id, name, country, rate_percent, active, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&rate.id)
        .bind(&rate.name)
        .bind(&rate.country)
        .bind(rate.rate_percent)
        .bind(rate.active)
        .bind(&rate.created_at)
        .execute(&self.pool)
        .await
        .context("insert tax rate")?;
        Ok(rate)
    }

    pub async fn get_tax_rate(&self, id: &str) -> Result<Option<TaxRate>> {
        Ok(sqlx::query_as("SELECT * FROM tax_rates WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn list_tax_rates(&self) -> Result<Vec<TaxRate>> {
        with_timeout(async {
            Ok(
                sqlx::query_as("SELECT * FROM tax_rates ORDER BY country ASC, name ASC")
                    .fetch_all(&self.pool)
                    .await?,
            )
        })
        .await
    }

    pub async fn delete_tax_rate(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tax_rates WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientStatus, ExpenseCategory, InvoiceStatus};

    async fn storage() -> Storage {
        let dir = tempfile::tempdir().unwrap().keep();
        Storage::open(&dir).await.unwrap()
    }

    fn client_draft() -> ClientDraft {
        ClientDraft {
            name: "Meridian Retail Group".into(),
            industry: "Retail".into(),
            contact_name: "Dana Whitfield".into(),
            contact_email: "dana@meridian.example".into(),
            country: "Germany".into(),
            status: Some(ClientStatus::Active),
        }
    }

    #[tokio::test]
    async fn client_crud_round_trip() {
        let s = storage().await;
        let created = s.create_client(&client_draft()).await.unwrap();

        let fetched = s.get_client(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Meridian Retail Group");
        assert_eq!(fetched.status, ClientStatus::Active);

        let mut draft = client_draft();
        draft.status = Some(ClientStatus::Archived);
        let updated = s.update_client(&created.id, &draft).await.unwrap().unwrap();
        assert_eq!(updated.status, ClientStatus::Archived);
        assert!(updated.updated_at >= created.updated_at);

        assert!(s.delete_client(&created.id).await.unwrap());
        assert!(s.get_client(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_of_missing_client_returns_none() {
        let s = storage().await;
        let result = s.update_client("no-such-id", &client_draft()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn invoice_caches_tax_math_at_write_time() {
        let s = storage().await;
        let draft = InvoiceDraft {
            number: "INV-2026-0001".into(),
            project_id: "p-1".into(),
            amount_usd: 1000.0,
            tax_rate_id: None,
            status: Some(InvoiceStatus::Sent),
            issued_on: "2026-07-01".into(),
            due_on: "2026-07-31".into(),
            paid_on: None,
        };
        let inv = s
            .create_invoice(&draft, "Rollout", "Meridian", 19.0)
            .await
            .unwrap();
        assert_eq!(inv.tax_usd, 190.0);
        assert_eq!(inv.total_usd, 1190.0);

        let fetched = s.get_invoice(&inv.id).await.unwrap().unwrap();
        assert_eq!(fetched.tax_rate_percent, 19.0);
        assert_eq!(fetched.status, InvoiceStatus::Sent);
    }

    #[tokio::test]
    async fn expense_keeps_cached_project_name() {
        let s = storage().await;
        let draft = ExpenseDraft {
            project_id: "p-1".into(),
            category: ExpenseCategory::Travel,
            description: "Flights".into(),
            amount_usd: 420.0,
            incurred_on: "2026-06-12".into(),
            billable: None,
        };
        let exp = s.create_expense(&draft, "Rollout").await.unwrap();
        assert_eq!(exp.project_name, "Rollout");
        assert!(exp.billable);

        let all = s.list_expenses().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].category, ExpenseCategory::Travel);
    }

    #[tokio::test]
    async fn deleting_a_client_leaves_its_projects_alone() {
        // No referential integrity by design — the cached name survives.
        let s = storage().await;
        let client = s.create_client(&client_draft()).await.unwrap();
        let project = s
            .create_project(
                &crate::domain::ProjectDraft {
                    name: "Rollout".into(),
                    client_id: client.id.clone(),
                    status: None,
                    start_date: "2026-05-01".into(),
                    end_date: None,
                    budget_usd: 100.0,
                },
                &client.name,
            )
            .await
            .unwrap();

        assert!(s.delete_client(&client.id).await.unwrap());
        let still_there = s.get_project(&project.id).await.unwrap().unwrap();
        assert_eq!(still_there.client_name, "Meridian Retail Group");
    }
}
