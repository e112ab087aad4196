//! Entity types and form validation.
//!
//! Records are flat and carry cached display fields (a project stores its
//! client's name, an invoice stores the client name and resolved tax
//! percentage) — denormalized copies captured at write time, with no
//! referential integrity between tables. Wire naming is camelCase.

pub mod client;
pub mod consultant;
pub mod finance;
pub mod project;
pub mod validate;

pub use client::{Client, ClientDraft, ClientStatus};
pub use consultant::{Availability, Consultant, ConsultantDraft, Seniority};
pub use finance::{
    Budget, BudgetDraft, Expense, ExpenseCategory, ExpenseDraft, Invoice, InvoiceDraft,
    InvoiceStatus, TaxRate, TaxRateDraft,
};
pub use project::{Project, ProjectDraft, ProjectStatus};

/// Server-generated record id (UUID v4 string).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current instant as an RFC 3339 UTC string — the storage timestamp format.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
