//! Project records.
//!
//! `client_name` is a cached display copy of the client record's name,
//! captured when the project is created or updated. There is no foreign
//! key back to the client — archiving or deleting the client leaves the
//! project untouched.

use serde::{Deserialize, Serialize};

use super::validate::Violations;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ProjectStatus {
    Draft,
    Active,
    OnHold,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub client_id: String,
    /// Cached display field — the client's name at write time.
    pub client_name: String,
    pub status: ProjectStatus,
    /// `YYYY-MM-DD`.
    pub start_date: String,
    pub end_date: Option<String>,
    pub budget_usd: f64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub name: String,
    pub client_id: String,
    pub status: Option<ProjectStatus>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub budget_usd: f64,
}

impl ProjectDraft {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut v = Violations::new();
        v.text("name", &self.name, 160);
        v.text("clientId", &self.client_id, 64);
        v.date("startDate", &self.start_date);
        v.date_opt("endDate", self.end_date.as_deref());
        v.non_negative("budgetUsd", self.budget_usd);
        if let Some(end) = &self.end_date {
            // String compare is date order for well-formed YYYY-MM-DD.
            if end < &self.start_date {
                v.push("endDate is before startDate");
            }
        }
        v.finish()
    }

    pub fn status(&self) -> ProjectStatus {
        self.status.unwrap_or(ProjectStatus::Draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProjectDraft {
        ProjectDraft {
            name: "Warehouse Automation Rollout".into(),
            client_id: "c-1".into(),
            status: None,
            start_date: "2026-05-01".into(),
            end_date: Some("2026-11-30".into()),
            budget_usd: 250_000.0,
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut d = draft();
        d.end_date = Some("2026-04-01".into());
        let msg = d.validate().unwrap_err().to_string();
        assert!(msg.contains("endDate"), "{msg}");
    }

    #[test]
    fn open_ended_project_is_fine() {
        let mut d = draft();
        d.end_date = None;
        assert!(d.validate().is_ok());
    }
}
