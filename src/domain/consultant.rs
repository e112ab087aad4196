//! Consultant records — staff who get assigned to projects.

use serde::{Deserialize, Serialize};

use super::validate::Violations;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Seniority {
    Junior,
    Mid,
    Senior,
    Principal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Assigned,
    OnLeave,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Consultant {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Practice area shown on staffing pages, e.g. "Cloud Migration".
    pub specialty: String,
    pub seniority: Seniority,
    pub daily_rate_usd: f64,
    pub availability: Availability,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultantDraft {
    pub name: String,
    pub email: String,
    pub specialty: String,
    pub seniority: Seniority,
    pub daily_rate_usd: f64,
    /// Defaults to `available` when omitted.
    pub availability: Option<Availability>,
}

impl ConsultantDraft {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut v = Violations::new();
        v.text("name", &self.name, 120);
        v.email("email", &self.email);
        v.text("specialty", &self.specialty, 80);
        v.non_negative("dailyRateUsd", self.daily_rate_usd);
        v.finish()
    }

    pub fn availability(&self) -> Availability {
        self.availability.unwrap_or(Availability::Available)
    }
}
