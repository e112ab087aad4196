//! Client records — the firms this consultancy bills.

use serde::{Deserialize, Serialize};

use super::validate::Violations;
use crate::error::AppError;

/// Engagement status of a client account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ClientStatus {
    Active,
    Prospect,
    Archived,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub industry: String,
    pub contact_name: String,
    pub contact_email: String,
    pub country: String,
    pub status: ClientStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Form payload for creating or replacing a client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDraft {
    pub name: String,
    pub industry: String,
    pub contact_name: String,
    pub contact_email: String,
    pub country: String,
    /// Defaults to `prospect` when omitted.
    pub status: Option<ClientStatus>,
}

impl ClientDraft {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut v = Violations::new();
        v.text("name", &self.name, 120);
        v.text("industry", &self.industry, 80);
        v.text("contactName", &self.contact_name, 120);
        v.email("contactEmail", &self.contact_email);
        v.text("country", &self.country, 56);
        v.finish()
    }

    pub fn status(&self) -> ClientStatus {
        self.status.unwrap_or(ClientStatus::Prospect)
    }
}
