// SPDX-License-Identifier: MIT
//! Application-level error taxonomy.
//!
//! One variant per boundary failure: caller-side validation, missing
//! records, the hosted-model call failing, the model reply failing its
//! declared schema, and storage faults. The REST layer maps each variant
//! to a status code and a localized payload; nothing here depends on HTTP.

use crate::ai::FlowError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A form payload failed validation before any side effect ran.
    /// The string carries every violation, semicolon-separated.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The requested record id does not exist. Carries the entity noun
    /// used in the error payload ("client", "invoice", …).
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The outbound call to the hosted model failed (connect, timeout,
    /// or non-success HTTP status).
    #[error("external service call failed: {0}")]
    ServiceCall(String),

    /// The model replied, but the reply did not satisfy the declared
    /// output schema even after the bounded re-request.
    #[error("model response did not match the declared schema: {0}")]
    SchemaMismatch(String),

    /// Database failure. Wraps the full sqlx/anyhow context chain.
    #[error("storage failure")]
    Storage(#[source] anyhow::Error),
}

impl AppError {
    /// Stable message key for the localized headline of this error.
    pub fn message_key(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "error.validation",
            AppError::NotFound(_) => "error.not_found",
            AppError::ServiceCall(_) => "error.service_call",
            AppError::SchemaMismatch(_) => "error.schema_mismatch",
            AppError::Storage(_) => "error.storage",
        }
    }
}

impl From<FlowError> for AppError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::InvalidInput(detail) => AppError::Validation(detail),
            FlowError::Service(e) => AppError::ServiceCall(e.to_string()),
            FlowError::SchemaMismatch { detail, .. } => AppError::SchemaMismatch(detail),
            FlowError::Template(e) => AppError::ServiceCall(format!("prompt render failed: {e}")),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Storage(err)
    }
}
