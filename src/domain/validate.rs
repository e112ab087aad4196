// SPDX-License-Identifier: MIT
//! Form-level validation helpers.
//!
//! Every draft payload runs through a [`Violations`] collector before any
//! storage write: required strings non-empty, length caps, numeric ranges,
//! `YYYY-MM-DD` dates, email shape. All violations are reported in one
//! pass rather than failing on the first.

use std::sync::OnceLock;

use crate::error::AppError;

static RE_EMAIL: OnceLock<regex::Regex> = OnceLock::new();

fn re_email() -> &'static regex::Regex {
    RE_EMAIL.get_or_init(|| {
        regex::Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex")
    })
}

/// Accumulates human-readable violations for one payload.
#[derive(Debug, Default)]
pub struct Violations {
    list: Vec<String>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, msg: impl Into<String>) {
        self.list.push(msg.into());
    }

    /// Required string: non-empty after trimming, at most `max` chars.
    pub fn text(&mut self, field: &str, value: &str, max: usize) {
        if value.trim().is_empty() {
            self.list.push(format!("{field} is required"));
        } else if value.chars().count() > max {
            self.list.push(format!("{field} exceeds {max} characters"));
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.list.push(format!("{field} is required"));
        } else if !re_email().is_match(value.trim()) {
            self.list.push(format!("{field} is not a valid email address"));
        }
    }

    /// Calendar date in `YYYY-MM-DD`.
    pub fn date(&mut self, field: &str, value: &str) {
        if chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
            self.list.push(format!("{field} must be a YYYY-MM-DD date"));
        }
    }

    pub fn date_opt(&mut self, field: &str, value: Option<&str>) {
        if let Some(v) = value {
            self.date(field, v);
        }
    }

    pub fn non_negative(&mut self, field: &str, value: f64) {
        if !value.is_finite() || value < 0.0 {
            self.list.push(format!("{field} must be a non-negative amount"));
        }
    }

    pub fn percent(&mut self, field: &str, value: f64) {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            self.list.push(format!("{field} must be between 0 and 100"));
        }
    }

    /// Consume the collector: `Ok(())` when clean, otherwise a single
    /// `Validation` error joining every violation.
    pub fn finish(self) -> Result<(), AppError> {
        if self.list.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.list.join("; ")))
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
