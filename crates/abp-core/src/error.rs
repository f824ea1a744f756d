//! Shared error kinds for the platform core.
//!
//! Four outcomes are distinguished end to end (and must never collapse into
//! each other): per-field validation failures, opaque authorization denials,
//! missing records, and the read-only retention lock on documents.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single collected validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Attribute the failure is reported on (e.g. `valid_to`).
    pub field: String,
    /// Stable machine-readable code (e.g. `invalid_transition`).
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// Per-field validation failures collected across one mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record a failure on `field`.
    pub fn add(&mut self, field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        });
    }

    /// Absorb all failures from another collection.
    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// `Ok(())` when no failures were collected, otherwise `Err(Validation)`.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] carrying every collected failure.
    pub fn into_result(self) -> Result<(), Error> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{} {}", error.field, error.code)?;
            first = false;
        }
        Ok(())
    }
}

/// Core error surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// One or more per-field validation failures.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// Authorization denial. Deliberately opaque: never names the rule that
    /// failed.
    #[error("forbidden")]
    Forbidden,

    /// Record lookup failed.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Record is past its retention lock and refuses mutation.
    #[error("{kind} is read-only: {id}")]
    ReadOnly { kind: &'static str, id: String },

    /// Uniqueness or referential conflict detected at commit.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl Error {
    /// Shorthand for a single-field validation error.
    #[must_use]
    pub fn validation(field: &str, code: &str, message: &str) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, code, message);
        Self::Validation(errors)
    }

    #[must_use]
    pub fn not_found(kind: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    #[must_use]
    pub fn read_only(kind: &'static str, id: impl fmt::Display) -> Self {
        Self::ReadOnly {
            kind,
            id: id.to_string(),
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Validate that a date range is well-ordered (`valid_to >= valid_from`).
///
/// Either bound may be open; only a closed, inverted range fails.
pub fn check_date_range(
    errors: &mut ValidationErrors,
    field: &str,
    valid_from: Option<chrono::NaiveDate>,
    valid_to: Option<chrono::NaiveDate>,
) {
    if let (Some(from), Some(to)) = (valid_from, valid_to) {
        if to < from {
            errors.add(field, "before_valid_from", "must be on or after valid_from");
        }
    }
}
