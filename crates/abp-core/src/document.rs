//! Documents with a polymorphic owner and a retention lock.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ValidationErrors, check_date_range};
use crate::id::DocumentId;
use crate::owner::DocumentOwner;

/// Grace period during which a freshly uploaded document may still be
/// corrected or removed. Past it the record is immutable.
pub const RETENTION_LOCK_HOURS: i64 = 24;

/// Business category of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    Contract,
    FundSubscriptionAgreement,
    Report,
    Invoice,
    KycDocument,
    Other,
}

/// Stored document. File contents live in external storage; this record
/// carries the metadata the policy core needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub owner: DocumentOwner,
    pub name: String,
    pub category: DocumentCategory,
    pub uploaded_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<chrono::NaiveDate>,
}

impl Document {
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "blank", "must be present");
        }
        check_date_range(&mut errors, "valid_to", self.valid_from, self.valid_to);
        errors
    }

    /// Whether the retention lock has engaged. Locked documents reject both
    /// update and destroy.
    #[must_use]
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        now - self.uploaded_at >= Duration::hours(RETENTION_LOCK_HOURS)
    }
}
