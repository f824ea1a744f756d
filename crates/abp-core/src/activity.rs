//! Logged interactions with contacts and mandates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;
use crate::id::{ActivityId, UserId};
use crate::owner::ActivitySubject;

/// Kind of a logged interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Call,
    Meeting,
    Email,
    Note,
}

/// Logged interaction attached to a contact or mandate. Documents may hang
/// off an activity; permissions then follow the activity's subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub subject: ActivitySubject,
    pub kind: ActivityKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub creator: UserId,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl Activity {
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.title.trim().is_empty() {
            errors.add("title", "blank", "must be present");
        }
        if let Some(ended_at) = self.ended_at {
            if ended_at < self.started_at {
                errors.add("ended_at", "before_started_at", "must be on or after started_at");
            }
        }
        errors
    }
}
