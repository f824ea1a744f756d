//! Tasks and task comments.
//!
//! Task visibility is pure ownership: creator, assignees, and (for comments)
//! the author. Roles play no part; a foreign task is invisible even to
//! admins.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;
use crate::id::{TaskCommentId, TaskId, UserId};
use crate::lifecycle::TaskState;

/// Assignable work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub state: TaskState,
    pub creator: UserId,
    #[serde(default)]
    pub assignees: BTreeSet<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finisher: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Cross-field invariant: the finished state requires finisher and
    /// finished_at, and an unfinished task carries neither.
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.subject.trim().is_empty() {
            errors.add("subject", "blank", "must be present");
        }
        match self.state {
            TaskState::Finished => {
                if self.finisher.is_none() {
                    errors.add("finisher", "blank", "must be present for finished tasks");
                }
                if self.finished_at.is_none() {
                    errors.add("finished_at", "blank", "must be present for finished tasks");
                }
            }
            TaskState::Created => {
                if self.finisher.is_some() || self.finished_at.is_some() {
                    errors.add("state", "stale_finish_fields", "unfinished task carries finish fields");
                }
            }
        }
        errors
    }

    /// Users the task is visible to.
    #[must_use]
    pub fn participants(&self) -> BTreeSet<UserId> {
        let mut users = self.assignees.clone();
        users.insert(self.creator);
        users
    }
}

/// Comment on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskComment {
    pub id: TaskCommentId,
    pub task_id: TaskId,
    pub author: UserId,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl TaskComment {
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.comment.trim().is_empty() {
            errors.add("comment", "blank", "must be present");
        }
        errors
    }
}
