//! Curated contact lists.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;
use crate::id::{ContactId, ListId};
use crate::lifecycle::ListState;

/// Curated set of contacts (mailing lists, event invitations).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    pub name: String,
    pub state: ListState,
    #[serde(default)]
    pub contacts: BTreeSet<ContactId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl List {
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "blank", "must be present");
        }
        errors
    }
}
