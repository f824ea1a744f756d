//! Mandates, mandate members, and mandate groups.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationErrors, check_date_range};
use crate::id::{ContactId, MandateGroupId, MandateId, MandateMemberId};
use crate::lifecycle::MandateState;

/// Family or organization scoping bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MandateGroupKind {
    Family,
    Organization,
}

/// Named scoping bucket used to restrict role grants to a subset of
/// mandates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MandateGroup {
    pub id: MandateGroupId,
    pub name: String,
    pub kind: MandateGroupKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl MandateGroup {
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "blank", "must be present");
        }
        errors
    }
}

/// Membership role of a contact inside a mandate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Owner,
    Beneficiary,
}

/// Ownership edge between a mandate and a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MandateMember {
    pub id: MandateMemberId,
    pub mandate_id: MandateId,
    pub contact_id: ContactId,
    pub kind: MemberKind,
}

/// Client engagement aggregate.
///
/// Invariant: a mandate belongs to at least one organization-kind mandate
/// group. The store checks this against the group table on every save since
/// the kind lives on the group record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mandate {
    pub id: MandateId,
    pub title: String,
    pub state: MandateState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_consultant: Option<ContactId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_consultant: Option<ContactId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant: Option<ContactId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookkeeper: Option<ContactId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<NaiveDate>,
    /// Currently designated legal address, maintained by the store's
    /// designation swap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_address: Option<crate::id::AddressId>,
    /// Mandate groups this mandate is scoped under.
    #[serde(default)]
    pub groups: BTreeSet<MandateGroupId>,
}

impl Mandate {
    /// Field-level validation. The organization-group invariant needs the
    /// group table and lives in the store.
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.title.trim().is_empty() {
            errors.add("title", "blank", "must be present");
        }
        check_date_range(&mut errors, "valid_to", self.valid_from, self.valid_to);
        if self.groups.is_empty() {
            errors.add("groups", "blank", "must contain at least one mandate group");
        }
        errors
    }

    /// Guard for the `become_client` transition.
    #[must_use]
    pub const fn consultants_assigned(&self) -> bool {
        self.primary_consultant.is_some() && self.secondary_consultant.is_some()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn mandate() -> Mandate {
        Mandate {
            id: MandateId::generate(),
            title: "Family Office A".to_string(),
            state: MandateState::Prospect,
            category: None,
            primary_consultant: None,
            secondary_consultant: None,
            assistant: None,
            bookkeeper: None,
            valid_from: None,
            valid_to: None,
            legal_address: None,
            groups: BTreeSet::from([MandateGroupId::generate()]),
        }
    }

    #[test]
    fn mandate_without_groups_is_invalid() {
        let mut subject = mandate();
        subject.groups.clear();
        let errors = subject.validate();
        assert_eq!(errors.errors()[0].field, "groups");
    }

    #[test]
    fn inverted_validity_range_is_rejected() {
        let mut subject = mandate();
        subject.valid_from = NaiveDate::from_ymd_opt(2024, 6, 1);
        subject.valid_to = NaiveDate::from_ymd_opt(2024, 1, 1);
        let errors = subject.validate();
        assert_eq!(errors.errors()[0].field, "valid_to");
    }

    #[test]
    fn consultants_assigned_needs_both() {
        let mut subject = mandate();
        assert!(!subject.consultants_assigned());
        subject.primary_consultant = Some(ContactId::generate());
        assert!(!subject.consultants_assigned());
        subject.secondary_consultant = Some(ContactId::generate());
        assert!(subject.consultants_assigned());
    }
}
