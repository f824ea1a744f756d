//! Users and user groups.
//!
//! A user group is the grant unit of the permission model: a named role set
//! plus the mandate groups those roles are scoped to. Membership is
//! many-to-many; the group carries the member set.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;
use crate::id::{ContactId, MandateGroupId, UserGroupId, UserId};
use crate::policy::Role;

/// Authenticating platform user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    /// Optional link to the contact record representing this user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<ContactId>,
    #[serde(default)]
    pub deactivated: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if !self.email.contains('@') {
            errors.add("email", "invalid", "is not an email address");
        }
        errors
    }
}

/// Named role grant set scoped to a set of mandate groups.
///
/// A group with scoped-style roles but an empty `mandate_groups` set grants
/// those roles for no mandate at all; it is inert until mandate groups are
/// attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGroup {
    pub id: UserGroupId,
    pub name: String,
    #[serde(default)]
    pub roles: BTreeSet<Role>,
    #[serde(default)]
    pub mandate_groups: BTreeSet<MandateGroupId>,
    #[serde(default)]
    pub members: BTreeSet<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl UserGroup {
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "blank", "must be present");
        }
        errors
    }

    #[must_use]
    pub fn has_member(&self, user_id: UserId) -> bool {
        self.members.contains(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_email_must_look_like_one() {
        let user = User {
            id: UserId::generate(),
            email: "ops".to_string(),
            contact_id: None,
            deactivated: false,
            created_at: Utc::now(),
        };
        assert_eq!(user.validate().errors()[0].field, "email");
    }

    #[test]
    fn group_name_must_be_present() {
        let group = UserGroup {
            id: UserGroupId::generate(),
            name: "  ".to_string(),
            roles: BTreeSet::new(),
            mandate_groups: BTreeSet::new(),
            members: BTreeSet::new(),
            comment: None,
        };
        assert_eq!(group.validate().errors()[0].code, "blank");
    }
}
