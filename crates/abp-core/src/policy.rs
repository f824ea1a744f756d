//! Role resolution and permission evaluation.
//!
//! The evaluator is deny-by-default: every (resource kind, action) pair maps
//! to exactly one scope requirement, and anything that does not resolve to an
//! explicit allow is denied. Denials carry a stable internal reason code for
//! logs and the simulation CLI, but callers only ever see the opaque
//! `forbidden` error; which rule failed is never leaked.
//!
//! Resolution is a pure function of the current group memberships and runs
//! once per request; nothing here caches across requests.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::id::{MandateGroupId, UserId};
use crate::user::UserGroup;

// ─────────────────────────────────────────────────────────────────────────────
// Roles and actions
// ─────────────────────────────────────────────────────────────────────────────

/// Permission-relevant action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Read,
    Write,
    Destroy,
    Export,
}

impl Action {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Destroy => "destroy",
            Self::Export => "export",
        }
    }
}

/// Role domain a scoped role family belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleDomain {
    Mandates,
    Contacts,
    Funds,
}

/// Named permission grant carried by a user group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    MandatesRead,
    MandatesWrite,
    MandatesDestroy,
    MandatesExport,
    ContactsRead,
    ContactsWrite,
    ContactsDestroy,
    ContactsExport,
    FundsRead,
    FundsWrite,
    FundsDestroy,
    FundsExport,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::MandatesRead => "mandates_read",
            Self::MandatesWrite => "mandates_write",
            Self::MandatesDestroy => "mandates_destroy",
            Self::MandatesExport => "mandates_export",
            Self::ContactsRead => "contacts_read",
            Self::ContactsWrite => "contacts_write",
            Self::ContactsDestroy => "contacts_destroy",
            Self::ContactsExport => "contacts_export",
            Self::FundsRead => "funds_read",
            Self::FundsWrite => "funds_write",
            Self::FundsDestroy => "funds_destroy",
            Self::FundsExport => "funds_export",
        }
    }

    /// The role governing `action` within `domain`.
    #[must_use]
    pub const fn governing(domain: RoleDomain, action: Action) -> Self {
        match (domain, action) {
            (RoleDomain::Mandates, Action::Read) => Self::MandatesRead,
            (RoleDomain::Mandates, Action::Write) => Self::MandatesWrite,
            (RoleDomain::Mandates, Action::Destroy) => Self::MandatesDestroy,
            (RoleDomain::Mandates, Action::Export) => Self::MandatesExport,
            (RoleDomain::Contacts, Action::Read) => Self::ContactsRead,
            (RoleDomain::Contacts, Action::Write) => Self::ContactsWrite,
            (RoleDomain::Contacts, Action::Destroy) => Self::ContactsDestroy,
            (RoleDomain::Contacts, Action::Export) => Self::ContactsExport,
            (RoleDomain::Funds, Action::Read) => Self::FundsRead,
            (RoleDomain::Funds, Action::Write) => Self::FundsWrite,
            (RoleDomain::Funds, Action::Destroy) => Self::FundsDestroy,
            (RoleDomain::Funds, Action::Export) => Self::FundsExport,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Grant resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Resolved permission set for one user, valid for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedGrants {
    /// Roles granted without mandate-group restriction.
    pub global: BTreeSet<Role>,
    /// Roles granted per mandate group.
    pub scoped: BTreeMap<MandateGroupId, BTreeSet<Role>>,
}

impl ResolvedGrants {
    #[must_use]
    pub fn has_global(&self, role: Role) -> bool {
        self.global.contains(&role)
    }

    /// Whether `role` is granted for at least one of `groups`.
    #[must_use]
    pub fn has_scoped_for_any<'a>(
        &self,
        role: Role,
        groups: impl IntoIterator<Item = &'a MandateGroupId>,
    ) -> bool {
        groups
            .into_iter()
            .any(|group| self.scoped.get(group).is_some_and(|roles| roles.contains(&role)))
    }

    /// Mandate groups carrying `role`.
    #[must_use]
    pub fn groups_with(&self, role: Role) -> BTreeSet<MandateGroupId> {
        self.scoped
            .iter()
            .filter(|(_, roles)| roles.contains(&role))
            .map(|(group, _)| *group)
            .collect()
    }
}

/// Resolve the grant set for `user` from its user-group memberships.
///
/// Global grants are the union of all member groups' role sets. A role is
/// scoped to mandate group G when any member group lists both the role and
/// G. A group with scoped-style roles but no mandate groups contributes the
/// roles globally in name only: scoped checks find nothing, so the group
/// stays inert for mandate-scoped resources until mandate groups are
/// attached.
#[must_use]
pub fn resolve_grants<'a>(
    user: UserId,
    groups: impl IntoIterator<Item = &'a UserGroup>,
) -> ResolvedGrants {
    let mut grants = ResolvedGrants::default();

    for group in groups {
        if !group.has_member(user) {
            continue;
        }
        grants.global.extend(group.roles.iter().copied());
        for mandate_group in &group.mandate_groups {
            grants
                .scoped
                .entry(*mandate_group)
                .or_default()
                .extend(group.roles.iter().copied());
        }
    }

    grants
}

// ─────────────────────────────────────────────────────────────────────────────
// Targets
// ─────────────────────────────────────────────────────────────────────────────

/// Resource kind under evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    User,
    UserGroup,
    MandateGroup,
    Mandate,
    MandateMember,
    Contact,
    ContactDetail,
    ComplianceDetail,
    TaxDetail,
    ContactRelationship,
    Address,
    BankAccount,
    Document,
    Activity,
    Task,
    TaskComment,
    Fund,
    Investor,
    FundCashflow,
    InvestorCashflow,
    FundReport,
    List,
    NewsletterSubscriber,
}

impl ResourceKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::UserGroup => "user_group",
            Self::MandateGroup => "mandate_group",
            Self::Mandate => "mandate",
            Self::MandateMember => "mandate_member",
            Self::Contact => "contact",
            Self::ContactDetail => "contact_detail",
            Self::ComplianceDetail => "compliance_detail",
            Self::TaxDetail => "tax_detail",
            Self::ContactRelationship => "contact_relationship",
            Self::Address => "address",
            Self::BankAccount => "bank_account",
            Self::Document => "document",
            Self::Activity => "activity",
            Self::Task => "task",
            Self::TaskComment => "task_comment",
            Self::Fund => "fund",
            Self::Investor => "investor",
            Self::FundCashflow => "fund_cashflow",
            Self::InvestorCashflow => "investor_cashflow",
            Self::FundReport => "fund_report",
            Self::List => "list",
            Self::NewsletterSubscriber => "newsletter_subscriber",
        }
    }
}

/// Scope requirement a resource resolves to.
///
/// The store computes this from the record's ownership edges (e.g. a
/// document owned by an activity on a mandate resolves to that mandate's
/// groups) so the evaluator itself stays a pure table lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum TargetScope {
    /// Global `admin` role required.
    Admin,
    /// A user record: the user itself may read and update it, anyone else
    /// needs `admin`.
    OwnUser { user: UserId },
    /// Mandate-scoped: the actor needs the governing mandates role scoped to
    /// one of these groups.
    MandateGroups { groups: BTreeSet<MandateGroupId> },
    /// Contact-scoped: global contacts role.
    Contacts,
    /// Fund-scoped: global funds role.
    Funds,
    /// Pure ownership: only these users, roles are irrelevant.
    Participants { users: BTreeSet<UserId> },
}

/// Fully resolved permission target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionTarget {
    pub kind: ResourceKind,
    #[serde(flatten)]
    pub scope: TargetScope,
}

impl PermissionTarget {
    #[must_use]
    pub const fn new(kind: ResourceKind, scope: TargetScope) -> Self {
        Self { kind, scope }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Channels
// ─────────────────────────────────────────────────────────────────────────────

/// Caller channel. The Ews channel (API-key sync callers) is restricted to a
/// reduced surface regardless of role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Standard,
    Ews,
}

/// (kind, action) pairs the Ews channel may attempt at all. Everything else
/// is unconditionally denied on that channel, permitting roles or not.
pub const EWS_SURFACE: &[(ResourceKind, Action)] = &[
    (ResourceKind::Contact, Action::Read),
    (ResourceKind::ContactDetail, Action::Read),
    (ResourceKind::Activity, Action::Read),
    (ResourceKind::Activity, Action::Write),
];

// ─────────────────────────────────────────────────────────────────────────────
// Decisions
// ─────────────────────────────────────────────────────────────────────────────

/// Stable internal denial reason codes. Logged and exposed by the simulation
/// CLI; never surfaced to API callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    ChannelRestricted,
    AdminRequired,
    RoleMissing,
    ScopeMismatch,
    NotParticipant,
}

impl DenyReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ChannelRestricted => "channel.restricted",
            Self::AdminRequired => "role.admin_required",
            Self::RoleMissing => "role.missing",
            Self::ScopeMismatch => "scope.mandate_group_mismatch",
            Self::NotParticipant => "ownership.not_participant",
        }
    }
}

/// Outcome of a permission evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    Allow,
    Deny { reason: DenyReason },
}

impl AccessDecision {
    #[must_use]
    pub const fn is_allow(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Collapse into the opaque caller-facing error.
    ///
    /// # Errors
    /// Returns [`Error::Forbidden`] on deny; the reason stays internal.
    pub const fn into_result(self) -> Result<(), Error> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny { .. } => Err(Error::Forbidden),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Evaluator
// ─────────────────────────────────────────────────────────────────────────────

/// Evaluate one (actor, action, target) triple against resolved grants.
///
/// Check order: channel surface first (unconditional), then the scope
/// requirement the target resolved to. Anything unresolved denies.
#[must_use]
pub fn evaluate(
    grants: &ResolvedGrants,
    actor: UserId,
    channel: Channel,
    action: Action,
    target: &PermissionTarget,
) -> AccessDecision {
    let decision = evaluate_inner(grants, actor, channel, action, target);
    if let AccessDecision::Deny { reason } = decision {
        tracing::debug!(
            actor = %actor,
            action = action.as_str(),
            resource = target.kind.as_str(),
            reason = reason.as_str(),
            "access denied"
        );
    }
    decision
}

fn evaluate_inner(
    grants: &ResolvedGrants,
    actor: UserId,
    channel: Channel,
    action: Action,
    target: &PermissionTarget,
) -> AccessDecision {
    if channel == Channel::Ews && !EWS_SURFACE.contains(&(target.kind, action)) {
        return AccessDecision::Deny {
            reason: DenyReason::ChannelRestricted,
        };
    }

    match &target.scope {
        TargetScope::Admin => {
            if grants.has_global(Role::Admin) {
                AccessDecision::Allow
            } else {
                AccessDecision::Deny {
                    reason: DenyReason::AdminRequired,
                }
            }
        }
        TargetScope::OwnUser { user } => {
            let self_access = actor == *user && matches!(action, Action::Read | Action::Write);
            if self_access || grants.has_global(Role::Admin) {
                AccessDecision::Allow
            } else {
                AccessDecision::Deny {
                    reason: DenyReason::AdminRequired,
                }
            }
        }
        TargetScope::MandateGroups { groups } => {
            let role = Role::governing(RoleDomain::Mandates, action);
            if grants.has_scoped_for_any(role, groups) {
                AccessDecision::Allow
            } else if grants.groups_with(role).is_empty() {
                AccessDecision::Deny {
                    reason: DenyReason::RoleMissing,
                }
            } else {
                AccessDecision::Deny {
                    reason: DenyReason::ScopeMismatch,
                }
            }
        }
        TargetScope::Contacts => {
            let role = Role::governing(RoleDomain::Contacts, action);
            if grants.has_global(role) {
                AccessDecision::Allow
            } else {
                AccessDecision::Deny {
                    reason: DenyReason::RoleMissing,
                }
            }
        }
        TargetScope::Funds => {
            let role = Role::governing(RoleDomain::Funds, action);
            if grants.has_global(role) {
                AccessDecision::Allow
            } else {
                AccessDecision::Deny {
                    reason: DenyReason::RoleMissing,
                }
            }
        }
        TargetScope::Participants { users } => {
            if users.contains(&actor) {
                AccessDecision::Allow
            } else {
                AccessDecision::Deny {
                    reason: DenyReason::NotParticipant,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::id::UserGroupId;

    fn group(
        member: UserId,
        roles: &[Role],
        mandate_groups: &[MandateGroupId],
    ) -> UserGroup {
        UserGroup {
            id: UserGroupId::generate(),
            name: "Advisors".to_string(),
            roles: roles.iter().copied().collect(),
            mandate_groups: mandate_groups.iter().copied().collect(),
            members: BTreeSet::from([member]),
            comment: None,
        }
    }

    fn mandate_target(groups: &[MandateGroupId]) -> PermissionTarget {
        PermissionTarget::new(
            ResourceKind::Mandate,
            TargetScope::MandateGroups {
                groups: groups.iter().copied().collect(),
            },
        )
    }

    // ── resolver ───────────────────────────────────────────────────────────

    #[test]
    fn resolve_unions_roles_across_groups() {
        let user = UserId::generate();
        let g1 = MandateGroupId::generate();
        let groups = [
            group(user, &[Role::MandatesRead], &[g1]),
            group(user, &[Role::ContactsRead, Role::ContactsWrite], &[]),
        ];
        let grants = resolve_grants(user, &groups);

        assert!(grants.has_global(Role::MandatesRead));
        assert!(grants.has_global(Role::ContactsRead));
        assert!(grants.has_global(Role::ContactsWrite));
        assert_eq!(grants.groups_with(Role::MandatesRead), BTreeSet::from([g1]));
    }

    #[test]
    fn resolve_skips_groups_without_the_user() {
        let user = UserId::generate();
        let other = UserId::generate();
        let grants = resolve_grants(user, &[group(other, &[Role::Admin], &[])]);
        assert_eq!(grants, ResolvedGrants::default());
    }

    #[test]
    fn scoped_role_without_mandate_groups_is_inert() {
        let user = UserId::generate();
        let grants = resolve_grants(user, &[group(user, &[Role::MandatesRead], &[])]);

        // Global name exists, but no scoped grant: mandate checks all deny.
        let target = mandate_target(&[MandateGroupId::generate()]);
        let decision = evaluate(&grants, user, Channel::Standard, Action::Read, &target);
        assert_eq!(
            decision,
            AccessDecision::Deny {
                reason: DenyReason::RoleMissing
            }
        );
    }

    #[test]
    fn attaching_the_group_activates_the_grant() {
        let user = UserId::generate();
        let g1 = MandateGroupId::generate();
        let grants = resolve_grants(user, &[group(user, &[Role::MandatesRead], &[g1])]);
        let decision = evaluate(
            &grants,
            user,
            Channel::Standard,
            Action::Read,
            &mandate_target(&[g1]),
        );
        assert_eq!(decision, AccessDecision::Allow);
    }

    // ── evaluator ──────────────────────────────────────────────────────────

    #[test]
    fn mandate_outside_granted_groups_is_scope_mismatch() {
        let user = UserId::generate();
        let granted = MandateGroupId::generate();
        let foreign = MandateGroupId::generate();
        let grants = resolve_grants(user, &[group(user, &[Role::MandatesRead], &[granted])]);

        let decision = evaluate(
            &grants,
            user,
            Channel::Standard,
            Action::Read,
            &mandate_target(&[foreign]),
        );
        assert_eq!(
            decision,
            AccessDecision::Deny {
                reason: DenyReason::ScopeMismatch
            }
        );
    }

    #[test]
    fn mandate_write_needs_the_write_role() {
        let user = UserId::generate();
        let g1 = MandateGroupId::generate();
        let grants = resolve_grants(user, &[group(user, &[Role::MandatesRead], &[g1])]);
        let decision = evaluate(
            &grants,
            user,
            Channel::Standard,
            Action::Write,
            &mandate_target(&[g1]),
        );
        assert!(!decision.is_allow());
    }

    #[test]
    fn contact_roles_are_global_not_scoped() {
        let user = UserId::generate();
        let grants = resolve_grants(user, &[group(user, &[Role::ContactsRead], &[])]);
        let target = PermissionTarget::new(ResourceKind::Contact, TargetScope::Contacts);
        assert!(evaluate(&grants, user, Channel::Standard, Action::Read, &target).is_allow());
        assert!(!evaluate(&grants, user, Channel::Standard, Action::Destroy, &target).is_allow());
    }

    #[test]
    fn fund_roles_are_global() {
        let user = UserId::generate();
        let grants = resolve_grants(user, &[group(user, &[Role::FundsExport], &[])]);
        let target = PermissionTarget::new(ResourceKind::Fund, TargetScope::Funds);
        assert!(evaluate(&grants, user, Channel::Standard, Action::Export, &target).is_allow());
        assert!(!evaluate(&grants, user, Channel::Standard, Action::Read, &target).is_allow());
    }

    #[test]
    fn user_record_allows_self_read_and_write_only() {
        let user = UserId::generate();
        let grants = ResolvedGrants::default();
        let own = PermissionTarget::new(ResourceKind::User, TargetScope::OwnUser { user });

        assert!(evaluate(&grants, user, Channel::Standard, Action::Read, &own).is_allow());
        assert!(evaluate(&grants, user, Channel::Standard, Action::Write, &own).is_allow());
        assert!(!evaluate(&grants, user, Channel::Standard, Action::Destroy, &own).is_allow());

        let stranger = UserId::generate();
        assert!(!evaluate(&grants, stranger, Channel::Standard, Action::Read, &own).is_allow());
    }

    #[test]
    fn user_group_management_requires_admin() {
        let user = UserId::generate();
        let admin = resolve_grants(user, &[group(user, &[Role::Admin], &[])]);
        let target = PermissionTarget::new(ResourceKind::UserGroup, TargetScope::Admin);
        assert!(evaluate(&admin, user, Channel::Standard, Action::Write, &target).is_allow());

        let plain = ResolvedGrants::default();
        let decision = evaluate(&plain, user, Channel::Standard, Action::Read, &target);
        assert_eq!(
            decision,
            AccessDecision::Deny {
                reason: DenyReason::AdminRequired
            }
        );
    }

    #[test]
    fn foreign_tasks_stay_invisible_even_for_admins() {
        let admin_user = UserId::generate();
        let grants = resolve_grants(admin_user, &[group(admin_user, &[Role::Admin], &[])]);
        let target = PermissionTarget::new(
            ResourceKind::Task,
            TargetScope::Participants {
                users: BTreeSet::from([UserId::generate()]),
            },
        );
        let decision = evaluate(&grants, admin_user, Channel::Standard, Action::Read, &target);
        assert_eq!(
            decision,
            AccessDecision::Deny {
                reason: DenyReason::NotParticipant
            }
        );
    }

    #[test]
    fn task_participants_see_their_task() {
        let user = UserId::generate();
        let target = PermissionTarget::new(
            ResourceKind::Task,
            TargetScope::Participants {
                users: BTreeSet::from([user]),
            },
        );
        let decision = evaluate(
            &ResolvedGrants::default(),
            user,
            Channel::Standard,
            Action::Write,
            &target,
        );
        assert_eq!(decision, AccessDecision::Allow);
    }

    #[test]
    fn ews_channel_is_capped_regardless_of_role() {
        let user = UserId::generate();
        let grants = resolve_grants(
            user,
            &[group(
                user,
                &[Role::Admin, Role::ContactsRead, Role::ContactsWrite],
                &[],
            )],
        );
        let contact = PermissionTarget::new(ResourceKind::Contact, TargetScope::Contacts);

        assert!(evaluate(&grants, user, Channel::Ews, Action::Read, &contact).is_allow());
        let decision = evaluate(&grants, user, Channel::Ews, Action::Write, &contact);
        assert_eq!(
            decision,
            AccessDecision::Deny {
                reason: DenyReason::ChannelRestricted
            }
        );
    }

    #[test]
    fn ews_channel_still_requires_the_role() {
        let user = UserId::generate();
        let contact = PermissionTarget::new(ResourceKind::Contact, TargetScope::Contacts);
        let decision = evaluate(
            &ResolvedGrants::default(),
            user,
            Channel::Ews,
            Action::Read,
            &contact,
        );
        assert_eq!(
            decision,
            AccessDecision::Deny {
                reason: DenyReason::RoleMissing
            }
        );
    }

    #[test]
    fn deny_collapses_to_opaque_forbidden() {
        let decision = AccessDecision::Deny {
            reason: DenyReason::ScopeMismatch,
        };
        let err = decision.into_result().expect_err("deny");
        assert_eq!(err, Error::Forbidden);
        assert_eq!(err.to_string(), "forbidden");
    }

    #[test]
    fn reason_codes_are_stable() {
        assert_eq!(DenyReason::ChannelRestricted.as_str(), "channel.restricted");
        assert_eq!(DenyReason::ScopeMismatch.as_str(), "scope.mandate_group_mismatch");
        assert_eq!(
            serde_json::to_string(&Role::MandatesRead).expect("serialize"),
            "\"mandates_read\""
        );
    }
}
