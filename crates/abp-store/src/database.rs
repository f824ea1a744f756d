//! The relational table set.
//!
//! Plain `BTreeMap` tables keyed by typed ids, serializable as one snapshot
//! (the CLI and test fixtures load these from JSON). The version log is part
//! of the database so it commits or rolls back with the tables.

use std::collections::BTreeMap;

use abp_audit::Version;
use abp_core::{
    Activity, ActivityId, Address, AddressId, BankAccount, BankAccountId, ComplianceDetail,
    ComplianceDetailId, Contact, ContactDetail, ContactDetailId, ContactId, ContactRelationship,
    ContactRelationshipId, Document, DocumentId, Error, Fund, FundCashflow, FundCashflowId,
    FundId, FundReport, FundReportId, Investor, InvestorCashflow, InvestorCashflowId, InvestorId,
    List, ListId, Mandate, MandateGroup, MandateGroupId, MandateGroupKind, MandateId,
    MandateMember, MandateMemberId, NewsletterSubscriber, SubscriberId, Task, TaskComment,
    TaskCommentId, TaskId, TaxDetail, TaxDetailId, User, UserGroup, UserGroupId, UserId,
};
use serde::{Deserialize, Serialize};

/// Full platform state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub users: BTreeMap<UserId, User>,
    #[serde(default)]
    pub user_groups: BTreeMap<UserGroupId, UserGroup>,
    #[serde(default)]
    pub mandate_groups: BTreeMap<MandateGroupId, MandateGroup>,
    #[serde(default)]
    pub mandates: BTreeMap<MandateId, Mandate>,
    #[serde(default)]
    pub mandate_members: BTreeMap<MandateMemberId, MandateMember>,
    #[serde(default)]
    pub contacts: BTreeMap<ContactId, Contact>,
    #[serde(default)]
    pub addresses: BTreeMap<AddressId, Address>,
    #[serde(default)]
    pub contact_details: BTreeMap<ContactDetailId, ContactDetail>,
    #[serde(default)]
    pub compliance_details: BTreeMap<ComplianceDetailId, ComplianceDetail>,
    #[serde(default)]
    pub tax_details: BTreeMap<TaxDetailId, TaxDetail>,
    #[serde(default)]
    pub relationships: BTreeMap<ContactRelationshipId, ContactRelationship>,
    #[serde(default)]
    pub funds: BTreeMap<FundId, Fund>,
    #[serde(default)]
    pub investors: BTreeMap<InvestorId, Investor>,
    #[serde(default)]
    pub fund_cashflows: BTreeMap<FundCashflowId, FundCashflow>,
    #[serde(default)]
    pub investor_cashflows: BTreeMap<InvestorCashflowId, InvestorCashflow>,
    #[serde(default)]
    pub fund_reports: BTreeMap<FundReportId, FundReport>,
    #[serde(default)]
    pub documents: BTreeMap<DocumentId, Document>,
    #[serde(default)]
    pub activities: BTreeMap<ActivityId, Activity>,
    #[serde(default)]
    pub bank_accounts: BTreeMap<BankAccountId, BankAccount>,
    #[serde(default)]
    pub tasks: BTreeMap<TaskId, Task>,
    #[serde(default)]
    pub task_comments: BTreeMap<TaskCommentId, TaskComment>,
    #[serde(default)]
    pub lists: BTreeMap<ListId, List>,
    #[serde(default)]
    pub subscribers: BTreeMap<SubscriberId, NewsletterSubscriber>,
    /// Append-only version log.
    #[serde(default)]
    pub versions: Vec<Version>,
}

macro_rules! fetch {
    ($fn_name:ident, $table:ident, $id_ty:ty, $entity:ty, $kind:literal) => {
        /// Fetch by id.
        ///
        /// # Errors
        /// Returns [`Error::NotFound`] when absent.
        pub fn $fn_name(&self, id: $id_ty) -> Result<&$entity, Error> {
            self.$table.get(&id).ok_or_else(|| Error::not_found($kind, id))
        }
    };
}

impl Database {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fetch!(user, users, UserId, User, "user");
    fetch!(user_group, user_groups, UserGroupId, UserGroup, "user_group");
    fetch!(mandate_group, mandate_groups, MandateGroupId, MandateGroup, "mandate_group");
    fetch!(mandate, mandates, MandateId, Mandate, "mandate");
    fetch!(contact, contacts, ContactId, Contact, "contact");
    fetch!(address, addresses, AddressId, Address, "address");
    fetch!(fund, funds, FundId, Fund, "fund");
    fetch!(investor, investors, InvestorId, Investor, "investor");
    fetch!(fund_cashflow, fund_cashflows, FundCashflowId, FundCashflow, "fund_cashflow");
    fetch!(
        investor_cashflow,
        investor_cashflows,
        InvestorCashflowId,
        InvestorCashflow,
        "investor_cashflow"
    );
    fetch!(document, documents, DocumentId, Document, "document");
    fetch!(activity, activities, ActivityId, Activity, "activity");
    fetch!(bank_account, bank_accounts, BankAccountId, BankAccount, "bank_account");
    fetch!(task, tasks, TaskId, Task, "task");
    fetch!(list, lists, ListId, List, "list");
    fetch!(subscriber, subscribers, SubscriberId, NewsletterSubscriber, "newsletter_subscriber");

    /// User groups the user is a member of.
    pub fn groups_of(&self, user: UserId) -> impl Iterator<Item = &UserGroup> {
        self.user_groups
            .values()
            .filter(move |group| group.has_member(user))
    }

    /// Whether at least one of the mandate's groups is organization-kind.
    /// Every persisted mandate must satisfy this.
    #[must_use]
    pub fn mandate_has_organization_group(&self, mandate: &Mandate) -> bool {
        mandate.groups.iter().any(|group_id| {
            self.mandate_groups
                .get(group_id)
                .is_some_and(|group| group.kind == MandateGroupKind::Organization)
        })
    }

    /// Line items of a fund cashflow batch.
    pub fn line_items_of(
        &self,
        batch: FundCashflowId,
    ) -> impl Iterator<Item = &InvestorCashflow> {
        self.investor_cashflows
            .values()
            .filter(move |item| item.fund_cashflow_id == batch)
    }

    /// Subscriber lookup by confirmation token.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] for unknown tokens, a distinct failure
    /// from validation.
    pub fn subscriber_by_token(&self, token: &str) -> Result<&NewsletterSubscriber, Error> {
        self.subscribers
            .values()
            .find(|subscriber| subscriber.confirmation_token.as_deref() == Some(token))
            .ok_or_else(|| Error::not_found("newsletter_subscriber", token))
    }
}
