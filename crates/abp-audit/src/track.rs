//! Trackable entities and their parent-item declarations.

use abp_core::{
    Activity, ActivitySubject, Address, AddressOwner, BankAccount, BankAccountOwner,
    ComplianceDetail, Contact, ContactDetail, ContactRelationship, Document, DocumentOwner, Fund,
    FundCashflow, FundReport, Investor, InvestorCashflow, List, Mandate, MandateGroup,
    MandateMember, NewsletterSubscriber, ResourceKind, Task, TaskComment, TaxDetail, User,
    UserGroup,
};
use serde::Serialize;

/// A record the audit trail follows.
///
/// `parent_item` declares the aggregate the record's versions surface under.
/// Parents that can only be resolved through a live association (an investor
/// cashflow's fund, a document owned by an activity) are attached by the
/// store via [`crate::Version::with_parent`] instead.
pub trait Trackable: Serialize {
    const KIND: ResourceKind;

    fn item_id(&self) -> String;

    fn parent_item(&self) -> Option<(ResourceKind, String)> {
        None
    }
}

impl Trackable for User {
    const KIND: ResourceKind = ResourceKind::User;

    fn item_id(&self) -> String {
        self.id.to_string()
    }
}

impl Trackable for UserGroup {
    const KIND: ResourceKind = ResourceKind::UserGroup;

    fn item_id(&self) -> String {
        self.id.to_string()
    }
}

impl Trackable for MandateGroup {
    const KIND: ResourceKind = ResourceKind::MandateGroup;

    fn item_id(&self) -> String {
        self.id.to_string()
    }
}

impl Trackable for Mandate {
    const KIND: ResourceKind = ResourceKind::Mandate;

    fn item_id(&self) -> String {
        self.id.to_string()
    }
}

impl Trackable for MandateMember {
    const KIND: ResourceKind = ResourceKind::MandateMember;

    fn item_id(&self) -> String {
        self.id.to_string()
    }

    fn parent_item(&self) -> Option<(ResourceKind, String)> {
        Some((ResourceKind::Mandate, self.mandate_id.to_string()))
    }
}

impl Trackable for Contact {
    const KIND: ResourceKind = ResourceKind::Contact;

    fn item_id(&self) -> String {
        self.id.to_string()
    }
}

impl Trackable for Address {
    const KIND: ResourceKind = ResourceKind::Address;

    fn item_id(&self) -> String {
        self.id.to_string()
    }

    fn parent_item(&self) -> Option<(ResourceKind, String)> {
        Some(match self.owner {
            AddressOwner::Contact(id) => (ResourceKind::Contact, id.to_string()),
            AddressOwner::Mandate(id) => (ResourceKind::Mandate, id.to_string()),
            AddressOwner::Fund(id) => (ResourceKind::Fund, id.to_string()),
        })
    }
}

impl Trackable for ContactDetail {
    const KIND: ResourceKind = ResourceKind::ContactDetail;

    fn item_id(&self) -> String {
        self.id.to_string()
    }

    fn parent_item(&self) -> Option<(ResourceKind, String)> {
        Some((ResourceKind::Contact, self.contact_id.to_string()))
    }
}

impl Trackable for ComplianceDetail {
    const KIND: ResourceKind = ResourceKind::ComplianceDetail;

    fn item_id(&self) -> String {
        self.id.to_string()
    }

    fn parent_item(&self) -> Option<(ResourceKind, String)> {
        Some((ResourceKind::Contact, self.contact_id.to_string()))
    }
}

impl Trackable for TaxDetail {
    const KIND: ResourceKind = ResourceKind::TaxDetail;

    fn item_id(&self) -> String {
        self.id.to_string()
    }

    fn parent_item(&self) -> Option<(ResourceKind, String)> {
        Some((ResourceKind::Contact, self.contact_id.to_string()))
    }
}

impl Trackable for ContactRelationship {
    const KIND: ResourceKind = ResourceKind::ContactRelationship;

    fn item_id(&self) -> String {
        self.id.to_string()
    }

    fn parent_item(&self) -> Option<(ResourceKind, String)> {
        Some((ResourceKind::Contact, self.source_id.to_string()))
    }
}

impl Trackable for Fund {
    const KIND: ResourceKind = ResourceKind::Fund;

    fn item_id(&self) -> String {
        self.id.to_string()
    }
}

impl Trackable for Investor {
    const KIND: ResourceKind = ResourceKind::Investor;

    fn item_id(&self) -> String {
        self.id.to_string()
    }

    fn parent_item(&self) -> Option<(ResourceKind, String)> {
        Some((ResourceKind::Fund, self.fund_id.to_string()))
    }
}

impl Trackable for FundCashflow {
    const KIND: ResourceKind = ResourceKind::FundCashflow;

    fn item_id(&self) -> String {
        self.id.to_string()
    }

    fn parent_item(&self) -> Option<(ResourceKind, String)> {
        Some((ResourceKind::Fund, self.fund_id.to_string()))
    }
}

// The investor cashflow's parent is the fund, resolved through its batch,
// a live association the store attaches at record time.
impl Trackable for InvestorCashflow {
    const KIND: ResourceKind = ResourceKind::InvestorCashflow;

    fn item_id(&self) -> String {
        self.id.to_string()
    }
}

impl Trackable for FundReport {
    const KIND: ResourceKind = ResourceKind::FundReport;

    fn item_id(&self) -> String {
        self.id.to_string()
    }

    fn parent_item(&self) -> Option<(ResourceKind, String)> {
        Some((ResourceKind::Fund, self.fund_id.to_string()))
    }
}

// A document owned by an activity surfaces under the activity's subject;
// that resolution needs the activity table, so the store overrides the
// parent for that owner kind.
impl Trackable for Document {
    const KIND: ResourceKind = ResourceKind::Document;

    fn item_id(&self) -> String {
        self.id.to_string()
    }

    fn parent_item(&self) -> Option<(ResourceKind, String)> {
        match self.owner {
            DocumentOwner::Contact(id) => Some((ResourceKind::Contact, id.to_string())),
            DocumentOwner::Mandate(id) => Some((ResourceKind::Mandate, id.to_string())),
            DocumentOwner::Fund(id) => Some((ResourceKind::Fund, id.to_string())),
            DocumentOwner::Activity(_) => None,
        }
    }
}

impl Trackable for Activity {
    const KIND: ResourceKind = ResourceKind::Activity;

    fn item_id(&self) -> String {
        self.id.to_string()
    }

    fn parent_item(&self) -> Option<(ResourceKind, String)> {
        Some(match self.subject {
            ActivitySubject::Contact(id) => (ResourceKind::Contact, id.to_string()),
            ActivitySubject::Mandate(id) => (ResourceKind::Mandate, id.to_string()),
        })
    }
}

impl Trackable for BankAccount {
    const KIND: ResourceKind = ResourceKind::BankAccount;

    fn item_id(&self) -> String {
        self.id.to_string()
    }

    fn parent_item(&self) -> Option<(ResourceKind, String)> {
        Some(match self.owner {
            BankAccountOwner::Mandate(id) => (ResourceKind::Mandate, id.to_string()),
            BankAccountOwner::Fund(id) => (ResourceKind::Fund, id.to_string()),
        })
    }
}

impl Trackable for Task {
    const KIND: ResourceKind = ResourceKind::Task;

    fn item_id(&self) -> String {
        self.id.to_string()
    }
}

impl Trackable for TaskComment {
    const KIND: ResourceKind = ResourceKind::TaskComment;

    fn item_id(&self) -> String {
        self.id.to_string()
    }

    fn parent_item(&self) -> Option<(ResourceKind, String)> {
        Some((ResourceKind::Task, self.task_id.to_string()))
    }
}

impl Trackable for List {
    const KIND: ResourceKind = ResourceKind::List;

    fn item_id(&self) -> String {
        self.id.to_string()
    }
}

impl Trackable for NewsletterSubscriber {
    const KIND: ResourceKind = ResourceKind::NewsletterSubscriber;

    fn item_id(&self) -> String {
        self.id.to_string()
    }
}
