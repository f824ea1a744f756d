//! Resolution of records to permission targets.
//!
//! The evaluator in `abp-core` works on fully resolved scopes; this module
//! walks the ownership edges (a document owned by an activity attached to a
//! mandate resolves to that mandate's groups) so every check goes through
//! one place.

use abp_core::{
    Activity, ActivitySubject, Address, AddressOwner, BankAccount, BankAccountOwner, Contact,
    ContactRelationship, Document, DocumentOwner, Error, Fund, FundCashflow, FundReport, Investor,
    InvestorCashflow, List, Mandate, MandateGroupId, NewsletterSubscriber, PermissionTarget,
    ResourceKind, Task, TaskComment, TargetScope, User, UserGroup,
};

use crate::database::Database;

use std::collections::BTreeSet;

fn mandate_scope(mandate: &Mandate) -> TargetScope {
    TargetScope::MandateGroups {
        groups: mandate.groups.clone(),
    }
}

fn mandate_groups_of(db: &Database, mandate_id: abp_core::MandateId) -> Result<BTreeSet<MandateGroupId>, Error> {
    Ok(db.mandate(mandate_id)?.groups.clone())
}

#[must_use]
pub fn user_target(user: &User) -> PermissionTarget {
    PermissionTarget::new(ResourceKind::User, TargetScope::OwnUser { user: user.id })
}

#[must_use]
pub fn user_group_target(_group: &UserGroup) -> PermissionTarget {
    PermissionTarget::new(ResourceKind::UserGroup, TargetScope::Admin)
}

#[must_use]
pub fn mandate_target(mandate: &Mandate) -> PermissionTarget {
    PermissionTarget::new(ResourceKind::Mandate, mandate_scope(mandate))
}

#[must_use]
pub fn contact_target(_contact: &Contact) -> PermissionTarget {
    PermissionTarget::new(ResourceKind::Contact, TargetScope::Contacts)
}

#[must_use]
pub fn relationship_target(_relationship: &ContactRelationship) -> PermissionTarget {
    PermissionTarget::new(ResourceKind::ContactRelationship, TargetScope::Contacts)
}

#[must_use]
pub fn fund_target(_fund: &Fund) -> PermissionTarget {
    PermissionTarget::new(ResourceKind::Fund, TargetScope::Funds)
}

#[must_use]
pub fn investor_target(_investor: &Investor) -> PermissionTarget {
    PermissionTarget::new(ResourceKind::Investor, TargetScope::Funds)
}

#[must_use]
pub fn fund_cashflow_target(_batch: &FundCashflow) -> PermissionTarget {
    PermissionTarget::new(ResourceKind::FundCashflow, TargetScope::Funds)
}

#[must_use]
pub fn investor_cashflow_target(_item: &InvestorCashflow) -> PermissionTarget {
    PermissionTarget::new(ResourceKind::InvestorCashflow, TargetScope::Funds)
}

#[must_use]
pub fn fund_report_target(_report: &FundReport) -> PermissionTarget {
    PermissionTarget::new(ResourceKind::FundReport, TargetScope::Funds)
}

/// Lists hold contacts, so they follow the contacts domain.
#[must_use]
pub fn list_target(_list: &List) -> PermissionTarget {
    PermissionTarget::new(ResourceKind::List, TargetScope::Contacts)
}

/// Newsletter administration is an admin concern.
#[must_use]
pub fn subscriber_target(_subscriber: &NewsletterSubscriber) -> PermissionTarget {
    PermissionTarget::new(ResourceKind::NewsletterSubscriber, TargetScope::Admin)
}

/// Tasks are pure ownership: creator plus assignees.
#[must_use]
pub fn task_target(task: &Task) -> PermissionTarget {
    PermissionTarget::new(
        ResourceKind::Task,
        TargetScope::Participants {
            users: task.participants(),
        },
    )
}

/// Comment access: the task's participants plus the comment author.
#[must_use]
pub fn task_comment_target(comment: &TaskComment, task: &Task) -> PermissionTarget {
    let mut users = task.participants();
    users.insert(comment.author);
    PermissionTarget::new(ResourceKind::TaskComment, TargetScope::Participants { users })
}

/// An address follows its owner's domain.
///
/// # Errors
/// Returns [`Error::NotFound`] when an ownership edge dangles.
pub fn address_target(db: &Database, address: &Address) -> Result<PermissionTarget, Error> {
    let scope = match address.owner {
        AddressOwner::Contact(_) => TargetScope::Contacts,
        AddressOwner::Mandate(id) => TargetScope::MandateGroups {
            groups: mandate_groups_of(db, id)?,
        },
        AddressOwner::Fund(_) => TargetScope::Funds,
    };
    Ok(PermissionTarget::new(ResourceKind::Address, scope))
}

/// A bank account follows its owner's domain.
///
/// # Errors
/// Returns [`Error::NotFound`] when an ownership edge dangles.
pub fn bank_account_target(db: &Database, account: &BankAccount) -> Result<PermissionTarget, Error> {
    let scope = match account.owner {
        BankAccountOwner::Mandate(id) => TargetScope::MandateGroups {
            groups: mandate_groups_of(db, id)?,
        },
        BankAccountOwner::Fund(_) => TargetScope::Funds,
    };
    Ok(PermissionTarget::new(ResourceKind::BankAccount, scope))
}

/// An activity follows its subject's domain.
///
/// # Errors
/// Returns [`Error::NotFound`] when an ownership edge dangles.
pub fn activity_target(db: &Database, activity: &Activity) -> Result<PermissionTarget, Error> {
    let scope = match activity.subject {
        ActivitySubject::Contact(_) => TargetScope::Contacts,
        ActivitySubject::Mandate(id) => TargetScope::MandateGroups {
            groups: mandate_groups_of(db, id)?,
        },
    };
    Ok(PermissionTarget::new(ResourceKind::Activity, scope))
}

/// A document follows its owner's domain; activity-owned documents resolve
/// through the activity's subject.
///
/// # Errors
/// Returns [`Error::NotFound`] when an ownership edge dangles.
pub fn document_target(db: &Database, document: &Document) -> Result<PermissionTarget, Error> {
    let scope = match document.owner {
        DocumentOwner::Contact(_) => TargetScope::Contacts,
        DocumentOwner::Mandate(id) => TargetScope::MandateGroups {
            groups: mandate_groups_of(db, id)?,
        },
        DocumentOwner::Fund(_) => TargetScope::Funds,
        DocumentOwner::Activity(id) => {
            let activity = db.activity(id)?;
            return Ok(PermissionTarget::new(
                ResourceKind::Document,
                match activity_target(db, activity)?.scope {
                    TargetScope::MandateGroups { groups } => TargetScope::MandateGroups { groups },
                    _ => TargetScope::Contacts,
                },
            ));
        }
    };
    Ok(PermissionTarget::new(ResourceKind::Document, scope))
}

/// The aggregate timeline of `(kind, id)` is readable iff the aggregate
/// itself is.
///
/// # Errors
/// Returns [`Error::NotFound`] for unknown aggregates or unsupported kinds.
pub fn history_target(
    db: &Database,
    kind: ResourceKind,
    id: &str,
) -> Result<PermissionTarget, Error> {
    let parse =
        |value: &str| -> Result<uuid::Uuid, Error> {
            value.parse().map_err(|_| Error::not_found(kind.as_str(), value))
        };
    match kind {
        ResourceKind::Contact => Ok(contact_target(db.contact(parse(id)?.into())?)),
        ResourceKind::Mandate => Ok(mandate_target(db.mandate(parse(id)?.into())?)),
        ResourceKind::Fund => Ok(fund_target(db.fund(parse(id)?.into())?)),
        ResourceKind::Task => Ok(task_target(db.task(parse(id)?.into())?)),
        other => Err(Error::not_found(other.as_str(), id)),
    }
}
