//! Cascade deletion planning.
//!
//! Delete behavior is a static per-edge policy table instead of rules
//! scattered across entity definitions. The planner computes the complete
//! deletion set (and every reference to null out) before the first record is
//! touched; execution then runs inside the caller's transaction, so a
//! restricted edge or a locked document aborts the whole operation.

use abp_core::{
    ActivityId, ActivitySubject, AddressId, AddressOwner, BankAccountId, BankAccountOwner,
    ComplianceDetailId, ContactDetailId, ContactId, ContactRelationshipId, DocumentId,
    DocumentOwner, Error, FundCashflowId, FundId, FundReportId, InvestorCashflowId, ListId,
    MandateId, MandateMemberId, ResourceKind, TaskCommentId, TaskId, TaxDetailId, UserId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::store::Txn;

// ─────────────────────────────────────────────────────────────────────────────
// Policy table
// ─────────────────────────────────────────────────────────────────────────────

/// What happens to a dependent when its parent is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnDelete {
    Cascade,
    Nullify,
    Restrict,
}

/// One edge of the deletion policy table.
#[derive(Debug, Clone, Copy)]
pub struct DeleteRule {
    pub parent: ResourceKind,
    pub dependent: ResourceKind,
    pub on_delete: OnDelete,
}

/// The full deletion policy table (the single source the planner consults).
pub const DELETE_RULES: &[DeleteRule] = &[
    // Contact aggregate
    DeleteRule { parent: ResourceKind::Contact, dependent: ResourceKind::Address, on_delete: OnDelete::Cascade },
    DeleteRule { parent: ResourceKind::Contact, dependent: ResourceKind::ContactDetail, on_delete: OnDelete::Cascade },
    DeleteRule { parent: ResourceKind::Contact, dependent: ResourceKind::ComplianceDetail, on_delete: OnDelete::Cascade },
    DeleteRule { parent: ResourceKind::Contact, dependent: ResourceKind::TaxDetail, on_delete: OnDelete::Cascade },
    DeleteRule { parent: ResourceKind::Contact, dependent: ResourceKind::ContactRelationship, on_delete: OnDelete::Cascade },
    DeleteRule { parent: ResourceKind::Contact, dependent: ResourceKind::Activity, on_delete: OnDelete::Cascade },
    DeleteRule { parent: ResourceKind::Contact, dependent: ResourceKind::Document, on_delete: OnDelete::Cascade },
    DeleteRule { parent: ResourceKind::Contact, dependent: ResourceKind::MandateMember, on_delete: OnDelete::Cascade },
    DeleteRule { parent: ResourceKind::Contact, dependent: ResourceKind::Mandate, on_delete: OnDelete::Nullify },
    DeleteRule { parent: ResourceKind::Contact, dependent: ResourceKind::User, on_delete: OnDelete::Nullify },
    DeleteRule { parent: ResourceKind::Contact, dependent: ResourceKind::List, on_delete: OnDelete::Nullify },
    // Mandate aggregate
    DeleteRule { parent: ResourceKind::Mandate, dependent: ResourceKind::MandateMember, on_delete: OnDelete::Cascade },
    DeleteRule { parent: ResourceKind::Mandate, dependent: ResourceKind::BankAccount, on_delete: OnDelete::Cascade },
    DeleteRule { parent: ResourceKind::Mandate, dependent: ResourceKind::Address, on_delete: OnDelete::Cascade },
    DeleteRule { parent: ResourceKind::Mandate, dependent: ResourceKind::Activity, on_delete: OnDelete::Cascade },
    DeleteRule { parent: ResourceKind::Mandate, dependent: ResourceKind::Document, on_delete: OnDelete::Cascade },
    DeleteRule { parent: ResourceKind::Mandate, dependent: ResourceKind::Investor, on_delete: OnDelete::Restrict },
    // Fund aggregate
    DeleteRule { parent: ResourceKind::Fund, dependent: ResourceKind::Investor, on_delete: OnDelete::Restrict },
    DeleteRule { parent: ResourceKind::Fund, dependent: ResourceKind::FundCashflow, on_delete: OnDelete::Restrict },
    DeleteRule { parent: ResourceKind::Fund, dependent: ResourceKind::FundReport, on_delete: OnDelete::Cascade },
    DeleteRule { parent: ResourceKind::Fund, dependent: ResourceKind::BankAccount, on_delete: OnDelete::Cascade },
    DeleteRule { parent: ResourceKind::Fund, dependent: ResourceKind::Address, on_delete: OnDelete::Cascade },
    DeleteRule { parent: ResourceKind::Fund, dependent: ResourceKind::Document, on_delete: OnDelete::Cascade },
    // Cashflow / task aggregates
    DeleteRule { parent: ResourceKind::FundCashflow, dependent: ResourceKind::InvestorCashflow, on_delete: OnDelete::Cascade },
    DeleteRule { parent: ResourceKind::Activity, dependent: ResourceKind::Document, on_delete: OnDelete::Cascade },
    DeleteRule { parent: ResourceKind::Task, dependent: ResourceKind::TaskComment, on_delete: OnDelete::Cascade },
];

fn rule_for(parent: ResourceKind, dependent: ResourceKind) -> Option<OnDelete> {
    DELETE_RULES
        .iter()
        .find(|rule| rule.parent == parent && rule.dependent == dependent)
        .map(|rule| rule.on_delete)
}

// ─────────────────────────────────────────────────────────────────────────────
// Plans
// ─────────────────────────────────────────────────────────────────────────────

/// Root of a deletion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Contact(ContactId),
    Mandate(MandateId),
    Fund(FundId),
    FundCashflow(FundCashflowId),
    Task(TaskId),
    List(ListId),
}

/// One record removal in a computed plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Contact(ContactId),
    Address(AddressId),
    ContactDetail(ContactDetailId),
    ComplianceDetail(ComplianceDetailId),
    TaxDetail(TaxDetailId),
    Relationship(ContactRelationshipId),
    Mandate(MandateId),
    MandateMember(MandateMemberId),
    BankAccount(BankAccountId),
    Document(DocumentId),
    Activity(ActivityId),
    Fund(FundId),
    FundReport(FundReportId),
    FundCashflow(FundCashflowId),
    InvestorCashflow(InvestorCashflowId),
    Task(TaskId),
    TaskComment(TaskCommentId),
    List(ListId),
}

/// One reference to null out in a computed plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nullification {
    MandateConsultants { mandate: MandateId, contact: ContactId },
    UserContact { user: UserId },
    ListMembership { list: ListId, contact: ContactId },
}

/// Complete, not-yet-executed deletion set.
#[derive(Debug, Clone, Default)]
pub struct DeletePlan {
    pub removals: Vec<Removal>,
    pub nullifications: Vec<Nullification>,
}

fn dependents_exist_error(dependent: &str) -> Error {
    Error::validation("base", "dependents_exist", &format!("{dependent} records still reference this record"))
}

/// Collect a document removal, refusing once the retention lock engaged.
fn push_document(
    db: &Database,
    plan: &mut DeletePlan,
    id: DocumentId,
    now: DateTime<Utc>,
) -> Result<(), Error> {
    if let Some(document) = db.documents.get(&id) {
        if document.is_locked(now) {
            return Err(Error::read_only("document", id));
        }
        plan.removals.push(Removal::Document(id));
    }
    Ok(())
}

fn push_activity(
    db: &Database,
    plan: &mut DeletePlan,
    id: ActivityId,
    now: DateTime<Utc>,
) -> Result<(), Error> {
    plan.removals.push(Removal::Activity(id));
    if rule_for(ResourceKind::Activity, ResourceKind::Document) == Some(OnDelete::Cascade) {
        let owned: Vec<DocumentId> = db
            .documents
            .values()
            .filter(|doc| doc.owner == DocumentOwner::Activity(id))
            .map(|doc| doc.id)
            .collect();
        for doc_id in owned {
            push_document(db, plan, doc_id, now)?;
        }
    }
    Ok(())
}

/// Compute the full deletion plan for `target`.
///
/// # Errors
/// Returns [`Error::NotFound`] for a missing root, [`Error::Validation`]
/// (`dependents_exist`) for a restricted edge, and [`Error::ReadOnly`] when
/// the plan would touch a locked document.
pub fn plan_delete(
    db: &Database,
    target: DeleteTarget,
    now: DateTime<Utc>,
) -> Result<DeletePlan, Error> {
    let mut plan = DeletePlan::default();

    match target {
        DeleteTarget::Contact(id) => {
            db.contact(id)?;
            plan_contact(db, &mut plan, id, now)?;
        }
        DeleteTarget::Mandate(id) => {
            db.mandate(id)?;
            plan_mandate(db, &mut plan, id, now)?;
        }
        DeleteTarget::Fund(id) => {
            db.fund(id)?;
            plan_fund(db, &mut plan, id, now)?;
        }
        DeleteTarget::FundCashflow(id) => {
            db.fund_cashflow(id)?;
            plan.removals.extend(
                db.line_items_of(id).map(|item| Removal::InvestorCashflow(item.id)),
            );
            plan.removals.push(Removal::FundCashflow(id));
        }
        DeleteTarget::Task(id) => {
            db.task(id)?;
            plan.removals.extend(
                db.task_comments
                    .values()
                    .filter(|comment| comment.task_id == id)
                    .map(|comment| Removal::TaskComment(comment.id)),
            );
            plan.removals.push(Removal::Task(id));
        }
        DeleteTarget::List(id) => {
            db.list(id)?;
            plan.removals.push(Removal::List(id));
        }
    }

    Ok(plan)
}

fn plan_contact(
    db: &Database,
    plan: &mut DeletePlan,
    id: ContactId,
    now: DateTime<Utc>,
) -> Result<(), Error> {
    plan.removals.extend(
        db.addresses
            .values()
            .filter(|address| address.owner == AddressOwner::Contact(id))
            .map(|address| Removal::Address(address.id)),
    );
    plan.removals.extend(
        db.contact_details
            .values()
            .filter(|detail| detail.contact_id == id)
            .map(|detail| Removal::ContactDetail(detail.id)),
    );
    plan.removals.extend(
        db.compliance_details
            .values()
            .filter(|detail| detail.contact_id == id)
            .map(|detail| Removal::ComplianceDetail(detail.id)),
    );
    plan.removals.extend(
        db.tax_details
            .values()
            .filter(|detail| detail.contact_id == id)
            .map(|detail| Removal::TaxDetail(detail.id)),
    );
    plan.removals.extend(
        db.relationships
            .values()
            .filter(|edge| edge.source_id == id || edge.target_id == id)
            .map(|edge| Removal::Relationship(edge.id)),
    );
    plan.removals.extend(
        db.mandate_members
            .values()
            .filter(|member| member.contact_id == id)
            .map(|member| Removal::MandateMember(member.id)),
    );

    let activities: Vec<ActivityId> = db
        .activities
        .values()
        .filter(|activity| activity.subject == ActivitySubject::Contact(id))
        .map(|activity| activity.id)
        .collect();
    for activity_id in activities {
        push_activity(db, plan, activity_id, now)?;
    }

    let documents: Vec<DocumentId> = db
        .documents
        .values()
        .filter(|doc| doc.owner == DocumentOwner::Contact(id))
        .map(|doc| doc.id)
        .collect();
    for doc_id in documents {
        push_document(db, plan, doc_id, now)?;
    }

    for mandate in db.mandates.values() {
        let referenced = [
            mandate.primary_consultant,
            mandate.secondary_consultant,
            mandate.assistant,
            mandate.bookkeeper,
        ]
        .iter()
        .any(|slot| *slot == Some(id));
        if referenced {
            plan.nullifications.push(Nullification::MandateConsultants {
                mandate: mandate.id,
                contact: id,
            });
        }
    }
    for user in db.users.values() {
        if user.contact_id == Some(id) {
            plan.nullifications.push(Nullification::UserContact { user: user.id });
        }
    }
    for list in db.lists.values() {
        if list.contacts.contains(&id) {
            plan.nullifications.push(Nullification::ListMembership {
                list: list.id,
                contact: id,
            });
        }
    }

    plan.removals.push(Removal::Contact(id));
    Ok(())
}

fn plan_mandate(
    db: &Database,
    plan: &mut DeletePlan,
    id: MandateId,
    now: DateTime<Utc>,
) -> Result<(), Error> {
    if rule_for(ResourceKind::Mandate, ResourceKind::Investor) == Some(OnDelete::Restrict)
        && db.investors.values().any(|investor| investor.mandate_id == id)
    {
        return Err(dependents_exist_error("investor"));
    }

    plan.removals.extend(
        db.mandate_members
            .values()
            .filter(|member| member.mandate_id == id)
            .map(|member| Removal::MandateMember(member.id)),
    );
    plan.removals.extend(
        db.bank_accounts
            .values()
            .filter(|account| account.owner == BankAccountOwner::Mandate(id))
            .map(|account| Removal::BankAccount(account.id)),
    );
    plan.removals.extend(
        db.addresses
            .values()
            .filter(|address| address.owner == AddressOwner::Mandate(id))
            .map(|address| Removal::Address(address.id)),
    );

    let activities: Vec<ActivityId> = db
        .activities
        .values()
        .filter(|activity| activity.subject == ActivitySubject::Mandate(id))
        .map(|activity| activity.id)
        .collect();
    for activity_id in activities {
        push_activity(db, plan, activity_id, now)?;
    }

    let documents: Vec<DocumentId> = db
        .documents
        .values()
        .filter(|doc| doc.owner == DocumentOwner::Mandate(id))
        .map(|doc| doc.id)
        .collect();
    for doc_id in documents {
        push_document(db, plan, doc_id, now)?;
    }

    plan.removals.push(Removal::Mandate(id));
    Ok(())
}

fn plan_fund(
    db: &Database,
    plan: &mut DeletePlan,
    id: FundId,
    now: DateTime<Utc>,
) -> Result<(), Error> {
    if db.investors.values().any(|investor| investor.fund_id == id) {
        return Err(dependents_exist_error("investor"));
    }
    if db.fund_cashflows.values().any(|batch| batch.fund_id == id) {
        return Err(dependents_exist_error("fund_cashflow"));
    }

    plan.removals.extend(
        db.fund_reports
            .values()
            .filter(|report| report.fund_id == id)
            .map(|report| Removal::FundReport(report.id)),
    );
    plan.removals.extend(
        db.bank_accounts
            .values()
            .filter(|account| account.owner == BankAccountOwner::Fund(id))
            .map(|account| Removal::BankAccount(account.id)),
    );
    plan.removals.extend(
        db.addresses
            .values()
            .filter(|address| address.owner == AddressOwner::Fund(id))
            .map(|address| Removal::Address(address.id)),
    );

    let documents: Vec<DocumentId> = db
        .documents
        .values()
        .filter(|doc| doc.owner == DocumentOwner::Fund(id))
        .map(|doc| doc.id)
        .collect();
    for doc_id in documents {
        push_document(db, plan, doc_id, now)?;
    }

    plan.removals.push(Removal::Fund(id));
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Execution
// ─────────────────────────────────────────────────────────────────────────────

/// Execute a computed plan inside a transaction, recording a destroy version
/// for every removed record.
///
/// # Errors
/// Returns [`Error::NotFound`] only for plans computed against a different
/// database state.
pub fn execute_plan(txn: &mut Txn<'_>, actor: UserId, plan: &DeletePlan) -> Result<(), Error> {
    for nullification in &plan.nullifications {
        match *nullification {
            Nullification::MandateConsultants { mandate, contact } => {
                if let Some(record) = txn.db_mut().mandates.get_mut(&mandate) {
                    for slot in [
                        &mut record.primary_consultant,
                        &mut record.secondary_consultant,
                        &mut record.assistant,
                        &mut record.bookkeeper,
                    ] {
                        if *slot == Some(contact) {
                            *slot = None;
                        }
                    }
                }
            }
            Nullification::UserContact { user } => {
                if let Some(record) = txn.db_mut().users.get_mut(&user) {
                    record.contact_id = None;
                }
            }
            Nullification::ListMembership { list, contact } => {
                if let Some(record) = txn.db_mut().lists.get_mut(&list) {
                    record.contacts.remove(&contact);
                }
            }
        }
    }

    for removal in &plan.removals {
        match *removal {
            Removal::Contact(id) => {
                let record = txn.db_mut().contacts.remove(&id).ok_or_else(|| Error::not_found("contact", id))?;
                txn.version_destroyed(&record, Some(actor));
            }
            Removal::Address(id) => {
                if let Some(record) = txn.db_mut().addresses.remove(&id) {
                    txn.version_destroyed(&record, Some(actor));
                }
            }
            Removal::ContactDetail(id) => {
                if let Some(record) = txn.db_mut().contact_details.remove(&id) {
                    txn.version_destroyed(&record, Some(actor));
                }
            }
            Removal::ComplianceDetail(id) => {
                if let Some(record) = txn.db_mut().compliance_details.remove(&id) {
                    txn.version_destroyed(&record, Some(actor));
                }
            }
            Removal::TaxDetail(id) => {
                if let Some(record) = txn.db_mut().tax_details.remove(&id) {
                    txn.version_destroyed(&record, Some(actor));
                }
            }
            Removal::Relationship(id) => {
                if let Some(record) = txn.db_mut().relationships.remove(&id) {
                    txn.version_destroyed(&record, Some(actor));
                }
            }
            Removal::Mandate(id) => {
                let record = txn.db_mut().mandates.remove(&id).ok_or_else(|| Error::not_found("mandate", id))?;
                txn.version_destroyed(&record, Some(actor));
            }
            Removal::MandateMember(id) => {
                if let Some(record) = txn.db_mut().mandate_members.remove(&id) {
                    txn.version_destroyed(&record, Some(actor));
                }
            }
            Removal::BankAccount(id) => {
                if let Some(record) = txn.db_mut().bank_accounts.remove(&id) {
                    txn.version_destroyed(&record, Some(actor));
                }
            }
            Removal::Document(id) => {
                if let Some(record) = txn.db_mut().documents.remove(&id) {
                    txn.version_destroyed(&record, Some(actor));
                }
            }
            Removal::Activity(id) => {
                if let Some(record) = txn.db_mut().activities.remove(&id) {
                    txn.version_destroyed(&record, Some(actor));
                }
            }
            Removal::Fund(id) => {
                let record = txn.db_mut().funds.remove(&id).ok_or_else(|| Error::not_found("fund", id))?;
                txn.version_destroyed(&record, Some(actor));
            }
            Removal::FundReport(id) => {
                if let Some(record) = txn.db_mut().fund_reports.remove(&id) {
                    txn.version_destroyed(&record, Some(actor));
                }
            }
            Removal::FundCashflow(id) => {
                let record = txn.db_mut().fund_cashflows.remove(&id).ok_or_else(|| Error::not_found("fund_cashflow", id))?;
                txn.version_destroyed(&record, Some(actor));
            }
            Removal::InvestorCashflow(id) => {
                if let Some(record) = txn.db_mut().investor_cashflows.remove(&id) {
                    txn.version_destroyed(&record, Some(actor));
                }
            }
            Removal::Task(id) => {
                let record = txn.db_mut().tasks.remove(&id).ok_or_else(|| Error::not_found("task", id))?;
                txn.version_destroyed(&record, Some(actor));
            }
            Removal::TaskComment(id) => {
                if let Some(record) = txn.db_mut().task_comments.remove(&id) {
                    txn.version_destroyed(&record, Some(actor));
                }
            }
            Removal::List(id) => {
                let record = txn.db_mut().lists.remove(&id).ok_or_else(|| Error::not_found("list", id))?;
                txn.version_destroyed(&record, Some(actor));
            }
        }
    }

    Ok(())
}
