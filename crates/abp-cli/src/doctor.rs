//! `abp doctor` command implementation.
//!
//! Referential-invariant checks over a snapshot: dangling ownership edges,
//! mandates without an organization group, signed investors missing their
//! paperwork, and cross-field state invariants.

use std::path::PathBuf;

use abp_core::{
    ActivitySubject, AddressOwner, BankAccountOwner, DocumentOwner, InvestorState,
    SubscriberState, TaskState,
};
use abp_store::Database;
use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::snapshot;

/// Arguments for `abp doctor`.
#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Database snapshot (JSON).
    #[arg(long)]
    pub snapshot: PathBuf,
}

/// One failed invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Stable finding code, e.g. `dangling_reference`.
    pub code: &'static str,
    /// Record the finding is about, as `kind:id`.
    pub item: String,
    pub message: String,
}

/// Full doctor report.
#[derive(Debug, Serialize)]
pub struct DoctorReport {
    pub findings: Vec<Finding>,
    pub checked_records: usize,
}

impl DoctorReport {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Run `abp doctor`.
///
/// # Errors
/// Fails only on unreadable snapshots; findings are data, not errors.
pub fn run(args: &DoctorArgs) -> Result<DoctorReport> {
    let db = snapshot::load(&args.snapshot)?;
    Ok(check(&db))
}

fn dangling(item: String, edge: &str) -> Finding {
    Finding {
        code: "dangling_reference",
        item,
        message: format!("{edge} references a missing record"),
    }
}

/// Run every invariant check against a database.
#[must_use]
pub fn check(db: &Database) -> DoctorReport {
    let mut findings = Vec::new();
    let mut checked_records = 0usize;

    for mandate in db.mandates.values() {
        checked_records += 1;
        let item = format!("mandate:{}", mandate.id);
        let mut has_organization_group = false;
        for group_id in &mandate.groups {
            match db.mandate_groups.get(group_id) {
                Some(group) => {
                    has_organization_group |=
                        group.kind == abp_core::MandateGroupKind::Organization;
                }
                None => findings.push(dangling(item.clone(), "groups")),
            }
        }
        if !has_organization_group {
            findings.push(Finding {
                code: "organization_group_missing",
                item: item.clone(),
                message: "mandate belongs to no organization mandate group".to_string(),
            });
        }
        for (edge, slot) in [
            ("primary_consultant", mandate.primary_consultant),
            ("secondary_consultant", mandate.secondary_consultant),
            ("assistant", mandate.assistant),
            ("bookkeeper", mandate.bookkeeper),
        ] {
            if let Some(contact_id) = slot {
                if !db.contacts.contains_key(&contact_id) {
                    findings.push(dangling(item.clone(), edge));
                }
            }
        }
    }

    for investor in db.investors.values() {
        checked_records += 1;
        let item = format!("investor:{}", investor.id);
        if !db.funds.contains_key(&investor.fund_id) {
            findings.push(dangling(item.clone(), "fund_id"));
        }
        if !db.mandates.contains_key(&investor.mandate_id) {
            findings.push(dangling(item.clone(), "mandate_id"));
        }
        if investor.state == InvestorState::Signed {
            if investor.investment_date.is_none() {
                findings.push(Finding {
                    code: "signed_without_investment_date",
                    item: item.clone(),
                    message: "signed investor has no investment date".to_string(),
                });
            }
            match investor.fund_subscription_agreement {
                None => findings.push(Finding {
                    code: "signed_without_agreement",
                    item: item.clone(),
                    message: "signed investor has no subscription agreement".to_string(),
                }),
                Some(document_id) if !db.documents.contains_key(&document_id) => {
                    findings.push(dangling(item.clone(), "fund_subscription_agreement"));
                }
                Some(_) => {}
            }
        }
    }

    for cashflow in db.investor_cashflows.values() {
        checked_records += 1;
        let item = format!("investor_cashflow:{}", cashflow.id);
        match db.fund_cashflows.get(&cashflow.fund_cashflow_id) {
            None => findings.push(dangling(item.clone(), "fund_cashflow_id")),
            Some(batch) => {
                if let Some(investor) = db.investors.get(&cashflow.investor_id) {
                    if investor.fund_id != batch.fund_id {
                        findings.push(Finding {
                            code: "fund_mismatch",
                            item: item.clone(),
                            message: "line item investor belongs to a different fund".to_string(),
                        });
                    }
                } else {
                    findings.push(dangling(item.clone(), "investor_id"));
                }
            }
        }
    }

    for document in db.documents.values() {
        checked_records += 1;
        let item = format!("document:{}", document.id);
        let exists = match document.owner {
            DocumentOwner::Contact(id) => db.contacts.contains_key(&id),
            DocumentOwner::Mandate(id) => db.mandates.contains_key(&id),
            DocumentOwner::Fund(id) => db.funds.contains_key(&id),
            DocumentOwner::Activity(id) => db.activities.contains_key(&id),
        };
        if !exists {
            findings.push(dangling(item, "owner"));
        }
    }

    for address in db.addresses.values() {
        checked_records += 1;
        let item = format!("address:{}", address.id);
        let exists = match address.owner {
            AddressOwner::Contact(id) => db.contacts.contains_key(&id),
            AddressOwner::Mandate(id) => db.mandates.contains_key(&id),
            AddressOwner::Fund(id) => db.funds.contains_key(&id),
        };
        if !exists {
            findings.push(dangling(item, "owner"));
        }
    }

    for account in db.bank_accounts.values() {
        checked_records += 1;
        let item = format!("bank_account:{}", account.id);
        let exists = match account.owner {
            BankAccountOwner::Mandate(id) => db.mandates.contains_key(&id),
            BankAccountOwner::Fund(id) => db.funds.contains_key(&id),
        };
        if !exists {
            findings.push(dangling(item, "owner"));
        }
    }

    for activity in db.activities.values() {
        checked_records += 1;
        let item = format!("activity:{}", activity.id);
        let exists = match activity.subject {
            ActivitySubject::Contact(id) => db.contacts.contains_key(&id),
            ActivitySubject::Mandate(id) => db.mandates.contains_key(&id),
        };
        if !exists {
            findings.push(dangling(item, "subject"));
        }
    }

    for relationship in db.relationships.values() {
        checked_records += 1;
        let item = format!("contact_relationship:{}", relationship.id);
        if !db.contacts.contains_key(&relationship.source_id)
            || !db.contacts.contains_key(&relationship.target_id)
        {
            findings.push(dangling(item, "contacts"));
        }
    }

    for task in db.tasks.values() {
        checked_records += 1;
        let item = format!("task:{}", task.id);
        if task.state == TaskState::Finished
            && (task.finisher.is_none() || task.finished_at.is_none())
        {
            findings.push(Finding {
                code: "finished_without_finisher",
                item,
                message: "finished task is missing finisher or finished_at".to_string(),
            });
        }
    }

    for subscriber in db.subscribers.values() {
        checked_records += 1;
        if subscriber.state == SubscriberState::Confirmed && subscriber.confirmed_at.is_none() {
            findings.push(Finding {
                code: "confirmed_without_timestamp",
                item: format!("newsletter_subscriber:{}", subscriber.id),
                message: "confirmed subscriber has no confirmed_at".to_string(),
            });
        }
    }

    DoctorReport {
        findings,
        checked_records,
    }
}
