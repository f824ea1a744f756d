//! Permission-filtered list queries.
//!
//! Index queries run every candidate through the same evaluator as the
//! single-record checks, and the reported total reflects the filtered set;
//! a caller must not be able to infer hidden records from count metadata.

use abp_audit::Page;
use abp_core::{
    Action, Channel, Contact, Fund, Mandate, PermissionTarget, ResolvedGrants, Task, UserId,
    evaluate,
};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::scope;

/// One page of a filtered index query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub records: Vec<T>,
    /// Count of the permission-filtered set, not the table.
    pub total_record_count: usize,
}

fn paginate<T>(records: Vec<T>, page: Page) -> PageResult<T> {
    let total_record_count = records.len();
    let records = records.into_iter().skip(page.offset()).take(page.size).collect();
    PageResult {
        records,
        total_record_count,
    }
}

fn filter_visible<T: Clone>(
    grants: &ResolvedGrants,
    actor: UserId,
    channel: Channel,
    candidates: impl Iterator<Item = T>,
    target_of: impl Fn(&T) -> PermissionTarget,
    page: Page,
) -> PageResult<T> {
    let visible: Vec<T> = candidates
        .filter(|record| {
            evaluate(grants, actor, channel, Action::Read, &target_of(record)).is_allow()
        })
        .collect();
    paginate(visible, page)
}

/// Mandates visible to the actor.
#[must_use]
pub fn list_mandates(
    db: &Database,
    grants: &ResolvedGrants,
    actor: UserId,
    channel: Channel,
    page: Page,
) -> PageResult<Mandate> {
    filter_visible(
        grants,
        actor,
        channel,
        db.mandates.values().cloned(),
        scope::mandate_target,
        page,
    )
}

/// Contacts visible to the actor.
#[must_use]
pub fn list_contacts(
    db: &Database,
    grants: &ResolvedGrants,
    actor: UserId,
    channel: Channel,
    page: Page,
) -> PageResult<Contact> {
    filter_visible(
        grants,
        actor,
        channel,
        db.contacts.values().cloned(),
        scope::contact_target,
        page,
    )
}

/// Funds visible to the actor.
#[must_use]
pub fn list_funds(
    db: &Database,
    grants: &ResolvedGrants,
    actor: UserId,
    channel: Channel,
    page: Page,
) -> PageResult<Fund> {
    filter_visible(
        grants,
        actor,
        channel,
        db.funds.values().cloned(),
        scope::fund_target,
        page,
    )
}

/// Tasks visible to the actor (participants only, roles irrelevant).
#[must_use]
pub fn list_tasks(
    db: &Database,
    grants: &ResolvedGrants,
    actor: UserId,
    channel: Channel,
    page: Page,
) -> PageResult<Task> {
    filter_visible(
        grants,
        actor,
        channel,
        db.tasks.values().cloned(),
        scope::task_target,
        page,
    )
}
