//! Activity logging operations.

use abp_core::{Action, Activity, ActivityId, ActivitySubject, Error};

use crate::ops::{Ctx, authorize};
use crate::scope;
use crate::store::{Committed, Store};

/// Log an activity against a contact or mandate. The actor becomes the
/// creator. This is one of the two operations the Ews channel may write.
///
/// # Errors
/// Forbidden without write access to the subject's domain.
pub fn create_activity(
    store: &Store,
    ctx: Ctx,
    mut activity: Activity,
) -> Result<Committed<Activity>, Error> {
    store.mutate(|txn| {
        match activity.subject {
            ActivitySubject::Contact(id) => {
                txn.db().contact(id)?;
            }
            ActivitySubject::Mandate(id) => {
                txn.db().mandate(id)?;
            }
        }
        let target = scope::activity_target(txn.db(), &activity)?;
        authorize(txn.db(), ctx, Action::Write, &target)?;
        activity.creator = ctx.actor;
        activity.validate().into_result()?;

        txn.db_mut().activities.insert(activity.id, activity.clone());
        txn.version_created(&activity, Some(ctx.actor));
        Ok(activity.clone())
    })
}

/// Update an activity through a mutation closure.
///
/// # Errors
/// Forbidden without write access to the subject's domain.
pub fn update_activity(
    store: &Store,
    ctx: Ctx,
    id: ActivityId,
    apply: impl FnOnce(&mut Activity),
) -> Result<Committed<Activity>, Error> {
    store.mutate(|txn| {
        let before = txn.db().activity(id)?.clone();
        let target = scope::activity_target(txn.db(), &before)?;
        authorize(txn.db(), ctx, Action::Write, &target)?;

        let mut after = before.clone();
        apply(&mut after);
        after.id = before.id;
        after.subject = before.subject;
        after.creator = before.creator;
        after.validate().into_result()?;

        txn.db_mut().activities.insert(id, after.clone());
        txn.version_updated(&before, &after, Some(ctx.actor));
        Ok(after)
    })
}
