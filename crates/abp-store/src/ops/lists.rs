//! Contact list operations.

use abp_core::{Action, Error, List, ListEvent, ListId, apply_list_event};

use crate::ops::{Ctx, authorize};
use crate::scope;
use crate::store::{Committed, Store};

/// Create a list.
///
/// # Errors
/// Forbidden without `contacts_write`; unknown contacts abort.
pub fn create_list(store: &Store, ctx: Ctx, list: List) -> Result<Committed<List>, Error> {
    store.mutate(|txn| {
        authorize(txn.db(), ctx, Action::Write, &scope::list_target(&list))?;
        list.validate().into_result()?;
        for contact_id in &list.contacts {
            txn.db().contact(*contact_id)?;
        }

        txn.db_mut().lists.insert(list.id, list.clone());
        txn.version_created(&list, Some(ctx.actor));
        Ok(list.clone())
    })
}

/// Archive or unarchive a list.
///
/// # Errors
/// Forbidden without `contacts_write`; illegal transitions fail validation.
pub fn transition_list(
    store: &Store,
    ctx: Ctx,
    id: ListId,
    event: ListEvent,
) -> Result<Committed<List>, Error> {
    store.mutate(|txn| {
        let before = txn.db().list(id)?.clone();
        authorize(txn.db(), ctx, Action::Write, &scope::list_target(&before))?;

        let mut after = before.clone();
        apply_list_event(&mut after.state, event)?;

        txn.db_mut().lists.insert(id, after.clone());
        txn.version_updated(&before, &after, Some(ctx.actor));
        Ok(after)
    })
}
