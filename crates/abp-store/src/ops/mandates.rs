//! Mandate aggregate operations.

use abp_core::{
    Action, ContactId, Error, Mandate, MandateEvent, MandateId, MandateMember, MandateMemberId,
    MemberKind, apply_mandate_event,
};

use crate::cascade::{self, DeleteTarget};
use crate::ops::{Ctx, authorize};
use crate::scope;
use crate::store::{Committed, Store};

fn check_organization_group(
    db: &crate::database::Database,
    mandate: &Mandate,
) -> Result<(), Error> {
    for group_id in &mandate.groups {
        db.mandate_group(*group_id)?;
    }
    if db.mandate_has_organization_group(mandate) {
        Ok(())
    } else {
        Err(Error::validation(
            "groups",
            "organization_group_missing",
            "must include at least one organization mandate group",
        ))
    }
}

/// Create a mandate with its nested owner members in one commit.
///
/// # Errors
/// Forbidden without `mandates_write` scoped to one of the mandate's groups;
/// a missing organization-kind group or unknown owner contact aborts the
/// whole commit.
pub fn create_mandate(
    store: &Store,
    ctx: Ctx,
    mandate: Mandate,
    owners: Vec<ContactId>,
) -> Result<Committed<Mandate>, Error> {
    store.mutate(|txn| {
        authorize(txn.db(), ctx, Action::Write, &scope::mandate_target(&mandate))?;
        mandate.validate().into_result()?;
        check_organization_group(txn.db(), &mandate)?;

        txn.db_mut().mandates.insert(mandate.id, mandate.clone());
        txn.version_created(&mandate, Some(ctx.actor));

        for contact_id in owners {
            txn.db().contact(contact_id)?;
            let member = MandateMember {
                id: MandateMemberId::generate(),
                mandate_id: mandate.id,
                contact_id,
                kind: MemberKind::Owner,
            };
            txn.db_mut().mandate_members.insert(member.id, member.clone());
            txn.version_created(&member, Some(ctx.actor));
        }

        Ok(mandate.clone())
    })
}

/// Update a mandate through a mutation closure. The state field is owned by
/// the lifecycle machine; use [`transition_mandate`] for it.
///
/// # Errors
/// Forbidden without `mandates_write` scoped to the mandate's groups (the
/// pre-update groups decide).
pub fn update_mandate(
    store: &Store,
    ctx: Ctx,
    id: MandateId,
    apply: impl FnOnce(&mut Mandate),
) -> Result<Committed<Mandate>, Error> {
    store.mutate(|txn| {
        let before = txn.db().mandate(id)?.clone();
        authorize(txn.db(), ctx, Action::Write, &scope::mandate_target(&before))?;

        let mut after = before.clone();
        apply(&mut after);
        after.id = before.id;
        after.state = before.state;
        after.validate().into_result()?;
        check_organization_group(txn.db(), &after)?;

        txn.db_mut().mandates.insert(id, after.clone());
        txn.version_updated(&before, &after, Some(ctx.actor));
        Ok(after)
    })
}

/// Fire a mandate lifecycle event.
///
/// # Errors
/// Forbidden without `mandates_write`; guard and transition failures come
/// back as validation errors with the mandate unchanged.
pub fn transition_mandate(
    store: &Store,
    ctx: Ctx,
    id: MandateId,
    event: MandateEvent,
) -> Result<Committed<Mandate>, Error> {
    store.mutate(|txn| {
        let before = txn.db().mandate(id)?.clone();
        authorize(txn.db(), ctx, Action::Write, &scope::mandate_target(&before))?;

        let mut after = before.clone();
        apply_mandate_event(&mut after, event)?;

        txn.db_mut().mandates.insert(id, after.clone());
        txn.version_updated(&before, &after, Some(ctx.actor));
        Ok(after)
    })
}

/// Delete a mandate and its cascade set.
///
/// # Errors
/// Forbidden without `mandates_destroy`; investors referencing the mandate
/// restrict the delete.
pub fn delete_mandate(store: &Store, ctx: Ctx, id: MandateId) -> Result<Committed<()>, Error> {
    store.mutate(|txn| {
        let mandate = txn.db().mandate(id)?.clone();
        authorize(txn.db(), ctx, Action::Destroy, &scope::mandate_target(&mandate))?;

        let plan = cascade::plan_delete(txn.db(), DeleteTarget::Mandate(id), txn.now())?;
        cascade::execute_plan(txn, ctx.actor, &plan)
    })
}
