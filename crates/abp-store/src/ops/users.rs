//! User and user-group administration.

use abp_core::{
    Action, Error, MandateGroup, PermissionTarget, ResourceKind, TargetScope, User, UserGroup,
    UserId,
};

use crate::ops::{Ctx, authorize};
use crate::scope;
use crate::store::{Committed, Store};

/// Create or update a user group (the grant unit of the permission model).
///
/// # Errors
/// Forbidden without `admin`; unknown members or mandate groups abort.
pub fn save_user_group(
    store: &Store,
    ctx: Ctx,
    group: UserGroup,
) -> Result<Committed<UserGroup>, Error> {
    store.mutate(|txn| {
        authorize(txn.db(), ctx, Action::Write, &scope::user_group_target(&group))?;
        group.validate().into_result()?;
        for member in &group.members {
            txn.db().user(*member)?;
        }
        for mandate_group in &group.mandate_groups {
            txn.db().mandate_group(*mandate_group)?;
        }

        let before = txn.db().user_groups.get(&group.id).cloned();
        txn.db_mut().user_groups.insert(group.id, group.clone());
        match before {
            Some(before) => txn.version_updated(&before, &group, Some(ctx.actor)),
            None => txn.version_created(&group, Some(ctx.actor)),
        }
        Ok(group.clone())
    })
}

/// Create or update a mandate group (admin action, like the user groups
/// that reference it).
///
/// # Errors
/// Forbidden without `admin`.
pub fn save_mandate_group(
    store: &Store,
    ctx: Ctx,
    group: MandateGroup,
) -> Result<Committed<MandateGroup>, Error> {
    store.mutate(|txn| {
        let target = PermissionTarget::new(ResourceKind::MandateGroup, TargetScope::Admin);
        authorize(txn.db(), ctx, Action::Write, &target)?;
        group.validate().into_result()?;

        let before = txn.db().mandate_groups.get(&group.id).cloned();
        txn.db_mut().mandate_groups.insert(group.id, group.clone());
        match before {
            Some(before) => txn.version_updated(&before, &group, Some(ctx.actor)),
            None => txn.version_created(&group, Some(ctx.actor)),
        }
        Ok(group.clone())
    })
}

/// Update a user record. Users may update themselves; anyone else needs
/// `admin`.
///
/// # Errors
/// Forbidden for non-self non-admin actors.
pub fn update_user(
    store: &Store,
    ctx: Ctx,
    id: UserId,
    apply: impl FnOnce(&mut User),
) -> Result<Committed<User>, Error> {
    store.mutate(|txn| {
        let before = txn.db().user(id)?.clone();
        authorize(txn.db(), ctx, Action::Write, &scope::user_target(&before))?;

        let mut after = before.clone();
        apply(&mut after);
        after.id = before.id;
        after.validate().into_result()?;

        txn.db_mut().users.insert(id, after.clone());
        txn.version_updated(&before, &after, Some(ctx.actor));
        Ok(after)
    })
}
