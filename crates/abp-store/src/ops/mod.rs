//! Request-scoped operations.
//!
//! Every operation follows the same sequence: resolve the actor's grants,
//! authorize (a denial short-circuits before any write and surfaces as the
//! opaque `forbidden` error), validate, mutate plus append versions, commit.
//! Jobs staged during the transaction come back in [`crate::Committed`] for
//! fire-and-forget dispatch.

pub mod activities;
pub mod bank_accounts;
pub mod contacts;
pub mod documents;
pub mod funds;
pub mod history;
pub mod lists;
pub mod mandates;
pub mod newsletter;
pub mod tasks;
pub mod users;

use abp_core::{
    Action, Channel, Error, PermissionTarget, ResolvedGrants, UserId, evaluate, resolve_grants,
};

use crate::database::Database;

/// Request context: the authenticated actor and the channel it came in on.
#[derive(Debug, Clone, Copy)]
pub struct Ctx {
    pub actor: UserId,
    pub channel: Channel,
}

impl Ctx {
    #[must_use]
    pub const fn new(actor: UserId) -> Self {
        Self {
            actor,
            channel: Channel::Standard,
        }
    }

    #[must_use]
    pub const fn via_ews(actor: UserId) -> Self {
        Self {
            actor,
            channel: Channel::Ews,
        }
    }
}

/// Resolve the actor's grants from current group memberships. Runs fresh on
/// every request; nothing is cached across requests.
#[must_use]
pub fn grants_for(db: &Database, actor: UserId) -> ResolvedGrants {
    resolve_grants(actor, db.groups_of(actor))
}

/// Authorize one action, short-circuiting before any mutation.
///
/// # Errors
/// Returns [`Error::Forbidden`] on deny.
pub(crate) fn authorize(
    db: &Database,
    ctx: Ctx,
    action: Action,
    target: &PermissionTarget,
) -> Result<(), Error> {
    let grants = grants_for(db, ctx.actor);
    evaluate(&grants, ctx.actor, ctx.channel, action, target).into_result()
}
