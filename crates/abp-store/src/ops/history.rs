//! Aggregate timeline queries.

use abp_audit::{HistoryPage, Page, SortOrder, history_for};
use abp_core::{Action, Error, ResourceKind};

use crate::ops::{Ctx, authorize};
use crate::scope;
use crate::store::Store;

/// The merged version timeline of an aggregate: its own entries plus every
/// child declaring it as parent, time-ordered and paginated.
///
/// # Errors
/// Forbidden unless the actor may read the aggregate itself; not-found for
/// unknown aggregates.
pub fn history(
    store: &Store,
    ctx: Ctx,
    kind: ResourceKind,
    id: &str,
    page: Page,
    sort: SortOrder,
) -> Result<HistoryPage, Error> {
    store.read(|db| {
        let target = scope::history_target(db, kind, id)?;
        authorize(db, ctx, Action::Read, &target)?;
        Ok(history_for(kind, id, &db.versions, page, sort))
    })
}
