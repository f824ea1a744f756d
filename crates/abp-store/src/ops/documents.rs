//! Document operations with the retention lock.

use abp_core::{Action, Document, DocumentId, Error};

use crate::ops::{Ctx, authorize};
use crate::scope;
use crate::store::{Committed, Store};

/// Upload a document. `uploaded_at` is stamped by the transaction.
///
/// # Errors
/// Forbidden without write access to the owner's domain.
pub fn create_document(
    store: &Store,
    ctx: Ctx,
    mut document: Document,
) -> Result<Committed<Document>, Error> {
    store.mutate(|txn| {
        let target = scope::document_target(txn.db(), &document)?;
        authorize(txn.db(), ctx, Action::Write, &target)?;
        document.uploaded_at = txn.now();
        document.validate().into_result()?;

        txn.db_mut().documents.insert(document.id, document.clone());
        txn.version_created(&document, Some(ctx.actor));
        Ok(document.clone())
    })
}

/// Correct a document's metadata within the retention window.
///
/// # Errors
/// Read-only once the record is older than the 24-hour lock, regardless of
/// role; forbidden without write access to the owner's domain.
pub fn update_document(
    store: &Store,
    ctx: Ctx,
    id: DocumentId,
    apply: impl FnOnce(&mut Document),
) -> Result<Committed<Document>, Error> {
    store.mutate(|txn| {
        let before = txn.db().document(id)?.clone();
        let target = scope::document_target(txn.db(), &before)?;
        authorize(txn.db(), ctx, Action::Write, &target)?;
        if before.is_locked(txn.now()) {
            return Err(Error::read_only("document", id));
        }

        let mut after = before.clone();
        apply(&mut after);
        after.id = before.id;
        after.owner = before.owner;
        after.uploaded_at = before.uploaded_at;
        after.validate().into_result()?;

        txn.db_mut().documents.insert(id, after.clone());
        txn.version_updated(&before, &after, Some(ctx.actor));
        Ok(after)
    })
}

/// Remove a document within the retention window.
///
/// # Errors
/// Read-only once the record is older than the 24-hour lock; forbidden
/// without destroy access to the owner's domain.
pub fn delete_document(store: &Store, ctx: Ctx, id: DocumentId) -> Result<Committed<()>, Error> {
    store.mutate(|txn| {
        let document = txn.db().document(id)?.clone();
        let target = scope::document_target(txn.db(), &document)?;
        authorize(txn.db(), ctx, Action::Destroy, &target)?;
        if document.is_locked(txn.now()) {
            return Err(Error::read_only("document", id));
        }

        txn.db_mut().documents.remove(&id);
        txn.version_destroyed(&document, Some(ctx.actor));
        Ok(())
    })
}
