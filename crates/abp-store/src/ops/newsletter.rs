//! Newsletter double-opt-in operations.
//!
//! Subscription and confirmation arrive unauthenticated (the public site and
//! the mailed token link); administration requires `admin`.

use abp_core::{
    Action, Error, NewsletterSubscriber, SubscriberId, confirm_subscriber,
    send_subscriber_confirmation,
};

use crate::ops::{Ctx, authorize};
use crate::scope;
use crate::store::{Committed, Store};

/// Public signup. No actor, no permission check.
///
/// # Errors
/// Validation failures abort the commit; a duplicate email conflicts.
pub fn subscribe(
    store: &Store,
    subscriber: NewsletterSubscriber,
) -> Result<Committed<NewsletterSubscriber>, Error> {
    store.mutate(|txn| {
        subscriber.validate().into_result()?;
        let duplicate = txn
            .db()
            .subscribers
            .values()
            .any(|existing| existing.email == subscriber.email);
        if duplicate {
            return Err(Error::validation("email", "taken", "is already subscribed"));
        }

        txn.db_mut().subscribers.insert(subscriber.id, subscriber.clone());
        txn.version_created(&subscriber, None);
        Ok(subscriber.clone())
    })
}

/// Send the confirmation mail (admin action). The mail job is returned with
/// the commit for post-commit dispatch.
///
/// # Errors
/// Forbidden without `admin`; re-sending after confirmation fails
/// validation.
pub fn send_confirmation(
    store: &Store,
    ctx: Ctx,
    id: SubscriberId,
) -> Result<Committed<NewsletterSubscriber>, Error> {
    store.mutate(|txn| {
        let before = txn.db().subscriber(id)?.clone();
        authorize(txn.db(), ctx, Action::Write, &scope::subscriber_target(&before))?;

        let mut after = before.clone();
        let job = send_subscriber_confirmation(&mut after, txn.now())?;

        txn.db_mut().subscribers.insert(id, after.clone());
        txn.version_updated(&before, &after, Some(ctx.actor));
        txn.enqueue(job);
        Ok(after)
    })
}

/// Confirm via the mailed token. Unauthenticated; an unknown token is a
/// not-found, distinct from validation failures.
///
/// # Errors
/// [`Error::NotFound`] for unknown tokens; illegal transitions fail
/// validation.
pub fn confirm(store: &Store, token: &str) -> Result<Committed<NewsletterSubscriber>, Error> {
    store.mutate(|txn| {
        let before = txn.db().subscriber_by_token(token)?.clone();

        let mut after = before.clone();
        let job = confirm_subscriber(&mut after, txn.now())?;

        txn.db_mut().subscribers.insert(after.id, after.clone());
        txn.version_updated(&before, &after, None);
        txn.enqueue(job);
        Ok(after)
    })
}
