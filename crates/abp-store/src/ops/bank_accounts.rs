//! Bank account operations.

use abp_core::{Action, BankAccount, BankAccountId, BankAccountOwner, Error};

use crate::ops::{Ctx, authorize};
use crate::scope;
use crate::store::{Committed, Store};

/// Create a bank account under a mandate or fund, enforcing the
/// exactly-one-identifier-pair rule.
///
/// # Errors
/// Forbidden without write access to the owner's domain; mixing or omitting
/// both identifier pairs fails validation.
pub fn create_bank_account(
    store: &Store,
    ctx: Ctx,
    account: BankAccount,
) -> Result<Committed<BankAccount>, Error> {
    store.mutate(|txn| {
        match account.owner {
            BankAccountOwner::Mandate(id) => {
                txn.db().mandate(id)?;
            }
            BankAccountOwner::Fund(id) => {
                txn.db().fund(id)?;
            }
        }
        let target = scope::bank_account_target(txn.db(), &account)?;
        authorize(txn.db(), ctx, Action::Write, &target)?;
        account.validate().into_result()?;

        txn.db_mut().bank_accounts.insert(account.id, account.clone());
        txn.version_created(&account, Some(ctx.actor));
        Ok(account.clone())
    })
}

/// Update a bank account through a mutation closure.
///
/// # Errors
/// Forbidden without write access to the owner's domain; validation failures
/// abort the commit.
pub fn update_bank_account(
    store: &Store,
    ctx: Ctx,
    id: BankAccountId,
    apply: impl FnOnce(&mut BankAccount),
) -> Result<Committed<BankAccount>, Error> {
    store.mutate(|txn| {
        let before = txn.db().bank_account(id)?.clone();
        let target = scope::bank_account_target(txn.db(), &before)?;
        authorize(txn.db(), ctx, Action::Write, &target)?;

        let mut after = before.clone();
        apply(&mut after);
        after.id = before.id;
        after.owner = before.owner;
        after.validate().into_result()?;

        txn.db_mut().bank_accounts.insert(id, after.clone());
        txn.version_updated(&before, &after, Some(ctx.actor));
        Ok(after)
    })
}
