//! Contact aggregate operations.

use abp_core::{
    Action, Address, AddressOwner, ComplianceDetail, Contact, ContactDetail, ContactId,
    ContactRelationship, Error, TaxDetail,
};

use crate::cascade::{self, DeleteTarget};
use crate::ops::{Ctx, authorize};
use crate::scope;
use crate::store::{Committed, Store, Txn};

/// Create a contact.
///
/// # Errors
/// Forbidden without `contacts_write`; validation failures abort the commit.
pub fn create_contact(
    store: &Store,
    ctx: Ctx,
    contact: Contact,
) -> Result<Committed<Contact>, Error> {
    store.mutate(|txn| {
        authorize(txn.db(), ctx, Action::Write, &scope::contact_target(&contact))?;
        contact.validate().into_result()?;
        txn.db_mut().contacts.insert(contact.id, contact.clone());
        txn.version_created(&contact, Some(ctx.actor));
        Ok(contact.clone())
    })
}

/// Update a contact through a mutation closure.
///
/// # Errors
/// Forbidden without `contacts_write`; validation failures abort the commit.
pub fn update_contact(
    store: &Store,
    ctx: Ctx,
    id: ContactId,
    apply: impl FnOnce(&mut Contact),
) -> Result<Committed<Contact>, Error> {
    store.mutate(|txn| {
        let before = txn.db().contact(id)?.clone();
        authorize(txn.db(), ctx, Action::Write, &scope::contact_target(&before))?;

        let mut after = before.clone();
        apply(&mut after);
        after.id = before.id;
        after.updated_at = txn.now();
        after.validate().into_result()?;

        txn.db_mut().contacts.insert(id, after.clone());
        txn.version_updated(&before, &after, Some(ctx.actor));
        Ok(after)
    })
}

/// Delete a contact and everything the cascade table says goes with it.
///
/// # Errors
/// Forbidden without `contacts_destroy`; read-only when a dependent document
/// is past its retention lock.
pub fn delete_contact(store: &Store, ctx: Ctx, id: ContactId) -> Result<Committed<()>, Error> {
    store.mutate(|txn| {
        let contact = txn.db().contact(id)?.clone();
        authorize(txn.db(), ctx, Action::Destroy, &scope::contact_target(&contact))?;

        let plan = cascade::plan_delete(txn.db(), DeleteTarget::Contact(id), txn.now())?;
        cascade::execute_plan(txn, ctx.actor, &plan)
    })
}

/// Create or update an address, maintaining the single-owner designation
/// back-references.
///
/// Saving with `legal_address: true` points the owner at this address and
/// clears the flag on the previously designated one. Saving with
/// `legal_address: false` clears the back-reference only if it currently
/// points here; unsetting via a different address leaves it untouched.
/// `primary_contact_address` behaves the same for contact owners.
///
/// # Errors
/// Forbidden without write access to the owner's domain; validation failures
/// abort the commit.
pub fn save_address(store: &Store, ctx: Ctx, address: Address) -> Result<Committed<Address>, Error> {
    store.mutate(|txn| {
        let target = scope::address_target(txn.db(), &address)?;
        authorize(txn.db(), ctx, Action::Write, &target)?;
        address.validate().into_result()?;

        let before = txn.db().addresses.get(&address.id).cloned();
        txn.db_mut().addresses.insert(address.id, address.clone());
        apply_designations(txn, &address)?;

        match before {
            Some(before) => txn.version_updated(&before, &address, Some(ctx.actor)),
            None => txn.version_created(&address, Some(ctx.actor)),
        }
        Ok(address.clone())
    })
}

fn apply_designations(txn: &mut Txn<'_>, address: &Address) -> Result<(), Error> {
    let id = address.id;

    // Resolve the owner's current designation slots, swap, and clear the
    // flag on the address losing the designation.
    match address.owner {
        AddressOwner::Contact(owner_id) => {
            let contact = txn.db().contact(owner_id)?.clone();
            let legal = swap_slot(txn, contact.legal_address, address.legal_address, id, true)?;
            let primary = swap_slot(
                txn,
                contact.primary_contact_address,
                address.primary_contact_address,
                id,
                false,
            )?;
            let record = txn
                .db_mut()
                .contacts
                .get_mut(&owner_id)
                .ok_or_else(|| Error::not_found("contact", owner_id))?;
            record.legal_address = legal;
            record.primary_contact_address = primary;
        }
        AddressOwner::Mandate(owner_id) => {
            let mandate = txn.db().mandate(owner_id)?.clone();
            let legal = swap_slot(txn, mandate.legal_address, address.legal_address, id, true)?;
            let record = txn
                .db_mut()
                .mandates
                .get_mut(&owner_id)
                .ok_or_else(|| Error::not_found("mandate", owner_id))?;
            record.legal_address = legal;
        }
        AddressOwner::Fund(owner_id) => {
            let fund = txn.db().fund(owner_id)?.clone();
            let legal = swap_slot(txn, fund.legal_address, address.legal_address, id, true)?;
            let record = txn
                .db_mut()
                .funds
                .get_mut(&owner_id)
                .ok_or_else(|| Error::not_found("fund", owner_id))?;
            record.legal_address = legal;
        }
    }
    Ok(())
}

fn swap_slot(
    txn: &mut Txn<'_>,
    current: Option<abp_core::AddressId>,
    requested: bool,
    id: abp_core::AddressId,
    legal: bool,
) -> Result<Option<abp_core::AddressId>, Error> {
    if requested {
        if let Some(previous) = current {
            if previous != id {
                if let Some(other) = txn.db_mut().addresses.get_mut(&previous) {
                    if legal {
                        other.legal_address = false;
                    } else {
                        other.primary_contact_address = false;
                    }
                }
            }
        }
        Ok(Some(id))
    } else if current == Some(id) {
        Ok(None)
    } else {
        Ok(current)
    }
}

/// Create a contact detail.
///
/// # Errors
/// Forbidden without `contacts_write`; validation failures abort the commit.
pub fn create_contact_detail(
    store: &Store,
    ctx: Ctx,
    detail: ContactDetail,
) -> Result<Committed<ContactDetail>, Error> {
    store.mutate(|txn| {
        let contact = txn.db().contact(detail.contact_id)?.clone();
        authorize(txn.db(), ctx, Action::Write, &scope::contact_target(&contact))?;
        detail.validate().into_result()?;
        txn.db_mut().contact_details.insert(detail.id, detail.clone());
        txn.version_created(&detail, Some(ctx.actor));
        Ok(detail.clone())
    })
}

/// Create or replace the compliance profile of a contact (1:1).
///
/// # Errors
/// Forbidden without `contacts_write`.
pub fn save_compliance_detail(
    store: &Store,
    ctx: Ctx,
    detail: ComplianceDetail,
) -> Result<Committed<ComplianceDetail>, Error> {
    store.mutate(|txn| {
        let contact = txn.db().contact(detail.contact_id)?.clone();
        authorize(txn.db(), ctx, Action::Write, &scope::contact_target(&contact))?;

        let before = txn
            .db()
            .compliance_details
            .values()
            .find(|existing| existing.contact_id == detail.contact_id)
            .cloned();
        if let Some(ref existing) = before {
            txn.db_mut().compliance_details.remove(&existing.id);
        }
        txn.db_mut().compliance_details.insert(detail.id, detail.clone());
        match before {
            Some(before) => txn.version_updated(&before, &detail, Some(ctx.actor)),
            None => txn.version_created(&detail, Some(ctx.actor)),
        }
        Ok(detail.clone())
    })
}

/// Create or replace the tax profile of a contact (1:1).
///
/// # Errors
/// Forbidden without `contacts_write`; validation failures abort the commit.
pub fn save_tax_detail(
    store: &Store,
    ctx: Ctx,
    detail: TaxDetail,
) -> Result<Committed<TaxDetail>, Error> {
    store.mutate(|txn| {
        let contact = txn.db().contact(detail.contact_id)?.clone();
        authorize(txn.db(), ctx, Action::Write, &scope::contact_target(&contact))?;
        detail.validate().into_result()?;

        let before = txn
            .db()
            .tax_details
            .values()
            .find(|existing| existing.contact_id == detail.contact_id)
            .cloned();
        if let Some(ref existing) = before {
            txn.db_mut().tax_details.remove(&existing.id);
        }
        txn.db_mut().tax_details.insert(detail.id, detail.clone());
        match before {
            Some(before) => txn.version_updated(&before, &detail, Some(ctx.actor)),
            None => txn.version_created(&detail, Some(ctx.actor)),
        }
        Ok(detail.clone())
    })
}

/// Create a typed relationship between two contacts, validating the role
/// against the pairing's vocabulary.
///
/// # Errors
/// Forbidden without `contacts_write`; an out-of-vocabulary role fails
/// validation.
pub fn create_relationship(
    store: &Store,
    ctx: Ctx,
    relationship: ContactRelationship,
) -> Result<Committed<ContactRelationship>, Error> {
    store.mutate(|txn| {
        authorize(
            txn.db(),
            ctx,
            Action::Write,
            &scope::relationship_target(&relationship),
        )?;
        let source = txn.db().contact(relationship.source_id)?;
        let target = txn.db().contact(relationship.target_id)?;
        relationship.validate(source, target).into_result()?;

        txn.db_mut()
            .relationships
            .insert(relationship.id, relationship.clone());
        txn.version_created(&relationship, Some(ctx.actor));
        Ok(relationship.clone())
    })
}
