//! Cascade deletion plans end to end.

use abp_core::{
    Address, AddressId, AddressOwner, ContactDetail, ContactDetailCategory, ContactDetailId,
    Error, InvestorState, MandateGroupKind, Role,
};
use abp_store::ops::contacts::delete_contact;
use abp_store::ops::mandates::delete_mandate;
use abp_store::{Ctx, DeleteTarget, Store, StoreConfig, plan_delete};
use abp_testkit::Fixture;
use chrono::Utc;
use pretty_assertions::assert_eq;

#[test]
fn deleting_a_contact_cascades_dependents_and_nullifies_references() {
    let mut fixture = Fixture::new();
    let user = fixture.user("backoffice@aurum.dev");
    fixture.user_group(user, &[Role::ContactsWrite, Role::ContactsDestroy], &[]);
    let contact = fixture.person("Clara", "Client");

    let address_id = AddressId::generate();
    fixture.db.addresses.insert(
        address_id,
        Address {
            id: address_id,
            owner: AddressOwner::Contact(contact),
            street_and_number: "Zeil 1".to_string(),
            addition: None,
            postal_code: "60313".to_string(),
            city: "Frankfurt".to_string(),
            country: "DE".to_string(),
            legal_address: false,
            primary_contact_address: false,
        },
    );
    let detail_id = ContactDetailId::generate();
    fixture.db.contact_details.insert(
        detail_id,
        ContactDetail {
            id: detail_id,
            contact_id: contact,
            category: ContactDetailCategory::Email,
            value: "clara@example.org".to_string(),
            primary: true,
        },
    );

    // The contact is also a consultant on a mandate; that reference must be
    // nulled, not cascaded.
    let group = fixture.mandate_group("Org", MandateGroupKind::Organization);
    let mandate = fixture.mandate("Mandate", &[group]);
    fixture
        .db
        .mandates
        .get_mut(&mandate)
        .expect("mandate")
        .assistant = Some(contact);

    let store = Store::with_database(fixture.db, StoreConfig::default());
    delete_contact(&store, Ctx::new(user), contact).expect("delete");

    store.read(|db| {
        assert!(!db.contacts.contains_key(&contact));
        assert!(db.addresses.is_empty());
        assert!(db.contact_details.is_empty());
        assert_eq!(db.mandates.get(&mandate).expect("mandate").assistant, None);
        // One destroy version per removed record.
        assert_eq!(db.versions.len(), 3);
    });
}

#[test]
fn mandates_with_investors_are_delete_restricted() {
    let mut fixture = Fixture::new();
    let user = fixture.user("backoffice@aurum.dev");
    let group = fixture.mandate_group("Org", MandateGroupKind::Organization);
    let mandate = fixture.mandate("Mandate", &[group]);
    fixture.user_group(
        user,
        &[Role::MandatesRead, Role::MandatesWrite, Role::MandatesDestroy],
        &[group],
    );
    let fund = fixture.fund("Aurum Growth I");
    fixture.investor(fund, mandate, InvestorState::Signed);

    let store = Store::with_database(fixture.db, StoreConfig::default());
    let result = delete_mandate(&store, Ctx::new(user), mandate);

    match result {
        Err(Error::Validation(errors)) => {
            assert_eq!(errors.errors()[0].code, "dependents_exist");
        }
        other => panic!("expected restricted delete, got {other:?}"),
    }
    store.read(|db| assert!(db.mandates.contains_key(&mandate)));
}

#[test]
fn fund_plans_are_restricted_by_cashflows() {
    let mut fixture = Fixture::new();
    let fund = fixture.fund("Aurum Growth I");
    let batch_id = abp_core::FundCashflowId::generate();
    fixture.db.fund_cashflows.insert(
        batch_id,
        abp_core::FundCashflow {
            id: batch_id,
            fund_id: fund,
            number: 1,
            valuta_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"),
            description: None,
        },
    );

    let result = plan_delete(&fixture.db, DeleteTarget::Fund(fund), Utc::now());
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[test]
fn plans_are_computed_before_any_delete_executes() {
    // A locked document anywhere in the cascade set aborts the whole plan,
    // leaving every other dependent in place.
    let mut fixture = Fixture::new();
    let user = fixture.user("backoffice@aurum.dev");
    fixture.user_group(user, &[Role::ContactsWrite, Role::ContactsDestroy], &[]);
    let contact = fixture.person("Clara", "Client");

    let detail_id = ContactDetailId::generate();
    fixture.db.contact_details.insert(
        detail_id,
        ContactDetail {
            id: detail_id,
            contact_id: contact,
            category: ContactDetailCategory::Phone,
            value: "+49 69 1234".to_string(),
            primary: true,
        },
    );
    let document_id = abp_core::DocumentId::generate();
    fixture.db.documents.insert(
        document_id,
        abp_core::Document {
            id: document_id,
            owner: abp_core::DocumentOwner::Contact(contact),
            name: "statement.pdf".to_string(),
            category: abp_core::DocumentCategory::Report,
            uploaded_at: Utc::now() - chrono::Duration::days(30),
            valid_from: None,
            valid_to: None,
        },
    );

    let store = Store::with_database(fixture.db, StoreConfig::default());
    let result = delete_contact(&store, Ctx::new(user), contact);
    assert!(matches!(result, Err(Error::ReadOnly { .. })));

    store.read(|db| {
        assert!(db.contacts.contains_key(&contact));
        assert!(db.contact_details.contains_key(&detail_id));
        assert!(db.documents.contains_key(&document_id));
    });
}
