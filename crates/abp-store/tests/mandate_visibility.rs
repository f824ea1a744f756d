//! Scoped mandate visibility end to end.
//!
//! A user whose `mandates_read` grant is scoped to one mandate group sees
//! exactly the mandates inside it, and list metadata reports the filtered
//! count rather than the table count.

use abp_audit::Page;
use abp_core::{Action, Channel, MandateGroupKind, Role, evaluate};
use abp_store::{Store, StoreConfig, grants_for, list_mandates};
use abp_testkit::Fixture;
use pretty_assertions::assert_eq;

#[test]
fn list_returns_only_mandates_in_granted_groups() {
    let mut fixture = Fixture::new();
    let user = fixture.user("advisor@aurum.dev");
    let g1 = fixture.mandate_group("Office North", MandateGroupKind::Organization);
    let g2 = fixture.mandate_group("Office South", MandateGroupKind::Organization);
    let m1 = fixture.mandate("Mandate One", &[g1]);
    let _m2 = fixture.mandate("Mandate Two", &[g2]);
    fixture.user_group(user, &[Role::MandatesRead], &[g1]);

    let store = Store::with_database(fixture.db, StoreConfig::default());
    let page = store.read(|db| {
        let grants = grants_for(db, user);
        list_mandates(db, &grants, user, Channel::Standard, Page::default())
    });

    assert_eq!(page.total_record_count, 1);
    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].id, m1);
}

#[test]
fn show_on_a_foreign_mandate_is_forbidden() {
    let mut fixture = Fixture::new();
    let user = fixture.user("advisor@aurum.dev");
    let g1 = fixture.mandate_group("Office North", MandateGroupKind::Organization);
    let g2 = fixture.mandate_group("Office South", MandateGroupKind::Organization);
    let _m1 = fixture.mandate("Mandate One", &[g1]);
    let m2 = fixture.mandate("Mandate Two", &[g2]);
    fixture.user_group(user, &[Role::MandatesRead], &[g1]);

    let store = Store::with_database(fixture.db, StoreConfig::default());
    let decision = store.read(|db| {
        let grants = grants_for(db, user);
        let mandate = db.mandate(m2).expect("mandate").clone();
        evaluate(
            &grants,
            user,
            Channel::Standard,
            Action::Read,
            &abp_store::scope::mandate_target(&mandate),
        )
    });

    assert!(!decision.is_allow());
}

#[test]
fn unassigned_group_grants_nothing_until_attached() {
    let mut fixture = Fixture::new();
    let user = fixture.user("advisor@aurum.dev");
    let g1 = fixture.mandate_group("Office North", MandateGroupKind::Organization);
    let _m1 = fixture.mandate("Mandate One", &[g1]);
    // Scoped-style role, but the user group carries no mandate groups.
    let group_id = fixture.user_group(user, &[Role::MandatesRead], &[]);

    let store = Store::with_database(fixture.db, StoreConfig::default());
    let before = store.read(|db| {
        let grants = grants_for(db, user);
        list_mandates(db, &grants, user, Channel::Standard, Page::default())
    });
    assert_eq!(before.total_record_count, 0);

    // Attaching the mandate group makes the same grant effective.
    store
        .mutate(|txn| {
            let group = txn
                .db_mut()
                .user_groups
                .get_mut(&group_id)
                .expect("user group");
            group.mandate_groups.insert(g1);
            Ok(())
        })
        .expect("attach group");

    let after = store.read(|db| {
        let grants = grants_for(db, user);
        list_mandates(db, &grants, user, Channel::Standard, Page::default())
    });
    assert_eq!(after.total_record_count, 1);
}
