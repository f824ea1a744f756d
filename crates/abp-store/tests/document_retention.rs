//! The 24-hour document retention lock.

use abp_core::{
    Document, DocumentCategory, DocumentId, DocumentOwner, Error, Role,
};
use abp_store::ops::documents::{create_document, delete_document, update_document};
use abp_store::{Ctx, Store, StoreConfig};
use abp_testkit::Fixture;
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;

fn seed_document(fixture: &mut Fixture, age_hours: i64) -> DocumentId {
    let contact = fixture.person("Clara", "Client");
    let id = DocumentId::generate();
    fixture.db.documents.insert(
        id,
        Document {
            id,
            owner: DocumentOwner::Contact(contact),
            name: "id-card.pdf".to_string(),
            category: DocumentCategory::KycDocument,
            uploaded_at: Utc::now() - Duration::hours(age_hours),
            valid_from: None,
            valid_to: None,
        },
    );
    id
}

fn store_with_writer(fixture: &mut Fixture) -> (Store, Ctx) {
    let user = fixture.user("backoffice@aurum.dev");
    fixture.user_group(
        user,
        &[Role::ContactsRead, Role::ContactsWrite, Role::ContactsDestroy],
        &[],
    );
    let db = std::mem::take(&mut fixture.db);
    (Store::with_database(db, StoreConfig::default()), Ctx::new(user))
}

#[test]
fn fresh_documents_accept_update_and_destroy() {
    let mut fixture = Fixture::new();
    let id = seed_document(&mut fixture, 1);
    let (store, ctx) = store_with_writer(&mut fixture);

    update_document(&store, ctx, id, |doc| {
        doc.name = "id-card-corrected.pdf".to_string();
    })
    .expect("update inside the window");

    delete_document(&store, ctx, id).expect("destroy inside the window");
    store.read(|db| assert!(db.documents.is_empty()));
}

#[test]
fn locked_documents_reject_update() {
    let mut fixture = Fixture::new();
    let id = seed_document(&mut fixture, 48);
    let (store, ctx) = store_with_writer(&mut fixture);

    let result = update_document(&store, ctx, id, |doc| {
        doc.name = "renamed.pdf".to_string();
    });
    assert!(matches!(result, Err(Error::ReadOnly { kind: "document", .. })));

    // Untouched, and no version written.
    store.read(|db| {
        assert_eq!(db.document(id).expect("document").name, "id-card.pdf");
        assert!(db.versions.is_empty());
    });
}

#[test]
fn locked_documents_reject_destroy() {
    let mut fixture = Fixture::new();
    let id = seed_document(&mut fixture, 25);
    let (store, ctx) = store_with_writer(&mut fixture);

    let result = delete_document(&store, ctx, id);
    assert!(matches!(result, Err(Error::ReadOnly { kind: "document", .. })));
    store.read(|db| assert!(db.documents.contains_key(&id)));
}

#[test]
fn upload_then_immediate_correction_works() {
    let mut fixture = Fixture::new();
    let contact = fixture.person("Clara", "Client");
    let (store, ctx) = store_with_writer(&mut fixture);

    let document = Document {
        id: DocumentId::generate(),
        owner: DocumentOwner::Contact(contact),
        name: "draft.pdf".to_string(),
        category: DocumentCategory::Contract,
        uploaded_at: Utc::now(),
        valid_from: None,
        valid_to: None,
    };
    let committed = create_document(&store, ctx, document).expect("upload");

    let updated = update_document(&store, ctx, committed.value.id, |doc| {
        doc.name = "final.pdf".to_string();
    })
    .expect("correction");
    assert_eq!(updated.value.name, "final.pdf");
}
