//! Investor signing pre- and post-conditions.

use abp_core::{Error, InvestorState, MandateGroupKind, Role};
use abp_store::ops::funds::sign_investor_op;
use abp_store::{Ctx, Store, StoreConfig};
use abp_testkit::Fixture;
use pretty_assertions::assert_eq;

fn setup(state: InvestorState) -> (Store, Ctx, abp_core::InvestorId) {
    let mut fixture = Fixture::new();
    let user = fixture.user("funds@aurum.dev");
    fixture.user_group(user, &[Role::FundsWrite], &[]);
    let group = fixture.mandate_group("Org", MandateGroupKind::Organization);
    let mandate = fixture.mandate("Mandate", &[group]);
    let fund = fixture.fund("Aurum Growth I");
    let investor = fixture.investor(fund, mandate, state);
    (
        Store::with_database(fixture.db, StoreConfig::default()),
        Ctx::new(user),
        investor,
    )
}

#[test]
fn signing_stamps_the_investment_date() {
    let (store, ctx, investor) = setup(InvestorState::Created);

    // Attach the agreement the post-condition demands.
    let fund = store.read(|db| db.investor(investor).expect("investor").fund_id);
    store
        .mutate(|txn| {
            let document_id = abp_core::DocumentId::generate();
            let now = txn.now();
            txn.db_mut().documents.insert(
                document_id,
                abp_core::Document {
                    id: document_id,
                    owner: abp_core::DocumentOwner::Fund(fund),
                    name: "subscription.pdf".to_string(),
                    category: abp_core::DocumentCategory::FundSubscriptionAgreement,
                    uploaded_at: now,
                    valid_from: None,
                    valid_to: None,
                },
            );
            let record = txn
                .db_mut()
                .investors
                .get_mut(&investor)
                .expect("investor");
            record.fund_subscription_agreement = Some(document_id);
            Ok(())
        })
        .expect("attach agreement");

    let signed = sign_investor_op(&store, ctx, investor).expect("sign");
    assert_eq!(signed.value.state, InvestorState::Signed);
    assert!(signed.value.investment_date.is_some());
}

#[test]
fn signing_without_an_agreement_fails_and_changes_nothing() {
    let (store, ctx, investor) = setup(InvestorState::Created);

    let result = sign_investor_op(&store, ctx, investor);
    match result {
        Err(Error::Validation(errors)) => {
            assert!(errors
                .errors()
                .iter()
                .any(|e| e.field == "fund_subscription_agreement"));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }

    store.read(|db| {
        let record = db.investor(investor).expect("investor");
        assert_eq!(record.state, InvestorState::Created);
        assert_eq!(record.investment_date, None);
        assert!(db.versions.is_empty());
    });
}

#[test]
fn signing_twice_is_an_invalid_transition() {
    let (store, ctx, investor) = setup(InvestorState::Signed);
    let result = sign_investor_op(&store, ctx, investor);
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[test]
fn signing_requires_the_funds_write_role() {
    let (store, _ctx, investor) = setup(InvestorState::Created);
    let outsider = store
        .mutate(|txn| {
            let id = abp_core::UserId::generate();
            let now = txn.now();
            txn.db_mut().users.insert(
                id,
                abp_core::User {
                    id,
                    email: "outsider@aurum.dev".to_string(),
                    contact_id: None,
                    deactivated: false,
                    created_at: now,
                },
            );
            Ok(id)
        })
        .expect("seed outsider")
        .value;

    let denied = sign_investor_op(&store, Ctx::new(outsider), investor);
    assert_eq!(denied.expect_err("denied"), Error::Forbidden);
}
