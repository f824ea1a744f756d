//! Double-opt-in flow with post-commit jobs.

use abp_core::{Error, JobRequest, NewsletterSubscriber, Role, SubscriberId, SubscriberState};
use abp_store::ops::newsletter::{confirm, send_confirmation, subscribe};
use abp_store::{Ctx, Store, StoreConfig};
use abp_testkit::Fixture;
use pretty_assertions::assert_eq;

fn new_subscriber(email: &str) -> NewsletterSubscriber {
    NewsletterSubscriber {
        id: SubscriberId::generate(),
        email: email.to_string(),
        first_name: None,
        last_name: None,
        state: SubscriberState::Created,
        confirmation_token: None,
        confirmation_sent_at: None,
        confirmed_at: None,
    }
}

#[test]
fn full_flow_emits_mail_then_sync_job() {
    let mut fixture = Fixture::new();
    let admin = fixture.user("admin@aurum.dev");
    fixture.user_group(admin, &[Role::Admin], &[]);
    let store = Store::with_database(fixture.db, StoreConfig::default());

    let subscribed = subscribe(&store, new_subscriber("reader@example.org")).expect("subscribe");
    assert!(subscribed.jobs.is_empty());

    let sent = send_confirmation(&store, Ctx::new(admin), subscribed.value.id).expect("send");
    let token = sent
        .value
        .confirmation_token
        .clone()
        .expect("token generated");
    match &sent.jobs[..] {
        [JobRequest::NewsletterConfirmationMail { token: mailed, email, .. }] => {
            assert_eq!(mailed, &token);
            assert_eq!(email, "reader@example.org");
        }
        other => panic!("unexpected jobs: {other:?}"),
    }

    let confirmed = confirm(&store, &token).expect("confirm");
    assert_eq!(confirmed.value.state, SubscriberState::Confirmed);
    assert_eq!(confirmed.value.confirmation_token, None);
    assert!(confirmed.value.confirmed_at.is_some());
    assert_eq!(
        confirmed.jobs,
        vec![JobRequest::NewsletterExternalSync {
            subscriber_id: subscribed.value.id
        }]
    );
}

#[test]
fn unknown_tokens_are_not_found_not_validation() {
    let store = Store::new(StoreConfig::default());
    let result = confirm(&store, "no-such-token");
    assert!(matches!(result, Err(Error::NotFound { .. })));
}

#[test]
fn sending_confirmation_requires_admin() {
    let mut fixture = Fixture::new();
    let plain = fixture.user("plain@aurum.dev");
    let store = Store::with_database(fixture.db, StoreConfig::default());

    let subscribed = subscribe(&store, new_subscriber("reader@example.org")).expect("subscribe");
    let denied = send_confirmation(&store, Ctx::new(plain), subscribed.value.id);
    assert_eq!(denied.expect_err("denied"), Error::Forbidden);
}

#[test]
fn duplicate_subscriptions_conflict_on_email() {
    let store = Store::new(StoreConfig::default());
    subscribe(&store, new_subscriber("reader@example.org")).expect("first");
    let result = subscribe(&store, new_subscriber("reader@example.org"));
    match result {
        Err(Error::Validation(errors)) => assert_eq!(errors.errors()[0].code, "taken"),
        other => panic!("expected validation failure, got {other:?}"),
    }
}
