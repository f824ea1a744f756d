//! `abp access check` end to end over a snapshot file.

use std::fs;
use std::path::PathBuf;

use abp_cli::access::{CheckArgs, run_check};
use abp_core::{MandateGroupKind, Role};
use abp_testkit::Fixture;
use pretty_assertions::assert_eq;

fn write_snapshot(fixture: &Fixture) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "abp-access-check-{}.json",
        uuid::Uuid::new_v4().simple()
    ));
    fs::write(&path, serde_json::to_string(&fixture.db).expect("serialize")).expect("write");
    path
}

#[test]
fn scoped_grant_allows_inside_and_denies_outside() {
    let mut fixture = Fixture::new();
    let user = fixture.user("advisor@aurum.dev");
    let g1 = fixture.mandate_group("Office North", MandateGroupKind::Organization);
    let g2 = fixture.mandate_group("Office South", MandateGroupKind::Organization);
    let m1 = fixture.mandate("Mandate One", &[g1]);
    let m2 = fixture.mandate("Mandate Two", &[g2]);
    fixture.user_group(user, &[Role::MandatesRead], &[g1]);

    let path = write_snapshot(&fixture);

    let allowed = run_check(&CheckArgs {
        snapshot: path.clone(),
        user: user.to_string(),
        action: "read".to_string(),
        resource: format!("mandate:{m1}"),
        ews: false,
    })
    .expect("check");
    assert_eq!(allowed.decision, "allow");
    assert_eq!(allowed.reason, None);

    let denied = run_check(&CheckArgs {
        snapshot: path.clone(),
        user: user.to_string(),
        action: "read".to_string(),
        resource: format!("mandate:{m2}"),
        ews: false,
    })
    .expect("check");
    assert_eq!(denied.decision, "deny");
    assert_eq!(denied.reason, Some("scope.mandate_group_mismatch"));

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn ews_channel_reports_the_channel_code() {
    let mut fixture = Fixture::new();
    let user = fixture.user("sync@aurum.dev");
    fixture.user_group(user, &[Role::ContactsRead, Role::ContactsWrite], &[]);
    let contact = fixture.person("Clara", "Client");

    let path = write_snapshot(&fixture);

    let denied = run_check(&CheckArgs {
        snapshot: path.clone(),
        user: user.to_string(),
        action: "write".to_string(),
        resource: format!("contact:{contact}"),
        ews: true,
    })
    .expect("check");
    assert_eq!(denied.decision, "deny");
    assert_eq!(denied.reason, Some("channel.restricted"));

    fs::remove_file(path).expect("cleanup");
}
