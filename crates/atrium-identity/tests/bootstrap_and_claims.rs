//! Startup admin bootstrap and request-scoped claim reads.

use assert_matches::assert_matches;
use atrium_identity::{AtriumError, IdentityConfig, IdentityReconciler, ReconcileOutcome, Role};
use atrium_testkit::{EmailAddress, InMemoryInvitationStore, InMemoryUserStore, ManualClock};
use chrono::Duration;
use std::sync::Arc;

fn engine(config: IdentityConfig) -> (IdentityReconciler, InMemoryUserStore, ManualClock) {
    atrium_testkit::init_test_logging();
    let users = InMemoryUserStore::new();
    let clock = ManualClock::fixed();
    let reconciler = IdentityReconciler::with_clock(
        Arc::new(users.clone()),
        Arc::new(InMemoryInvitationStore::new()),
        config,
        Arc::new(clock.clone()),
    )
    .unwrap();
    (reconciler, users, clock)
}

fn with_bootstrap(email: &str) -> IdentityConfig {
    IdentityConfig {
        bootstrap_admin_email: Some(email.into()),
        ..IdentityConfig::default()
    }
}

#[tokio::test]
async fn bootstrap_creates_a_provisioned_admin_once() {
    let (reconciler, users, _clock) = engine(with_bootstrap("root@acme.com"));

    let first = reconciler.ensure_bootstrap_admin().await.unwrap().unwrap();
    assert_eq!(first.role, Role::Admin);
    assert!(first.is_provisioned);

    // Second pass is a no-op.
    let second = reconciler.ensure_bootstrap_admin().await.unwrap().unwrap();
    assert_eq!(second, first);
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn bootstrap_promotes_an_existing_account() {
    let (reconciler, _users, _clock) = engine(with_bootstrap("root@acme.com"));
    reconciler.reconcile("root@acme.com", "Root A").await.unwrap();

    let admin = reconciler.ensure_bootstrap_admin().await.unwrap().unwrap();
    assert_eq!(admin.role, Role::Admin);
    assert!(!admin.is_provisioned);
}

#[tokio::test]
async fn bootstrap_admin_activates_like_any_provisioned_account() {
    let (reconciler, _users, clock) = engine(with_bootstrap("root@acme.com"));
    reconciler.ensure_bootstrap_admin().await.unwrap();

    clock.advance(Duration::hours(1));
    let result = reconciler.reconcile("root@acme.com", "Ada Root").await.unwrap();
    assert_eq!(result.outcome, ReconcileOutcome::Activated);
    let account = result.account.unwrap();
    assert_eq!(account.role, Role::Admin);
    assert!(!account.is_provisioned);
    // Placeholder name picked up from the first real sign-in.
    assert_eq!(account.first_name, "Ada");
    assert_eq!(account.last_name, "Root");
}

#[tokio::test]
async fn bootstrap_without_config_is_a_no_op() {
    let (reconciler, users, _clock) = engine(IdentityConfig::default());
    assert!(reconciler.ensure_bootstrap_admin().await.unwrap().is_none());
    assert!(users.is_empty());
}

#[tokio::test]
async fn bootstrap_ignores_domain_policy() {
    let (reconciler, users, _clock) = engine(IdentityConfig {
        allowed_domain: Some("acme.com".into()),
        ..with_bootstrap("root@external.org")
    });
    let admin = reconciler.ensure_bootstrap_admin().await.unwrap().unwrap();
    assert_eq!(admin.role, Role::Admin);
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn claims_reflect_the_current_stored_role() {
    let (reconciler, users, clock) = engine(IdentityConfig::default());
    reconciler.reconcile("eve@acme.com", "Eve E").await.unwrap();
    let email = EmailAddress::parse("eve@acme.com").unwrap();

    let before = reconciler.claims_for(&email).await.unwrap();
    assert_eq!(before.role, Role::Employee);
    assert_eq!(before.issued_at, clock.now_value());

    // An admin command changes the role out-of-band; the next request's
    // claims pick it up without touching any issued session.
    let mut account = users.dump().pop().unwrap();
    account.role = Role::Manager;
    users.seed(account);

    let after = reconciler.claims_for(&email).await.unwrap();
    assert_eq!(after.role, Role::Manager);
}

#[tokio::test]
async fn claims_refuse_unknown_and_deactivated_accounts() {
    let (reconciler, users, _clock) = engine(IdentityConfig::default());
    let email = EmailAddress::parse("ghost@acme.com").unwrap();
    assert_matches!(
        reconciler.claims_for(&email).await.unwrap_err(),
        AtriumError::NotFound { .. }
    );

    reconciler.reconcile("ghost@acme.com", "G G").await.unwrap();
    let mut account = users.dump().pop().unwrap();
    account.is_active = false;
    users.seed(account);
    assert_matches!(
        reconciler.claims_for(&email).await.unwrap_err(),
        AtriumError::PermissionDenied { .. }
    );
}
