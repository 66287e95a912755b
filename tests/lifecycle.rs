//! Integration tests for the token lifecycle state machine, run against the
//! in-memory store. They cover the full contract: digest-only storage,
//! exactly-once auditing per transition, the rotate/invalidate asymmetry on
//! already-inactive tokens, and the read paths.

use std::sync::Arc;

use tokend::errors::AppError;
use tokend::hasher;
use tokend::models::audit::AuditAction;
use tokend::service::TokenService;
use tokend::store::memory::MemoryStore;
use tokend::store::{AuditTrail, TokenStore};

use tokio_test::assert_ok;

fn service() -> (TokenService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let service = TokenService::new(store.clone(), store.clone());
    (service, store)
}

#[tokio::test]
async fn generate_stores_hashed_value_and_returns_raw() {
    let (service, store) = service();

    let issued = service.generate("testUser").await.unwrap();
    assert_eq!(issued.user_id, "testUser");

    let stored = store
        .find_by_hash(&hasher::hash(&issued.token))
        .await
        .unwrap()
        .expect("token should be stored under its digest");
    assert_ne!(issued.token, stored.hashed_value);
    assert_eq!(stored.hashed_value, hasher::hash(&issued.token));
    assert_eq!(stored.user_id, "testUser");
    assert!(stored.is_active);
}

#[tokio::test]
async fn generate_appends_exactly_one_audit_entry() {
    let (service, store) = service();

    let issued = service.generate("auditTest").await.unwrap();

    let logs = AuditTrail::find_by_user(store.as_ref(), "auditTest")
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, AuditAction::Generate);
    assert_eq!(logs[0].token_value, hasher::hash(&issued.token));
    assert_eq!(logs[0].user_id, "auditTest");
}

#[tokio::test]
async fn rotate_retires_old_and_issues_new() {
    let (service, store) = service();

    let old = service.generate("testUser").await.unwrap();
    let new = service.rotate(&old.token).await.unwrap();

    assert_ne!(new.token, old.token);
    assert_eq!(new.user_id, "testUser");

    let old_stored = store
        .find_by_hash(&hasher::hash(&old.token))
        .await
        .unwrap()
        .unwrap();
    assert!(!old_stored.is_active);
    assert!(old_stored.rotated_at.is_some());

    let new_stored = store
        .find_by_hash(&hasher::hash(&new.token))
        .await
        .unwrap()
        .unwrap();
    assert!(new_stored.is_active);
    assert!(new_stored.rotated_at.is_none());
}

#[tokio::test]
async fn rotate_appends_old_then_new_in_order() {
    let (service, store) = service();

    let old = service.generate("u").await.unwrap();
    let new = service.rotate(&old.token).await.unwrap();

    let logs = AuditTrail::find_by_user(store.as_ref(), "u").await.unwrap();
    let actions: Vec<AuditAction> = logs.iter().map(|l| l.action).collect();
    assert_eq!(
        actions,
        vec![
            AuditAction::Generate,
            AuditAction::RotateOld,
            AuditAction::RotateNew,
        ]
    );
    assert_eq!(logs[1].token_value, hasher::hash(&old.token));
    assert_eq!(logs[2].token_value, hasher::hash(&new.token));
}

#[tokio::test]
async fn rotate_unknown_token_is_not_found() {
    let (service, _) = service();

    let err = service.rotate("no-such-token").await.unwrap_err();
    assert!(matches!(err, AppError::TokenNotFound));
    assert_eq!(err.to_string(), "Token not found.");
}

#[tokio::test]
async fn rotate_already_invalid_token_is_rejected_without_side_effects() {
    let (service, store) = service();

    let issued = service.generate("user1").await.unwrap();
    service.invalidate(&issued.token).await.unwrap();

    let tokens_before = TokenStore::find_by_user(store.as_ref(), "user1")
        .await
        .unwrap()
        .len();
    let logs_before = AuditTrail::find_by_user(store.as_ref(), "user1")
        .await
        .unwrap()
        .len();

    let err = service.rotate(&issued.token).await.unwrap_err();
    assert!(matches!(err, AppError::TokenAlreadyInvalid));
    assert_eq!(err.to_string(), "Token is already invalid.");

    // no new token, no new audit entry
    assert_eq!(
        TokenStore::find_by_user(store.as_ref(), "user1")
            .await
            .unwrap()
            .len(),
        tokens_before
    );
    assert_eq!(
        AuditTrail::find_by_user(store.as_ref(), "user1")
            .await
            .unwrap()
            .len(),
        logs_before
    );
}

#[tokio::test]
async fn invalidate_deactivates_and_audits() {
    let (service, store) = service();

    let issued = service.generate("user1").await.unwrap();
    tokio_test::assert_ok!(service.invalidate(&issued.token).await);

    let stored = store
        .find_by_hash(&hasher::hash(&issued.token))
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.is_active);
    // invalidation is not rotation
    assert!(stored.rotated_at.is_none());

    let logs = AuditTrail::find_by_user(store.as_ref(), "user1")
        .await
        .unwrap();
    let invalidations: Vec<_> = logs
        .iter()
        .filter(|l| l.action == AuditAction::Invalidate)
        .collect();
    assert_eq!(invalidations.len(), 1);
    assert_eq!(invalidations[0].token_value, hasher::hash(&issued.token));
}

#[tokio::test]
async fn invalidate_unknown_token_is_not_found() {
    let (service, _) = service();

    let err = service.invalidate("xyz").await.unwrap_err();
    assert!(matches!(err, AppError::TokenNotFound));
    assert_eq!(err.to_string(), "Token not found.");
}

#[tokio::test]
async fn repeated_invalidation_passes_through_and_duplicates_the_audit_entry() {
    let (service, store) = service();

    let issued = service.generate("user1").await.unwrap();
    service.invalidate(&issued.token).await.unwrap();
    // second invalidation of the same token succeeds rather than erroring
    tokio_test::assert_ok!(service.invalidate(&issued.token).await);

    let logs = AuditTrail::find_by_user(store.as_ref(), "user1")
        .await
        .unwrap();
    let invalidations = logs
        .iter()
        .filter(|l| l.action == AuditAction::Invalidate)
        .count();
    assert_eq!(invalidations, 2);
}

#[tokio::test]
async fn listing_unknown_user_returns_empty_not_error() {
    let (service, _) = service();

    let tokens = service.list_tokens("unknown-user").await.unwrap();
    assert!(tokens.is_empty());
    let active = service.list_active_tokens("unknown-user").await.unwrap();
    assert!(active.is_empty());
}

#[tokio::test]
async fn active_tokens_are_a_subset_of_all_tokens() {
    let (service, _) = service();

    let a = service.generate("u").await.unwrap();
    service.generate("u").await.unwrap();
    service.invalidate(&a.token).await.unwrap();

    let all = service.list_tokens("u").await.unwrap();
    let active = service.list_active_tokens("u").await.unwrap();

    assert!(active.iter().all(|t| t.is_active));
    for t in &active {
        assert!(all.iter().any(|other| other.id == t.id));
    }
    assert!(active.len() <= all.len());
}

#[tokio::test]
async fn generate_then_rotate_leaves_one_active_of_two() {
    let (service, _) = service();

    let first = service.generate("alice").await.unwrap();
    let second = service.rotate(&first.token).await.unwrap();
    assert_ne!(first.token, second.token);

    let active = service.list_active_tokens("alice").await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].hashed_value, hasher::hash(&second.token));

    let all = service.list_tokens("alice").await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn operations_on_one_user_do_not_leak_into_another() {
    let (service, store) = service();

    service.generate("alice").await.unwrap();
    let bob = service.generate("bob").await.unwrap();
    service.invalidate(&bob.token).await.unwrap();

    assert_eq!(service.list_tokens("alice").await.unwrap().len(), 1);
    assert_eq!(service.list_active_tokens("bob").await.unwrap().len(), 0);

    let alice_logs = AuditTrail::find_by_user(store.as_ref(), "alice")
        .await
        .unwrap();
    assert_eq!(alice_logs.len(), 1);
    assert_eq!(alice_logs[0].action, AuditAction::Generate);
}
