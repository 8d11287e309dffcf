//! Registration coordinator integration tests
//!
//! Drives the coordinator against in-memory collaborators:
//! - Identity-then-profile sequencing and partial failure
//! - Resuming a partial registration without a second identity
//! - Sign-in against identities created by registration
//! - Per-call timeouts

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use registrar::coordinator::{
    CoordinatorConfig, RegistrationAttempt, RegistrationCoordinator, RegistrationResult,
    SignInResult, Stage,
};
use registrar::identity::{IdentityId, InMemoryIdentityProvider};
use registrar::profile::{InMemoryProfileStore, InjectedFault, ProfileStore};
use registrar::types::{IdentityError, ProfileError};

struct Harness {
    identity: Arc<InMemoryIdentityProvider>,
    profiles: Arc<InMemoryProfileStore>,
    coordinator: RegistrationCoordinator,
}

fn harness(identity: InMemoryIdentityProvider, profiles: InMemoryProfileStore) -> Harness {
    let identity = Arc::new(identity);
    let profiles = Arc::new(profiles);
    let coordinator = RegistrationCoordinator::new(
        identity.clone(),
        profiles.clone(),
        CoordinatorConfig {
            call_timeout: Duration::from_millis(500),
        },
    );
    Harness {
        identity,
        profiles,
        coordinator,
    }
}

/// Ids uid_1, uid_2, ... in creation order
fn sequential_ids() -> InMemoryIdentityProvider {
    let counter = AtomicUsize::new(0);
    InMemoryIdentityProvider::with_id_generator(move || {
        IdentityId::new(format!("uid_{}", counter.fetch_add(1, Ordering::SeqCst) + 1))
    })
}

// =============================================================================
// Sign-up
// =============================================================================

#[tokio::test]
async fn test_register_writes_profile_under_new_identity() {
    let h = harness(
        InMemoryIdentityProvider::with_id_generator(|| "uid_123".into()),
        InMemoryProfileStore::new(),
    );

    let attempt = RegistrationAttempt::new("a@x.com", "secret1", "alice");
    let result = h.coordinator.register(&attempt).await;

    assert_eq!(
        result,
        RegistrationResult::Succeeded {
            identity_id: "uid_123".into()
        }
    );

    let stored = h
        .profiles
        .get_profile(&"uid_123".into())
        .await
        .unwrap()
        .expect("profile keyed by the new identity");
    assert_eq!(stored.username, "alice");
    assert_eq!(stored.email, "a@x.com");
}

#[tokio::test]
async fn test_duplicate_email_stops_before_profile() {
    let h = harness(sequential_ids(), InMemoryProfileStore::new());

    let first = RegistrationAttempt::new("a@x.com", "secret1", "alice");
    assert!(h.coordinator.register(&first).await.is_success());

    let second = RegistrationAttempt::new("A@X.com", "other-pass", "alice2");
    let result = h.coordinator.register(&second).await;

    assert_eq!(
        result,
        RegistrationResult::IdentityFailed {
            cause: IdentityError::AlreadyExists
        }
    );
    assert_eq!(result.stage(), Some(Stage::Identity));
    assert_eq!(result.identity_id(), None);
    assert_eq!(h.profiles.put_calls(), 1);
    assert_eq!(h.profiles.profile_count(), 1);
}

#[tokio::test]
async fn test_invalid_credentials_write_nothing() {
    let h = harness(sequential_ids(), InMemoryProfileStore::new());

    let short_password = RegistrationAttempt::new("a@x.com", "12345", "alice");
    let result = h.coordinator.register(&short_password).await;
    assert!(matches!(
        result,
        RegistrationResult::IdentityFailed {
            cause: IdentityError::InvalidCredentialFormat(_)
        }
    ));

    let bad_email = RegistrationAttempt::new("not-an-email", "secret1", "alice");
    let result = h.coordinator.register(&bad_email).await;
    assert!(matches!(
        result,
        RegistrationResult::IdentityFailed {
            cause: IdentityError::InvalidCredentialFormat(_)
        }
    ));

    assert_eq!(h.identity.identity_count(), 0);
    assert_eq!(h.profiles.put_calls(), 0);
}

#[tokio::test]
async fn test_profile_failure_keeps_identity_and_resume_completes() {
    let h = harness(sequential_ids(), InMemoryProfileStore::new());
    h.profiles.fail_next_writes(1, InjectedFault::Network);

    let attempt = RegistrationAttempt::new("a@x.com", "secret1", "alice");
    let result = h.coordinator.register(&attempt).await;

    let identity_id = match result {
        RegistrationResult::ProfileFailed {
            identity_id,
            cause: ProfileError::Network(_),
        } => identity_id,
        other => panic!("expected profile failure, got {:?}", other),
    };
    assert_eq!(h.identity.identity_count(), 1);
    assert_eq!(h.profiles.profile_count(), 0);

    let resumed = h.coordinator.resume_profile(identity_id.clone(), &attempt).await;

    assert_eq!(
        resumed,
        RegistrationResult::Succeeded {
            identity_id: identity_id.clone()
        }
    );
    assert_eq!(h.identity.create_calls(), 1);
    assert_eq!(h.identity.identity_count(), 1);
    assert!(h.profiles.get_profile(&identity_id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_resume_is_idempotent() {
    let h = harness(sequential_ids(), InMemoryProfileStore::new());
    h.profiles.fail_next_writes(1, InjectedFault::Network);

    let attempt = RegistrationAttempt::new("a@x.com", "secret1", "alice");
    let identity_id = h
        .coordinator
        .register(&attempt)
        .await
        .identity_id()
        .cloned()
        .expect("identity created before the profile failure");

    for _ in 0..2 {
        let result = h.coordinator.resume_profile(identity_id.clone(), &attempt).await;
        assert!(result.is_success());
    }

    assert_eq!(h.profiles.profile_count(), 1);
    assert_eq!(h.identity.create_calls(), 1);
}

// =============================================================================
// Resume requires the identity's credentials
// =============================================================================

#[tokio::test]
async fn test_resume_for_identity_never_created_writes_nothing() {
    let h = harness(sequential_ids(), InMemoryProfileStore::new());

    let attempt = RegistrationAttempt::new("x@y.com", "secret1", "x");
    let result = h.coordinator.resume_profile("ghost".into(), &attempt).await;

    assert_eq!(
        result,
        RegistrationResult::IdentityFailed {
            cause: IdentityError::NotFound
        }
    );
    assert_eq!(h.identity.identity_count(), 0);
    assert_eq!(h.profiles.profile_count(), 0);
    assert!(h.profiles.get_profile(&"ghost".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_resume_cannot_overwrite_another_users_profile() {
    let h = harness(sequential_ids(), InMemoryProfileStore::new());

    let alice = RegistrationAttempt::new("a@x.com", "secret1", "alice");
    assert!(h.coordinator.register(&alice).await.is_success());
    let mallory = RegistrationAttempt::new("m@evil.com", "secret2", "mallory");
    assert!(h.coordinator.register(&mallory).await.is_success());
    let profiles_before = h.profiles.profile_count();

    // Valid credentials, but they belong to uid_2
    let result = h.coordinator.resume_profile("uid_1".into(), &mallory).await;

    assert_eq!(
        result,
        RegistrationResult::IdentityFailed {
            cause: IdentityError::NotFound
        }
    );
    assert_eq!(h.profiles.profile_count(), profiles_before);
    let stored = h.profiles.get_profile(&"uid_1".into()).await.unwrap().unwrap();
    assert_eq!(stored.username, "alice");
    assert_eq!(stored.email, "a@x.com");
}

#[tokio::test]
async fn test_resume_with_wrong_password_writes_nothing() {
    let h = harness(sequential_ids(), InMemoryProfileStore::new());
    h.profiles.fail_next_writes(1, InjectedFault::Network);

    let attempt = RegistrationAttempt::new("a@x.com", "secret1", "alice");
    let identity_id = h.coordinator.register(&attempt).await.identity_id().cloned().unwrap();
    let puts_before = h.profiles.put_calls();

    let wrong = RegistrationAttempt::new("a@x.com", "not-secret", "mallory");
    let result = h.coordinator.resume_profile(identity_id, &wrong).await;

    assert_eq!(
        result,
        RegistrationResult::IdentityFailed {
            cause: IdentityError::WrongPassword
        }
    );
    assert_eq!(h.profiles.put_calls(), puts_before);
    assert_eq!(h.profiles.profile_count(), 0);
}

#[tokio::test]
async fn test_write_conflict_reported_at_profile_stage() {
    let h = harness(sequential_ids(), InMemoryProfileStore::new());
    h.profiles.fail_next_writes(1, InjectedFault::WriteConflict);

    let attempt = RegistrationAttempt::new("a@x.com", "secret1", "alice");
    let result = h.coordinator.register(&attempt).await;

    assert_eq!(result.stage(), Some(Stage::Profile));
    assert_eq!(result.identity_id(), Some(&IdentityId::new("uid_1")));
}

// =============================================================================
// Sign-in
// =============================================================================

#[tokio::test]
async fn test_sign_in_returns_registered_identity() {
    let h = harness(sequential_ids(), InMemoryProfileStore::new());

    let attempt = RegistrationAttempt::new("a@x.com", "secret1", "alice");
    let registered = h.coordinator.register(&attempt).await;
    let registered_id = registered.identity_id().cloned();

    let signed_in = h.coordinator.sign_in("a@x.com", "secret1").await;
    assert_eq!(
        Some(signed_in),
        registered_id.map(|identity_id| SignInResult::Succeeded { identity_id })
    );
}

#[tokio::test]
async fn test_sign_in_failures_never_touch_profiles() {
    let h = harness(sequential_ids(), InMemoryProfileStore::new());
    let attempt = RegistrationAttempt::new("a@x.com", "secret1", "alice");
    h.coordinator.register(&attempt).await;
    let puts_after_sign_up = h.profiles.put_calls();

    assert_eq!(
        h.coordinator.sign_in("a@x.com", "wrong-pass").await,
        SignInResult::Failed {
            cause: IdentityError::WrongPassword
        }
    );
    assert_eq!(
        h.coordinator.sign_in("b@x.com", "secret1").await,
        SignInResult::Failed {
            cause: IdentityError::NotFound
        }
    );
    assert_eq!(h.profiles.put_calls(), puts_after_sign_up);
}

// =============================================================================
// Timeouts
// =============================================================================

#[tokio::test]
async fn test_slow_identity_provider_times_out_as_network_error() {
    let h = harness(
        sequential_ids().with_latency(Duration::from_secs(5)),
        InMemoryProfileStore::new(),
    );

    let attempt = RegistrationAttempt::new("a@x.com", "secret1", "alice");
    let result = h.coordinator.register(&attempt).await;

    assert!(matches!(
        result,
        RegistrationResult::IdentityFailed {
            cause: IdentityError::Network(_)
        }
    ));
    assert_eq!(h.profiles.put_calls(), 0);
}

#[tokio::test]
async fn test_slow_profile_store_times_out_with_identity_kept() {
    let h = harness(
        sequential_ids(),
        InMemoryProfileStore::new().with_latency(Duration::from_secs(5)),
    );

    let attempt = RegistrationAttempt::new("a@x.com", "secret1", "alice");
    let result = h.coordinator.register(&attempt).await;

    assert!(matches!(
        result,
        RegistrationResult::ProfileFailed {
            cause: ProfileError::Network(_),
            ..
        }
    ));
    assert_eq!(h.identity.identity_count(), 1);
}
