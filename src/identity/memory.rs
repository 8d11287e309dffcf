//! In-memory identity provider
//!
//! Used in dev mode and by tests. Keeps Argon2 hashes in a `DashMap` keyed by
//! normalized email, so uniqueness is enforced per map entry without a global
//! lock. Fault injection hooks let tests simulate an unreachable provider.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::credentials::{normalize_email, validate_email, validate_password};
use super::password::{hash_password, verify_password};
use super::{IdentityId, IdentityProvider};
use crate::types::IdentityError;

type IdGenerator = Arc<dyn Fn() -> IdentityId + Send + Sync>;

struct StoredCredential {
    identity_id: IdentityId,
    password_hash: String,
}

pub struct InMemoryIdentityProvider {
    accounts: DashMap<String, StoredCredential>,
    next_id: IdGenerator,
    latency: Option<Duration>,
    /// Remaining calls that fail with a simulated network error
    fail_next: AtomicUsize,
    create_calls: AtomicUsize,
    authenticate_calls: AtomicUsize,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::with_id_generator(|| {
            IdentityId::new(format!("uid_{}", uuid::Uuid::new_v4().simple()))
        })
    }

    /// Use a custom id source (deterministic ids in tests)
    pub fn with_id_generator<F>(generator: F) -> Self
    where
        F: Fn() -> IdentityId + Send + Sync + 'static,
    {
        Self {
            accounts: DashMap::new(),
            next_id: Arc::new(generator),
            latency: None,
            fail_next: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            authenticate_calls: AtomicUsize::new(0),
        }
    }

    /// Delay every call by `latency` before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make the next `count` calls fail with `IdentityError::Network`
    pub fn fail_next_calls(&self, count: usize) {
        self.fail_next.store(count, Ordering::SeqCst);
    }

    pub fn identity_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn authenticate_calls(&self) -> usize {
        self.authenticate_calls.load(Ordering::SeqCst)
    }

    async fn simulate_transport(&self) -> Result<(), IdentityError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let injected = self
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(IdentityError::Network("simulated outage".into()));
        }
        Ok(())
    }
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentityId, IdentityError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_transport().await?;

        validate_email(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        match self.accounts.entry(normalize_email(email)) {
            Entry::Occupied(_) => Err(IdentityError::AlreadyExists),
            Entry::Vacant(slot) => {
                let identity_id = (self.next_id)();
                debug!("Created in-memory identity {}", identity_id);
                slot.insert(StoredCredential {
                    identity_id: identity_id.clone(),
                    password_hash,
                });
                Ok(identity_id)
            }
        }
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentityId, IdentityError> {
        self.authenticate_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_transport().await?;

        let (identity_id, password_hash) = match self.accounts.get(&normalize_email(email)) {
            Some(stored) => (stored.identity_id.clone(), stored.password_hash.clone()),
            None => return Err(IdentityError::NotFound),
        };

        if verify_password(password, &password_hash)? {
            Ok(identity_id)
        } else {
            Err(IdentityError::WrongPassword)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_authenticate() {
        let provider = InMemoryIdentityProvider::with_id_generator(|| "uid_123".into());

        let id = provider.create_identity("a@x.com", "secret1").await.unwrap();
        assert_eq!(id.as_str(), "uid_123");

        let again = provider.authenticate("A@X.com", "secret1").await.unwrap();
        assert_eq!(again, id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let provider = InMemoryIdentityProvider::new();
        provider.create_identity("a@x.com", "secret1").await.unwrap();

        let err = provider
            .create_identity("a@x.com", "another1")
            .await
            .unwrap_err();
        assert_eq!(err, IdentityError::AlreadyExists);
        assert_eq!(provider.identity_count(), 1);
    }

    #[tokio::test]
    async fn test_authenticate_failures() {
        let provider = InMemoryIdentityProvider::new();
        provider.create_identity("a@x.com", "secret1").await.unwrap();

        assert_eq!(
            provider.authenticate("a@x.com", "wrong12").await.unwrap_err(),
            IdentityError::WrongPassword
        );
        assert_eq!(
            provider.authenticate("b@x.com", "secret1").await.unwrap_err(),
            IdentityError::NotFound
        );
    }

    #[tokio::test]
    async fn test_format_rules_apply() {
        let provider = InMemoryIdentityProvider::new();

        assert!(matches!(
            provider.create_identity("not-an-email", "secret1").await,
            Err(IdentityError::InvalidCredentialFormat(_))
        ));
        assert!(matches!(
            provider.create_identity("a@x.com", "123").await,
            Err(IdentityError::InvalidCredentialFormat(_))
        ));
        assert_eq!(provider.identity_count(), 0);
    }

    #[tokio::test]
    async fn test_injected_failures_are_consumed() {
        let provider = InMemoryIdentityProvider::new();
        provider.fail_next_calls(1);

        assert!(matches!(
            provider.create_identity("a@x.com", "secret1").await,
            Err(IdentityError::Network(_))
        ));
        assert!(provider.create_identity("a@x.com", "secret1").await.is_ok());
        assert_eq!(provider.create_calls(), 2);
    }
}
