//! Registration coordinator
//!
//! Sequences the two dependent remote calls behind sign-up:
//!
//! ```text
//! Start -> CreatingIdentity -+-> IdentityFailed
//!                            +-> IdentityCreated -> PersistingProfile -+-> Succeeded
//!                                                                      +-> ProfileFailed
//! ```
//!
//! A profile is only ever written for an identity that was created, so there
//! are no orphan profiles. The reverse (an identity without a profile) is a
//! reportable outcome: `ProfileFailed` carries the identity id and
//! `resume_profile` picks up at the second step once the caller has
//! re-authenticated as that identity. Nothing is rolled back and nothing is
//! retried automatically.
//!
//! Every remote call is bounded by `CoordinatorConfig::call_timeout`; an
//! expired call is reported as the stage's network error.

mod attempt;

use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::identity::{IdentityId, IdentityProvider};
use crate::profile::{ProfileFields, ProfileStore};
use crate::types::{IdentityError, ProfileError};

pub use attempt::RegistrationAttempt;

/// Stage at which a registration stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Identity,
    Profile,
}

/// Terminal outcome of `register` / `resume_profile`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationResult {
    Succeeded {
        identity_id: IdentityId,
    },
    /// Identity creation failed; nothing was written anywhere
    IdentityFailed {
        cause: IdentityError,
    },
    /// Identity exists but its profile was not written
    ProfileFailed {
        identity_id: IdentityId,
        cause: ProfileError,
    },
}

impl RegistrationResult {
    /// Stage that failed, or `None` on success
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Succeeded { .. } => None,
            Self::IdentityFailed { .. } => Some(Stage::Identity),
            Self::ProfileFailed { .. } => Some(Stage::Profile),
        }
    }

    /// Identity created by this registration, if any
    pub fn identity_id(&self) -> Option<&IdentityId> {
        match self {
            Self::Succeeded { identity_id } | Self::ProfileFailed { identity_id, .. } => {
                Some(identity_id)
            }
            Self::IdentityFailed { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// Outcome of `sign_in`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInResult {
    Succeeded { identity_id: IdentityId },
    Failed { cause: IdentityError },
}

/// Coordinator tuning
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Upper bound on each individual remote call
    pub call_timeout: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(10),
        }
    }
}

pub struct RegistrationCoordinator {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    config: CoordinatorConfig,
}

impl RegistrationCoordinator {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            identity,
            profiles,
            config,
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Create an identity, then persist its profile
    pub async fn register(&self, attempt: &RegistrationAttempt) -> RegistrationResult {
        debug!("register: creating identity for {}", attempt.email());

        let created = bounded(
            self.config.call_timeout,
            self.identity
                .create_identity(attempt.email(), attempt.password()),
            IdentityError::Network,
        )
        .await;

        let identity_id = match created {
            Ok(id) => id,
            Err(cause) => {
                warn!(
                    "register: identity creation failed for {}: {}",
                    attempt.email(),
                    cause
                );
                return RegistrationResult::IdentityFailed { cause };
            }
        };

        info!(
            "register: identity {} created for {}, persisting profile",
            identity_id,
            attempt.email()
        );
        self.persist_profile(identity_id, attempt.profile_fields())
            .await
    }

    /// Retry the profile step for an identity that already exists
    ///
    /// The caller proves the identity by re-authenticating with the attempt's
    /// credentials; the profile is written only when those credentials resolve
    /// to `identity_id`. Never calls `create_identity`, so it cannot create a
    /// second identity.
    pub async fn resume_profile(
        &self,
        identity_id: IdentityId,
        attempt: &RegistrationAttempt,
    ) -> RegistrationResult {
        info!("register: resuming profile persistence for {}", identity_id);

        let proven = bounded(
            self.config.call_timeout,
            self.identity
                .authenticate(attempt.email(), attempt.password()),
            IdentityError::Network,
        )
        .await;

        match proven {
            Ok(authenticated) if authenticated == identity_id => {}
            Ok(authenticated) => {
                warn!(
                    "register: resume for {} rejected, credentials belong to {}",
                    identity_id, authenticated
                );
                return RegistrationResult::IdentityFailed {
                    cause: IdentityError::NotFound,
                };
            }
            Err(cause) => {
                warn!("register: resume for {} rejected: {}", identity_id, cause);
                return RegistrationResult::IdentityFailed { cause };
            }
        }

        self.persist_profile(identity_id, attempt.profile_fields())
            .await
    }

    /// Authenticate against the identity provider only
    pub async fn sign_in(&self, email: &str, password: &str) -> SignInResult {
        let outcome = bounded(
            self.config.call_timeout,
            self.identity.authenticate(email, password),
            IdentityError::Network,
        )
        .await;

        match outcome {
            Ok(identity_id) => {
                info!("sign_in: {} authenticated as {}", email, identity_id);
                SignInResult::Succeeded { identity_id }
            }
            Err(cause) => {
                warn!("sign_in: {} rejected: {}", email, cause);
                SignInResult::Failed { cause }
            }
        }
    }

    async fn persist_profile(
        &self,
        identity_id: IdentityId,
        fields: ProfileFields,
    ) -> RegistrationResult {
        let written = bounded(
            self.config.call_timeout,
            self.profiles.put_profile(&identity_id, &fields),
            ProfileError::Network,
        )
        .await;

        match written {
            Ok(()) => {
                info!("register: profile stored for {}", identity_id);
                RegistrationResult::Succeeded { identity_id }
            }
            Err(cause) => {
                // Partial completion: identity stays, caller gets the id to resume with
                warn!(
                    "register: profile write failed for {} (identity kept): {}",
                    identity_id, cause
                );
                RegistrationResult::ProfileFailed { identity_id, cause }
            }
        }
    }
}

/// Run `call` with an upper bound, mapping expiry through `on_timeout`
async fn bounded<T, E, F>(
    limit: Duration,
    call: F,
    on_timeout: impl FnOnce(String) -> E,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(on_timeout(format!(
            "no response within {} ms",
            limit.as_millis()
        ))),
    }
}
