//! Profile store capability
//!
//! A profile is the `{username, email}` record persisted for an identity.
//! Writes are keyed by `IdentityId`, so repeating `put_profile` for the same
//! identity replaces the record instead of adding a second one. That is what
//! lets a failed registration resume at the profile step safely.

pub mod memory;
pub mod mongo;

use serde::{Deserialize, Serialize};

use crate::identity::IdentityId;
use crate::types::ProfileError;

pub use memory::{InMemoryProfileStore, InjectedFault};
pub use mongo::MongoProfileStore;

/// Fields written for an identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFields {
    pub username: String,
    pub email: String,
}

/// A persisted profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub identity_id: IdentityId,
    pub username: String,
    pub email: String,
}

impl ProfileRecord {
    pub fn new(identity_id: IdentityId, fields: ProfileFields) -> Self {
        Self {
            identity_id,
            username: fields.username,
            email: fields.email,
        }
    }
}

#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    /// Create or replace the profile for `identity_id`
    async fn put_profile(
        &self,
        identity_id: &IdentityId,
        fields: &ProfileFields,
    ) -> Result<(), ProfileError>;

    async fn get_profile(
        &self,
        identity_id: &IdentityId,
    ) -> Result<Option<ProfileRecord>, ProfileError>;
}
