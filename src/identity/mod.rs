//! Identity provider capability
//!
//! An identity provider owns credentials: it creates exactly one identity per
//! email and authenticates against it. The coordinator only ever sees the
//! opaque `IdentityId` it hands back.
//!
//! Two implementations ship with the crate:
//! - `InMemoryIdentityProvider` for development and tests
//! - `MongoIdentityProvider` backed by a `credentials` collection

pub mod credentials;
pub mod memory;
pub mod mongo;
pub mod password;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::IdentityError;

pub use memory::InMemoryIdentityProvider;
pub use mongo::MongoIdentityProvider;

/// Opaque identifier issued by an identity provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(String);

impl IdentityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IdentityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Credential authority the coordinator delegates to
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a new identity for `email`. Fails with `AlreadyExists` if one exists.
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentityId, IdentityError>;

    /// Resolve `email`/`password` to the identity created for that email.
    async fn authenticate(&self, email: &str, password: &str)
        -> Result<IdentityId, IdentityError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_id_serializes_as_plain_string() {
        let id = IdentityId::new("uid_123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"uid_123\"");
        assert_eq!(id.to_string(), "uid_123");
    }
}
