//! MongoDB-backed identity provider
//!
//! Credentials live in their own collection with a unique index on the
//! normalized email. The index is what rejects a second `create_identity`
//! for the same address, even across registrar instances.

use bson::doc;
use tracing::{debug, warn};

use super::credentials::{normalize_email, validate_email, validate_password};
use super::password::{hash_password, verify_password};
use super::{IdentityId, IdentityProvider};
use crate::db::schemas::CredentialDoc;
use crate::db::{classify, DbFault, MongoClient, MongoCollection};
use crate::types::{IdentityError, RegistrarError};

pub struct MongoIdentityProvider {
    credentials: MongoCollection<CredentialDoc>,
}

impl MongoIdentityProvider {
    /// Open the credential collection and ensure its indexes
    pub async fn new(mongo: &MongoClient, collection: &str) -> Result<Self, RegistrarError> {
        let credentials = mongo.collection::<CredentialDoc>(collection).await?;
        Ok(Self { credentials })
    }
}

fn network(err: mongodb::error::Error) -> IdentityError {
    IdentityError::Network(err.to_string())
}

#[async_trait::async_trait]
impl IdentityProvider for MongoIdentityProvider {
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentityId, IdentityError> {
        validate_email(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;
        let uid = format!("uid_{}", uuid::Uuid::new_v4().simple());
        let doc = CredentialDoc::new(normalize_email(email), password_hash, uid.clone());

        match self.credentials.insert_one(doc).await {
            Ok(_) => {
                debug!("Stored credential for identity {}", uid);
                Ok(IdentityId::new(uid))
            }
            Err(e) if classify(&e) == DbFault::DuplicateKey => Err(IdentityError::AlreadyExists),
            Err(e) => {
                warn!("Credential insert failed: {}", e);
                Err(network(e))
            }
        }
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentityId, IdentityError> {
        let stored = self
            .credentials
            .find_one(doc! { "identifier": normalize_email(email) })
            .await
            .map_err(network)?
            .ok_or(IdentityError::NotFound)?;

        match verify_password(password, &stored.password_hash) {
            Ok(true) => Ok(IdentityId::new(stored.uid)),
            Ok(false) => Err(IdentityError::WrongPassword),
            Err(e) => {
                warn!("Unreadable credential for identity {}: {}", stored.uid, e);
                Err(e)
            }
        }
    }
}
