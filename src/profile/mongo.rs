//! MongoDB-backed profile store
//!
//! Profiles are upserted on `uid`, so a retried write lands on the same
//! document. A unique index on `uid` turns a racing duplicate insert into a
//! write conflict rather than a second record.

use bson::{doc, DateTime};
use tracing::warn;

use super::{ProfileFields, ProfileRecord, ProfileStore};
use crate::db::schemas::ProfileDoc;
use crate::db::{classify, DbFault, MongoClient, MongoCollection};
use crate::identity::IdentityId;
use crate::types::{ProfileError, RegistrarError};

pub struct MongoProfileStore {
    profiles: MongoCollection<ProfileDoc>,
}

impl MongoProfileStore {
    /// Open the profile collection and ensure its indexes
    pub async fn new(mongo: &MongoClient, collection: &str) -> Result<Self, RegistrarError> {
        let profiles = mongo.collection::<ProfileDoc>(collection).await?;
        Ok(Self { profiles })
    }
}

fn map_error(err: mongodb::error::Error) -> ProfileError {
    match classify(&err) {
        DbFault::DuplicateKey | DbFault::WriteConflict => {
            ProfileError::WriteConflict(err.to_string())
        }
        DbFault::Other => ProfileError::Network(err.to_string()),
    }
}

#[async_trait::async_trait]
impl ProfileStore for MongoProfileStore {
    async fn put_profile(
        &self,
        identity_id: &IdentityId,
        fields: &ProfileFields,
    ) -> Result<(), ProfileError> {
        let now = DateTime::now();
        let update = doc! {
            "$set": {
                "username": fields.username.as_str(),
                "email": fields.email.as_str(),
                "metadata.updated_at": now,
            },
            "$setOnInsert": {
                "metadata.created_at": now,
            },
        };

        self.profiles
            .upsert_one(doc! { "uid": identity_id.as_str() }, update)
            .await
            .map(|_| ())
            .map_err(|e| {
                warn!("Profile upsert for {} failed: {}", identity_id, e);
                map_error(e)
            })
    }

    async fn get_profile(
        &self,
        identity_id: &IdentityId,
    ) -> Result<Option<ProfileRecord>, ProfileError> {
        let found = self
            .profiles
            .find_one(doc! { "uid": identity_id.as_str() })
            .await
            .map_err(map_error)?;

        Ok(found.map(|doc| ProfileRecord {
            identity_id: IdentityId::new(doc.uid),
            username: doc.username,
            email: doc.email,
        }))
    }
}
