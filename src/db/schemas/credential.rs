//! Credential document schema
//!
//! One document per identity: normalized email, Argon2 hash, issued uid.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Default collection name for credentials
pub const CREDENTIAL_COLLECTION: &str = "credentials";

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct CredentialDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Normalized (trimmed, lowercase) email
    pub identifier: String,

    /// Argon2 password hash
    pub password_hash: String,

    /// Identity id handed out to callers
    pub uid: String,
}

impl CredentialDoc {
    pub fn new(identifier: String, password_hash: String, uid: String) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            identifier,
            password_hash,
            uid,
        }
    }
}

impl IntoIndexes for CredentialDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // Uniqueness of the email is what makes create_identity exactly-once
            (
                doc! { "identifier": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("identifier_unique".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "uid": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .name("uid_unique".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for CredentialDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
