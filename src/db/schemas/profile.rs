//! Profile document schema
//!
//! Field names (`uid`, `username`, `email`) match the documents the sign-up
//! page wrote, so existing collections stay readable.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Default collection name for profiles
pub const PROFILE_COLLECTION: &str = "username-email-pwd";

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ProfileDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Identity this profile belongs to
    pub uid: String,

    pub username: String,

    pub email: String,
}

impl IntoIndexes for ProfileDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "uid": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("uid_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for ProfileDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
