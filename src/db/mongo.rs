//! MongoDB client and collection wrapper
//!
//! Pattern adapted from holo-host/rust/util_libs/db/src/mongodb

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::{
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, UpdateModifications},
    results::UpdateResult,
    Client, Collection, IndexModel,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

use crate::db::schemas::Metadata;
use crate::types::RegistrarError;

/// Server error code for a unique index violation
pub const DUPLICATE_KEY_CODE: i32 = 11000;
/// Server error code for a concurrent write conflict
pub const WRITE_CONFLICT_CODE: i32 = 112;

/// Trait for schemas that provide index definitions
pub trait IntoIndexes {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)>;
}

/// Trait for schemas with mutable metadata
pub trait MutMetadata {
    fn mut_metadata(&mut self) -> &mut Metadata;
}

/// Coarse classification of driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbFault {
    DuplicateKey,
    WriteConflict,
    Other,
}

/// Classify a driver error by server error code
pub fn classify(err: &mongodb::error::Error) -> DbFault {
    let code = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => Some(write_error.code),
        ErrorKind::Command(command_error) => Some(command_error.code),
        _ => None,
    };

    match code {
        Some(DUPLICATE_KEY_CODE) => DbFault::DuplicateKey,
        Some(WRITE_CONFLICT_CODE) => DbFault::WriteConflict,
        _ if err.contains_label("TransientTransactionError") => DbFault::WriteConflict,
        _ => DbFault::Other,
    }
}

/// MongoDB client wrapper
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Create a new MongoDB client
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, RegistrarError> {
        info!("Connecting to MongoDB at {}", uri);

        // Use serverSelectionTimeoutMS to avoid hanging on unreachable MongoDB
        let timeout_uri = if uri.contains('?') {
            format!("{}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        } else {
            format!("{}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        };

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| RegistrarError::Database(format!("Failed to connect to MongoDB: {}", e)))?;

        client
            .database(db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| RegistrarError::Database(format!("MongoDB ping failed: {}", e)))?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self {
            client,
            db_name: db_name.to_string(),
        })
    }

    /// Get a typed collection, applying the schema's indexes
    pub async fn collection<T>(&self, name: &str) -> Result<MongoCollection<T>, RegistrarError>
    where
        T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes + MutMetadata,
    {
        MongoCollection::new(&self.client, &self.db_name, name).await
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }
}

/// Typed MongoDB collection with automatic indexing
///
/// Operations return raw driver errors so callers can `classify` them into
/// their own taxonomy.
#[derive(Debug, Clone)]
pub struct MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    inner: Collection<T>,
}

impl<T> MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes + MutMetadata,
{
    /// Create a new collection and apply indexes
    pub async fn new(
        client: &Client,
        db_name: &str,
        collection_name: &str,
    ) -> Result<Self, RegistrarError> {
        let collection = client.database(db_name).collection::<T>(collection_name);
        let mongo_collection = MongoCollection { inner: collection };

        mongo_collection.apply_indexes().await?;

        Ok(mongo_collection)
    }

    async fn apply_indexes(&self) -> Result<(), RegistrarError> {
        let schema_indices = T::into_indices();

        if schema_indices.is_empty() {
            return Ok(());
        }

        let indices: Vec<IndexModel> = schema_indices
            .into_iter()
            .map(|(keys, opts)| IndexModel::builder().keys(keys).options(opts).build())
            .collect();

        self.inner
            .create_indexes(indices)
            .await
            .map_err(|e| RegistrarError::Database(format!("Failed to create indexes: {}", e)))?;

        Ok(())
    }

    /// Insert a document, setting metadata timestamps
    pub async fn insert_one(&self, mut item: T) -> mongodb::error::Result<Option<ObjectId>> {
        let now = DateTime::now();
        let metadata = item.mut_metadata();
        metadata.created_at = Some(now);
        metadata.updated_at = Some(now);

        let result = self.inner.insert_one(item).await?;
        Ok(result.inserted_id.as_object_id())
    }

    /// Find one document by filter
    pub async fn find_one(&self, filter: Document) -> mongodb::error::Result<Option<T>> {
        self.inner.find_one(filter).await
    }

    /// Update the document matching `filter`, inserting it when absent
    pub async fn upsert_one(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> mongodb::error::Result<UpdateResult> {
        self.inner.update_one(filter, update).upsert(true).await
    }
}

