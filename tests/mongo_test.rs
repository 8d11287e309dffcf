//! MongoDB-backed collaborator tests
//!
//! Need a live server, so they are ignored by default:
//!
//! ```text
//! MONGODB_URI=mongodb://localhost:27017 cargo test --test mongo_test -- --ignored
//! ```
//!
//! Each test works in a throwaway database that is dropped afterwards.

use registrar::db::schemas::{CREDENTIAL_COLLECTION, PROFILE_COLLECTION};
use registrar::db::MongoClient;
use registrar::identity::{IdentityProvider, MongoIdentityProvider};
use registrar::profile::{MongoProfileStore, ProfileFields, ProfileStore};
use registrar::types::IdentityError;

fn mongodb_uri() -> String {
    std::env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
}

fn scratch_db() -> String {
    format!("registrar_test_{}", uuid::Uuid::new_v4().simple())
}

async fn drop_db(name: &str) {
    let client = mongodb::Client::with_uri_str(mongodb_uri()).await.unwrap();
    client.database(name).drop().await.unwrap();
}

// =============================================================================
// Identity provider
// =============================================================================

#[tokio::test]
#[ignore = "requires a running MongoDB (MONGODB_URI)"]
async fn test_duplicate_email_maps_to_already_exists() {
    let db = scratch_db();
    let mongo = MongoClient::new(&mongodb_uri(), &db).await.unwrap();
    let provider = MongoIdentityProvider::new(&mongo, CREDENTIAL_COLLECTION)
        .await
        .unwrap();

    let id = provider.create_identity("a@x.com", "secret1").await.unwrap();
    let again = provider.create_identity("A@X.com ", "other-pass").await;
    assert_eq!(again, Err(IdentityError::AlreadyExists));

    assert_eq!(provider.authenticate("a@x.com", "secret1").await, Ok(id));
    assert_eq!(
        provider.authenticate("a@x.com", "wrong-pass").await,
        Err(IdentityError::WrongPassword)
    );
    assert_eq!(
        provider.authenticate("b@x.com", "secret1").await,
        Err(IdentityError::NotFound)
    );

    drop_db(&db).await;
}

// =============================================================================
// Profile store
// =============================================================================

#[tokio::test]
#[ignore = "requires a running MongoDB (MONGODB_URI)"]
async fn test_profile_upsert_is_idempotent() {
    let db = scratch_db();
    let mongo = MongoClient::new(&mongodb_uri(), &db).await.unwrap();
    let store = MongoProfileStore::new(&mongo, PROFILE_COLLECTION)
        .await
        .unwrap();
    let id = "uid_123".into();

    for username in ["alice", "alice2"] {
        let fields = ProfileFields {
            username: username.into(),
            email: "a@x.com".into(),
        };
        store.put_profile(&id, &fields).await.unwrap();
    }

    let stored = store.get_profile(&id).await.unwrap().unwrap();
    assert_eq!(stored.username, "alice2");

    let client = mongodb::Client::with_uri_str(mongodb_uri()).await.unwrap();
    let count = client
        .database(&db)
        .collection::<bson::Document>(PROFILE_COLLECTION)
        .count_documents(bson::doc! { "uid": "uid_123" })
        .await
        .unwrap();
    assert_eq!(count, 1);

    drop_db(&db).await;
}
