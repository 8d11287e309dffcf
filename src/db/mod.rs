//! Database layer
//!
//! MongoDB client, typed collections, and document schemas for the
//! production identity provider and profile store.

pub mod mongo;
pub mod schemas;

pub use mongo::{classify, DbFault, MongoClient, MongoCollection};
