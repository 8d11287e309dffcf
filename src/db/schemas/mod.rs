//! Database schemas
//!
//! Defines MongoDB document structures for credentials and profiles.

mod credential;
mod metadata;
mod profile;

pub use credential::{CredentialDoc, CREDENTIAL_COLLECTION};
pub use metadata::Metadata;
pub use profile::{ProfileDoc, PROFILE_COLLECTION};
