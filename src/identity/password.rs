//! Password hashing and verification using Argon2
//!
//! Uses argon2id with default parameters. Failures here are faults of the
//! provider, not of the submitted credentials, so they surface as
//! `IdentityError::Network`.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::fmt::Display;

use crate::types::IdentityError;

fn provider_fault(action: &str, err: impl Display) -> IdentityError {
    IdentityError::Network(format!("{action}: {err}"))
}

/// Hash a password into a PHC string (salt and parameters included)
pub fn hash_password(password: &str) -> Result<String, IdentityError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| provider_fault("failed to hash password", e))
}

/// Check `password` against a stored PHC hash
///
/// `Ok(false)` is a mismatch; `Err` means the stored hash is unreadable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, IdentityError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| provider_fault("unreadable password hash", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
