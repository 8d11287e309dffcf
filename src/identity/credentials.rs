//! Credential format rules shared by the bundled identity providers
//!
//! Mirrors what a hosted auth backend rejects up front: malformed email
//! addresses and passwords shorter than six characters.

use crate::types::IdentityError;

/// Shortest password an identity provider accepts
pub const MIN_PASSWORD_LEN: usize = 6;

/// Canonical form used as the uniqueness key for an email
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Syntactic email check (not deliverability)
pub fn validate_email(email: &str) -> Result<(), IdentityError> {
    let email = email.trim();
    let invalid = |why: &str| Err(IdentityError::InvalidCredentialFormat(why.to_string()));

    if email.is_empty() {
        return invalid("email is empty");
    }
    if email.chars().any(char::is_whitespace) {
        return invalid("email contains whitespace");
    }

    let Some((local, domain)) = email.split_once('@') else {
        return invalid("email is missing '@'");
    };
    if local.is_empty() || domain.contains('@') {
        return invalid("email local part is malformed");
    }
    if !domain.contains('.') || domain.split('.').any(str::is_empty) {
        return invalid("email domain is malformed");
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), IdentityError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(IdentityError::InvalidCredentialFormat(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_addresses() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("first.last+tag@mail.example.org").is_ok());
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        for bad in ["", "ax.com", "@x.com", "a@x", "a@x..com", "a@@x.com", "a b@x.com", "a@.com"] {
            assert!(
                matches!(validate_email(bad), Err(IdentityError::InvalidCredentialFormat(_))),
                "expected rejection for {bad:?}"
            );
        }
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("12345").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  A@X.Com "), "a@x.com");
    }
}
