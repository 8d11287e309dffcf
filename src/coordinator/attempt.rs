//! Registration input value

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::profile::ProfileFields;

/// One sign-up submission, alive for a single `register` call
///
/// The password is wiped from memory when the attempt is dropped and never
/// appears in `Debug` output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RegistrationAttempt {
    email: String,
    password: String,
    username: String,
}

impl RegistrationAttempt {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            username: username.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Profile fields written once the identity exists
    pub fn profile_fields(&self) -> ProfileFields {
        ProfileFields {
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

impl fmt::Debug for RegistrationAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationAttempt")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("username", &self.username)
            .finish()
    }
}
