//! User-facing messages
//!
//! Text is chosen from the error kind only. Provider detail strings go to the
//! logs, never to the user.

use serde::Serialize;

use crate::types::{IdentityError, ProfileError};

/// A message to show the user, with the machine code behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub code: &'static str,
    pub message: String,
}

impl Notice {
    pub fn sign_up_failed(cause: &IdentityError) -> Self {
        Self {
            code: cause.kind_code(),
            message: format!("Sign-up failed: {}", describe_identity(cause)),
        }
    }

    pub fn sign_in_failed(cause: &IdentityError) -> Self {
        Self {
            code: cause.kind_code(),
            message: format!("Sign-in failed: {}", describe_identity(cause)),
        }
    }

    /// Account exists but the profile was not saved; the user may retry
    pub fn profile_incomplete(cause: &ProfileError) -> Self {
        let detail = match cause {
            ProfileError::Network(_) => "the profile service could not be reached",
            ProfileError::WriteConflict(_) => "your profile was being updated elsewhere",
        };
        Self {
            code: cause.kind_code(),
            message: format!(
                "Your account was created, but {}. Retry to finish setting up your profile.",
                detail
            ),
        }
    }

    pub fn missing_fields(fields: &[&str]) -> Self {
        Self {
            code: "MISSING_FIELDS",
            message: format!("Please fill in: {}", fields.join(", ")),
        }
    }

    pub fn busy() -> Self {
        Self {
            code: "SUBMISSION_IN_PROGRESS",
            message: "A submission for this email is already in progress.".to_string(),
        }
    }
}

fn describe_identity(cause: &IdentityError) -> &'static str {
    match cause {
        IdentityError::AlreadyExists => "an account with this email already exists.",
        IdentityError::InvalidCredentialFormat(_) => {
            "check that the email is valid and the password has at least 6 characters."
        }
        IdentityError::NotFound => "no account exists for this email.",
        IdentityError::WrongPassword => "the password is incorrect.",
        IdentityError::Network(_) => "the service is unreachable, please try again.",
    }
}
