//! Error types for the registrar
//!
//! `IdentityError` and `ProfileError` are the collaborator taxonomies the
//! coordinator reports back to callers. `RegistrarError` covers everything
//! around them: configuration, database plumbing, and the HTTP boundary.

use hyper::StatusCode;

/// Failures reported by an identity provider
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("identity already exists")]
    AlreadyExists,

    #[error("invalid credential format: {0}")]
    InvalidCredentialFormat(String),

    #[error("identity not found")]
    NotFound,

    #[error("wrong password")]
    WrongPassword,

    #[error("identity provider unreachable: {0}")]
    Network(String),
}

impl IdentityError {
    /// Stable machine-readable code for this error kind
    pub fn kind_code(&self) -> &'static str {
        match self {
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::InvalidCredentialFormat(_) => "INVALID_CREDENTIAL_FORMAT",
            Self::NotFound => "NOT_FOUND",
            Self::WrongPassword => "WRONG_PASSWORD",
            Self::Network(_) => "NETWORK_ERROR",
        }
    }
}

/// Failures reported by a profile store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("profile store unreachable: {0}")]
    Network(String),

    #[error("profile write conflict: {0}")]
    WriteConflict(String),
}

impl ProfileError {
    /// Stable machine-readable code for this error kind
    pub fn kind_code(&self) -> &'static str {
        match self {
            Self::Network(_) => "NETWORK_ERROR",
            Self::WriteConflict(_) => "WRITE_CONFLICT",
        }
    }
}

/// Main error type for registrar infrastructure
#[derive(Debug, thiserror::Error)]
pub enum RegistrarError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RegistrarError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Http(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<std::io::Error> for RegistrarError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for RegistrarError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest(format!("JSON error: {}", err))
    }
}

impl From<mongodb::error::Error> for RegistrarError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Result type alias for registrar operations
pub type Result<T> = std::result::Result<T, RegistrarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            RegistrarError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RegistrarError::Database("down".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            RegistrarError::Config("bad".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_kind_codes_ignore_detail() {
        assert_eq!(
            IdentityError::Network("timeout".into()).kind_code(),
            IdentityError::Network("reset".into()).kind_code()
        );
        assert_eq!(IdentityError::WrongPassword.kind_code(), "WRONG_PASSWORD");
        assert_eq!(
            ProfileError::WriteConflict("dup".into()).kind_code(),
            "WRITE_CONFLICT"
        );
    }
}
