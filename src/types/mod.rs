//! Shared types

mod error;

pub use error::{IdentityError, ProfileError, RegistrarError, Result};
