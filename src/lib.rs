//! Registrar - sign-up and sign-in over two independent stores
//!
//! A registration is two dependent remote calls: create an identity with the
//! identity provider, then persist the user's profile under that identity's
//! id. The registrar sequences them, reports partial failure explicitly, and
//! lets a partial registration be resumed at the profile step.
//!
//! ## Components
//!
//! - **Identity**: identity provider abstraction (MongoDB-backed or in-memory)
//! - **Profile**: profile store abstraction (MongoDB-backed or in-memory)
//! - **Coordinator**: create-identity-then-persist-profile state machine and sign-in
//! - **Presentation**: form handlers, duplicate-submission guard, user notices
//! - **Server**: HTTP endpoints over the presentation layer

pub mod config;
pub mod coordinator;
pub mod db;
pub mod identity;
pub mod logging;
pub mod presentation;
pub mod profile;
pub mod routes;
pub mod server;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{RegistrarError, Result};
