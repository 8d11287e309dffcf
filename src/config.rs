//! Configuration for the registrar
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

use crate::db::schemas::{CREDENTIAL_COLLECTION, PROFILE_COLLECTION};

/// Registrar - credential and profile registration service
#[derive(Parser, Debug, Clone)]
#[command(name = "registrar")]
#[command(about = "Sign-up and sign-in service coordinating identity and profile stores")]
pub struct Args {
    /// Unique node identifier for this instance
    #[arg(long, env = "NODE_ID", default_value_t = Uuid::new_v4())]
    pub node_id: Uuid,

    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Enable development mode (in-memory identity provider and profile store)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "registrar")]
    pub mongodb_db: String,

    /// Collection holding credentials
    #[arg(long, env = "CREDENTIAL_COLLECTION", default_value = CREDENTIAL_COLLECTION)]
    pub credential_collection: String,

    /// Collection holding profiles
    #[arg(long, env = "PROFILE_COLLECTION", default_value = PROFILE_COLLECTION)]
    pub profile_collection: String,

    /// Upper bound on each identity/profile call in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value = "10000")]
    pub request_timeout_ms: u64,

    /// Where a successful sign-in sends the user
    #[arg(long, env = "POST_LOGIN_REDIRECT", default_value = "/dashboard.html")]
    pub post_login_redirect: String,

    /// Append audit events as JSONL to this file
    #[arg(long, env = "AUDIT_LOG_PATH")]
    pub audit_log_path: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON", default_value = "false")]
    pub log_json: bool,
}

impl Args {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout_ms == 0 {
            return Err("REQUEST_TIMEOUT_MS must be greater than zero".to_string());
        }

        if self.credential_collection.trim().is_empty() || self.profile_collection.trim().is_empty()
        {
            return Err("Collection names must not be empty".to_string());
        }

        if self.credential_collection == self.profile_collection {
            return Err("CREDENTIAL_COLLECTION and PROFILE_COLLECTION must differ".to_string());
        }

        if !self.post_login_redirect.starts_with('/') {
            return Err("POST_LOGIN_REDIRECT must be a path starting with '/'".to_string());
        }

        Ok(())
    }
}
