//! Registrar - sign-up and sign-in service

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use registrar::{
    config::Args,
    coordinator::{CoordinatorConfig, RegistrationCoordinator},
    db::MongoClient,
    identity::{IdentityProvider, InMemoryIdentityProvider, MongoIdentityProvider},
    logging::AuditLogger,
    presentation::FormController,
    profile::{InMemoryProfileStore, MongoProfileStore, ProfileStore},
    server::{self, AppState, Backend},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    // Initialize tracing/logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("registrar={},info", args.log_level).into());
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Registrar");
    info!("======================================");
    info!("Node ID: {}", args.node_id);
    info!("Listen: {}", args.listen);
    info!("Mode: {}", if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" });
    info!("MongoDB: {}", args.mongodb_uri);
    info!(
        "Collections: {} (credentials), {} (profiles)",
        args.credential_collection, args.profile_collection
    );
    info!("Call timeout: {}ms", args.request_timeout_ms);
    info!("======================================");

    let (identity, profiles, backend) = connect_backend(&args).await?;

    let audit = AuditLogger::new(args.node_id.to_string());
    if let Some(path) = &args.audit_log_path {
        if let Err(e) = audit.init_file(path.clone()).await {
            warn!("Audit file unavailable, logging to tracing only: {}", e);
        }
    }

    let coordinator = Arc::new(RegistrationCoordinator::new(
        identity,
        profiles,
        CoordinatorConfig {
            call_timeout: args.call_timeout(),
        },
    ));
    let controller = Arc::new(FormController::new(
        coordinator,
        audit,
        args.post_login_redirect.clone(),
    ));

    let state = Arc::new(AppState::new(args, controller, backend));
    server::run(state).await?;

    Ok(())
}

/// Pick MongoDB collaborators, or in-memory ones when dev mode can't reach MongoDB
async fn connect_backend(
    args: &Args,
) -> anyhow::Result<(Arc<dyn IdentityProvider>, Arc<dyn ProfileStore>, Backend)> {
    let mongo = match MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await {
        Ok(client) => {
            info!("MongoDB connected successfully");
            client
        }
        Err(e) if args.dev_mode => {
            warn!("MongoDB connection failed (dev mode, using in-memory stores): {}", e);
            return Ok((
                Arc::new(InMemoryIdentityProvider::new()),
                Arc::new(InMemoryProfileStore::new()),
                Backend::InMemory,
            ));
        }
        Err(e) => {
            error!("MongoDB connection failed: {}", e);
            std::process::exit(1);
        }
    };

    let identity = MongoIdentityProvider::new(&mongo, &args.credential_collection).await?;
    let profiles = MongoProfileStore::new(&mongo, &args.profile_collection).await?;

    Ok((Arc::new(identity), Arc::new(profiles), Backend::Mongo))
}
