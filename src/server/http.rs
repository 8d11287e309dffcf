//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::header::HeaderValue;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::Args;
use crate::presentation::FormController;
use crate::routes;
use crate::types::RegistrarError;

pub type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

/// Which collaborators back the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    InMemory,
    Mongo,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InMemory => "memory",
            Self::Mongo => "mongodb",
        }
    }
}

/// Shared application state
pub struct AppState {
    pub args: Args,
    pub controller: Arc<FormController>,
    pub backend: Backend,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(args: Args, controller: Arc<FormController>, backend: Backend) -> Self {
        Self {
            args,
            controller,
            backend,
            started_at: Instant::now(),
        }
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<(), RegistrarError> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!(
        "Registrar listening on {} as node {} (backend: {})",
        state.args.listen,
        state.args.node_id,
        state.backend.as_str()
    );

    if state.backend == Backend::InMemory {
        warn!("In-memory collaborators active - accounts are lost on restart");
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(io, service)
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route incoming HTTP requests
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<BoxBody>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("[{}] {} {}", addr, method, path);

    if path.starts_with("/auth") {
        return Ok(routes::handle_auth_request(req, Arc::clone(&state)).await);
    }

    let response = match (method, path.as_str()) {
        (Method::GET, "/health") | (Method::GET, "/healthz") => {
            routes::health_check(&state)
        }
        (Method::OPTIONS, _) => preflight_response(),
        _ => not_found_response(&path),
    };

    Ok(response)
}

pub fn full_body(data: impl Into<Bytes>) -> BoxBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

pub fn empty_body() -> BoxBody {
    full_body(Bytes::new())
}

/// CORS preflight
pub fn preflight_response() -> Response<BoxBody> {
    let mut response = Response::new(empty_body());
    *response.status_mut() = StatusCode::NO_CONTENT;
    routes::apply_cors(response.headers_mut());
    response
        .headers_mut()
        .insert("Access-Control-Max-Age", HeaderValue::from_static("86400"));
    response
}

fn not_found_response(path: &str) -> Response<BoxBody> {
    routes::json_response(
        StatusCode::NOT_FOUND,
        &routes::ErrorResponse {
            error: format!("Not found: {}", path),
            code: None,
        },
    )
}
