//! HTTP Routes for sign-up and sign-in
//!
//! - POST /auth/register        - Create identity, then profile
//! - POST /auth/register/resume - Retry the profile step for an existing identity
//! - POST /auth/login           - Authenticate and get the post-login destination

use http_body_util::BodyExt;
use hyper::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{json_response, ErrorResponse};
use crate::identity::IdentityId;
use crate::presentation::{Notice, RetryProfileForm, SignInForm, SignInView, SignUpForm, SignUpView};
use crate::server::{AppState, BoxBody};
use crate::types::RegistrarError;

/// Largest accepted request body
const MAX_BODY_BYTES: usize = 10240;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredResponse {
    pub identity_id: IdentityId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileIncompleteResponse {
    pub error: String,
    pub code: String,
    pub identity_id: IdentityId,
    /// Client should offer POST /auth/register/resume
    pub retry: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedInResponse {
    pub identity_id: IdentityId,
    pub redirect: String,
}

/// Status code for a notice's error kind
pub fn status_for_code(code: &str) -> StatusCode {
    match code {
        "ALREADY_EXISTS" | "WRITE_CONFLICT" => StatusCode::CONFLICT,
        "INVALID_CREDENTIAL_FORMAT" | "MISSING_FIELDS" => StatusCode::BAD_REQUEST,
        "NOT_FOUND" | "WRONG_PASSWORD" => StatusCode::UNAUTHORIZED,
        "NETWORK_ERROR" => StatusCode::SERVICE_UNAVAILABLE,
        "SUBMISSION_IN_PROGRESS" => StatusCode::TOO_MANY_REQUESTS,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn notice_body(notice: Notice) -> ErrorResponse {
    ErrorResponse {
        error: notice.message,
        code: Some(notice.code.to_string()),
    }
}

/// HTTP rendering of a sign-up outcome
pub fn sign_up_response(view: SignUpView) -> Response<BoxBody> {
    match view {
        SignUpView::Registered { identity_id } => {
            json_response(StatusCode::CREATED, &RegisteredResponse { identity_id })
        }
        SignUpView::ProfileIncomplete {
            identity_id,
            notice,
        } => json_response(
            StatusCode::BAD_GATEWAY,
            &ProfileIncompleteResponse {
                error: notice.message,
                code: notice.code.to_string(),
                identity_id,
                retry: true,
            },
        ),
        SignUpView::Rejected { notice } | SignUpView::Busy { notice } => {
            json_response(status_for_code(notice.code), &notice_body(notice))
        }
    }
}

/// HTTP rendering of a sign-in outcome
pub fn sign_in_response(view: SignInView) -> Response<BoxBody> {
    match view {
        SignInView::Redirect {
            identity_id,
            location,
        } => json_response(
            StatusCode::OK,
            &SignedInResponse {
                identity_id,
                redirect: location,
            },
        ),
        SignInView::Rejected { notice } | SignInView::Busy { notice } => {
            json_response(status_for_code(notice.code), &notice_body(notice))
        }
    }
}

async fn parse_json_body<T: for<'de> Deserialize<'de>>(
    req: Request<hyper::body::Incoming>,
) -> Result<T, RegistrarError> {
    let body = req
        .collect()
        .await
        .map_err(|e| RegistrarError::Http(format!("Failed to read body: {}", e)))?;

    let bytes = body.to_bytes();
    if bytes.len() > MAX_BODY_BYTES {
        return Err(RegistrarError::Http("Request body too large".into()));
    }

    Ok(serde_json::from_slice(&bytes)?)
}

fn bad_body(err: RegistrarError) -> Response<BoxBody> {
    json_response(
        err.status_code(),
        &ErrorResponse {
            error: err.to_string(),
            code: Some("INVALID_BODY".into()),
        },
    )
}

async fn handle_register(req: Request<hyper::body::Incoming>, state: Arc<AppState>) -> Response<BoxBody> {
    match parse_json_body::<SignUpForm>(req).await {
        Ok(form) => sign_up_response(state.controller.submit_sign_up(form).await),
        Err(e) => bad_body(e),
    }
}

async fn handle_resume(req: Request<hyper::body::Incoming>, state: Arc<AppState>) -> Response<BoxBody> {
    match parse_json_body::<RetryProfileForm>(req).await {
        Ok(form) => sign_up_response(state.controller.retry_profile(form).await),
        Err(e) => bad_body(e),
    }
}

async fn handle_login(req: Request<hyper::body::Incoming>, state: Arc<AppState>) -> Response<BoxBody> {
    match parse_json_body::<SignInForm>(req).await {
        Ok(form) => sign_in_response(state.controller.submit_sign_in(form).await),
        Err(e) => bad_body(e),
    }
}

/// Handle /auth/* requests
pub async fn handle_auth_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    if req.method() == Method::OPTIONS {
        return crate::server::http::preflight_response();
    }

    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match (&method, path.as_str()) {
        (&Method::POST, "/auth/register") => handle_register(req, state).await,
        (&Method::POST, "/auth/register/resume") => handle_resume(req, state).await,
        (&Method::POST, "/auth/login") => handle_login(req, state).await,

        (_, "/auth/register") | (_, "/auth/register/resume") | (_, "/auth/login") => {
            json_response(
                StatusCode::METHOD_NOT_ALLOWED,
                &ErrorResponse {
                    error: "Method not allowed".into(),
                    code: None,
                },
            )
        }

        _ => json_response(
            StatusCode::NOT_FOUND,
            &ErrorResponse {
                error: "Auth endpoint not found".into(),
                code: None,
            },
        ),
    }
}
