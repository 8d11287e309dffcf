//! Liveness probe
//!
//! /health and /healthz return 200 while the process is serving, along with
//! the backend in use and the number of submissions in flight.

use hyper::{Response, StatusCode};
use serde::Serialize;

use super::json_response;
use crate::server::{AppState, BoxBody};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: &'static str,
    pub backend: &'static str,
    pub node_id: String,
    pub uptime: u64,
    pub in_flight: usize,
}

pub fn health_check(state: &AppState) -> Response<BoxBody> {
    json_response(
        StatusCode::OK,
        &HealthResponse {
            healthy: true,
            version: env!("CARGO_PKG_VERSION"),
            backend: state.backend.as_str(),
            node_id: state.args.node_id.to_string(),
            uptime: state.started_at.elapsed().as_secs(),
            in_flight: state.controller.guard().in_flight(),
        },
    )
}
