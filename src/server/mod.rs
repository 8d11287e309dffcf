//! HTTP server for the sign-up/sign-in boundary

pub mod http;

pub use http::{run, AppState, Backend, BoxBody};
