//! Logging infrastructure for the registrar
//!
//! Structured audit events for every sign-up, retry, and sign-in outcome.

pub mod audit;

pub use audit::{AuditEvent, AuditLogger, EventType, Outcome};
