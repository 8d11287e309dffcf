//! Audit trail for sign-up and sign-in outcomes
//!
//! Every outcome is emitted on the `registrar::audit` tracing target and, when
//! a path is configured, appended to a JSONL file. Passwords never reach an
//! event; emails are recorded as submitted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Audit event types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SignUp,
    ProfileRetry,
    SignIn,
}

/// How the submission ended
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Succeeded,
    /// Identity exists, profile missing
    Partial,
    Failed,
    /// Refused as a duplicate in-flight submission
    Busy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub timestamp: DateTime<Utc>,
    pub event_type: EventType,
    pub node_id: String,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Error kind code when the outcome is not a success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl AuditEvent {
    pub fn new(event_type: EventType, node_id: String, outcome: Outcome) -> Self {
        Self {
            timestamp: Utc::now(),
            event_type,
            node_id,
            outcome,
            identity_id: None,
            email: None,
            code: None,
        }
    }

    pub fn with_identity(mut self, identity_id: impl Into<String>) -> Self {
        self.identity_id = Some(identity_id.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Audit logger with optional JSONL file sink
#[derive(Clone)]
pub struct AuditLogger {
    inner: Arc<Mutex<Option<BufWriter<File>>>>,
    node_id: String,
}

impl AuditLogger {
    pub fn new(node_id: String) -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
            node_id,
        }
    }

    /// Start appending events to `path`
    pub async fn init_file(&self, path: PathBuf) -> std::io::Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        *self.inner.lock().await = Some(BufWriter::new(file));

        info!("Audit logging initialized to {}", path.display());
        Ok(())
    }

    /// Start an event stamped with this logger's node id
    pub fn event(&self, event_type: EventType, outcome: Outcome) -> AuditEvent {
        AuditEvent::new(event_type, self.node_id.clone(), outcome)
    }

    pub async fn log(&self, event: AuditEvent) {
        info!(
            target: "registrar::audit",
            event_type = ?event.event_type,
            outcome = ?event.outcome,
            identity_id = event.identity_id.as_deref().unwrap_or("-"),
            code = event.code.as_deref().unwrap_or("-"),
            "auth outcome"
        );

        let mut inner = self.inner.lock().await;
        let Some(writer) = inner.as_mut() else {
            return;
        };

        let jsonl = match event.to_jsonl() {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to serialize audit event: {}", e);
                return;
            }
        };

        if let Err(e) = writeln!(writer, "{}", jsonl) {
            error!("Failed to write audit event: {}", e);
        }
        if let Err(e) = writer.flush() {
            error!("Failed to flush audit log: {}", e);
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = AuditEvent::new(EventType::SignUp, "node-1".into(), Outcome::Partial)
            .with_identity("uid_123")
            .with_code("NETWORK_ERROR");

        let jsonl = event.to_jsonl().unwrap();
        assert!(jsonl.contains("\"sign_up\""));
        assert!(jsonl.contains("\"partial\""));
        assert!(jsonl.contains("uid_123"));
        assert!(!jsonl.contains("email"));
    }

    #[tokio::test]
    async fn test_file_sink_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        let logger = AuditLogger::new("node-1".into());
        logger.init_file(path.clone()).await.unwrap();

        logger
            .log(logger.event(EventType::SignIn, Outcome::Succeeded).with_identity("uid_1"))
            .await;
        logger
            .log(logger.event(EventType::SignIn, Outcome::Failed).with_code("WRONG_PASSWORD"))
            .await;

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);

        let second: AuditEvent = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.outcome, Outcome::Failed);
        assert_eq!(second.code.as_deref(), Some("WRONG_PASSWORD"));
    }
}
