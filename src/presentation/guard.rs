//! Duplicate-submission guard
//!
//! A submission holds a ticket for its form kind and normalized email while
//! its coordinator call is outstanding. A second submission with the same key
//! is refused instead of racing the first one.

use dashmap::DashSet;
use std::sync::Arc;

use crate::identity::credentials::normalize_email;

/// Which form a submission came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    SignUp,
    SignIn,
}

#[derive(Clone, Default)]
pub struct SubmissionGuard {
    in_flight: Arc<DashSet<(FormKind, String)>>,
}

impl SubmissionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for `(kind, email)`, or `None` if one is already held
    pub fn try_acquire(&self, kind: FormKind, email: &str) -> Option<SubmissionTicket> {
        let key = (kind, normalize_email(email));
        if self.in_flight.insert(key.clone()) {
            Some(SubmissionTicket {
                in_flight: Arc::clone(&self.in_flight),
                key,
            })
        } else {
            None
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

/// Releases its slot on drop
pub struct SubmissionTicket {
    in_flight: Arc<DashSet<(FormKind, String)>>,
    key: (FormKind, String),
}

impl Drop for SubmissionTicket {
    fn drop(&mut self) {
        self.in_flight.remove(&self.key);
    }
}
