//! Form submission handlers
//!
//! Each handler takes a structured form value, runs exactly one coordinator
//! operation, and returns a view the caller branches on. Callers never need
//! to inspect error text.

use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use super::guard::{FormKind, SubmissionGuard};
use super::notice::Notice;
use crate::coordinator::{
    RegistrationAttempt, RegistrationCoordinator, RegistrationResult, SignInResult,
};
use crate::identity::IdentityId;
use crate::logging::{AuditLogger, EventType, Outcome};

/// Sign-up form fields
#[derive(Clone, Deserialize)]
pub struct SignUpForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub username: String,
}

impl SignUpForm {
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        if self.password.is_empty() {
            missing.push("password");
        }
        if self.username.trim().is_empty() {
            missing.push("username");
        }
        missing
    }
}

/// Sign-in form fields
#[derive(Clone, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Retry action offered after a partial registration
///
/// Carries the sign-up credentials so the retry can prove it is acting for
/// `identity_id`.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryProfileForm {
    #[serde(default)]
    pub identity_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpView {
    Registered {
        identity_id: IdentityId,
    },
    Rejected {
        notice: Notice,
    },
    /// Account exists without a profile; offer `retry_profile` with this id
    ProfileIncomplete {
        identity_id: IdentityId,
        notice: Notice,
    },
    Busy {
        notice: Notice,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInView {
    Redirect {
        identity_id: IdentityId,
        location: String,
    },
    Rejected {
        notice: Notice,
    },
    Busy {
        notice: Notice,
    },
}

pub struct FormController {
    coordinator: Arc<RegistrationCoordinator>,
    guard: SubmissionGuard,
    audit: AuditLogger,
    post_login_redirect: String,
}

impl FormController {
    pub fn new(
        coordinator: Arc<RegistrationCoordinator>,
        audit: AuditLogger,
        post_login_redirect: impl Into<String>,
    ) -> Self {
        Self {
            coordinator,
            guard: SubmissionGuard::new(),
            audit,
            post_login_redirect: post_login_redirect.into(),
        }
    }

    pub fn guard(&self) -> &SubmissionGuard {
        &self.guard
    }

    pub async fn submit_sign_up(&self, form: SignUpForm) -> SignUpView {
        let missing = form.missing_fields();
        if !missing.is_empty() {
            return SignUpView::Rejected {
                notice: Notice::missing_fields(&missing),
            };
        }

        let Some(_ticket) = self.guard.try_acquire(FormKind::SignUp, &form.email) else {
            self.record_busy(EventType::SignUp, &form.email).await;
            return SignUpView::Busy {
                notice: Notice::busy(),
            };
        };

        let attempt = RegistrationAttempt::new(form.email, form.password, form.username);
        let result = self.coordinator.register(&attempt).await;
        self.finish_sign_up(EventType::SignUp, attempt.email(), result)
            .await
    }

    pub async fn retry_profile(&self, form: RetryProfileForm) -> SignUpView {
        let mut missing = Vec::new();
        if form.identity_id.trim().is_empty() {
            missing.push("identityId");
        }
        if form.email.trim().is_empty() {
            missing.push("email");
        }
        if form.password.is_empty() {
            missing.push("password");
        }
        if form.username.trim().is_empty() {
            missing.push("username");
        }
        if !missing.is_empty() {
            return SignUpView::Rejected {
                notice: Notice::missing_fields(&missing),
            };
        }

        let Some(_ticket) = self.guard.try_acquire(FormKind::SignUp, &form.email) else {
            self.record_busy(EventType::ProfileRetry, &form.email).await;
            return SignUpView::Busy {
                notice: Notice::busy(),
            };
        };

        let identity_id = IdentityId::new(form.identity_id);
        let attempt = RegistrationAttempt::new(form.email, form.password, form.username);
        let result = self.coordinator.resume_profile(identity_id, &attempt).await;
        self.finish_sign_up(EventType::ProfileRetry, attempt.email(), result)
            .await
    }

    pub async fn submit_sign_in(&self, form: SignInForm) -> SignInView {
        let mut missing = Vec::new();
        if form.email.trim().is_empty() {
            missing.push("email");
        }
        if form.password.is_empty() {
            missing.push("password");
        }
        if !missing.is_empty() {
            return SignInView::Rejected {
                notice: Notice::missing_fields(&missing),
            };
        }

        let Some(_ticket) = self.guard.try_acquire(FormKind::SignIn, &form.email) else {
            self.record_busy(EventType::SignIn, &form.email).await;
            return SignInView::Busy {
                notice: Notice::busy(),
            };
        };

        match self.coordinator.sign_in(&form.email, &form.password).await {
            SignInResult::Succeeded { identity_id } => {
                self.audit
                    .log(
                        self.audit
                            .event(EventType::SignIn, Outcome::Succeeded)
                            .with_identity(identity_id.as_str())
                            .with_email(form.email.as_str()),
                    )
                    .await;
                SignInView::Redirect {
                    identity_id,
                    location: self.post_login_redirect.clone(),
                }
            }
            SignInResult::Failed { cause } => {
                self.audit
                    .log(
                        self.audit
                            .event(EventType::SignIn, Outcome::Failed)
                            .with_email(form.email.as_str())
                            .with_code(cause.kind_code()),
                    )
                    .await;
                SignInView::Rejected {
                    notice: Notice::sign_in_failed(&cause),
                }
            }
        }
    }

    async fn finish_sign_up(
        &self,
        event_type: EventType,
        email: &str,
        result: RegistrationResult,
    ) -> SignUpView {
        debug!("sign-up stage outcome: {:?}", result.stage());

        match result {
            RegistrationResult::Succeeded { identity_id } => {
                self.audit
                    .log(
                        self.audit
                            .event(event_type, Outcome::Succeeded)
                            .with_identity(identity_id.as_str())
                            .with_email(email),
                    )
                    .await;
                SignUpView::Registered { identity_id }
            }
            RegistrationResult::IdentityFailed { cause } => {
                self.audit
                    .log(
                        self.audit
                            .event(event_type, Outcome::Failed)
                            .with_email(email)
                            .with_code(cause.kind_code()),
                    )
                    .await;
                SignUpView::Rejected {
                    notice: Notice::sign_up_failed(&cause),
                }
            }
            RegistrationResult::ProfileFailed { identity_id, cause } => {
                self.audit
                    .log(
                        self.audit
                            .event(event_type, Outcome::Partial)
                            .with_identity(identity_id.as_str())
                            .with_email(email)
                            .with_code(cause.kind_code()),
                    )
                    .await;
                SignUpView::ProfileIncomplete {
                    identity_id,
                    notice: Notice::profile_incomplete(&cause),
                }
            }
        }
    }

    async fn record_busy(&self, event_type: EventType, email: &str) {
        self.audit
            .log(
                self.audit
                    .event(event_type, Outcome::Busy)
                    .with_email(email)
                    .with_code("SUBMISSION_IN_PROGRESS"),
            )
            .await;
    }
}
