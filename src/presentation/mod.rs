//! Presentation boundary
//!
//! Everything the sign-up/sign-in page needs from the registrar, expressed as
//! message handlers over structured form values:
//! - `FormController` runs one coordinator operation per submission
//! - `SubmissionGuard` refuses duplicate submissions while one is in flight
//! - `Notice` turns error kinds into user-facing text
//! - `PanelState` is the sign-up/sign-in panel toggle

mod controller;
mod guard;
mod notice;
mod panel;

pub use controller::{
    FormController, RetryProfileForm, SignInForm, SignInView, SignUpForm, SignUpView,
};
pub use guard::{FormKind, SubmissionGuard, SubmissionTicket};
pub use notice::Notice;
pub use panel::{Panel, PanelState, SIGN_UP_ACTIVE_CLASS};
