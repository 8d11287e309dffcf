//! Sign-up / sign-in panel toggle
//!
//! Pure view state with no link to the coordinator. The container shows the
//! sign-up panel while it carries `right-panel-active`.

use serde::Serialize;

/// CSS class that slides the container over to the sign-up panel
pub const SIGN_UP_ACTIVE_CLASS: &str = "right-panel-active";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    SignUp,
    #[default]
    SignIn,
}

#[derive(Debug, Clone, Default)]
pub struct PanelState {
    active: Panel,
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// "Sign Up" button clicked
    pub fn show_sign_up(&mut self) {
        self.active = Panel::SignUp;
    }

    /// "Sign In" button clicked
    pub fn show_sign_in(&mut self) {
        self.active = Panel::SignIn;
    }

    pub fn active(&self) -> Panel {
        self.active
    }

    /// Classes to put on the container element besides its base class
    pub fn container_classes(&self) -> Vec<&'static str> {
        match self.active {
            Panel::SignUp => vec![SIGN_UP_ACTIVE_CLASS],
            Panel::SignIn => Vec::new(),
        }
    }
}
