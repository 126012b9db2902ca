//! Navigation guards driven purely by local session state

use crate::SessionStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Logical navigation targets a guard can redirect to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Login,
    Dashboard,
    AdminLanding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "decision", content = "to")]
pub enum GuardDecision {
    Allow,
    Redirect(Destination),
}

impl GuardDecision {
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    pub const fn redirect_target(self) -> Option<Destination> {
        match self {
            Self::Allow => None,
            Self::Redirect(to) => Some(to),
        }
    }
}

/// Guard for admin-only pages.
///
/// Anonymous visitors go to the login page before any role check; signed-in
/// non-admins go to the dashboard.
pub fn admin_guard(session: &SessionStore) -> GuardDecision {
    let decision = if !session.is_authenticated() {
        GuardDecision::Redirect(Destination::Login)
    } else if !session.is_admin() {
        GuardDecision::Redirect(Destination::Dashboard)
    } else {
        GuardDecision::Allow
    };
    debug!(?decision, "admin guard");
    decision
}

/// Guard for pages only anonymous visitors should see (login, register)
pub fn guest_guard(session: &SessionStore) -> GuardDecision {
    let decision = if session.is_authenticated() {
        if session.is_admin() {
            GuardDecision::Redirect(Destination::AdminLanding)
        } else {
            GuardDecision::Redirect(Destination::Dashboard)
        }
    } else {
        GuardDecision::Allow
    };
    debug!(?decision, "guest guard");
    decision
}
