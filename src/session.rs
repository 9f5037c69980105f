//! Session gate.
//!
//! Decides what a route shows given the state of the authentication signal:
//! a loading placeholder, a redirect, or the protected content.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Routes reachable without a signed-in user.
pub const PUBLIC_ROUTES: [&str; 2] = ["/login", "/signup"];

/// Route unauthenticated users are sent to.
pub const LOGIN_ROUTE: &str = "/login";

/// Route signed-in users are sent to from public pages.
pub const HOME_ROUTE: &str = "/";

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Build a user from an optional raw identity; blank names mean signed out.
    pub fn from_identity(identity: Option<&str>) -> Option<Self> {
        identity
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(Self::new)
    }
}

/// State of the authentication signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSignal {
    /// Still waiting to learn whether a user is signed in.
    Pending,
    /// Resolved, with the user if one is signed in.
    Resolved(Option<User>),
}

/// What to do for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    /// Show a loading placeholder until the signal resolves.
    Loading,
    /// Send the visitor to the login page.
    RedirectToLogin,
    /// Send a signed-in user away from a public page.
    RedirectToHome,
    /// Show the requested content.
    Render,
}

impl GateDecision {
    /// Target route for redirects.
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            GateDecision::RedirectToLogin => Some(LOGIN_ROUTE),
            GateDecision::RedirectToHome => Some(HOME_ROUTE),
            GateDecision::Loading | GateDecision::Render => None,
        }
    }
}

impl fmt::Display for GateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateDecision::Loading => write!(f, "Loading..."),
            GateDecision::RedirectToLogin => write!(f, "Redirecting to {}", LOGIN_ROUTE),
            GateDecision::RedirectToHome => write!(f, "Redirecting to {}", HOME_ROUTE),
            GateDecision::Render => write!(f, "Render"),
        }
    }
}

pub fn is_public_route(route: &str) -> bool {
    PUBLIC_ROUTES.contains(&route)
}

/// Resolve the gate for `route`.
pub fn resolve_gate(signal: &AuthSignal, route: &str) -> GateDecision {
    let public = is_public_route(route);

    match signal {
        AuthSignal::Pending => GateDecision::Loading,
        AuthSignal::Resolved(None) if !public => GateDecision::RedirectToLogin,
        AuthSignal::Resolved(Some(_)) if public => GateDecision::RedirectToHome,
        AuthSignal::Resolved(_) => GateDecision::Render,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_in() -> AuthSignal {
        AuthSignal::Resolved(Some(User::new("admin")))
    }

    #[test]
    fn test_pending_signal_shows_loading() {
        assert_eq!(resolve_gate(&AuthSignal::Pending, "/"), GateDecision::Loading);
        assert_eq!(
            resolve_gate(&AuthSignal::Pending, "/login"),
            GateDecision::Loading
        );
    }

    #[test]
    fn test_signed_out_visitor() {
        let signal = AuthSignal::Resolved(None);
        assert_eq!(resolve_gate(&signal, "/reports"), GateDecision::RedirectToLogin);
        assert_eq!(resolve_gate(&signal, "/login"), GateDecision::Render);
        assert_eq!(resolve_gate(&signal, "/signup"), GateDecision::Render);
    }

    #[test]
    fn test_signed_in_user() {
        assert_eq!(resolve_gate(&signed_in(), "/reports"), GateDecision::Render);
        assert_eq!(resolve_gate(&signed_in(), "/"), GateDecision::Render);
        assert_eq!(
            resolve_gate(&signed_in(), "/login"),
            GateDecision::RedirectToHome
        );
    }

    #[test]
    fn test_redirect_targets() {
        assert_eq!(GateDecision::RedirectToLogin.redirect_target(), Some("/login"));
        assert_eq!(GateDecision::RedirectToHome.redirect_target(), Some("/"));
        assert_eq!(GateDecision::Render.redirect_target(), None);
    }

    #[test]
    fn test_user_from_identity() {
        assert_eq!(User::from_identity(Some("  ")), None);
        assert_eq!(User::from_identity(None), None);
        assert_eq!(User::from_identity(Some(" ada ")), Some(User::new("ada")));
    }
}
