//! Route guard decisions.
//!
//! Guards answer "may this navigation proceed" from session state alone,
//! attempting a silent auto-login when a marker suggests recovery might
//! work. They return decisions; the host router applies them. Every guard
//! resolves fully (including any in-flight refresh) before answering, and
//! a missing marker is answered synchronously with no network call.

use super::coordinator::SessionCoordinator;

/// Where to send the user when a guard denies navigation.
pub const SIGN_IN_ROUTE: &str = "/auth/signin";
/// Where to send an authenticated user away from guest-only routes.
pub const DASHBOARD_ROUTE: &str = "/dashboard";

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

/// Protect private routes: allow authenticated users, try a silent
/// recovery when a marker exists, otherwise redirect to sign-in.
pub async fn auth_guard(session: &SessionCoordinator) -> GuardDecision {
    if session.is_authenticated() {
        return GuardDecision::Allow;
    }
    if session.has_session_marker() {
        if session.auto_login().await {
            return GuardDecision::Allow;
        }
        return GuardDecision::Redirect(SIGN_IN_ROUTE);
    }
    GuardDecision::Redirect(SIGN_IN_ROUTE)
}

/// Keep authenticated users out of sign-in/sign-up routes.
pub async fn guest_guard(session: &SessionCoordinator) -> GuardDecision {
    if session.is_authenticated() {
        return GuardDecision::Redirect(DASHBOARD_ROUTE);
    }
    if session.has_session_marker() {
        if session.auto_login().await {
            return GuardDecision::Redirect(DASHBOARD_ROUTE);
        }
        return GuardDecision::Allow;
    }
    GuardDecision::Allow
}

/// Same decision logic as [`auth_guard`] but answering a plain bool, for
/// lazy route matching where the route's existence is conditional.
pub async fn auth_match_guard(session: &SessionCoordinator) -> bool {
    if session.is_authenticated() {
        return true;
    }
    if session.has_session_marker() {
        return session.auto_login().await;
    }
    false
}
