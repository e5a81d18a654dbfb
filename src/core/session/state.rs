//! Reactive authentication state.
//!
//! One record, one signal: every UI binding, guard and interceptor reads
//! the same `AuthSnapshot`, and only the `SessionCoordinator` writes it.
//! The signal is reference-counted (`ArcRwSignal`) so the state works both
//! inside a component tree and in plain native tests.

use leptos::prelude::*;

use crate::core::error::AuthError;
use crate::core::models::User;

/// The authentication state record.
///
/// `is_authenticated == true` implies both `user` and `token` are present;
/// all transitions preserving that invariant go through [`AuthState`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthSnapshot {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Shared handle to the reactive auth record.
///
/// Cloning shares the underlying signal.
#[derive(Clone)]
pub struct AuthState {
    inner: ArcRwSignal<AuthSnapshot>,
}

impl AuthState {
    /// Create a new state in the initial unauthenticated, not-loading shape.
    pub fn new() -> Self {
        Self {
            inner: ArcRwSignal::new(AuthSnapshot::default()),
        }
    }

    /// The underlying signal, for reactive subscribers.
    pub fn signal(&self) -> ArcRwSignal<AuthSnapshot> {
        self.inner.clone()
    }

    /// Current value, read outside any reactive context.
    pub fn snapshot(&self) -> AuthSnapshot {
        self.inner.get_untracked()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.with_untracked(|s| s.is_authenticated)
    }

    pub fn user(&self) -> Option<User> {
        self.inner.with_untracked(|s| s.user.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.inner.with_untracked(|s| s.token.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.inner.with_untracked(|s| s.is_loading)
    }

    pub fn error(&self) -> Option<String> {
        self.inner.with_untracked(|s| s.error.clone())
    }

    /// Start of a sign-in / sign-up / verify attempt: loading on, error off.
    pub(crate) fn begin_attempt(&self) {
        self.inner.update(|s| {
            s.is_loading = true;
            s.error = None;
        });
    }

    /// End of a side operation that does not change authentication.
    pub(crate) fn finish_attempt(&self) {
        self.inner.update(|s| {
            s.is_loading = false;
        });
    }

    /// A sign-in-shaped attempt failed; surface the message to the UI.
    pub(crate) fn fail_attempt(&self, error: &AuthError) {
        let message = error.user_message();
        self.inner.update(|s| {
            s.is_authenticated = false;
            s.user = None;
            s.token = None;
            s.is_loading = false;
            s.error = Some(message);
        });
    }

    /// Full successful authentication.
    pub(crate) fn authenticate(&self, user: User, token: String) {
        self.inner.update(|s| {
            s.is_authenticated = true;
            s.user = Some(user);
            s.token = Some(token);
            s.is_loading = false;
            s.error = None;
        });
    }

    /// Refresh success: replace the token, leave identity untouched.
    pub(crate) fn set_token(&self, token: String) {
        self.inner.update(|s| {
            s.token = Some(token);
        });
    }

    /// Absorb a profile update without touching authentication.
    pub(crate) fn set_user(&self, user: User) {
        self.inner.update(|s| {
            s.user = Some(user);
        });
    }

    /// Seed the last-known user from storage at startup; not authenticated
    /// until a refresh succeeds.
    pub(crate) fn seed_user(&self, user: User) {
        self.inner.update(|s| {
            s.user = Some(user);
            s.is_authenticated = false;
            s.token = None;
        });
    }

    /// Back to the initial unauthenticated shape.
    pub(crate) fn reset(&self) {
        self.inner.set(AuthSnapshot::default());
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}
