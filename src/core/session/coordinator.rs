//! Session coordinator.
//!
//! The one writer of all session state. Orchestrates sign-in, sign-up,
//! verification, silent refresh, auto-login and sign-out against the
//! backend, and guarantees at most one in-flight refresh and one in-flight
//! auto-login at a time: concurrent callers await the same shared future
//! and observe the same outcome instead of issuing duplicate requests.

use std::cell::RefCell;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};
use leptos::logging;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::error::AuthError;
use crate::core::models::{
    AuthResponse, EmailRequest, LoginRequest, MessageResponse, RefreshResponse, RegisterRequest,
    RegistrationResponse, ResetPasswordRequest, User, VerifyRegistrationRequest,
};

use super::events::{SessionEvent, SessionEvents};
use super::marker::{MarkerStore, SessionMarker};
use super::state::AuthState;
use super::tokens::TokenStore;
use super::transport::{ApiRequest, HttpTransport};

type SharedRefresh = Shared<LocalBoxFuture<'static, Result<(), AuthError>>>;
type SharedAutoLogin = Shared<LocalBoxFuture<'static, bool>>;

/// Coordinates authentication flows and owns the session state.
///
/// Cloning shares every underlying handle; the application constructs one
/// coordinator at its root and passes clones to guards and the
/// interceptor. Tests construct isolated instances with mock seams.
#[derive(Clone)]
pub struct SessionCoordinator {
    transport: Rc<dyn HttpTransport>,
    markers: Rc<dyn MarkerStore>,
    state: AuthState,
    tokens: TokenStore,
    events: SessionEvents,
    refresh_inflight: Rc<RefCell<Option<SharedRefresh>>>,
    auto_login_inflight: Rc<RefCell<Option<SharedAutoLogin>>>,
}

impl SessionCoordinator {
    /// Build a coordinator and seed the last-known user from storage.
    ///
    /// The seeded user is not authenticated; an access token only appears
    /// after a successful refresh or sign-in.
    pub fn new(transport: Rc<dyn HttpTransport>, markers: Rc<dyn MarkerStore>) -> Self {
        let coordinator = Self {
            transport,
            markers,
            state: AuthState::new(),
            tokens: TokenStore::new(),
            events: SessionEvents::new(),
            refresh_inflight: Rc::new(RefCell::new(None)),
            auto_login_inflight: Rc::new(RefCell::new(None)),
        };
        coordinator.initialize_from_storage();
        coordinator
    }

    fn initialize_from_storage(&self) {
        if let Some(marker) = self.markers.load() {
            self.state.seed_user(marker.user);
        }
    }

    /// Reactive session state handle.
    pub fn state(&self) -> AuthState {
        self.state.clone()
    }

    /// Lifecycle event subscriptions.
    pub fn events(&self) -> SessionEvents {
        self.events.clone()
    }

    /// In-memory access token holder.
    pub fn token_store(&self) -> TokenStore {
        self.tokens.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.user()
    }

    /// Whether a session marker exists, i.e. whether a silent recovery
    /// attempt is worth making. Never proof of a valid session.
    pub fn has_session_marker(&self) -> bool {
        self.markers.load().is_some()
    }

    pub(crate) fn transport_handle(&self) -> Rc<dyn HttpTransport> {
        self.transport.clone()
    }

    /// Sign in with email and password. Exactly one network call.
    pub async fn sign_in(&self, credentials: LoginRequest) -> Result<AuthResponse, AuthError> {
        self.state.begin_attempt();
        match self.post_json("/auth/login", &credentials).await {
            Ok(response) => {
                self.complete_authentication(&response);
                self.events.emit(SessionEvent::SignedIn);
                Ok(response)
            }
            Err(err) => {
                self.state.fail_attempt(&err);
                Err(err)
            }
        }
    }

    /// Register a new account. Success does not authenticate: the backend
    /// sends a verification code and `verify_registration` completes the
    /// flow.
    pub async fn sign_up(&self, user_data: RegisterRequest) -> Result<RegistrationResponse, AuthError> {
        self.state.begin_attempt();
        match self.post_json("/auth/register", &user_data).await {
            Ok(response) => {
                self.state.finish_attempt();
                self.events.emit(SessionEvent::VerificationPending);
                Ok(response)
            }
            Err(err) => {
                self.state.fail_attempt(&err);
                Err(err)
            }
        }
    }

    /// Complete a registration with the emailed code; same shape as
    /// [`SessionCoordinator::sign_in`].
    pub async fn verify_registration(
        &self,
        verification: VerifyRegistrationRequest,
    ) -> Result<AuthResponse, AuthError> {
        self.state.begin_attempt();
        match self.post_json("/auth/verify-registration", &verification).await {
            Ok(response) => {
                self.complete_authentication(&response);
                self.events.emit(SessionEvent::SignedIn);
                Ok(response)
            }
            Err(err) => {
                self.state.fail_attempt(&err);
                Err(err)
            }
        }
    }

    /// Ask the backend to resend the verification code. The resend
    /// cooldown is the caller's concern, not this module's.
    pub async fn resend_verification_code(
        &self,
        email: impl Into<String>,
    ) -> Result<MessageResponse, AuthError> {
        self.side_operation("/auth/resend-verification", &EmailRequest { email: email.into() })
            .await
    }

    /// Request a password-reset email.
    pub async fn forgot_password(
        &self,
        email: impl Into<String>,
    ) -> Result<MessageResponse, AuthError> {
        self.side_operation("/accounts/forgot-password", &EmailRequest { email: email.into() })
            .await
    }

    /// Set a new password using an emailed reset token.
    pub async fn reset_password(
        &self,
        request: ResetPasswordRequest,
    ) -> Result<MessageResponse, AuthError> {
        self.side_operation("/accounts/reset-password", &request).await
    }

    /// Silent token refresh, the single-flight primitive.
    ///
    /// All callers arriving while a refresh is in flight await the same
    /// shared future. Without a session marker the call fails fast with no
    /// network round trip. On success only the token changes; on failure
    /// the whole session is cleared.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let inflight = self.refresh_inflight.borrow().clone();
        if let Some(shared) = inflight {
            return shared.await;
        }

        if self.markers.load().is_none() {
            self.expire_session();
            return Err(AuthError::SessionExpired);
        }

        let this = self.clone();
        let shared: SharedRefresh = async move {
            let outcome = this.request_refresh().await;
            this.refresh_inflight.borrow_mut().take();
            outcome
        }
        .boxed_local()
        .shared();

        // Installed before the future is first polled, so any caller
        // arriving from here on joins this flight.
        *self.refresh_inflight.borrow_mut() = Some(shared.clone());
        shared.await
    }

    async fn request_refresh(&self) -> Result<(), AuthError> {
        let outcome: Result<RefreshResponse, AuthError> =
            self.post_json("/auth/refresh", &serde_json::json!({})).await;
        match outcome {
            Ok(response) => {
                self.tokens.set(response.access_token.clone());
                self.state.set_token(response.access_token);
                Ok(())
            }
            Err(err) => {
                logging::warn!("token refresh failed: {err}");
                self.expire_session();
                Err(AuthError::SessionExpired)
            }
        }
    }

    /// Restore a session at startup or on navigation: refresh the token
    /// and rehydrate the user from the marker. Resolves `true` only when
    /// both succeed; `false` with no marker costs no network call.
    pub async fn auto_login(&self) -> bool {
        let inflight = self.auto_login_inflight.borrow().clone();
        if let Some(shared) = inflight {
            return shared.await;
        }

        if self.markers.load().is_none() {
            return false;
        }

        let this = self.clone();
        let shared: SharedAutoLogin = async move {
            let outcome = this.run_auto_login().await;
            this.auto_login_inflight.borrow_mut().take();
            outcome
        }
        .boxed_local()
        .shared();

        *self.auto_login_inflight.borrow_mut() = Some(shared.clone());
        shared.await
    }

    async fn run_auto_login(&self) -> bool {
        if self.refresh().await.is_err() {
            // refresh already cleared the session state
            return false;
        }
        let Some(marker) = self.markers.load() else {
            self.clear_session_state();
            return false;
        };
        let Some(token) = self.tokens.get() else {
            self.clear_session_state();
            return false;
        };
        self.state.authenticate(marker.user, token);
        true
    }

    /// Sign out of this device. The backend call is best-effort; local
    /// state is cleared unconditionally and the operation is idempotent.
    pub async fn sign_out(&self) {
        if let Err(err) = self.post_status("/auth/logout").await {
            logging::warn!("logout request failed: {err}");
        }
        self.clear_session_state();
        self.events.emit(SessionEvent::SignedOut);
    }

    /// Absorb a profile update into the state and the persisted marker.
    /// Token and authentication flag are untouched; no network call.
    pub fn update_user_data(&self, user: User) {
        self.state.set_user(user.clone());
        self.markers.save(&SessionMarker::new(user));
    }

    fn complete_authentication(&self, response: &AuthResponse) {
        self.tokens.set(response.access_token.clone());
        self.markers.save(&SessionMarker::new(response.user.clone()));
        self.state
            .authenticate(response.user.clone(), response.access_token.clone());
    }

    fn expire_session(&self) {
        self.clear_session_state();
        self.events.emit(SessionEvent::SessionExpired);
    }

    fn clear_session_state(&self) {
        self.tokens.clear();
        self.markers.clear();
        self.state.reset();
    }

    async fn side_operation<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<MessageResponse, AuthError> {
        self.state.begin_attempt();
        match self.post_json(path, body).await {
            Ok(response) => {
                self.state.finish_attempt();
                Ok(response)
            }
            Err(err) => {
                self.state.fail_attempt(&err);
                Err(err)
            }
        }
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AuthError> {
        let request = ApiRequest::post(path)
            .json(body)?
            .with_bearer(self.tokens.get());
        let response = self.transport.execute(request).await?;
        response.json()
    }

    async fn post_status(&self, path: &str) -> Result<(), AuthError> {
        let request = ApiRequest::post(path)
            .json(&serde_json::json!({}))?
            .with_bearer(self.tokens.get());
        let response = self.transport.execute(request).await?;
        response.into_result()
    }
}
