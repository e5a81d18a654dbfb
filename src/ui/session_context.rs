//! Session context wiring.
//!
//! The application root calls `provide_session_context()` once; every
//! component, guard call site and feature service then reaches the same
//! session instance through `use_session_context()`. On the client the
//! context also kicks off the initial silent recovery after hydration.

use leptos::prelude::*;

use crate::core::config::ApiConfig;
use crate::core::session::{ApiClient, AuthState, SessionCoordinator};

use std::rc::Rc;

#[cfg(not(feature = "ssr"))]
use crate::core::session::{FetchTransport, LocalStorageMarkerStore};

#[cfg(feature = "ssr")]
use crate::core::session::MemoryMarkerStore;

struct SessionHandles {
    session: SessionCoordinator,
    api: ApiClient,
}

/// Handle to the application's session module.
///
/// The coordinator itself is single-threaded, so it lives behind an
/// arena-local stored value; the handle stays `Copy` like any other
/// context.
#[derive(Clone, Copy)]
pub struct SessionContext {
    inner: StoredValue<SessionHandles, LocalStorage>,
}

impl SessionContext {
    /// The session coordinator.
    pub fn session(&self) -> SessionCoordinator {
        self.inner.with_value(|handles| handles.session.clone())
    }

    /// The intercepting API client for feature services.
    pub fn api(&self) -> ApiClient {
        self.inner.with_value(|handles| handles.api.clone())
    }

    /// The reactive auth state record.
    pub fn state(&self) -> AuthState {
        self.session().state()
    }
}

/// Build the session module and provide it to the component tree.
pub fn provide_session_context(config: ApiConfig) -> SessionContext {
    let session = build_session(&config);
    let api = ApiClient::new(session.clone());

    let ctx = SessionContext {
        inner: StoredValue::new_local(SessionHandles { session, api }),
    };

    // Attempt silent recovery once the client is up: a marker without an
    // authenticated state means a refresh cookie may still be valid.
    #[cfg(not(feature = "ssr"))]
    {
        let restore = ctx;
        Effect::new(move |_| {
            let session = restore.session();
            if session.has_session_marker() && !session.is_authenticated() {
                leptos::task::spawn_local(async move {
                    let _ = session.auto_login().await;
                });
            }
        });
    }

    provide_context(ctx);
    ctx
}

/// Get the session context from the component tree.
pub fn use_session_context() -> SessionContext {
    expect_context::<SessionContext>()
}

#[cfg(not(feature = "ssr"))]
fn build_session(config: &ApiConfig) -> SessionCoordinator {
    SessionCoordinator::new(
        Rc::new(FetchTransport::new(config.clone())),
        Rc::new(LocalStorageMarkerStore::new()),
    )
}

#[cfg(feature = "ssr")]
fn build_session(config: &ApiConfig) -> SessionCoordinator {
    let _ = config;
    SessionCoordinator::new(Rc::new(OfflineTransport), Rc::new(MemoryMarkerStore::new()))
}

/// Server-side stand-in: authentication flows only run in the browser.
#[cfg(feature = "ssr")]
struct OfflineTransport;

#[cfg(feature = "ssr")]
#[async_trait::async_trait(?Send)]
impl crate::core::session::HttpTransport for OfflineTransport {
    async fn execute(
        &self,
        _request: crate::core::session::ApiRequest,
    ) -> Result<crate::core::session::ApiResponse, crate::core::error::AuthError> {
        Err(crate::core::error::AuthError::Network)
    }
}
