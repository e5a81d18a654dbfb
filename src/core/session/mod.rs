//! Client session subsystem: authentication state machine, token storage,
//! single-flight refresh, request interception and route guard decisions.
//!
//! The application root constructs one [`SessionCoordinator`] from a
//! transport and a marker store and shares it by handle; everything else
//! (UI, guards, interceptor) only reads state or calls coordinator
//! methods. See `ui::session_context` for the wiring.

mod coordinator;
mod events;
mod guards;
mod interceptor;
mod marker;
mod state;
mod tokens;
mod transport;

pub use coordinator::SessionCoordinator;
pub use events::{SessionEvent, SessionEvents};
pub use guards::{
    DASHBOARD_ROUTE, GuardDecision, SIGN_IN_ROUTE, auth_guard, auth_match_guard, guest_guard,
};
pub use interceptor::ApiClient;
pub use marker::{MarkerStore, MemoryMarkerStore, SessionMarker};
pub use state::{AuthSnapshot, AuthState};
pub use tokens::TokenStore;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method};

#[cfg(not(feature = "ssr"))]
pub use marker::LocalStorageMarkerStore;
#[cfg(not(feature = "ssr"))]
pub use transport::FetchTransport;
