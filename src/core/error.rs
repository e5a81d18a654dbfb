//! Client-side authentication error taxonomy.
//!
//! Errors double as user-facing messages: the `Display` impl of each
//! variant is what ends up in `AuthState.error` for the form that started
//! the attempt. Refresh and auto-login failures are never surfaced this
//! way; they resolve as a state transition instead.

use serde::Deserialize;

/// Authentication and API error types seen by the client.
///
/// `Clone` is required because a single failure can be observed by every
/// caller sharing an in-flight refresh.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// HTTP 401 on a credentialed sign-in attempt.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// HTTP 400: the submitted form data was rejected.
    #[error("Invalid input data")]
    Validation,

    /// Transport-level failure; the backend was never reached.
    #[error("Cannot reach the server")]
    Network,

    /// The refresh flow failed or no session exists to recover.
    #[error("Your session has expired, please sign in again")]
    SessionExpired,

    /// Any other non-2xx response, carrying the backend's message when
    /// one was present in the body.
    #[error("{0}")]
    Server(String),

    /// A payload that should have parsed did not.
    #[error("Unexpected response from the server")]
    InvalidResponse,
}

/// Error body shape used by the backend for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

const DEFAULT_SERVER_ERROR: &str = "An error occurred during authentication";

impl AuthError {
    /// Map a non-2xx HTTP response to the client taxonomy.
    ///
    /// 401 and 400 map to fixed variants; anything else becomes
    /// [`AuthError::Server`] with the body's `message` field when present.
    pub fn from_response(status: u16, body: &str) -> Self {
        match status {
            401 => AuthError::InvalidCredentials,
            400 => AuthError::Validation,
            _ => AuthError::Server(
                response_message(body).unwrap_or_else(|| DEFAULT_SERVER_ERROR.to_string()),
            ),
        }
    }

    /// The message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Extract the `message` field from an error response body, if any.
fn response_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|e| e.message)
}
