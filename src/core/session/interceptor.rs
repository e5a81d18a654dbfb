//! Request interceptor for the dashboard's API calls.
//!
//! Every outbound request carries the current access token as a bearer
//! header (the browser transport additionally sends cookies). A 401 from a
//! non-auth endpoint triggers one refresh through the coordinator's
//! single-flight primitive, then one resubmission of the original request
//! with the new token. This is the only call site outside the coordinator
//! allowed to trigger a refresh.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::error::AuthError;

use super::coordinator::SessionCoordinator;
use super::transport::{ApiRequest, ApiResponse, HttpTransport};

/// Prefixes exempt from the 401 retry loop. Retrying a failed login or
/// refresh through the refresh flow would recurse.
const AUTH_PREFIXES: [&str; 2] = ["/auth/", "/accounts/"];

fn is_auth_endpoint(path: &str) -> bool {
    AUTH_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// API client used by the feature services (job tracks, profile, uploads).
///
/// Shares the coordinator's transport so tests exercise the exact request
/// flow the app performs.
#[derive(Clone)]
pub struct ApiClient {
    session: SessionCoordinator,
    transport: std::rc::Rc<dyn HttpTransport>,
}

impl ApiClient {
    pub fn new(session: SessionCoordinator) -> Self {
        let transport = session.transport_handle();
        Self { session, transport }
    }

    /// Send a request with the session's bearer token attached, recovering
    /// from an expired access token exactly once.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AuthError> {
        let attempt = request
            .clone()
            .with_bearer(self.session.token_store().get());
        let response = self.transport.execute(attempt).await?;

        if response.status != 401 || is_auth_endpoint(&request.path) {
            return Ok(response);
        }

        if self.session.refresh().await.is_err() {
            // recovery failed: hand the original 401 back to the caller
            return Ok(response);
        }

        let retry = request.with_bearer(self.session.token_store().get());
        self.transport.execute(retry).await
    }

    /// Send and deserialize a JSON response body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, AuthError> {
        let response = self.send(request).await?;
        response.json()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AuthError> {
        self.send_json(ApiRequest::get(path)).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AuthError> {
        self.send_json(ApiRequest::post(path).json(body)?).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AuthError> {
        self.send_json(ApiRequest::put(path).json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), AuthError> {
        let response = self.send(ApiRequest::delete(path)).await?;
        response.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{User, UserRole};
    use crate::core::session::marker::{MarkerStore, MemoryMarkerStore, SessionMarker};
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Default)]
    struct MockTransport {
        script: RefCell<VecDeque<Result<ApiResponse, AuthError>>>,
        calls: RefCell<Vec<ApiRequest>>,
    }

    impl MockTransport {
        fn respond(self, status: u16, body: serde_json::Value) -> Self {
            self.script.borrow_mut().push_back(Ok(ApiResponse {
                status,
                body: body.to_string(),
            }));
            self
        }

        fn calls(&self) -> Vec<ApiRequest> {
            self.calls.borrow().clone()
        }
    }

    #[async_trait(?Send)]
    impl HttpTransport for MockTransport {
        async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, AuthError> {
            self.calls.borrow_mut().push(request);
            self.script
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(AuthError::Network))
        }
    }

    fn test_user() -> User {
        User {
            id: "u1".to_string(),
            email: "a@b.com".to_string(),
            username: None,
            role: UserRole::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn client_with(
        transport: MockTransport,
        marker: bool,
    ) -> (ApiClient, Rc<MockTransport>, Rc<MemoryMarkerStore>) {
        let transport = Rc::new(transport);
        let markers = Rc::new(MemoryMarkerStore::new());
        if marker {
            markers.save(&SessionMarker::new(test_user()));
        }
        let session = SessionCoordinator::new(transport.clone(), markers.clone());
        session.token_store().set("tok1".to_string());
        (ApiClient::new(session), transport, markers)
    }

    #[tokio::test]
    async fn test_bearer_token_is_attached() {
        let (client, transport, _) =
            client_with(MockTransport::default().respond(200, json!([])), true);

        let _: serde_json::Value = client.get("/tracks").await.unwrap();
        assert_eq!(transport.calls()[0].bearer.as_deref(), Some("tok1"));
    }

    #[tokio::test]
    async fn test_requests_without_token_are_sent_bare() {
        let transport = Rc::new(MockTransport::default().respond(200, json!([])));
        let markers = Rc::new(MemoryMarkerStore::new());
        let session = SessionCoordinator::new(transport.clone(), markers);
        let client = ApiClient::new(session);

        let _: serde_json::Value = client.get("/tracks").await.unwrap();
        assert!(transport.calls()[0].bearer.is_none());
    }

    #[tokio::test]
    async fn test_401_triggers_refresh_and_single_retry() {
        let (client, transport, _) = client_with(
            MockTransport::default()
                .respond(401, json!({}))
                .respond(200, json!({"access_token": "tok2"}))
                .respond(200, json!({"items": []})),
            true,
        );

        let body: serde_json::Value = client.get("/tracks").await.unwrap();
        assert_eq!(body["items"], json!([]));

        let calls = transport.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].path, "/tracks");
        assert_eq!(calls[0].bearer.as_deref(), Some("tok1"));
        assert_eq!(calls[1].path, "/auth/refresh");
        assert_eq!(calls[2].path, "/tracks");
        assert_eq!(calls[2].bearer.as_deref(), Some("tok2"));
    }

    #[tokio::test]
    async fn test_failed_refresh_propagates_original_401() {
        let (client, transport, markers) = client_with(
            MockTransport::default()
                .respond(401, json!({}))
                .respond(401, json!({})),
            true,
        );

        let err = client.get::<serde_json::Value>("/tracks").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);

        // one original call, one refresh, no retry loop
        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].path, "/auth/refresh");
        // the failed refresh also tore the session down
        assert!(markers.load().is_none());
    }

    #[tokio::test]
    async fn test_auth_endpoints_are_exempt_from_retry() {
        let (client, transport, _) =
            client_with(MockTransport::default().respond(401, json!({})), true);

        let response = client
            .send(ApiRequest::post("/auth/login").json(&json!({})).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status, 401);
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_non_401_errors_pass_through_untouched() {
        let (client, transport, _) = client_with(
            MockTransport::default().respond(500, json!({"message": "boom"})),
            true,
        );

        let err = client.get::<serde_json::Value>("/tracks").await.unwrap_err();
        assert_eq!(err, AuthError::Server("boom".to_string()));
        assert_eq!(transport.calls().len(), 1);
    }

    #[test]
    fn test_auth_endpoint_detection() {
        assert!(is_auth_endpoint("/auth/login"));
        assert!(is_auth_endpoint("/auth/refresh"));
        assert!(is_auth_endpoint("/accounts/forgot-password"));
        assert!(!is_auth_endpoint("/tracks"));
        assert!(!is_auth_endpoint("/profile"));
    }
}
