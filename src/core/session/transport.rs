//! HTTP transport seam.
//!
//! The session core talks to the backend through [`HttpTransport`] so that
//! native tests can inject scripted transports. The browser implementation
//! sends every request with credentials included, which is what lets the
//! HttpOnly refresh cookie travel without the client ever reading it.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::error::AuthError;

/// HTTP method subset used by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// An outbound API request, relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, AuthError> {
        self.body = Some(serde_json::to_value(body).map_err(|_| AuthError::InvalidResponse)?);
        Ok(self)
    }

    /// Set (or clear) the bearer token for this request.
    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }
}

/// An API response: status plus raw body text.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body, or map the response into the error taxonomy.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, AuthError> {
        if !self.ok() {
            return Err(AuthError::from_response(self.status, &self.body));
        }
        serde_json::from_str(&self.body).map_err(|_| AuthError::InvalidResponse)
    }

    /// Status check without caring about the body.
    pub fn into_result(self) -> Result<(), AuthError> {
        if self.ok() {
            Ok(())
        } else {
            Err(AuthError::from_response(self.status, &self.body))
        }
    }
}

/// Transport seam between the session core and the backend.
///
/// `Err` means the backend was never reached; HTTP error statuses come
/// back as `Ok` responses and are classified by the caller.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, AuthError>;
}

/// Browser transport over `fetch`, with cookies always included.
#[cfg(not(feature = "ssr"))]
pub struct FetchTransport {
    config: crate::core::config::ApiConfig,
}

#[cfg(not(feature = "ssr"))]
impl FetchTransport {
    pub fn new(config: crate::core::config::ApiConfig) -> Self {
        Self { config }
    }
}

#[cfg(not(feature = "ssr"))]
#[async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, AuthError> {
        use gloo_net::http::Request;

        let url = self.config.url_for(&request.path);
        let builder = match request.method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
            Method::Put => Request::put(&url),
            Method::Patch => Request::patch(&url),
            Method::Delete => Request::delete(&url),
        };

        let mut builder = builder.credentials(web_sys::RequestCredentials::Include);
        if let Some(token) = &request.bearer {
            builder = builder.header("Authorization", &format!("Bearer {token}"));
        }

        let req = match &request.body {
            Some(body) => builder.json(body).map_err(|_| AuthError::Network)?,
            None => builder.build().map_err(|_| AuthError::Network)?,
        };

        let response = req.send().await.map_err(|_| AuthError::Network)?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        Ok(ApiResponse { status, body })
    }
}
