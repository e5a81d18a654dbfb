//! Application configuration for the JobTrack client.
//!
//! The browser has no environment to read, so the application root builds
//! an `ApiConfig` and hands it to `provide_session_context()`.

/// Client configuration shared by the session module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the REST backend, without a trailing slash.
    /// Example: `/api` or `https://api.jobtrack.app/api`
    pub base_url: String,
}

impl ApiConfig {
    /// Build a configuration for the given API base URL.
    ///
    /// A trailing slash is stripped so request paths can always start
    /// with `/`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Absolute URL for an API path such as `/auth/login`.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new("/api")
    }
}
