//! In-memory access token storage.
//!
//! The access token lives only in this signal and is never written to any
//! durable store; expiry is discovered reactively through 401 responses,
//! not predicted. The refresh token is an HttpOnly cookie the client
//! cannot read at all.

use leptos::prelude::*;

/// Holder for the current access token. Cloning shares the value.
#[derive(Clone)]
pub struct TokenStore {
    access_token: ArcRwSignal<Option<String>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self {
            access_token: ArcRwSignal::new(None),
        }
    }

    pub fn set(&self, token: String) {
        self.access_token.set(Some(token));
    }

    /// Uses `get_untracked` since callers are request paths, not views.
    pub fn get(&self) -> Option<String> {
        self.access_token.get_untracked()
    }

    pub fn clear(&self) {
        self.access_token.set(None);
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}
