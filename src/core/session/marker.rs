//! Durable session marker.
//!
//! The marker is a non-sensitive snapshot of the last-known user persisted
//! under a fixed storage key. Its presence is only a heuristic that a
//! refresh cookie probably still exists server-side; it is never proof of
//! a valid session, and no token is ever stored alongside it.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::core::models::User;

/// Storage key for the persisted user snapshot.
const STORAGE_KEY_USER: &str = "jobtrack_auth_user";

/// The persisted record: the last-known user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMarker {
    pub user: User,
}

impl SessionMarker {
    pub fn new(user: User) -> Self {
        Self { user }
    }
}

/// Persistence seam for the session marker.
///
/// The browser implementation writes `localStorage`; tests and server-side
/// rendering use the in-memory implementation.
pub trait MarkerStore {
    fn load(&self) -> Option<SessionMarker>;
    fn save(&self, marker: &SessionMarker);
    fn clear(&self);
}

/// In-memory marker store for tests and SSR.
#[derive(Default)]
pub struct MemoryMarkerStore {
    marker: RefCell<Option<SessionMarker>>,
}

impl MemoryMarkerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MarkerStore for MemoryMarkerStore {
    fn load(&self) -> Option<SessionMarker> {
        self.marker.borrow().clone()
    }

    fn save(&self, marker: &SessionMarker) {
        *self.marker.borrow_mut() = Some(marker.clone());
    }

    fn clear(&self) {
        *self.marker.borrow_mut() = None;
    }
}

/// Browser marker store backed by `localStorage`.
#[cfg(not(feature = "ssr"))]
#[derive(Default)]
pub struct LocalStorageMarkerStore;

#[cfg(not(feature = "ssr"))]
impl LocalStorageMarkerStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(not(feature = "ssr"))]
impl MarkerStore for LocalStorageMarkerStore {
    fn load(&self) -> Option<SessionMarker> {
        let storage = Self::storage()?;
        let raw = storage.get_item(STORAGE_KEY_USER).ok()??;
        // Older builds could leave a literal "undefined" behind
        if raw == "undefined" {
            return None;
        }
        let user: User = serde_json::from_str(&raw).ok()?;
        Some(SessionMarker::new(user))
    }

    fn save(&self, marker: &SessionMarker) {
        if let Some(storage) = Self::storage() {
            if let Ok(json) = serde_json::to_string(&marker.user) {
                let _ = storage.set_item(STORAGE_KEY_USER, &json);
            }
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(STORAGE_KEY_USER);
        }
    }
}
