//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by the route guard, the request pipeline and user-aware components.
//! The session is an explicit object handed out through Leptos context; there
//! is no ambient global. Its only persistent backing is three storage keys.
//!
//! DESIGN
//! ======
//! "Logged in" is never stored. It is recomputed from the presence of the
//! token key on every query, so a token written by another tab, or removed by
//! a 401 in a concurrent request, is observed on the next check.
//!
//! ERROR HANDLING
//! ==============
//! A cached profile that no longer parses is treated as corrupt session
//! state: every key is dropped and the session reads as anonymous.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;

use crate::net::types::{TokenResponse, User};
use crate::util::storage::KeyValueStore;

pub const TOKEN_KEY: &str = "token";
pub const TOKEN_TYPE_KEY: &str = "token_type";
pub const USER_KEY: &str = "user";

/// Every key owned by the session, cleared together.
pub const SESSION_KEYS: [&str; 3] = [TOKEN_KEY, TOKEN_TYPE_KEY, USER_KEY];

/// Bearer token plus its scheme name as issued by the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub kind: String,
}

/// Two-state session machine. There is no terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Anonymous,
    Authenticated,
}

/// Handle over the persisted session. Clones share the same backing store.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Open the session over `storage`, discarding it if the cached profile
    /// is corrupt.
    pub fn new(storage: impl KeyValueStore + 'static) -> Self {
        let store = Self { storage: Arc::new(storage) };
        let _ = store.profile();
        store
    }

    /// True iff a token is present. No expiry check and no network call: a
    /// stale token reads as authenticated until a request fails with 401.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.storage.get(TOKEN_KEY).is_some()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.is_authenticated() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        }
    }

    /// The stored credential, when both token and kind are present.
    #[must_use]
    pub fn credential(&self) -> Option<Credential> {
        let token = self.storage.get(TOKEN_KEY)?;
        let kind = self.storage.get(TOKEN_TYPE_KEY)?;
        if token.is_empty() || kind.is_empty() {
            return None;
        }
        Some(Credential { token, kind })
    }

    /// Persist a freshly issued credential (Anonymous -> Authenticated).
    pub fn store_credential(&self, issued: &TokenResponse) {
        self.storage.set(TOKEN_KEY, &issued.access_token);
        self.storage.set(TOKEN_TYPE_KEY, &issued.token_type);
    }

    /// Cache the last-known profile next to the credential.
    pub fn save_profile(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(raw) => self.storage.set(USER_KEY, &raw),
            Err(e) => leptos::logging::warn!("profile not cached: {e}"),
        }
    }

    /// Cached profile, if any. A value that fails to parse clears the whole
    /// session.
    #[must_use]
    pub fn profile(&self) -> Option<User> {
        let raw = self.storage.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                leptos::logging::warn!("corrupt cached profile, clearing session: {e}");
                self.clear();
                None
            }
        }
    }

    /// Drop credential and profile (Authenticated -> Anonymous).
    pub fn clear(&self) {
        for key in SESSION_KEYS {
            self.storage.remove(key);
        }
    }
}
