//! Durable Session Storage
//!
//! Key/value persistence for the signed-in session. The browser build uses
//! `localStorage`; tests use the in-memory store.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::models::{Session, User};

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const USER_KEY: &str = "user";

/// Synchronous string key/value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store for tests and non-browser targets
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// `window.localStorage`
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    tracing::warn!(key, "localStorage rejected write");
                }
            }
            None => tracing::warn!(key, "localStorage unavailable"),
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// Reads and writes the persisted session fields.
///
/// Written by the auth flow and the 401 handler, read by the HTTP wrapper.
#[derive(Clone)]
pub struct SessionStore {
    store: Rc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn user(&self) -> Option<User> {
        let raw = self.store.get(USER_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    /// Restore a persisted session.
    ///
    /// A half-written or unparseable record is wiped and reported as absent.
    pub fn load(&self) -> Option<Session> {
        let token = self.access_token();
        let raw_user = self.store.get(USER_KEY);
        if token.is_none() && raw_user.is_none() {
            return None;
        }

        let user = raw_user.as_deref().and_then(|raw| serde_json::from_str::<User>(raw).ok());
        match (token, user) {
            (Some(access_token), Some(user)) => Some(Session { access_token, user }),
            _ => {
                tracing::warn!("discarding incomplete or corrupt stored session");
                self.clear();
                None
            }
        }
    }

    pub fn save(&self, session: &Session) {
        match serde_json::to_string(&session.user) {
            Ok(user) => {
                self.store.set(ACCESS_TOKEN_KEY, &session.access_token);
                self.store.set(USER_KEY, &user);
            }
            Err(e) => tracing::warn!(error = %e, "could not serialize user"),
        }
    }

    pub fn clear(&self) {
        self.store.remove(ACCESS_TOKEN_KEY);
        self.store.remove(USER_KEY);
    }
}
