//! Query Cache
//!
//! Keyed cache of server data. Entries go stale after a fixed time or when
//! invalidated by key prefix; concurrent fetches of one key share a single
//! request. Values are held as JSON so one cache serves every model type.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// Hierarchical cache key, e.g. `tasks/<board>/<card>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

/// Every key the app reads through the cache
pub mod keys {
    use super::QueryKey;

    pub fn boards() -> QueryKey {
        QueryKey::new(["boards"])
    }

    pub fn board(board_id: &str) -> QueryKey {
        QueryKey::new(["board", board_id])
    }

    pub fn cards(board_id: &str) -> QueryKey {
        QueryKey::new(["cards", board_id])
    }

    /// Cards of a board involving one user; invalidated along with `cards`
    pub fn user_cards(board_id: &str, user_id: &str) -> QueryKey {
        QueryKey::new(["cards", board_id, "user", user_id])
    }

    /// All tasks of a board; also the prefix of every per-card key
    pub fn tasks(board_id: &str) -> QueryKey {
        QueryKey::new(["tasks", board_id])
    }

    pub fn card_tasks(board_id: &str, card_id: &str) -> QueryKey {
        QueryKey::new(["tasks", board_id, card_id])
    }

    pub fn members(board_id: &str) -> QueryKey {
        QueryKey::new(["members", board_id])
    }

    pub fn notifications() -> QueryKey {
        QueryKey::new(["notifications"])
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    updated_at: DateTime<Utc>,
    invalidated: bool,
}

type SharedFetch = Shared<LocalBoxFuture<'static, Result<Value, ApiError>>>;

struct InFlight {
    ticket: u64,
    future: SharedFetch,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<QueryKey, Entry>,
    in_flight: HashMap<QueryKey, InFlight>,
    next_ticket: u64,
}

struct CacheInner {
    state: RefCell<CacheState>,
    stale_time: Duration,
    clock: Box<dyn Fn() -> DateTime<Utc>>,
    listeners: RefCell<Vec<Rc<dyn Fn()>>>,
}

/// Cheap to clone; clones share entries and listeners
#[derive(Clone)]
pub struct QueryCache {
    inner: Rc<CacheInner>,
}

impl QueryCache {
    pub fn new(stale_time: Duration) -> Self {
        Self::with_clock(stale_time, Utc::now)
    }

    pub fn with_clock(stale_time: Duration, clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        Self {
            inner: Rc::new(CacheInner {
                state: RefCell::new(CacheState::default()),
                stale_time,
                clock: Box::new(clock),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Called after every write or invalidation
    pub fn subscribe(&self, listener: impl Fn() + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Cached value regardless of staleness
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let value = self.inner.state.borrow().entries.get(key)?.value.clone();
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(%key, error = %e, "cached value has unexpected shape");
                None
            }
        }
    }

    pub fn is_fresh(&self, key: &QueryKey) -> bool {
        let state = self.inner.state.borrow();
        state.entries.get(key).is_some_and(|e| self.entry_is_fresh(e))
    }

    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.inner.state.borrow().in_flight.contains_key(key)
    }

    /// Store a fresh value, replacing whatever was there
    pub fn set<T: Serialize>(&self, key: &QueryKey, value: &T) {
        let Some(value) = to_json(key, value) else { return };
        let now = self.now();
        self.inner.state.borrow_mut().entries.insert(
            key.clone(),
            Entry { value, updated_at: now, invalidated: false },
        );
        self.notify();
    }

    /// Mark every entry under `prefix` stale and abandon fetches for them.
    ///
    /// Abandoned fetches still resolve for their waiters but never write.
    pub fn invalidate(&self, prefix: &QueryKey) {
        {
            let mut state = self.inner.state.borrow_mut();
            let mut count = 0usize;
            for (key, entry) in state.entries.iter_mut() {
                if key.starts_with(prefix) {
                    entry.invalidated = true;
                    count += 1;
                }
            }
            state.in_flight.retain(|key, _| !key.starts_with(prefix));
            tracing::debug!(%prefix, count, "invalidated queries");
        }
        self.notify();
    }

    /// Write a speculative value, handing back the means to undo it.
    ///
    /// Any fetch in flight for the key is abandoned so it cannot clobber
    /// the speculative value.
    pub fn write_optimistic<T: Serialize>(&self, key: &QueryKey, value: &T) -> Rollback {
        let previous = {
            let mut state = self.inner.state.borrow_mut();
            state.in_flight.remove(key);
            state.entries.get(key).cloned()
        };
        self.set(key, value);
        Rollback { key: key.clone(), previous }
    }

    /// Cached value if fresh, otherwise the result of `fetcher`.
    ///
    /// Callers asking for a key that is already being fetched wait on that
    /// request instead of issuing their own. Failures are not cached.
    pub async fn fetch<T, F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + 'static,
    {
        if let Some(value) = self.fresh_value(key) {
            return Ok(serde_json::from_value(value)?);
        }

        let shared = self.join_or_start(key, || {
            let request = fetcher();
            async move {
                let value = request.await?;
                Ok(serde_json::to_value(&value)?)
            }
            .boxed_local()
        });
        let value = shared.await?;
        Ok(serde_json::from_value(value)?)
    }

    fn fresh_value(&self, key: &QueryKey) -> Option<Value> {
        let state = self.inner.state.borrow();
        state.entries.get(key).filter(|e| self.entry_is_fresh(e)).map(|e| e.value.clone())
    }

    fn join_or_start(
        &self,
        key: &QueryKey,
        start: impl FnOnce() -> LocalBoxFuture<'static, Result<Value, ApiError>>,
    ) -> SharedFetch {
        if let Some(existing) = self.inner.state.borrow().in_flight.get(key) {
            tracing::debug!(%key, "joining in-flight fetch");
            return existing.future.clone();
        }

        let request = start();
        let ticket = {
            let mut state = self.inner.state.borrow_mut();
            state.next_ticket += 1;
            state.next_ticket
        };
        let weak = Rc::downgrade(&self.inner);
        let settle_key = key.clone();
        let future = async move {
            let result = request.await;
            if let Some(inner) = weak.upgrade() {
                QueryCache { inner }.settle(&settle_key, ticket, &result);
            }
            result
        }
        .boxed_local()
        .shared();

        tracing::debug!(%key, "fetching");
        self.inner
            .state
            .borrow_mut()
            .in_flight
            .insert(key.clone(), InFlight { ticket, future: future.clone() });
        future
    }

    /// Record a finished fetch unless it was superseded in the meantime
    fn settle(&self, key: &QueryKey, ticket: u64, result: &Result<Value, ApiError>) {
        {
            let mut state = self.inner.state.borrow_mut();
            let current = state.in_flight.get(key).is_some_and(|f| f.ticket == ticket);
            if !current {
                tracing::debug!(%key, "discarding superseded fetch result");
                return;
            }
            state.in_flight.remove(key);
            match result {
                Ok(value) => {
                    let now = self.now();
                    state.entries.insert(
                        key.clone(),
                        Entry { value: value.clone(), updated_at: now, invalidated: false },
                    );
                }
                Err(e) => {
                    tracing::debug!(%key, error = %e, "fetch failed");
                    return;
                }
            }
        }
        self.notify();
    }

    fn entry_is_fresh(&self, entry: &Entry) -> bool {
        !entry.invalidated && self.now() - entry.updated_at < self.inner.stale_time
    }

    fn now(&self) -> DateTime<Utc> {
        (self.inner.clock)()
    }

    fn notify(&self) {
        let listeners: Vec<Rc<dyn Fn()>> = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener();
        }
    }
}

fn to_json<T: Serialize>(key: &QueryKey, value: &T) -> Option<Value> {
    match serde_json::to_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(%key, error = %e, "value not cacheable");
            None
        }
    }
}

/// Snapshot taken before an optimistic write
#[must_use = "an optimistic write should be rolled back when the mutation fails"]
pub struct Rollback {
    key: QueryKey,
    previous: Option<Entry>,
}

impl Rollback {
    /// Put the snapshot back exactly as it was
    pub fn restore(self, cache: &QueryCache) {
        {
            let mut state = cache.inner.state.borrow_mut();
            match self.previous {
                Some(entry) => {
                    state.entries.insert(self.key, entry);
                }
                None => {
                    state.entries.remove(&self.key);
                }
            }
        }
        cache.notify();
    }
}
