//! Application Context
//!
//! Shared services and state provided via Leptos Context API.

use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::api::ApiClient;
use crate::auth::{self, AuthPhase, AuthState, AuthStateStoreFields};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::User;
use crate::query::QueryCache;
use crate::realtime::RealtimeChannel;
use crate::routes::{Route, Router};
use crate::services::{CodeFlow, SignUpDetails};
use crate::toast::Toasts;

/// Backend client, cache and configuration shared by the whole app
#[derive(Clone)]
pub struct Services {
    pub api: ApiClient,
    pub cache: QueryCache,
    pub config: AppConfig,
}

#[cfg(target_arch = "wasm32")]
impl Services {
    /// `fetch`, `localStorage` and `window.location` backed services
    pub fn browser(config: AppConfig) -> Self {
        use std::rc::Rc;

        use crate::api::{BrowserNavigator, FetchTransport};
        use crate::storage::{BrowserStorage, SessionStore};

        let sessions = SessionStore::new(Rc::new(BrowserStorage));
        let api = ApiClient::new(config.api_base_url.clone(), FetchTransport, sessions, BrowserNavigator);
        let cache = QueryCache::new(config.stale_time);
        Self { api, cache, config }
    }
}

/// Open realtime channel, if any
#[derive(Clone, Copy)]
pub struct RealtimeHandle {
    channel: StoredValue<Option<RealtimeChannel>, LocalStorage>,
    pub connected: RwSignal<bool>,
}

impl RealtimeHandle {
    fn new() -> Self {
        Self { channel: StoredValue::new_local(None), connected: RwSignal::new(false) }
    }

    /// Swap the channel; the old one closes once dropped
    pub fn replace(&self, channel: Option<RealtimeChannel>) {
        if channel.is_none() {
            self.connected.try_set(false);
        }
        self.channel.try_set_value(channel);
    }

    pub fn join_board(&self, board_id: &str) {
        self.channel.try_with_value(|c| {
            if let Some(channel) = c {
                channel.join_board(board_id);
            }
        });
    }

    pub fn leave_board(&self, board_id: &str) {
        self.channel.try_with_value(|c| {
            if let Some(channel) = c {
                channel.leave_board(board_id);
            }
        });
    }
}

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    services: StoredValue<Services, LocalStorage>,
    /// Bumped on every cache write or invalidation
    pub cache_version: ReadSignal<u64>,
    pub toasts: Toasts,
    pub router: Router,
    pub realtime: RealtimeHandle,
}

impl AppContext {
    pub fn new(services: Services, router: Router) -> Self {
        let (cache_version, set_cache_version) = signal(0u64);
        services.cache.subscribe(move || {
            set_cache_version.try_update(|v| *v += 1);
        });
        let toasts = Toasts::new(services.config.toast_lifetime_ms);
        Self {
            services: StoredValue::new_local(services),
            cache_version,
            toasts,
            router,
            realtime: RealtimeHandle::new(),
        }
    }

    pub fn api(&self) -> ApiClient {
        self.services.with_value(|s| s.api.clone())
    }

    pub fn cache(&self) -> QueryCache {
        self.services.with_value(|s| s.cache.clone())
    }

    pub fn config(&self) -> AppConfig {
        self.services.with_value(|s| s.config.clone())
    }

    pub fn navigate(&self, route: Route) {
        self.router.navigate(route);
    }
}

pub fn use_app() -> AppContext {
    expect_context::<AppContext>()
}

/// Reactive session state and the sign-in flows
#[derive(Clone, Copy)]
pub struct AuthContext {
    state: Store<AuthState>,
    app: AppContext,
}

impl AuthContext {
    /// Hydrated from durable storage
    pub fn new(app: AppContext) -> Self {
        let state = Store::new(AuthState::hydrate(app.api().session()));
        Self { state, app }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with(|s| s.is_authenticated())
    }

    pub fn user(&self) -> Option<User> {
        self.state.with(|s| s.user().cloned())
    }

    pub fn error(&self) -> Option<String> {
        self.state.error().get()
    }

    pub fn pending(&self) -> bool {
        self.state.pending().get()
    }

    /// Email a code was sent to, while waiting for it
    pub fn code_email(&self) -> Option<String> {
        self.state.phase().with(|phase| match phase {
            AuthPhase::CodeRequested { email, .. } => Some(email.clone()),
            _ => None,
        })
    }

    pub fn sign_up(&self, details: SignUpDetails) {
        let (state, api) = (self.state, self.app.api());
        state.update(|s| s.begin());
        spawn_local(async move {
            let result = auth::request_sign_up(&api, &details).await;
            state.try_update(|s| s.settle_code_request(&details.email, CodeFlow::SignUp, result));
        });
    }

    pub fn sign_in(&self, email: String) {
        let (state, api) = (self.state, self.app.api());
        state.update(|s| s.begin());
        spawn_local(async move {
            let result = auth::request_sign_in(&api, &email).await;
            state.try_update(|s| s.settle_code_request(&email, CodeFlow::SignIn, result));
        });
    }

    /// Goes to the board list once the code checks out
    pub fn verify(&self, email: String, code: String) {
        let (state, api, router) = (self.state, self.app.api(), self.app.router);
        let flow = state.with_untracked(|s| s.pending_flow());
        state.update(|s| s.begin());
        spawn_local(async move {
            let result = auth::verify(&api, flow, &email, &code).await;
            let verified = result.is_ok();
            state.try_update(|s| s.settle_verify(result));
            if verified {
                router.navigate(Route::Boards);
            }
        });
    }

    /// Leaves the app for GitHub; only failures come back here
    pub fn github_sign_in(&self) {
        let (state, api) = (self.state, self.app.api());
        state.update(|s| s.begin());
        spawn_local(async move {
            let result = auth::start_github_sign_in(&api).await;
            state.try_update(|s| s.settle_github_redirect(result));
        });
    }

    /// Goes to the board list once GitHub's code is accepted
    pub fn complete_github_sign_in(&self, code: String) {
        let (state, api, router) = (self.state, self.app.api(), self.app.router);
        state.update(|s| s.begin());
        spawn_local(async move {
            let result = auth::complete_github_sign_in(&api, &code).await;
            // leave the callback page before it can see the new session
            if result.is_ok() {
                router.replace(Route::Boards);
            }
            state.try_update(|s| s.settle_github_callback(result));
        });
    }

    /// Drop a pending code request and start over
    pub fn restart(&self) {
        self.state.update(|s| s.signed_out());
    }

    pub fn sign_out(&self) {
        let api = self.app.api();
        self.state.update(|s| auth::sign_out(api.session(), s));
        self.app.realtime.replace(None);
        self.app.navigate(Route::SignIn);
    }
}

pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

/// Latest result of a cached query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub loading: bool,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self { data: None, error: None, loading: true }
    }
}

impl<T> QueryState<T> {
    /// Failures keep the last good data
    fn settle(&mut self, result: Result<T, ApiError>) {
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(e) => self.error = Some(e),
        }
    }
}

/// Run `load` now, again whenever the signals it reads change, and again
/// after every cache change.
///
/// Fresh cache entries make reruns cheap. Only the newest run may write the
/// result.
pub fn use_query<T, F, Fut>(load: F) -> ReadSignal<QueryState<T>>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(ApiClient, QueryCache) -> Fut + 'static,
    Fut: Future<Output = Result<T, ApiError>> + 'static,
{
    let app = use_app();
    let (state, set_state) = signal(QueryState::<T>::default());
    let generation = StoredValue::new(0u64);

    Effect::new(move |_| {
        app.cache_version.track();
        generation.update_value(|g| *g += 1);
        let current = generation.get_value();
        let request = load(app.api(), app.cache());
        spawn_local(async move {
            let result = request.await;
            if generation.try_get_value() == Some(current) {
                set_state.try_update(|s| s.settle(result));
            }
        });
    });

    state
}

/// Run a mutation in the background and report its outcome as a toast
pub fn run_mutation<T, Fut>(
    toasts: Toasts,
    request: Fut,
    success: &'static str,
    failure: &'static str,
    then: impl FnOnce(&Result<T, ApiError>) + 'static,
) where
    T: 'static,
    Fut: Future<Output = Result<T, ApiError>> + 'static,
{
    spawn_local(async move {
        let result = request.await;
        toasts.report(&result, success, failure);
        then(&result);
    });
}
