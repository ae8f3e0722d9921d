//! Client-side routes and history-based navigation.

use leptos::prelude::*;
use percent_encoding::percent_decode_str;
use wasm_bindgen::prelude::*;

pub const SIGN_IN_PATH: &str = "/signin";
pub const SIGN_UP_PATH: &str = "/signup";
pub const BOARDS_PATH: &str = "/boards";
pub const GITHUB_CALLBACK_PATH: &str = "/auth/github/callback";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    SignIn,
    SignUp,
    Boards,
    Board(String),
    /// Return leg of GitHub OAuth, with the `code` query parameter
    GitHubCallback(String),
    NotFound,
}

impl Route {
    /// `location` is a path, optionally followed by a query string
    pub fn parse(location: &str) -> Self {
        let location = location.split('#').next().unwrap_or_default();
        let (path, query) = location.split_once('?').unwrap_or((location, ""));
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] | ["boards"] => Route::Boards,
            ["signin"] => Route::SignIn,
            ["signup"] => Route::SignUp,
            ["boards", id] => Route::Board(decode(id)),
            ["auth", "github", "callback"] => Route::GitHubCallback(query_param(query, "code").unwrap_or_default()),
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::SignIn => SIGN_IN_PATH.to_string(),
            Route::SignUp => SIGN_UP_PATH.to_string(),
            Route::Boards | Route::NotFound => BOARDS_PATH.to_string(),
            Route::Board(id) => format!("{BOARDS_PATH}/{}", crate::api::segment(id)),
            Route::GitHubCallback(_) => GITHUB_CALLBACK_PATH.to_string(),
        }
    }

    /// Private routes need a signed-in user
    pub fn is_private(&self) -> bool {
        matches!(self, Route::Boards | Route::Board(_))
    }

    /// Where a visitor actually lands
    pub fn guard(self, authenticated: bool) -> Self {
        if self.is_private() && !authenticated {
            Route::SignIn
        } else {
            self
        }
    }
}

fn decode(component: &str) -> String {
    percent_decode_str(component).decode_utf8_lossy().into_owned()
}

fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| decode(&value.replace('+', " ")))
}

/// Current route, kept in sync with the address bar
#[derive(Clone, Copy)]
pub struct Router {
    route: RwSignal<Route>,
}

impl Router {
    pub fn new(initial: Route) -> Self {
        Self { route: RwSignal::new(initial) }
    }

    /// Router following `window.location`, updated on back/forward
    pub fn from_location() -> Self {
        let router = Self::new(Route::parse(&current_path()));
        if let Some(window) = web_sys::window() {
            let on_popstate = Closure::<dyn Fn(web_sys::Event)>::new(move |_: web_sys::Event| {
                router.route.try_set(Route::parse(&current_path()));
            });
            let _ = window
                .add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref());
            // lives as long as the page
            on_popstate.forget();
        }
        router
    }

    pub fn route(&self) -> Route {
        self.route.get()
    }

    pub fn navigate(&self, route: Route) {
        let path = route.path();
        if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
            if history.push_state_with_url(&JsValue::NULL, "", Some(&path)).is_err() {
                tracing::warn!(path, "pushState rejected");
            }
        }
        self.route.set(route);
    }

    /// Navigate without adding a history entry
    pub fn replace(&self, route: Route) {
        let path = route.path();
        if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&path));
        }
        self.route.set(route);
    }
}

/// Path plus query string of the address bar
fn current_path() -> String {
    let Some(location) = web_sys::window().map(|w| w.location()) else {
        return "/".to_string();
    };
    let path = location.pathname().unwrap_or_else(|_| "/".to_string());
    let search = location.search().unwrap_or_default();
    format!("{path}{search}")
}
