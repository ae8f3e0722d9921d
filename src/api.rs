//! HTTP Client Wrapper
//!
//! Uniform request dispatch: base URL, bearer token injection and the
//! process-wide 401 handling. Services never talk to the transport directly.

use std::fmt;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::routes::SIGN_IN_PATH;
use crate::storage::SessionStore;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode an id for use as one URL path segment
pub fn segment(value: &str) -> impl fmt::Display + '_ {
    utf8_percent_encode(value, SEGMENT)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub bearer: Option<String>,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one request and hands back the raw response.
///
/// Non-2xx statuses are not errors at this level; only failing to get a
/// response at all is.
pub trait Transport {
    fn send(&self, request: HttpRequest) -> LocalBoxFuture<'static, Result<HttpResponse, ApiError>>;
}

/// Where the app currently is, and how to force it somewhere else
pub trait Navigator {
    fn current_path(&self) -> String;
    fn redirect(&self, path: &str);
}

/// Full page navigation through `window.location`
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn current_path(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_default()
    }

    fn redirect(&self, path: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(path);
        }
    }
}

struct ClientInner {
    base_url: String,
    transport: Box<dyn Transport>,
    session: SessionStore,
    navigator: Box<dyn Navigator>,
}

/// Cheap to clone; all clones share one transport and session store
#[derive(Clone)]
pub struct ApiClient {
    inner: Rc<ClientInner>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        transport: impl Transport + 'static,
        session: SessionStore,
        navigator: impl Navigator + 'static,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            inner: Rc::new(ClientInner {
                base_url,
                transport: Box::new(transport),
                session,
                navigator: Box::new(navigator),
            }),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Leave the app for `url`
    pub fn redirect(&self, url: &str) {
        self.inner.navigator.redirect(url);
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let body = self.dispatch(Method::Get, path, None).await?;
        decode(&body)
    }

    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = self.dispatch(Method::Post, path, Some(serde_json::to_value(body)?)).await?;
        decode(&body)
    }

    /// POST where the response body is ignored
    pub async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        self.dispatch(Method::Post, path, Some(serde_json::to_value(body)?)).await?;
        Ok(())
    }

    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = self.dispatch(Method::Put, path, Some(serde_json::to_value(body)?)).await?;
        decode(&body)
    }

    /// PUT without a request body, response ignored
    pub async fn put_empty(&self, path: &str) -> Result<(), ApiError> {
        self.dispatch(Method::Put, path, None).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.dispatch(Method::Delete, path, None).await?;
        Ok(())
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<String, ApiError> {
        let request = HttpRequest {
            method,
            url: format!("{}{}", self.inner.base_url, path),
            bearer: self.inner.session.access_token(),
            body,
        };
        tracing::debug!(?method, path, "api request");

        let response = match self.inner.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(?method, path, error = %e, "api transport failure");
                return Err(e);
            }
        };

        match response.status {
            200..=299 => Ok(response.body),
            401 => {
                self.handle_unauthorized();
                Err(ApiError::Unauthorized)
            }
            status => {
                let err = ApiError::from_status(status, &response.body);
                tracing::warn!(?method, path, status, error = %err, "api request rejected");
                Err(err)
            }
        }
    }

    /// Drop the persisted session and send the user to sign-in
    fn handle_unauthorized(&self) {
        tracing::info!("received 401, clearing session");
        self.inner.session.clear();
        if self.inner.navigator.current_path() != SIGN_IN_PATH {
            self.inner.navigator.redirect(SIGN_IN_PATH);
        }
    }
}

fn decode<R: DeserializeOwned>(body: &str) -> Result<R, ApiError> {
    // Unit-like results may come back as an empty body
    let body = if body.trim().is_empty() { "null" } else { body };
    Ok(serde_json::from_str(body)?)
}

#[cfg(target_arch = "wasm32")]
pub use fetch::FetchTransport;

#[cfg(target_arch = "wasm32")]
mod fetch {
    use futures::future::{FutureExt, LocalBoxFuture};
    use gloo_net::http::Request;

    use super::{HttpRequest, HttpResponse, Method, Transport};
    use crate::error::ApiError;

    /// Browser `fetch` via gloo-net
    #[derive(Clone, Copy, Debug, Default)]
    pub struct FetchTransport;

    impl Transport for FetchTransport {
        fn send(&self, request: HttpRequest) -> LocalBoxFuture<'static, Result<HttpResponse, ApiError>> {
            async move {
                let builder = match request.method {
                    Method::Get => Request::get(&request.url),
                    Method::Post => Request::post(&request.url),
                    Method::Put => Request::put(&request.url),
                    Method::Delete => Request::delete(&request.url),
                };
                let mut builder = builder.header("Content-Type", "application/json");
                if let Some(token) = &request.bearer {
                    builder = builder.header("Authorization", &format!("Bearer {token}"));
                }

                let sent = match &request.body {
                    Some(body) => builder
                        .json(body)
                        .map_err(|e| ApiError::Network(e.to_string()))?
                        .send()
                        .await,
                    None => builder.send().await,
                };
                let response = sent.map_err(|e| ApiError::Network(e.to_string()))?;
                let status = response.status();
                let body = response.text().await.map_err(|e| ApiError::Network(e.to_string()))?;
                Ok(HttpResponse { status, body })
            }
            .boxed_local()
        }
    }
}
