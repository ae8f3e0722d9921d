//! Session Lifecycle
//!
//! `Anonymous -> CodeRequested -> Authenticated`, with an error message that
//! any attempt may leave behind. The async flows here talk to the backend
//! and persist the session; `AuthState` only records what happened.

use reactive_stores::Store;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{Session, User};
use crate::services::{self, CodeFlow, SignUpDetails};
use crate::storage::SessionStore;

pub const SEND_CODE_FAILED: &str = "Failed to send verification code";
pub const INVALID_CODE: &str = "Invalid verification code";
pub const GITHUB_FAILED: &str = "An error occurred during GitHub sign-in";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthPhase {
    #[default]
    Anonymous,
    CodeRequested {
        email: String,
        flow: CodeFlow,
    },
    Authenticated(Session),
}

#[derive(Debug, Clone, PartialEq, Default, Store)]
pub struct AuthState {
    pub phase: AuthPhase,
    /// Message from the last failed attempt
    pub error: Option<String>,
    /// A request is in flight
    pub pending: bool,
}

impl AuthState {
    /// State restored from durable storage; corrupt records count as signed out
    pub fn hydrate(sessions: &SessionStore) -> Self {
        let phase = match sessions.load() {
            Some(session) => {
                tracing::debug!(user = %session.user.id, "restored session");
                AuthPhase::Authenticated(session)
            }
            None => AuthPhase::Anonymous,
        };
        Self { phase, ..Self::default() }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.phase, AuthPhase::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match &self.phase {
            AuthPhase::Authenticated(session) => Some(&session.user),
            _ => None,
        }
    }

    /// Flow awaiting a code, if any
    pub fn pending_flow(&self) -> Option<CodeFlow> {
        match &self.phase {
            AuthPhase::CodeRequested { flow, .. } => Some(*flow),
            _ => None,
        }
    }

    /// Clears the previous error
    pub fn begin(&mut self) {
        self.error = None;
        self.pending = true;
    }

    pub fn settle_code_request(&mut self, email: &str, flow: CodeFlow, result: Result<(), ApiError>) {
        self.pending = false;
        match result {
            Ok(()) => {
                self.phase = AuthPhase::CodeRequested { email: email.to_string(), flow };
            }
            Err(e) => self.error = Some(user_message(&e, SEND_CODE_FAILED)),
        }
    }

    /// On failure the phase is left exactly as it was
    pub fn settle_verify(&mut self, result: Result<Session, ApiError>) {
        self.pending = false;
        match result {
            Ok(session) => self.phase = AuthPhase::Authenticated(session),
            Err(_) => self.error = Some(INVALID_CODE.to_string()),
        }
    }

    /// Only failures are recorded; success leaves the page
    pub fn settle_github_redirect(&mut self, result: Result<(), ApiError>) {
        self.pending = false;
        if result.is_err() {
            self.error = Some(GITHUB_FAILED.to_string());
        }
    }

    pub fn settle_github_callback(&mut self, result: Result<Session, ApiError>) {
        self.pending = false;
        match result {
            Ok(session) => self.phase = AuthPhase::Authenticated(session),
            Err(_) => self.error = Some(GITHUB_FAILED.to_string()),
        }
    }

    pub fn signed_out(&mut self) {
        *self = Self::default();
    }
}

/// Backend validation messages are shown as-is; anything else gets `fallback`
fn user_message(err: &ApiError, fallback: &str) -> String {
    match err {
        ApiError::Validation(message) if !message.is_empty() => message.clone(),
        _ => fallback.to_string(),
    }
}

pub async fn request_sign_up(api: &ApiClient, details: &SignUpDetails) -> Result<(), ApiError> {
    services::sign_up(api, details).await.inspect_err(|e| {
        tracing::warn!(error = %e, "sign-up code request failed");
    })
}

pub async fn request_sign_in(api: &ApiClient, email: &str) -> Result<(), ApiError> {
    services::sign_in(api, email).await.inspect_err(|e| {
        tracing::warn!(error = %e, "sign-in code request failed");
    })
}

/// Exchange a one-time code for a session and persist it.
///
/// `flow` is the flow the code was requested for; sign-in when unknown.
pub async fn verify(api: &ApiClient, flow: Option<CodeFlow>, email: &str, code: &str) -> Result<Session, ApiError> {
    let flow = flow.unwrap_or(CodeFlow::SignIn);
    let session = services::verify_code(api, flow, email, code).await.inspect_err(|e| {
        tracing::info!(error = %e, "code verification failed");
    })?;
    api.session().save(&session);
    tracing::info!(user = %session.user.id, "signed in");
    Ok(session)
}

/// Send the browser to GitHub's authorization page
pub async fn start_github_sign_in(api: &ApiClient) -> Result<(), ApiError> {
    let authorization = services::github_authorization(api).await.inspect_err(|e| {
        tracing::warn!(error = %e, "could not start GitHub sign-in");
    })?;
    api.redirect(&authorization.url);
    Ok(())
}

/// Finish the OAuth round trip and persist the session
pub async fn complete_github_sign_in(api: &ApiClient, code: &str) -> Result<Session, ApiError> {
    let session = services::github_callback(api, code).await.inspect_err(|e| {
        tracing::info!(error = %e, "GitHub callback rejected");
    })?;
    api.session().save(&session);
    tracing::info!(user = %session.user.id, "signed in with GitHub");
    Ok(session)
}

/// Local only; the backend keeps no session to end
pub fn sign_out(sessions: &SessionStore, state: &mut AuthState) {
    sessions.clear();
    state.signed_out();
    tracing::info!("signed out");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, ACCESS_TOKEN_KEY, USER_KEY};
    use crate::testing::{harness, session_fixture, GITHUB_AUTHORIZE_URL, VALID_CODE};

    #[tokio::test]
    async fn test_sign_in_then_verify() {
        let h = harness("/signin");
        let mut state = AuthState::hydrate(h.api.session());
        assert!(!state.is_authenticated());

        state.begin();
        let sent = request_sign_in(&h.api, "ada@example.com").await;
        state.settle_code_request("ada@example.com", CodeFlow::SignIn, sent);
        assert_eq!(state.pending_flow(), Some(CodeFlow::SignIn));

        state.begin();
        let verified = verify(&h.api, state.pending_flow(), "ada@example.com", VALID_CODE).await;
        state.settle_verify(verified);

        assert!(state.is_authenticated());
        assert_eq!(state.error, None);
        assert_eq!(h.storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("token-123"));
        assert_eq!(h.backend.requests()[1].url, "http://api.test/auth/signin/verify");
    }

    #[tokio::test]
    async fn test_sign_up_verifies_against_sign_up_endpoint() {
        let h = harness("/signup");
        let details = SignUpDetails { email: "ada@example.com".to_string(), name: "Ada".to_string(), avatar: None };
        let mut state = AuthState::default();

        let sent = request_sign_up(&h.api, &details).await;
        state.settle_code_request(&details.email, CodeFlow::SignUp, sent);
        let verified = verify(&h.api, state.pending_flow(), &details.email, VALID_CODE).await;
        state.settle_verify(verified);

        assert!(state.is_authenticated());
        assert_eq!(h.backend.requests()[1].url, "http://api.test/auth/signup/verify");
    }

    #[tokio::test]
    async fn test_invalid_code_leaves_state_unchanged() {
        let h = harness("/signin");
        let mut state = AuthState::default();
        state.settle_code_request("ada@example.com", CodeFlow::SignIn, Ok(()));
        let before = state.phase.clone();

        state.begin();
        let verified = verify(&h.api, state.pending_flow(), "ada@example.com", "000000").await;
        state.settle_verify(verified);

        assert_eq!(state.phase, before);
        assert_eq!(state.error.as_deref(), Some(INVALID_CODE));
        assert!(!state.pending);
        assert_eq!(h.storage.get(ACCESS_TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn test_failed_code_request_sets_message() {
        let h = harness("/signin");
        h.backend.go_offline();
        let mut state = AuthState::default();

        state.begin();
        let sent = request_sign_in(&h.api, "ada@example.com").await;
        state.settle_code_request("ada@example.com", CodeFlow::SignIn, sent);

        assert_eq!(state.phase, AuthPhase::Anonymous);
        assert_eq!(state.error.as_deref(), Some(SEND_CODE_FAILED));
    }

    #[test]
    fn test_new_attempt_clears_error() {
        let mut state = AuthState { error: Some(INVALID_CODE.to_string()), ..AuthState::default() };
        state.begin();
        assert_eq!(state.error, None);
        assert!(state.pending);
    }

    #[test]
    fn test_sign_out_clears_storage() {
        let h = harness("/boards");
        h.api.session().save(&session_fixture());
        let mut state = AuthState::hydrate(h.api.session());
        assert!(state.is_authenticated());

        sign_out(h.api.session(), &mut state);

        assert!(!state.is_authenticated());
        assert_eq!(h.storage.get(ACCESS_TOKEN_KEY), None);
        assert_eq!(h.storage.get(USER_KEY), None);
    }

    #[test]
    fn test_hydrate_discards_corrupt_record() {
        let h = harness("/boards");
        h.storage.set(ACCESS_TOKEN_KEY, "tok");
        h.storage.set(USER_KEY, "not json");

        let state = AuthState::hydrate(h.api.session());

        assert_eq!(state, AuthState::default());
        assert_eq!(h.storage.get(ACCESS_TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn test_github_sign_in_leaves_for_authorization_page() {
        let h = harness("/signin");
        let mut state = AuthState::default();

        state.begin();
        let started = start_github_sign_in(&h.api).await;
        state.settle_github_redirect(started);

        assert_eq!(h.navigator.redirects(), vec![GITHUB_AUTHORIZE_URL.to_string()]);
        assert_eq!(state.error, None);
        assert!(!state.pending);
    }

    #[tokio::test]
    async fn test_github_callback_persists_session() {
        let h = harness("/auth/github/callback");
        let mut state = AuthState::default();

        let session = complete_github_sign_in(&h.api, VALID_CODE).await;
        state.settle_github_callback(session);

        assert!(state.is_authenticated());
        assert_eq!(h.storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("token-123"));
        assert_eq!(h.backend.requests()[0].body, Some(serde_json::json!({ "code": VALID_CODE })));
    }

    #[tokio::test]
    async fn test_rejected_github_callback_stays_signed_out() {
        let h = harness("/auth/github/callback");
        let mut state = AuthState::default();

        let session = complete_github_sign_in(&h.api, "expired").await;
        state.settle_github_callback(session);

        assert_eq!(state.phase, AuthPhase::Anonymous);
        assert_eq!(state.error.as_deref(), Some(GITHUB_FAILED));
        assert_eq!(h.storage.get(ACCESS_TOKEN_KEY), None);
    }
}
