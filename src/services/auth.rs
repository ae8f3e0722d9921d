//! Auth Services
//!
//! Email one-time-code sign-up and sign-in, plus GitHub OAuth.

use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::Session;

// ========================
// Argument Structs
// ========================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignUpDetails {
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Serialize)]
struct EmailArgs<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct VerifyArgs<'a> {
    email: &'a str,
    code: &'a str,
}

#[derive(Serialize)]
struct CallbackArgs<'a> {
    code: &'a str,
}

/// Where to send the browser to authorize with GitHub
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GitHubAuthorization {
    pub url: String,
}

/// Which flow a one-time code was requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeFlow {
    SignUp,
    SignIn,
}

impl CodeFlow {
    fn verify_path(self) -> &'static str {
        match self {
            CodeFlow::SignUp => "/auth/signup/verify",
            CodeFlow::SignIn => "/auth/signin/verify",
        }
    }
}

// ========================
// Services
// ========================

pub async fn sign_up(api: &ApiClient, details: &SignUpDetails) -> Result<(), ApiError> {
    api.post_unit("/auth/signup", details).await
}

pub async fn sign_in(api: &ApiClient, email: &str) -> Result<(), ApiError> {
    api.post_unit("/auth/signin", &EmailArgs { email }).await
}

pub async fn verify_code(api: &ApiClient, flow: CodeFlow, email: &str, code: &str) -> Result<Session, ApiError> {
    api.post(flow.verify_path(), &VerifyArgs { email, code }).await
}

pub async fn github_authorization(api: &ApiClient) -> Result<GitHubAuthorization, ApiError> {
    api.get("/auth/github").await
}

/// Trade the OAuth `code` GitHub redirected back with for a session
pub async fn github_callback(api: &ApiClient, code: &str) -> Result<Session, ApiError> {
    api.post("/auth/github/callback", &CallbackArgs { code }).await
}
