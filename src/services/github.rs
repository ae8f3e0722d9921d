//! GitHub Services

use crate::api::{segment, ApiClient};
use crate::error::ApiError;
use crate::models::GitHubInfo;

pub async fn repository_info(api: &ApiClient, repository_id: &str) -> Result<GitHubInfo, ApiError> {
    api.get(&format!("/repositories/{}/github-info", segment(repository_id))).await
}
