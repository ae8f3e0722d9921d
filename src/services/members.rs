//! Board Member Services

use serde::Serialize;

use crate::api::{segment, ApiClient};
use crate::error::ApiError;
use crate::models::Member;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMember {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemberUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

fn members_path(board_id: &str) -> String {
    format!("/boards/{}/members", segment(board_id))
}

pub async fn list_members(api: &ApiClient, board_id: &str) -> Result<Vec<Member>, ApiError> {
    api.get(&members_path(board_id)).await
}

pub async fn add_member(api: &ApiClient, board_id: &str, member: &NewMember) -> Result<Member, ApiError> {
    api.post(&members_path(board_id), member).await
}

pub async fn update_member(
    api: &ApiClient,
    board_id: &str,
    member_id: &str,
    update: &MemberUpdate,
) -> Result<Member, ApiError> {
    api.put(&format!("{}/{}", members_path(board_id), segment(member_id)), update).await
}

pub async fn remove_member(api: &ApiClient, board_id: &str, member_id: &str) -> Result<(), ApiError> {
    api.delete(&format!("{}/{}", members_path(board_id), segment(member_id))).await
}
