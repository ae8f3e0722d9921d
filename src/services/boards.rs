//! Board Services

use serde::Serialize;

use crate::api::{segment, ApiClient};
use crate::error::ApiError;
use crate::models::Board;

// ========================
// Argument Structs
// ========================

/// Body for both create and update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardArgs {
    pub name: String,
    pub description: String,
}

#[derive(Serialize)]
struct InviteArgs<'a> {
    board_owner_id: &'a str,
    email_member: &'a str,
    status: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteResponse {
    Accepted,
    Declined,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RespondArgs<'a> {
    invite_id: &'a str,
    board_id: &'a str,
    status: InviteResponse,
}

// ========================
// Services
// ========================

pub async fn list_boards(api: &ApiClient) -> Result<Vec<Board>, ApiError> {
    api.get("/boards").await
}

pub async fn get_board(api: &ApiClient, board_id: &str) -> Result<Board, ApiError> {
    api.get(&format!("/boards/{}", segment(board_id))).await
}

pub async fn create_board(api: &ApiClient, args: &BoardArgs) -> Result<Board, ApiError> {
    api.post("/boards", args).await
}

pub async fn update_board(api: &ApiClient, board_id: &str, args: &BoardArgs) -> Result<Board, ApiError> {
    api.put(&format!("/boards/{}", segment(board_id)), args).await
}

pub async fn delete_board(api: &ApiClient, board_id: &str) -> Result<(), ApiError> {
    api.delete(&format!("/boards/{}", segment(board_id))).await
}

pub async fn invite_member(api: &ApiClient, board_id: &str, owner_id: &str, email: &str) -> Result<(), ApiError> {
    let args = InviteArgs { board_owner_id: owner_id, email_member: email, status: "pending" };
    api.post_unit(&format!("/boards/{}/invite", segment(board_id)), &args).await
}

pub async fn respond_to_invite(
    api: &ApiClient,
    board_id: &str,
    invite_id: &str,
    response: InviteResponse,
) -> Result<(), ApiError> {
    let args = RespondArgs { invite_id, board_id, status: response };
    api.post_unit(&format!("/boards/{}/invite/accept", segment(board_id)), &args).await
}
