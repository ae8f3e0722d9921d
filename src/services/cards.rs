//! Card Services
//!
//! Cards are the lists (columns) of a board.

use serde::Serialize;

use crate::api::{segment, ApiClient};
use crate::error::ApiError;
use crate::models::Card;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardArgs {
    pub name: String,
    pub description: String,
}

fn cards_path(board_id: &str) -> String {
    format!("/boards/{}/cards", segment(board_id))
}

pub async fn list_cards(api: &ApiClient, board_id: &str) -> Result<Vec<Card>, ApiError> {
    api.get(&cards_path(board_id)).await
}

/// Cards of a board that involve the given user
pub async fn list_cards_for_user(api: &ApiClient, board_id: &str, user_id: &str) -> Result<Vec<Card>, ApiError> {
    api.get(&format!("{}/user/{}", cards_path(board_id), segment(user_id))).await
}

pub async fn get_card(api: &ApiClient, board_id: &str, card_id: &str) -> Result<Card, ApiError> {
    api.get(&format!("{}/{}", cards_path(board_id), segment(card_id))).await
}

pub async fn create_card(api: &ApiClient, board_id: &str, args: &CardArgs) -> Result<Card, ApiError> {
    api.post(&cards_path(board_id), args).await
}

pub async fn update_card(api: &ApiClient, board_id: &str, card_id: &str, args: &CardArgs) -> Result<Card, ApiError> {
    api.put(&format!("{}/{}", cards_path(board_id), segment(card_id)), args).await
}

pub async fn delete_card(api: &ApiClient, board_id: &str, card_id: &str) -> Result<(), ApiError> {
    api.delete(&format!("{}/{}", cards_path(board_id), segment(card_id))).await
}
