//! Cached reads, one per query key.

use crate::api::ApiClient;
use crate::board;
use crate::error::ApiError;
use crate::models::{Board, Card, Member, Notification, Task};
use crate::query::{keys, QueryCache};
use crate::services;

pub async fn boards(api: &ApiClient, cache: &QueryCache) -> Result<Vec<Board>, ApiError> {
    let api = api.clone();
    cache.fetch(&keys::boards(), move || async move { services::list_boards(&api).await }).await
}

pub async fn board(api: &ApiClient, cache: &QueryCache, board_id: &str) -> Result<Board, ApiError> {
    let (api, id) = (api.clone(), board_id.to_string());
    cache.fetch(&keys::board(board_id), move || async move { services::get_board(&api, &id).await }).await
}

pub async fn cards(api: &ApiClient, cache: &QueryCache, board_id: &str) -> Result<Vec<Card>, ApiError> {
    let (api, id) = (api.clone(), board_id.to_string());
    cache.fetch(&keys::cards(board_id), move || async move { services::list_cards(&api, &id).await }).await
}

pub async fn user_cards(
    api: &ApiClient,
    cache: &QueryCache,
    board_id: &str,
    user_id: &str,
) -> Result<Vec<Card>, ApiError> {
    let (api, board, user) = (api.clone(), board_id.to_string(), user_id.to_string());
    cache
        .fetch(&keys::user_cards(board_id, user_id), move || async move {
            services::list_cards_for_user(&api, &board, &user).await
        })
        .await
}

/// Tasks of one card
pub async fn card_tasks(
    api: &ApiClient,
    cache: &QueryCache,
    board_id: &str,
    card_id: &str,
) -> Result<Vec<Task>, ApiError> {
    let (api, board, card) = (api.clone(), board_id.to_string(), card_id.to_string());
    cache
        .fetch(&keys::card_tasks(board_id, card_id), move || async move {
            services::list_tasks(&api, &board, &card).await
        })
        .await
}

/// Every task of a board, fetched card by card once the cards are known
pub async fn board_tasks(api: &ApiClient, cache: &QueryCache, board_id: &str) -> Result<Vec<Task>, ApiError> {
    let cards = cards(api, cache, board_id).await?;
    let (api, per_card, id) = (api.clone(), cache.clone(), board_id.to_string());
    cache
        .fetch(&keys::tasks(board_id), move || async move {
            Ok(board::fetch_board_tasks(&api, &per_card, &id, &cards).await)
        })
        .await
}

pub async fn members(api: &ApiClient, cache: &QueryCache, board_id: &str) -> Result<Vec<Member>, ApiError> {
    let (api, id) = (api.clone(), board_id.to_string());
    cache.fetch(&keys::members(board_id), move || async move { services::list_members(&api, &id).await }).await
}

pub async fn notifications(api: &ApiClient, cache: &QueryCache) -> Result<Vec<Notification>, ApiError> {
    let api = api.clone();
    cache
        .fetch(&keys::notifications(), move || async move { services::list_notifications(&api).await })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{board as board_fixture, card, harness, task};

    #[tokio::test]
    async fn test_second_read_within_window_hits_cache() {
        let h = harness("/boards");
        h.backend.seed_board(board_fixture("b1", "Roadmap"));

        let first = boards(&h.api, &h.cache).await.unwrap();
        let second = boards(&h.api, &h.cache).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(h.backend.request_count(), 1);
    }

    #[tokio::test]
    async fn test_board_tasks_fetches_cards_then_tasks() {
        let h = harness("/boards/b1");
        h.backend.seed_card("b1", card("c1", "Todo"));
        h.backend.seed_task("b1", task("t1", "c1"));

        let tasks = board_tasks(&h.api, &h.cache, "b1").await.unwrap();

        assert_eq!(tasks.len(), 1);
        assert!(h.cache.is_fresh(&keys::cards("b1")));
        assert!(h.cache.is_fresh(&keys::tasks("b1")));
    }

    #[tokio::test]
    async fn test_user_cards_path() {
        let h = harness("/boards/b1");
        h.backend.seed_card("b1", card("c1", "Todo"));

        let cards = user_cards(&h.api, &h.cache, "b1", "u1").await.unwrap();

        assert_eq!(cards.len(), 1);
        assert_eq!(h.backend.requests()[0].url, "http://api.test/boards/b1/cards/user/u1");
        h.cache.invalidate(&keys::cards("b1"));
        assert!(!h.cache.is_fresh(&keys::user_cards("b1", "u1")));
    }
}
