//! Board View Data
//!
//! Fan-out of per-card task fetches and grouping of tasks under their cards.

use futures::future::join_all;

use crate::api::ApiClient;
use crate::models::{Card, Task};
use crate::queries;
use crate::query::QueryCache;

/// One rendered list: a card and the tasks currently in it
#[derive(Debug, Clone, PartialEq)]
pub struct CardColumn {
    pub card: Card,
    pub tasks: Vec<Task>,
}

/// Group tasks under their cards, in card order.
///
/// Tasks keep their relative order; tasks whose card is not loaded are dropped.
pub fn group_by_card(cards: &[Card], tasks: &[Task]) -> Vec<CardColumn> {
    let columns: Vec<CardColumn> = cards
        .iter()
        .map(|card| CardColumn {
            card: card.clone(),
            tasks: tasks.iter().filter(|t| t.card_id == card.id).cloned().collect(),
        })
        .collect();

    let shown: usize = columns.iter().map(|c| c.tasks.len()).sum();
    if shown < tasks.len() {
        tracing::debug!(orphans = tasks.len() - shown, "dropping tasks with unknown card");
    }
    columns
}

/// Every task of a board, one cached read per card, joined before returning.
///
/// A card whose fetch fails contributes no tasks.
pub async fn fetch_board_tasks(api: &ApiClient, cache: &QueryCache, board_id: &str, cards: &[Card]) -> Vec<Task> {
    let requests = cards.iter().map(|card| async move {
        match queries::card_tasks(api, cache, board_id, &card.id).await {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::warn!(card = %card.id, error = %e, "failed to load tasks for card");
                Vec::new()
            }
        }
    });
    join_all(requests).await.into_iter().flatten().collect()
}
