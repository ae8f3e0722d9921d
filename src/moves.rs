//! Optimistic Task Moves
//!
//! A drop is validated into a `TaskMove`, written to the board's task cache
//! right away, then confirmed with the backend. A rejected move restores the
//! cache to what it was before the drag.

use leptos_dragdrop::DropResult;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::Task;
use crate::query::{keys, QueryCache};
use crate::services::{self, TaskUpdate};

pub const MOVE_FAILED: &str = "Failed to move task";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskMove {
    pub task_id: String,
    pub from_card: String,
    pub to_card: String,
    /// Final position among the destination card's tasks
    pub to_index: usize,
}

impl TaskMove {
    /// None for drops that change nothing
    pub fn from_drop(drop: &DropResult) -> Option<Self> {
        if drop.is_noop() {
            return None;
        }
        let dest = drop.destination.as_ref()?;
        Some(Self {
            task_id: drop.source.item_id.clone(),
            from_card: drop.source.list_id.clone(),
            to_card: dest.list_id.clone(),
            to_index: drop.destination_index()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// Task not in the cached grouping; nothing was sent
    Skipped,
}

/// Task list with the move applied, or None when the task is not in it
pub fn apply_move(tasks: &[Task], mv: &TaskMove) -> Option<Vec<Task>> {
    let from = tasks.iter().position(|t| t.id == mv.task_id)?;
    let mut next = tasks.to_vec();
    let mut task = next.remove(from);
    task.card_id = mv.to_card.clone();

    // Insert before the task currently at `to_index` in the destination card,
    // or after its last task when the index is past the end
    let mut seen = 0;
    let mut insert_at = None;
    let mut after_last = None;
    for (i, t) in next.iter().enumerate().filter(|(_, t)| t.card_id == mv.to_card) {
        if seen == mv.to_index {
            insert_at = Some(i);
            break;
        }
        seen += 1;
        after_last = Some(i + 1);
    }
    let at = insert_at.or(after_last).unwrap_or(next.len());
    next.insert(at, task);
    Some(next)
}

/// Apply `mv` to the cached tasks of `board_id`, then persist it.
///
/// The cache holds the moved layout before the request is sent. On failure
/// the previous layout is restored and the error returned.
pub async fn commit_move(
    api: &ApiClient,
    cache: &QueryCache,
    board_id: &str,
    mv: &TaskMove,
) -> Result<MoveOutcome, ApiError> {
    let key = keys::tasks(board_id);
    let current: Vec<Task> = cache.get(&key).unwrap_or_default();
    let Some(task) = current.iter().find(|t| t.id == mv.task_id).cloned() else {
        tracing::warn!(task = %mv.task_id, "dropped task not in cached board");
        return Ok(MoveOutcome::Skipped);
    };
    let Some(next) = apply_move(&current, mv) else {
        return Ok(MoveOutcome::Skipped);
    };

    let rollback = cache.write_optimistic(&key, &next);
    tracing::debug!(task = %task.id, from = %task.card_id, to = %mv.to_card, "moving task");

    let update = TaskUpdate { new_card_id: Some(mv.to_card.clone()), ..TaskUpdate::from_task(&task) };
    match services::update_task(api, board_id, &task.card_id, &update).await {
        Ok(_) => {
            cache.invalidate(&key);
            Ok(MoveOutcome::Moved)
        }
        Err(e) => {
            tracing::warn!(task = %task.id, error = %e, "move rejected, rolling back");
            rollback.restore(cache);
            cache.invalidate(&key);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::board::group_by_card;
    use crate::testing::{card, harness, task};
    use leptos_dragdrop::{DragSource, DropSlot};

    fn drop(task_id: &str, from: (&str, usize), to: Option<(&str, usize)>) -> DropResult {
        DropResult {
            source: DragSource { item_id: task_id.to_string(), list_id: from.0.to_string(), index: from.1 },
            destination: to.map(|(list, index)| DropSlot { list_id: list.to_string(), index }),
        }
    }

    fn ids(tasks: &[Task]) -> Vec<(&str, &str)> {
        tasks.iter().map(|t| (t.id.as_str(), t.card_id.as_str())).collect()
    }

    fn seeded() -> crate::testing::Harness {
        let h = harness("/boards/b1");
        h.cache.set(&keys::tasks("b1"), &vec![task("t1", "a"), task("t2", "a"), task("t3", "b")]);
        for t in [task("t1", "a"), task("t2", "a"), task("t3", "b")] {
            h.backend.seed_task("b1", t);
        }
        h
    }

    #[test]
    fn test_drop_on_origin_is_not_a_move() {
        assert_eq!(TaskMove::from_drop(&drop("t1", ("a", 0), Some(("a", 0)))), None);
        assert_eq!(TaskMove::from_drop(&drop("t1", ("a", 0), None)), None);
    }

    #[test]
    fn test_apply_move_across_cards() {
        let tasks = vec![task("t1", "a"), task("t2", "a"), task("t3", "b")];
        let mv = TaskMove { task_id: "t1".into(), from_card: "a".into(), to_card: "b".into(), to_index: 0 };

        let next = apply_move(&tasks, &mv).unwrap();

        assert_eq!(ids(&next), vec![("t2", "a"), ("t1", "b"), ("t3", "b")]);
    }

    #[test]
    fn test_apply_move_to_end_of_card() {
        let tasks = vec![task("t1", "a"), task("t2", "b"), task("t3", "b")];
        let mv = TaskMove { task_id: "t1".into(), from_card: "a".into(), to_card: "b".into(), to_index: 2 };

        let next = apply_move(&tasks, &mv).unwrap();

        assert_eq!(ids(&next), vec![("t2", "b"), ("t3", "b"), ("t1", "b")]);
    }

    #[test]
    fn test_apply_move_into_empty_card() {
        let tasks = vec![task("t1", "a")];
        let mv = TaskMove { task_id: "t1".into(), from_card: "a".into(), to_card: "c".into(), to_index: 0 };

        let next = apply_move(&tasks, &mv).unwrap();

        assert_eq!(ids(&next), vec![("t1", "c")]);
    }

    #[tokio::test]
    async fn test_noop_drop_sends_nothing() {
        let h = seeded();
        let before: Vec<Task> = h.cache.get(&keys::tasks("b1")).unwrap();

        if let Some(mv) = TaskMove::from_drop(&drop("t1", ("a", 0), Some(("a", 0)))) {
            commit_move(&h.api, &h.cache, "b1", &mv).await.unwrap();
        }

        assert_eq!(h.backend.request_count(), 0);
        assert_eq!(h.cache.get::<Vec<Task>>(&keys::tasks("b1")), Some(before));
    }

    #[tokio::test]
    async fn test_move_is_visible_before_response() {
        let h = seeded();
        let gate = h.backend.hold_next();
        let mv = TaskMove::from_drop(&drop("t1", ("a", 0), Some(("b", 0)))).unwrap();

        let commit = commit_move(&h.api, &h.cache, "b1", &mv);
        futures::pin_mut!(commit);
        assert!(futures::poll!(commit.as_mut()).is_pending());

        let cached: Vec<Task> = h.cache.get(&keys::tasks("b1")).unwrap();
        let columns = group_by_card(&[card("a", "A"), card("b", "B")], &cached);
        assert_eq!(ids(&columns[1].tasks), vec![("t1", "b"), ("t3", "b")]);

        gate.release();
        assert_eq!(commit.await, Ok(MoveOutcome::Moved));

        let sent = h.backend.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::Put);
        assert_eq!(sent[0].url, "http://api.test/boards/b1/cards/a/tasks/t1");
        assert_eq!(sent[0].body.as_ref().unwrap()["newCardId"], "b");
        assert_eq!(h.backend.task("t1").unwrap().card_id, "b");
        assert!(!h.cache.is_fresh(&keys::tasks("b1")));
    }

    #[tokio::test]
    async fn test_failed_move_restores_grouping() {
        let h = seeded();
        let before: Vec<Task> = h.cache.get(&keys::tasks("b1")).unwrap();
        h.backend.fail_next(500);
        let mv = TaskMove::from_drop(&drop("t2", ("a", 1), Some(("b", 1)))).unwrap();

        let result = commit_move(&h.api, &h.cache, "b1", &mv).await;

        assert!(result.is_err());
        assert_eq!(h.cache.get::<Vec<Task>>(&keys::tasks("b1")), Some(before));
        assert!(!h.cache.is_fresh(&keys::tasks("b1")));
    }

    #[tokio::test]
    async fn test_unknown_task_is_skipped() {
        let h = seeded();
        let mv = TaskMove { task_id: "ghost".into(), from_card: "a".into(), to_card: "b".into(), to_index: 0 };

        assert_eq!(commit_move(&h.api, &h.cache, "b1", &mv).await, Ok(MoveOutcome::Skipped));
        assert_eq!(h.backend.request_count(), 0);
    }
}
