//! Mutation Handlers
//!
//! Each call goes through the service layer and, on success, marks stale
//! every cached query whose data it changed.

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{Assignment, Board, Card, Member, Task};
use crate::query::{keys, QueryCache};
use crate::services::{self, BoardArgs, CardArgs, MemberUpdate, NewMember, NewTask, TaskUpdate};

// ========================
// Boards
// ========================

pub async fn create_board(api: &ApiClient, cache: &QueryCache, args: &BoardArgs) -> Result<Board, ApiError> {
    let board = services::create_board(api, args).await?;
    tracing::info!(board = %board.id, "board created");
    cache.invalidate(&keys::boards());
    Ok(board)
}

pub async fn update_board(
    api: &ApiClient,
    cache: &QueryCache,
    board_id: &str,
    args: &BoardArgs,
) -> Result<Board, ApiError> {
    let board = services::update_board(api, board_id, args).await?;
    cache.invalidate(&keys::boards());
    cache.invalidate(&keys::board(board_id));
    Ok(board)
}

pub async fn delete_board(api: &ApiClient, cache: &QueryCache, board_id: &str) -> Result<(), ApiError> {
    services::delete_board(api, board_id).await?;
    tracing::info!(board = %board_id, "board deleted");
    cache.invalidate(&keys::boards());
    Ok(())
}

// ========================
// Cards
// ========================

pub async fn create_card(
    api: &ApiClient,
    cache: &QueryCache,
    board_id: &str,
    args: &CardArgs,
) -> Result<Card, ApiError> {
    let card = services::create_card(api, board_id, args).await?;
    cache.invalidate(&keys::cards(board_id));
    Ok(card)
}

pub async fn update_card(
    api: &ApiClient,
    cache: &QueryCache,
    board_id: &str,
    card_id: &str,
    args: &CardArgs,
) -> Result<Card, ApiError> {
    let card = services::update_card(api, board_id, card_id, args).await?;
    cache.invalidate(&keys::cards(board_id));
    Ok(card)
}

/// Also drops the card's tasks from view
pub async fn delete_card(api: &ApiClient, cache: &QueryCache, board_id: &str, card_id: &str) -> Result<(), ApiError> {
    services::delete_card(api, board_id, card_id).await?;
    cache.invalidate(&keys::cards(board_id));
    cache.invalidate(&keys::tasks(board_id));
    Ok(())
}

// ========================
// Tasks
// ========================

pub async fn create_task(
    api: &ApiClient,
    cache: &QueryCache,
    board_id: &str,
    card_id: &str,
    task: &NewTask,
) -> Result<Task, ApiError> {
    let created = services::create_task(api, board_id, card_id, task).await?;
    cache.invalidate(&keys::tasks(board_id));
    Ok(created)
}

pub async fn update_task(
    api: &ApiClient,
    cache: &QueryCache,
    board_id: &str,
    card_id: &str,
    update: &TaskUpdate,
) -> Result<Task, ApiError> {
    let task = services::update_task(api, board_id, card_id, update).await?;
    cache.invalidate(&keys::tasks(board_id));
    Ok(task)
}

pub async fn delete_task(
    api: &ApiClient,
    cache: &QueryCache,
    board_id: &str,
    card_id: &str,
    task_id: &str,
) -> Result<(), ApiError> {
    services::delete_task(api, board_id, card_id, task_id).await?;
    cache.invalidate(&keys::tasks(board_id));
    Ok(())
}

pub async fn assign_member(
    api: &ApiClient,
    cache: &QueryCache,
    task: &Task,
    board_id: &str,
    member_id: &str,
) -> Result<Assignment, ApiError> {
    let assignment = services::assign_member(api, board_id, &task.card_id, &task.id, member_id).await?;
    cache.invalidate(&keys::tasks(board_id));
    Ok(assignment)
}

pub async fn unassign_member(
    api: &ApiClient,
    cache: &QueryCache,
    task: &Task,
    board_id: &str,
    member_id: &str,
) -> Result<(), ApiError> {
    services::unassign_member(api, board_id, &task.card_id, &task.id, member_id).await?;
    cache.invalidate(&keys::tasks(board_id));
    Ok(())
}

// ========================
// Members
// ========================

pub async fn add_member(
    api: &ApiClient,
    cache: &QueryCache,
    board_id: &str,
    member: &NewMember,
) -> Result<Member, ApiError> {
    let added = services::add_member(api, board_id, member).await?;
    invalidate_membership(cache, board_id);
    Ok(added)
}

pub async fn update_member(
    api: &ApiClient,
    cache: &QueryCache,
    board_id: &str,
    member_id: &str,
    update: &MemberUpdate,
) -> Result<Member, ApiError> {
    let member = services::update_member(api, board_id, member_id, update).await?;
    invalidate_membership(cache, board_id);
    Ok(member)
}

pub async fn remove_member(
    api: &ApiClient,
    cache: &QueryCache,
    board_id: &str,
    member_id: &str,
) -> Result<(), ApiError> {
    services::remove_member(api, board_id, member_id).await?;
    invalidate_membership(cache, board_id);
    Ok(())
}

fn invalidate_membership(cache: &QueryCache, board_id: &str) {
    cache.invalidate(&keys::members(board_id));
    cache.invalidate(&keys::board(board_id));
}
