//! Task Services

use serde::Serialize;

use crate::api::{segment, ApiClient};
use crate::error::ApiError;
use crate::models::{Assignment, GitHubAttachment, GitHubItemKind, Task, TaskStatus};

// ========================
// Argument Structs
// ========================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    /// Set to move the task to another card
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_card_id: Option<String>,
}

impl TaskUpdate {
    /// Update carrying the task's current fields unchanged
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            new_card_id: None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignArgs<'a> {
    member_id: &'a str,
}

/// Reference to a GitHub item: `number` for pull requests and issues,
/// `sha` for commits
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GitHubItemRef {
    #[serde(rename = "type")]
    pub kind: GitHubItemKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

impl GitHubItemRef {
    pub fn pull_request(number: impl Into<String>) -> Self {
        Self { kind: GitHubItemKind::PullRequest, number: Some(number.into()), sha: None }
    }

    pub fn issue(number: impl Into<String>) -> Self {
        Self { kind: GitHubItemKind::Issue, number: Some(number.into()), sha: None }
    }

    pub fn commit(sha: impl Into<String>) -> Self {
        Self { kind: GitHubItemKind::Commit, number: None, sha: Some(sha.into()) }
    }
}

fn tasks_path(board_id: &str, card_id: &str) -> String {
    format!("/boards/{}/cards/{}/tasks", segment(board_id), segment(card_id))
}

fn task_path(board_id: &str, card_id: &str, task_id: &str) -> String {
    format!("{}/{}", tasks_path(board_id, card_id), segment(task_id))
}

// ========================
// Services
// ========================

pub async fn list_tasks(api: &ApiClient, board_id: &str, card_id: &str) -> Result<Vec<Task>, ApiError> {
    api.get(&tasks_path(board_id, card_id)).await
}

pub async fn get_task(api: &ApiClient, board_id: &str, card_id: &str, task_id: &str) -> Result<Task, ApiError> {
    api.get(&task_path(board_id, card_id, task_id)).await
}

pub async fn create_task(api: &ApiClient, board_id: &str, card_id: &str, task: &NewTask) -> Result<Task, ApiError> {
    api.post(&tasks_path(board_id, card_id), task).await
}

/// `card_id` is the card the task currently lives in
pub async fn update_task(
    api: &ApiClient,
    board_id: &str,
    card_id: &str,
    update: &TaskUpdate,
) -> Result<Task, ApiError> {
    api.put(&task_path(board_id, card_id, &update.id), update).await
}

pub async fn delete_task(api: &ApiClient, board_id: &str, card_id: &str, task_id: &str) -> Result<(), ApiError> {
    api.delete(&task_path(board_id, card_id, task_id)).await
}

pub async fn list_assignments(
    api: &ApiClient,
    board_id: &str,
    card_id: &str,
    task_id: &str,
) -> Result<Vec<Assignment>, ApiError> {
    api.get(&format!("{}/assign", task_path(board_id, card_id, task_id))).await
}

pub async fn assign_member(
    api: &ApiClient,
    board_id: &str,
    card_id: &str,
    task_id: &str,
    member_id: &str,
) -> Result<Assignment, ApiError> {
    let path = format!("{}/assign", task_path(board_id, card_id, task_id));
    api.post(&path, &AssignArgs { member_id }).await
}

pub async fn unassign_member(
    api: &ApiClient,
    board_id: &str,
    card_id: &str,
    task_id: &str,
    member_id: &str,
) -> Result<(), ApiError> {
    let path = format!("{}/assign/{}", task_path(board_id, card_id, task_id), segment(member_id));
    api.delete(&path).await
}

// ========================
// GitHub Attachments
// ========================

pub async fn attach_github_item(
    api: &ApiClient,
    board_id: &str,
    card_id: &str,
    task_id: &str,
    item: &GitHubItemRef,
) -> Result<GitHubAttachment, ApiError> {
    api.post(&format!("{}/github-attach", task_path(board_id, card_id, task_id)), item).await
}

pub async fn list_github_attachments(
    api: &ApiClient,
    board_id: &str,
    card_id: &str,
    task_id: &str,
) -> Result<Vec<GitHubAttachment>, ApiError> {
    api.get(&format!("{}/github-attachments", task_path(board_id, card_id, task_id))).await
}

pub async fn remove_github_attachment(
    api: &ApiClient,
    board_id: &str,
    card_id: &str,
    task_id: &str,
    attachment_id: &str,
) -> Result<(), ApiError> {
    let path = format!("{}/github-attachments/{}", task_path(board_id, card_id, task_id), segment(attachment_id));
    api.delete(&path).await
}
