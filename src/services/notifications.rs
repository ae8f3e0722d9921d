//! Notification Services

use crate::api::{segment, ApiClient};
use crate::error::ApiError;
use crate::models::Notification;

pub async fn list_notifications(api: &ApiClient) -> Result<Vec<Notification>, ApiError> {
    api.get("/notifications").await
}

pub async fn mark_notification_read(api: &ApiClient, notification_id: &str) -> Result<(), ApiError> {
    api.put_empty(&format!("/notifications/{}/read", segment(notification_id))).await
}
