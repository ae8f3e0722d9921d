//! Toast Notifications
//!
//! Short-lived messages shown in a corner of the screen. Each toast is
//! dismissed automatically after the configured lifetime.

use leptos::prelude::*;

use crate::error::ApiError;
use crate::models::InvitePayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Default,
    Destructive,
}

/// Buttons attached to a toast
#[derive(Debug, Clone, PartialEq)]
pub enum ToastAction {
    /// Accept / Decline an invitation received in real time
    RespondToInvite(InvitePayload),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
    pub action: Option<ToastAction>,
}

impl Toast {
    pub fn success(description: impl Into<String>) -> Self {
        Self::new("Success", description, ToastVariant::Default)
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self::new("Error", description, ToastVariant::Destructive)
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, ToastVariant::Default)
    }

    pub fn with_action(mut self, action: ToastAction) -> Self {
        self.action = Some(action);
        self
    }

    fn new(title: impl Into<String>, description: impl Into<String>, variant: ToastVariant) -> Self {
        Self { id: 0, title: title.into(), description: description.into(), variant, action: None }
    }
}

/// Toasts currently on screen, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastQueue {
    next_id: u64,
    items: Vec<Toast>,
}

impl ToastQueue {
    /// Returns the id assigned to the toast
    pub fn push(&mut self, mut toast: Toast) -> u64 {
        self.next_id += 1;
        toast.id = self.next_id;
        self.items.push(toast);
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|t| t.id != id);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }
}

/// Reactive handle to the toast queue
#[derive(Clone, Copy)]
pub struct Toasts {
    queue: RwSignal<ToastQueue>,
    lifetime_ms: u32,
}

impl Toasts {
    pub fn new(lifetime_ms: u32) -> Self {
        Self { queue: RwSignal::new(ToastQueue::default()), lifetime_ms }
    }

    pub fn show(&self, toast: Toast) {
        let Some(id) = self.queue.try_update(|q| q.push(toast)) else { return };
        self.schedule_dismiss(id);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(Toast::success(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(Toast::error(message));
    }

    /// Success toast on `Ok`, `failure` on `Err`
    pub fn report<T>(&self, result: &Result<T, ApiError>, success: &str, failure: &str) {
        match result {
            Ok(_) => self.success(success),
            // the sign-in redirect already tells the story
            Err(ApiError::Unauthorized) => {}
            Err(_) => self.error(failure),
        }
    }

    pub fn dismiss(&self, id: u64) {
        self.queue.try_update(|q| q.dismiss(id));
    }

    pub fn items(&self) -> Vec<Toast> {
        self.queue.with(|q| q.items().to_vec())
    }

    #[cfg(target_arch = "wasm32")]
    fn schedule_dismiss(&self, id: u64) {
        let toasts = *self;
        leptos::task::spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(toasts.lifetime_ms).await;
            toasts.dismiss(id);
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn schedule_dismiss(&self, _id: u64) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_assigns_ids_and_dismisses() {
        let mut queue = ToastQueue::default();
        let first = queue.push(Toast::success("Invitation sent successfully"));
        let second = queue.push(Toast::error("Failed to move task"));
        assert_ne!(first, second);

        queue.dismiss(first);

        assert_eq!(queue.items().len(), 1);
        assert_eq!(queue.items()[0].variant, ToastVariant::Destructive);
        assert_eq!(queue.items()[0].description, "Failed to move task");
    }

    #[test]
    fn test_action_is_attached() {
        let invite = InvitePayload { invite_id: "i1".into(), board_id: "b1".into(), board_name: None, inviter_name: None };
        let toast = Toast::info("Board invitation", "You were invited").with_action(ToastAction::RespondToInvite(invite.clone()));
        assert_eq!(toast.action, Some(ToastAction::RespondToInvite(invite)));
    }
}
