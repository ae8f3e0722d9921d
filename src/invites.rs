//! Board invitations: sending them and answering them.

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{InvitePayload, NotificationKind};
use crate::queries;
use crate::query::{keys, QueryCache};
use crate::services::{self, InviteResponse};

pub const INVITE_SENT: &str = "Invitation sent successfully";
pub const INVITE_FAILED: &str = "Failed to send invitation";

/// Invite `email` to a board owned by `owner_id`.
///
/// The email is trimmed and must not be empty; its format is left to the
/// backend.
pub async fn send_invite(
    api: &ApiClient,
    cache: &QueryCache,
    board_id: &str,
    owner_id: &str,
    email: &str,
) -> Result<(), ApiError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ApiError::Validation("Email is required".to_string()));
    }
    services::invite_member(api, board_id, owner_id, email).await?;
    tracing::info!(board = %board_id, "invitation sent");
    cache.invalidate(&keys::board(board_id));
    Ok(())
}

/// Accept or decline an invitation.
///
/// The originating notification, when there is one, is marked read whatever
/// the answer and whether or not the answer went through.
pub async fn respond_to_invite(
    api: &ApiClient,
    cache: &QueryCache,
    invite: &InvitePayload,
    notification_id: Option<&str>,
    response: InviteResponse,
) -> Result<(), ApiError> {
    let result = services::respond_to_invite(api, &invite.board_id, &invite.invite_id, response).await;
    if let Err(e) = &result {
        tracing::warn!(invite = %invite.invite_id, error = %e, "invite response failed");
    }

    if let Some(id) = notification_id {
        if let Err(e) = services::mark_notification_read(api, id).await {
            tracing::warn!(notification = %id, error = %e, "could not mark notification read");
        }
    }
    cache.invalidate(&keys::notifications());

    if result.is_ok() && response == InviteResponse::Accepted {
        cache.invalidate(&keys::boards());
    }
    result
}

/// Answer an invitation pushed over the realtime channel.
///
/// The push carries no notification id, so the matching board-invite
/// notification is looked up first (fetched when not cached) and marked read
/// along with the answer.
pub async fn respond_to_pushed_invite(
    api: &ApiClient,
    cache: &QueryCache,
    invite: &InvitePayload,
    response: InviteResponse,
) -> Result<(), ApiError> {
    let notification_id = match queries::notifications(api, cache).await {
        Ok(list) => list
            .into_iter()
            .find(|n| n.kind == NotificationKind::BoardInvite && n.payload.invite_id == invite.invite_id)
            .map(|n| n.id),
        Err(e) => {
            tracing::warn!(invite = %invite.invite_id, error = %e, "could not look up invite notification");
            None
        }
    };
    respond_to_invite(api, cache, invite, notification_id.as_deref(), response).await
}
