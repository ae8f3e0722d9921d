//! Realtime Channel
//!
//! Optional WebSocket carrying JSON frames `{"event": ..., "data": ...}`.
//! Inbound events refresh cached queries and raise toasts; the board view
//! announces itself with `join-board` / `leave-board`. The app works the same
//! without it, so connection problems are only logged at debug level.

use futures::channel::mpsc;
use serde::{Deserialize, Serialize};

use crate::models::InvitePayload;
use crate::query::{keys, QueryCache};
use crate::toast::{Toast, ToastAction};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "board-invitation")]
    BoardInvitation(BoardInvitation),
    #[serde(rename = "board-join")]
    BoardJoin(BoardJoin),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoardInvitation {
    #[serde(alias = "inviteId")]
    pub invite_id: String,
    #[serde(rename = "boardId", alias = "board_id")]
    pub board_id: String,
    #[serde(default, alias = "boardName")]
    pub board_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardJoin {
    pub board_id: String,
    pub user_data: JoinedUser,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JoinedUser {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "join-board")]
    JoinBoard(String),
    #[serde(rename = "leave-board")]
    LeaveBoard(String),
}

/// Decode one text frame; unknown or malformed frames are ignored
pub fn parse_frame(text: &str) -> Option<ServerEvent> {
    match serde_json::from_str(text) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring realtime frame");
            None
        }
    }
}

/// Refresh what the event changed and build the toast announcing it
pub fn apply_event(event: &ServerEvent, cache: &QueryCache) -> Toast {
    match event {
        ServerEvent::BoardInvitation(invite) => {
            cache.invalidate(&keys::notifications());
            let description = match &invite.board_name {
                Some(name) => format!("You have been invited to join {name}"),
                None => "You have been invited to join a board".to_string(),
            };
            Toast::info("Board invitation", description).with_action(ToastAction::RespondToInvite(InvitePayload {
                invite_id: invite.invite_id.clone(),
                board_id: invite.board_id.clone(),
                board_name: invite.board_name.clone(),
                inviter_name: None,
            }))
        }
        ServerEvent::BoardJoin(join) => {
            cache.invalidate(&keys::board(&join.board_id));
            cache.invalidate(&keys::members(&join.board_id));
            Toast::info("New member", format!("{} has joined the board", join.user_data.name))
        }
    }
}

/// Socket address for a user
pub fn socket_url(base: &str, user_id: &str) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}userId={}", crate::api::segment(user_id))
}

/// Sending half of an open channel. Dropping every clone closes the socket.
#[derive(Clone)]
pub struct RealtimeChannel {
    outbound: mpsc::UnboundedSender<ClientEvent>,
}

impl RealtimeChannel {
    pub fn join_board(&self, board_id: &str) {
        self.emit(ClientEvent::JoinBoard(board_id.to_string()));
    }

    pub fn leave_board(&self, board_id: &str) {
        self.emit(ClientEvent::LeaveBoard(board_id.to_string()));
    }

    fn emit(&self, event: ClientEvent) {
        if self.outbound.unbounded_send(event).is_err() {
            tracing::debug!("realtime channel closed, event dropped");
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use socket::connect;

#[cfg(target_arch = "wasm32")]
mod socket {
    use futures::channel::mpsc;
    use futures::{SinkExt, StreamExt};
    use gloo_net::websocket::futures::WebSocket;
    use gloo_net::websocket::Message;
    use leptos::task::spawn_local;

    use super::{parse_frame, socket_url, ClientEvent, RealtimeChannel, ServerEvent};

    /// Open the socket and pump it until it closes.
    ///
    /// `on_status` reports `true` once opened and `false` when the connection ends.
    pub fn connect(
        base_url: &str,
        user_id: &str,
        on_event: impl Fn(ServerEvent) + 'static,
        on_status: impl Fn(bool) + 'static,
    ) -> Option<RealtimeChannel> {
        let url = socket_url(base_url, user_id);
        let ws = match WebSocket::open(&url) {
            Ok(ws) => ws,
            Err(e) => {
                tracing::debug!(url, error = %e, "realtime unavailable");
                return None;
            }
        };
        on_status(true);
        let (mut write, mut read) = ws.split();
        let (outbound, mut queued) = mpsc::unbounded::<ClientEvent>();

        spawn_local(async move {
            while let Some(event) = queued.next().await {
                let Ok(text) = serde_json::to_string(&event) else { continue };
                if let Err(e) = write.send(Message::Text(text)).await {
                    tracing::debug!(error = %e, "realtime send failed");
                    break;
                }
            }
            let _ = write.close().await;
        });

        spawn_local(async move {
            while let Some(frame) = read.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        if let Some(event) = parse_frame(&text) {
                            on_event(event);
                        }
                    }
                    Ok(Message::Bytes(_)) => {}
                    Err(e) => {
                        tracing::debug!(error = %e, "realtime connection dropped");
                        break;
                    }
                }
            }
            on_status(false);
        });

        Some(RealtimeChannel { outbound })
    }
}

/// No socket outside the browser
#[cfg(not(target_arch = "wasm32"))]
pub fn connect(
    _base_url: &str,
    _user_id: &str,
    _on_event: impl Fn(ServerEvent) + 'static,
    _on_status: impl Fn(bool) + 'static,
) -> Option<RealtimeChannel> {
    tracing::debug!("realtime needs a browser WebSocket");
    None
}
