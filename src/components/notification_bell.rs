//! Notification Bell Component
//!
//! Unread count plus a dropdown of notifications; unread board invites can
//! be answered in place.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::toaster::{response_message, RESPOND_FAILED};
use crate::context::{use_app, use_query};
use crate::invites;
use crate::models::Notification;
use crate::queries;
use crate::services::InviteResponse;

#[component]
pub fn NotificationBell() -> impl IntoView {
    let (open, set_open) = signal(false);
    let notifications = use_query(|api, cache| async move { queries::notifications(&api, &cache).await });

    let unread = move || {
        notifications.with(|q| q.data.as_ref().map_or(0, |list| list.iter().filter(|n| !n.read).count()))
    };

    view! {
        <div class="notification-bell">
            <button class="bell-btn" title="Notifications" on:click=move |_| set_open.update(|o| *o = !*o)>
                "🔔"
                <Show when=move || { unread() > 0 }>
                    <span class="badge">{unread}</span>
                </Show>
            </button>
            <Show when=move || open.get()>
                <div class="notification-panel">
                    {move || {
                        let list = notifications.with(|q| q.data.clone().unwrap_or_default());
                        if list.is_empty() {
                            view! { <p class="empty">"No notifications"</p> }.into_any()
                        } else {
                            list.into_iter()
                                .map(|n| view! { <NotificationRow notification=n /> })
                                .collect_view()
                                .into_any()
                        }
                    }}
                </div>
            </Show>
        </div>
    }
}

#[component]
fn NotificationRow(notification: Notification) -> impl IntoView {
    let app = use_app();
    let awaits_response = notification.awaits_response();
    let class = if notification.read { "notification read" } else { "notification" };
    let created = notification.created_at.format("%b %-d, %H:%M").to_string();
    let (title, message) = (notification.title.clone(), notification.message.clone());
    let notification = StoredValue::new(notification);

    let respond = move |response: InviteResponse| {
        let (api, cache, toasts) = (app.api(), app.cache(), app.toasts);
        let notification = notification.get_value();
        spawn_local(async move {
            let result =
                invites::respond_to_invite(&api, &cache, &notification.payload, Some(&notification.id), response)
                    .await;
            toasts.report(&result, response_message(response), RESPOND_FAILED);
        });
    };

    view! {
        <div class=class>
            <strong>{title}</strong>
            <p>{message}</p>
            <time>{created}</time>
            <Show when=move || awaits_response>
                <div class="notification-actions">
                    <button class="accept-btn" on:click=move |_| respond(InviteResponse::Accepted)>"Accept"</button>
                    <button class="decline-btn" on:click=move |_| respond(InviteResponse::Declined)>"Decline"</button>
                </div>
            </Show>
        </div>
    }
}
