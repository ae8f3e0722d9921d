//! Toaster Component
//!
//! Renders the toast queue; invitation toasts carry Accept/Decline buttons.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_app;
use crate::invites;
use crate::models::InvitePayload;
use crate::services::InviteResponse;
use crate::toast::{Toast, ToastAction, ToastVariant};

pub const RESPOND_FAILED: &str = "Failed to respond to invitation";

pub fn response_message(response: InviteResponse) -> &'static str {
    match response {
        InviteResponse::Accepted => "Invitation accepted",
        InviteResponse::Declined => "Invitation declined",
    }
}

#[component]
pub fn Toaster() -> impl IntoView {
    let app = use_app();
    let toasts = app.toasts;

    view! {
        <div class="toaster">
            <For
                each=move || toasts.items()
                key=|toast| toast.id
                children=move |toast: Toast| view! { <ToastItem toast=toast /> }
            />
        </div>
    }
}

#[component]
fn ToastItem(toast: Toast) -> impl IntoView {
    let app = use_app();
    let id = toast.id;
    let class = match toast.variant {
        ToastVariant::Default => "toast",
        ToastVariant::Destructive => "toast destructive",
    };
    let actions = toast.action.map(|action| match action {
        ToastAction::RespondToInvite(invite) => view! { <InviteActions toast_id=id invite=invite /> },
    });

    view! {
        <div class=class role="status">
            <div class="toast-body">
                <strong class="toast-title">{toast.title}</strong>
                <p class="toast-description">{toast.description}</p>
            </div>
            {actions}
            <button class="toast-close" on:click=move |_| app.toasts.dismiss(id)>"×"</button>
        </div>
    }
}

#[component]
fn InviteActions(toast_id: u64, invite: InvitePayload) -> impl IntoView {
    let app = use_app();
    let invite = StoredValue::new(invite);

    let respond = move |response: InviteResponse| {
        let (api, cache, toasts) = (app.api(), app.cache(), app.toasts);
        let invite = invite.get_value();
        toasts.dismiss(toast_id);
        spawn_local(async move {
            let result = invites::respond_to_pushed_invite(&api, &cache, &invite, response).await;
            toasts.report(&result, response_message(response), RESPOND_FAILED);
        });
    };

    view! {
        <div class="toast-actions">
            <button class="accept-btn" on:click=move |_| respond(InviteResponse::Accepted)>"Accept"</button>
            <button class="decline-btn" on:click=move |_| respond(InviteResponse::Declined)>"Decline"</button>
        </div>
    }
}
