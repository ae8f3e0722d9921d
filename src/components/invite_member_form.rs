//! Invite Member Form Component

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::{use_app, use_auth};
use crate::invites::{self, INVITE_FAILED, INVITE_SENT};

/// Invites an email address to the board on behalf of the signed-in user
#[component]
pub fn InviteMemberForm(board_id: String) -> impl IntoView {
    let app = use_app();
    let auth = use_auth();
    let (email, set_email) = signal(String::new());
    let (sending, set_sending) = signal(false);
    let board_id = StoredValue::new(board_id);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(owner) = auth.user() else { return };
        let (api, cache, toasts) = (app.api(), app.cache(), app.toasts);
        let (board, address) = (board_id.get_value(), email.get());
        set_sending.set(true);
        spawn_local(async move {
            let result = invites::send_invite(&api, &cache, &board, &owner.id, &address).await;
            toasts.report(&result, INVITE_SENT, INVITE_FAILED);
            if result.is_ok() {
                set_email.try_set(String::new());
            }
            set_sending.try_set(false);
        });
    };

    view! {
        <form class="invite-form" on:submit=submit>
            <h3>"Invite a member"</h3>
            <input
                type="email"
                placeholder="colleague@example.com"
                prop:value=move || email.get()
                on:input=move |ev| set_email.set(event_target_value(&ev))
            />
            <button type="submit" disabled=move || sending.get() || email.get().trim().is_empty()>
                {move || if sending.get() { "Sending..." } else { "Send invite" }}
            </button>
        </form>
    }
}
