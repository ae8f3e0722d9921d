//! Code Form Component
//!
//! Second step of sign-in and sign-up: enter the emailed one-time code.

use leptos::prelude::*;

use crate::context::use_auth;

#[component]
pub fn CodeForm() -> impl IntoView {
    let auth = use_auth();
    let (code, set_code) = signal(String::new());

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(email) = auth.code_email() else { return };
        let entered = code.get().trim().to_string();
        if entered.is_empty() {
            return;
        }
        auth.verify(email, entered);
    };

    view! {
        <form class="auth-form" on:submit=submit>
            <p class="auth-hint">
                "We sent a verification code to " <strong>{move || auth.code_email().unwrap_or_default()}</strong>
            </p>
            <input
                type="text"
                inputmode="numeric"
                autocomplete="one-time-code"
                placeholder="Verification code"
                prop:value=move || code.get()
                on:input=move |ev| set_code.set(event_target_value(&ev))
            />
            <button type="submit" disabled=move || auth.pending()>
                {move || if auth.pending() { "Verifying..." } else { "Verify" }}
            </button>
            <button type="button" class="link-btn" on:click=move |_| auth.restart()>
                "Use a different email"
            </button>
        </form>
    }
}
