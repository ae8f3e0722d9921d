//! Navigation Bar Component

use leptos::prelude::*;

use crate::components::NotificationBell;
use crate::context::{use_app, use_auth};
use crate::routes::{Route, BOARDS_PATH};

#[component]
pub fn Navigation() -> impl IntoView {
    let app = use_app();
    let auth = use_auth();
    let user_name = move || auth.user().map(|u| u.name).unwrap_or_default();
    let live = app.realtime.connected;

    view! {
        <nav class="navigation">
            <a
                class="brand"
                href=BOARDS_PATH
                on:click=move |ev| {
                    ev.prevent_default();
                    app.navigate(Route::Boards);
                }
            >
                "Taskboard"
            </a>
            <Show when=move || auth.is_authenticated()>
                <div class="nav-actions">
                    <span
                        class=move || if live.get() { "live-dot online" } else { "live-dot" }
                        title=move || if live.get() { "Live updates on" } else { "Live updates off" }
                    ></span>
                    <NotificationBell />
                    <span class="user-name">{user_name}</span>
                    <button class="sign-out-btn" on:click=move |_| auth.sign_out()>"Sign out"</button>
                </div>
            </Show>
        </nav>
    }
}
