//! Sign Up Page

use leptos::prelude::*;

use crate::components::CodeForm;
use crate::context::{use_app, use_auth};
use crate::routes::{Route, SIGN_IN_PATH};
use crate::services::SignUpDetails;

#[component]
pub fn SignUpPage() -> impl IntoView {
    let app = use_app();
    let auth = use_auth();
    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());

    let request_code = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let details = SignUpDetails {
            email: email.get().trim().to_string(),
            name: name.get().trim().to_string(),
            avatar: None,
        };
        if details.email.is_empty() || details.name.is_empty() {
            return;
        }
        auth.sign_up(details);
    };

    view! {
        <section class="auth-page">
            <h1>"Create an account"</h1>
            <Show
                when=move || auth.code_email().is_some()
                fallback=move || view! {
                    <form class="auth-form" on:submit=request_code>
                        <input
                            type="text"
                            placeholder="Your name"
                            prop:value=move || name.get()
                            on:input=move |ev| set_name.set(event_target_value(&ev))
                        />
                        <input
                            type="email"
                            placeholder="you@example.com"
                            prop:value=move || email.get()
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                        />
                        <button type="submit" disabled=move || auth.pending()>
                            {move || if auth.pending() { "Sending..." } else { "Sign up" }}
                        </button>
                    </form>
                }
            >
                <CodeForm />
            </Show>
            {move || auth.error().map(|e| view! { <p class="form-error">{e}</p> })}
            <p class="auth-switch">
                "Already have an account? "
                <a
                    href=SIGN_IN_PATH
                    on:click=move |ev| {
                        ev.prevent_default();
                        auth.restart();
                        app.navigate(Route::SignIn);
                    }
                >
                    "Sign in"
                </a>
            </p>
        </section>
    }
}
