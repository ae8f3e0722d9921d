//! Sign In Page
//!
//! Email first, then the one-time code.

use leptos::prelude::*;

use crate::components::CodeForm;
use crate::context::{use_app, use_auth};
use crate::routes::{Route, SIGN_UP_PATH};

#[component]
pub fn SignInPage() -> impl IntoView {
    let app = use_app();
    let auth = use_auth();
    let (email, set_email) = signal(String::new());

    let request_code = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let address = email.get().trim().to_string();
        if address.is_empty() {
            return;
        }
        auth.sign_in(address);
    };

    view! {
        <section class="auth-page">
            <h1>"Sign in"</h1>
            <Show
                when=move || auth.code_email().is_some()
                fallback=move || view! {
                    <form class="auth-form" on:submit=request_code>
                        <input
                            type="email"
                            placeholder="you@example.com"
                            prop:value=move || email.get()
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                        />
                        <button type="submit" disabled=move || auth.pending()>
                            {move || if auth.pending() { "Sending..." } else { "Send code" }}
                        </button>
                    </form>
                }
            >
                <CodeForm />
            </Show>
            <div class="auth-divider">"or"</div>
            <button class="github-btn" disabled=move || auth.pending() on:click=move |_| auth.github_sign_in()>
                "Continue with GitHub"
            </button>
            {move || auth.error().map(|e| view! { <p class="form-error">{e}</p> })}
            <p class="auth-switch">
                "No account yet? "
                <a
                    href=SIGN_UP_PATH
                    on:click=move |ev| {
                        ev.prevent_default();
                        auth.restart();
                        app.navigate(Route::SignUp);
                    }
                >
                    "Sign up"
                </a>
            </p>
        </section>
    }
}
