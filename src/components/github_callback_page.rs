//! GitHub Callback Page
//!
//! Landing page after GitHub authorization; trades the code for a session.

use leptos::prelude::*;

use crate::context::{use_app, use_auth};
use crate::routes::Route;

#[component]
pub fn GitHubCallbackPage(code: String) -> impl IntoView {
    let app = use_app();
    let auth = use_auth();
    let missing_code = code.is_empty();
    let code = StoredValue::new(code);
    Effect::new(move |_| {
        if !missing_code {
            auth.complete_github_sign_in(code.get_value());
        }
    });

    view! {
        <section class="auth-page">
            <h1>"Signing in with GitHub"</h1>
            {move || {
                let message = auth.error().or_else(|| missing_code.then(|| "GitHub did not return a code".to_string()));
                match message {
                    Some(message) => view! {
                        <p class="form-error">{message}</p>
                        <button class="primary-btn" on:click=move |_| app.navigate(Route::SignIn)>"Back to sign in"</button>
                    }
                    .into_any(),
                    None => view! { <p class="loading">"Just a moment..."</p> }.into_any(),
                }
            }}
        </section>
    }
}
