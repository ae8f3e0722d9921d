//! Taskboard App
//!
//! Root component: provides the shared contexts, guards private routes and
//! keeps the realtime channel open for the signed-in user.

use leptos::prelude::*;

use crate::components::{
    BoardDetailPage, BoardListPage, GitHubCallbackPage, Navigation, SignInPage, SignUpPage, Toaster,
};
use crate::context::{AppContext, AuthContext, Services};
use crate::realtime;
use crate::routes::{Route, Router};

#[component]
pub fn App(services: Services) -> impl IntoView {
    let router = Router::from_location();
    let app = AppContext::new(services, router);
    let auth = AuthContext::new(app);
    provide_context(app);
    provide_context(auth);

    // Private routes bounce to sign-in
    let authenticated = Memo::new(move |_| auth.is_authenticated());
    Effect::new(move |_| {
        let requested = router.route();
        let allowed = requested.clone().guard(authenticated.get());
        if allowed != requested {
            tracing::debug!(from = %requested.path(), "redirecting to sign-in");
            router.replace(allowed);
        }
    });

    // One realtime connection per signed-in user
    let user_id = Memo::new(move |_| auth.user().map(|u| u.id));
    Effect::new(move |_| {
        let Some(user) = user_id.get() else {
            app.realtime.replace(None);
            return;
        };
        let (cache, toasts, connected) = (app.cache(), app.toasts, app.realtime.connected);
        let channel = realtime::connect(
            &app.config().realtime_url,
            &user,
            move |event| toasts.show(realtime::apply_event(&event, &cache)),
            move |open| {
                connected.try_set(open);
            },
        );
        app.realtime.replace(channel);
    });

    let page = move || match router.route().guard(authenticated.get()) {
        Route::SignIn => view! { <SignInPage /> }.into_any(),
        Route::SignUp => view! { <SignUpPage /> }.into_any(),
        Route::Boards => view! { <BoardListPage /> }.into_any(),
        Route::Board(id) => view! { <BoardDetailPage board_id=id /> }.into_any(),
        Route::GitHubCallback(code) => view! { <GitHubCallbackPage code=code /> }.into_any(),
        Route::NotFound => view! {
            <section class="not-found">
                <h1>"Page not found"</h1>
                <button class="primary-btn" on:click=move |_| app.navigate(Route::Boards)>"Back to boards"</button>
            </section>
        }
        .into_any(),
    };

    view! {
        <div class="app-layout">
            <Navigation />
            <main class="main-content">{page}</main>
            <Toaster />
        </div>
    }
}
