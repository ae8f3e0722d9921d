//! Board List Page
//!
//! The signed-in user's boards, with a dialog for creating new ones.

use leptos::prelude::*;

use crate::components::{DeleteConfirmButton, EntryForm};
use crate::context::{run_mutation, use_app, use_query};
use crate::models::Board;
use crate::mutations;
use crate::queries;
use crate::routes::Route;
use crate::services::BoardArgs;

#[component]
pub fn BoardListPage() -> impl IntoView {
    let app = use_app();
    let (creating, set_creating) = signal(false);
    let boards = use_query(|api, cache| async move { queries::boards(&api, &cache).await });

    let create = move |(name, description): (String, String)| {
        let (api, cache) = (app.api(), app.cache());
        let request = async move { mutations::create_board(&api, &cache, &BoardArgs { name, description }).await };
        run_mutation(app.toasts, request, "Board created successfully", "Failed to create board", move |result| {
            if result.is_ok() {
                set_creating.try_set(false);
            }
        });
    };

    view! {
        <section class="board-list-page">
            <header class="page-header">
                <h1>"My Boards"</h1>
                <button class="primary-btn" on:click=move |_| set_creating.set(true)>"Create board"</button>
            </header>
            <Show when=move || creating.get()>
                <div class="dialog">
                    <h2>"Create a new board"</h2>
                    <EntryForm
                        submit_label="Create"
                        name_placeholder="Board name"
                        on_submit=create
                        on_cancel=move |_| set_creating.set(false)
                    />
                </div>
            </Show>
            {move || {
                let state = boards.get();
                match (state.data, state.error) {
                    (None, Some(_)) => view! { <p class="form-error">"Could not load boards"</p> }.into_any(),
                    (None, None) => view! { <p class="loading">"Loading boards..."</p> }.into_any(),
                    (Some(list), _) if list.is_empty() => {
                        view! { <p class="empty">"No boards yet. Create one to get started."</p> }.into_any()
                    }
                    (Some(list), _) => view! {
                        <div class="board-grid">
                            {list.into_iter().map(|board| view! { <BoardTile board=board /> }).collect_view()}
                        </div>
                    }
                    .into_any(),
                }
            }}
        </section>
    }
}

#[component]
fn BoardTile(board: Board) -> impl IntoView {
    let app = use_app();
    let open_id = board.id.clone();
    let delete_id = board.id.clone();
    let member_count = board.members.len();

    let delete = move |_| {
        let (api, cache, id) = (app.api(), app.cache(), delete_id.clone());
        let request = async move { mutations::delete_board(&api, &cache, &id).await };
        run_mutation(app.toasts, request, "Board deleted", "Failed to delete board", |_| {});
    };

    view! {
        <article class="board-tile" on:click=move |_| app.navigate(Route::Board(open_id.clone()))>
            <header>
                <h2>{board.name}</h2>
                <DeleteConfirmButton button_class="delete-btn" title="Delete board" on_confirm=delete />
            </header>
            <p class="board-description">{board.description}</p>
            <span class="member-count">
                {match member_count {
                    1 => "1 member".to_string(),
                    n => format!("{n} members"),
                }}
            </span>
        </article>
    }
}
