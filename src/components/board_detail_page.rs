//! Board Detail Page
//!
//! Lists (cards) side by side with their tasks, board members, invitations,
//! and drag-and-drop of tasks between lists.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{bind_global_listeners, create_dnd_signals, DropResult};

use crate::board::group_by_card;
use crate::components::{BoardColumn, EntryForm, InviteMemberForm, MemberList};
use crate::context::{run_mutation, use_app, use_auth, use_query};
use crate::moves::{self, TaskMove, MOVE_FAILED};
use crate::mutations;
use crate::queries;
use crate::routes::Route;
use crate::services::{BoardArgs, CardArgs};

#[component]
pub fn BoardDetailPage(board_id: String) -> impl IntoView {
    let app = use_app();
    let auth = use_auth();
    let board_id = StoredValue::new(board_id);
    let id = move || board_id.get_value();

    let (editing, set_editing) = signal(false);
    let (adding_list, set_adding_list) = signal(false);
    let (only_mine, set_only_mine) = signal(false);

    let board = use_query(move |api, cache| {
        let id = id();
        async move { queries::board(&api, &cache, &id).await }
    });
    let cards = use_query(move |api, cache| {
        let id = id();
        async move { queries::cards(&api, &cache, &id).await }
    });
    let tasks = use_query(move |api, cache| {
        let id = id();
        async move { queries::board_tasks(&api, &cache, &id).await }
    });
    let members = use_query(move |api, cache| {
        let id = id();
        async move { queries::members(&api, &cache, &id).await }
    });
    let my_cards = use_query(move |api, cache| {
        let (id, user) = (id(), auth.user().map(|u| u.id));
        let wanted = only_mine.get();
        async move {
            match (wanted, user) {
                (true, Some(user)) => queries::user_cards(&api, &cache, &id, &user).await.map(Some),
                _ => Ok(None),
            }
        }
    });

    // Realtime presence for this board, re-announced after every reconnect
    Effect::new(move |_| {
        if app.realtime.connected.get() {
            app.realtime.join_board(&id());
        }
    });
    on_cleanup(move || app.realtime.leave_board(&board_id.get_value()));

    // Drag-and-drop: listeners are removed when this page is disposed
    let dnd = create_dnd_signals();
    let on_drop = move |drop: DropResult| {
        let Some(mv) = TaskMove::from_drop(&drop) else { return };
        let (api, cache, toasts, board) = (app.api(), app.cache(), app.toasts, id());
        spawn_local(async move {
            if let Err(e) = moves::commit_move(&api, &cache, &board, &mv).await {
                if !e.is_unauthorized() {
                    toasts.error(MOVE_FAILED);
                }
            }
        });
    };
    let _listeners = StoredValue::new_local(bind_global_listeners(dnd, on_drop));

    let save_board = move |(name, description): (String, String)| {
        let (api, cache, board) = (app.api(), app.cache(), id());
        let request = async move { mutations::update_board(&api, &cache, &board, &BoardArgs { name, description }).await };
        run_mutation(app.toasts, request, "Board updated", "Failed to update board", move |result| {
            if result.is_ok() {
                set_editing.try_set(false);
            }
        });
    };

    let add_list = move |(name, description): (String, String)| {
        let (api, cache, board) = (app.api(), app.cache(), id());
        let request = async move { mutations::create_card(&api, &cache, &board, &CardArgs { name, description }).await };
        run_mutation(app.toasts, request, "List created", "Failed to create list", move |result| {
            if result.is_ok() {
                set_adding_list.try_set(false);
            }
        });
    };

    let columns = move || {
        let all_cards = cards.with(|q| q.data.clone())?;
        let all_tasks = tasks.with(|q| q.data.clone()).unwrap_or_default();
        let shown = match my_cards.with(|q| q.data.clone().flatten()) {
            Some(mine) => all_cards.into_iter().filter(|c| mine.iter().any(|m| m.id == c.id)).collect(),
            None => all_cards,
        };
        Some(group_by_card(&shown, &all_tasks))
    };

    view! {
        <section class="board-detail-page">
            <header class="page-header">
                <button class="link-btn" on:click=move |_| app.navigate(Route::Boards)>"← Boards"</button>
                {move || match board.with(|q| q.data.clone()) {
                    Some(b) => view! {
                        <div class="board-heading">
                            <h1>{b.name}</h1>
                            <p class="board-description">{b.description}</p>
                        </div>
                    }
                    .into_any(),
                    None if board.with(|q| q.error.is_some()) => {
                        view! { <p class="form-error">"Board not found"</p> }.into_any()
                    }
                    None => view! { <p class="loading">"Loading board..."</p> }.into_any(),
                }}
                <div class="board-actions">
                    <label class="filter-toggle">
                        <input
                            type="checkbox"
                            prop:checked=move || only_mine.get()
                            on:change=move |ev| set_only_mine.set(event_target_checked(&ev))
                        />
                        "Only my lists"
                    </label>
                    <button on:click=move |_| set_editing.set(true)>"Edit board"</button>
                    <button class="primary-btn" on:click=move |_| set_adding_list.set(true)>"Add list"</button>
                </div>
            </header>

            <Show when=move || editing.get()>
                {move || {
                    let current = board.with(|q| q.data.clone());
                    view! {
                        <div class="dialog">
                            <h2>"Edit board"</h2>
                            <EntryForm
                                submit_label="Save"
                                name_placeholder="Board name"
                                initial_name=current.as_ref().map(|b| b.name.clone()).unwrap_or_default()
                                initial_description=current.map(|b| b.description).unwrap_or_default()
                                on_submit=save_board
                                on_cancel=move |_| set_editing.set(false)
                            />
                        </div>
                    }
                }}
            </Show>
            <Show when=move || adding_list.get()>
                <div class="dialog">
                    <h2>"Add a list"</h2>
                    <EntryForm
                        submit_label="Create"
                        name_placeholder="List name"
                        on_submit=add_list
                        on_cancel=move |_| set_adding_list.set(false)
                    />
                </div>
            </Show>

            <aside class="board-sidebar">
                <InviteMemberForm board_id=id() />
                <MemberList board_id=id() members=members />
            </aside>

            <div class="board-columns" class:dragging=move || dnd.dragging.with(|d| d.is_some())>
                {move || match columns() {
                    None => view! { <p class="loading">"Loading lists..."</p> }.into_any(),
                    Some(columns) if columns.is_empty() => {
                        view! { <p class="empty">"No lists yet. Add one to start planning."</p> }.into_any()
                    }
                    Some(columns) => {
                        let board_members = members.with(|q| q.data.clone().unwrap_or_default());
                        columns
                            .into_iter()
                            .map(|column| {
                                view! {
                                    <BoardColumn
                                        board_id=id()
                                        column=column
                                        members=board_members.clone()
                                        dnd=dnd
                                    />
                                }
                            })
                            .collect_view()
                            .into_any()
                    }
                }}
            </div>
        </section>
    }
}
