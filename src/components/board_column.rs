//! Board Column Component
//!
//! One list of a board: its header, its tasks with drop slots between them,
//! and a form for adding tasks.

use leptos::prelude::*;
use leptos_dragdrop::{make_on_mouseleave, make_on_slot_mouseenter, DndSignals, DropSlot};

use crate::board::CardColumn;
use crate::components::{DeleteConfirmButton, EntryForm, TaskCard};
use crate::context::{run_mutation, use_app};
use crate::models::{Member, TaskStatus};
use crate::mutations;
use crate::services::{CardArgs, NewTask};

/// Drop target in front of the task at `index`, or after the last one
#[component]
fn DropZone(dnd: DndSignals, slot: DropSlot) -> impl IntoView {
    let on_enter = make_on_slot_mouseenter(dnd, slot.clone());
    let active = move || dnd.is_active_slot(&slot);

    view! {
        <div
            class="drop-slot"
            class:active=active
            class:visible=move || dnd.dragging.with(|d| d.is_some())
            on:mouseenter=on_enter
            on:mouseleave=make_on_mouseleave(dnd)
        ></div>
    }
}

#[component]
pub fn BoardColumn(
    board_id: String,
    column: CardColumn,
    members: Vec<Member>,
    dnd: DndSignals,
) -> impl IntoView {
    let app = use_app();
    let (renaming, set_renaming) = signal(false);
    let (adding, set_adding) = signal(false);

    let card = column.card.clone();
    let ids = StoredValue::new((board_id.clone(), card.id.clone()));

    let rename = move |(name, description): (String, String)| {
        let (api, cache, (board, card)) = (app.api(), app.cache(), ids.get_value());
        let request = async move { mutations::update_card(&api, &cache, &board, &card, &CardArgs { name, description }).await };
        run_mutation(app.toasts, request, "List updated", "Failed to update list", move |result| {
            if result.is_ok() {
                set_renaming.try_set(false);
            }
        });
    };

    let delete = move |_| {
        let (api, cache, (board, card)) = (app.api(), app.cache(), ids.get_value());
        let request = async move { mutations::delete_card(&api, &cache, &board, &card).await };
        run_mutation(app.toasts, request, "List deleted", "Failed to delete list", |_| {});
    };

    let add_task = move |(title, description): (String, String)| {
        let (api, cache, (board, card)) = (app.api(), app.cache(), ids.get_value());
        let task = NewTask { title, description, status: TaskStatus::Todo };
        let request = async move { mutations::create_task(&api, &cache, &board, &card, &task).await };
        run_mutation(app.toasts, request, "Task created", "Failed to create task", move |result| {
            if result.is_ok() {
                set_adding.try_set(false);
            }
        });
    };

    let task_count = column.tasks.len();
    let end_slot = DropSlot { list_id: card.id.clone(), index: task_count };
    let tasks = column
        .tasks
        .into_iter()
        .enumerate()
        .map(|(index, task)| {
            let slot = DropSlot { list_id: card.id.clone(), index };
            view! {
                <DropZone dnd=dnd slot=slot />
                <TaskCard
                    board_id=board_id.clone()
                    task=task
                    index=index
                    members=members.clone()
                    dnd=dnd
                />
            }
        })
        .collect_view();

    let initial_name = card.name.clone();
    let initial_description = card.description.clone();

    view! {
        <div class="board-column">
            <header class="column-header">
                <Show
                    when=move || renaming.get()
                    fallback=move || {
                        view! {
                            <h3 on:dblclick=move |_| set_renaming.set(true)>{card.name.clone()}</h3>
                            <span class="task-count">{task_count}</span>
                        }
                    }
                >
                    <EntryForm
                        submit_label="Save"
                        name_placeholder="List name"
                        initial_name=initial_name.clone()
                        initial_description=initial_description.clone()
                        on_submit=rename
                        on_cancel=move |_| set_renaming.set(false)
                    />
                </Show>
                <DeleteConfirmButton button_class="delete-btn" title="Delete list" on_confirm=delete />
            </header>
            <div class="column-tasks">
                {tasks}
                <DropZone dnd=dnd slot=end_slot />
            </div>
            <Show
                when=move || adding.get()
                fallback=move || {
                    view! {
                        <button class="add-task-btn" on:click=move |_| set_adding.set(true)>"+ Add task"</button>
                    }
                }
            >
                <EntryForm
                    submit_label="Add"
                    name_placeholder="Task title"
                    on_submit=add_task
                    on_cancel=move |_| set_adding.set(false)
                />
            </Show>
        </div>
    }
}
