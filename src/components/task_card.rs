//! Task Card Component
//!
//! A draggable task with its status, assignees and inline editing.

use leptos::prelude::*;
use leptos_dragdrop::{make_on_mousedown, DndSignals, DragSource};

use crate::components::{DeleteConfirmButton, EntryForm};
use crate::context::{run_mutation, use_app};
use crate::models::{Member, Task, TaskStatus};
use crate::mutations;
use crate::services::TaskUpdate;

fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "To do",
        TaskStatus::InProgress => "In progress",
        TaskStatus::Done => "Done",
    }
}

#[component]
pub fn TaskCard(board_id: String, task: Task, index: usize, members: Vec<Member>, dnd: DndSignals) -> impl IntoView {
    let app = use_app();
    let (editing, set_editing) = signal(false);
    let (picking, set_picking) = signal(false);

    let source = DragSource { item_id: task.id.clone(), list_id: task.card_id.clone(), index };
    let on_mousedown = make_on_mousedown(dnd, source);
    let task_id = task.id.clone();
    let is_dragging = move || dnd.is_dragging_item(&task_id);

    let stored = StoredValue::new((board_id, task.clone()));

    let save = move |update: TaskUpdate, success: &'static str| {
        let (api, cache, (board, task)) = (app.api(), app.cache(), stored.get_value());
        let request = async move { mutations::update_task(&api, &cache, &board, &task.card_id, &update).await };
        run_mutation(app.toasts, request, success, "Failed to update task", move |result| {
            if result.is_ok() {
                set_editing.try_set(false);
            }
        });
    };

    let edit = move |(title, description): (String, String)| {
        let mut update = stored.with_value(|(_, task)| TaskUpdate::from_task(task));
        update.title = title;
        update.description = description;
        save(update, "Task updated");
    };

    let change_status = move |ev: web_sys::Event| {
        let Some(status) = TaskStatus::parse(&event_target_value(&ev)) else { return };
        let mut update = stored.with_value(|(_, task)| TaskUpdate::from_task(task));
        update.status = status;
        save(update, "Task status updated");
    };

    let delete = move |_| {
        let (api, cache, (board, task)) = (app.api(), app.cache(), stored.get_value());
        let request = async move { mutations::delete_task(&api, &cache, &board, &task.card_id, &task.id).await };
        run_mutation(app.toasts, request, "Task deleted", "Failed to delete task", |_| {});
    };

    let toggle_member = move |member_id: String, assigned: bool| {
        let (api, cache, (board, task)) = (app.api(), app.cache(), stored.get_value());
        if assigned {
            let request = async move { mutations::unassign_member(&api, &cache, &task, &board, &member_id).await };
            run_mutation(app.toasts, request, "Member unassigned", "Failed to unassign member", |_| {});
        } else {
            let request = async move { mutations::assign_member(&api, &cache, &task, &board, &member_id).await };
            run_mutation(app.toasts, request, "Member assigned", "Failed to assign member", |_| {});
        }
    };

    let current_status = task.status;
    let done = current_status == TaskStatus::Done;
    let assignees = task.assigned_members.clone();
    let assigned_ids: Vec<String> = assignees.iter().map(|m| m.id.clone()).collect();
    let (title, description) = (task.title.clone(), task.description.clone());

    view! {
        <article
            class="task-card"
            class:dragging=is_dragging
            class:done=done
            on:mousedown=on_mousedown
        >
            <Show
                when=move || editing.get()
                fallback=move || {
                    view! {
                        <h4 on:dblclick=move |_| set_editing.set(true)>{title.clone()}</h4>
                        <p class="task-description">{description.clone()}</p>
                    }
                }
            >
                <EntryForm
                    submit_label="Save"
                    name_placeholder="Task title"
                    initial_name=task.title.clone()
                    initial_description=task.description.clone()
                    on_submit=edit
                    on_cancel=move |_| set_editing.set(false)
                />
            </Show>
            <footer class="task-footer">
                <select class="status-select" on:change=change_status>
                    {TaskStatus::ALL
                        .into_iter()
                        .map(|status| {
                            view! {
                                <option value=status.as_str() selected={status == current_status}>
                                    {status_label(status)}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
                <div class="assignees">
                    {assignees
                        .into_iter()
                        .map(|m| view! { <span class="avatar" title=m.name.clone()>{m.initials()}</span> })
                        .collect_view()}
                    <button class="assign-btn" title="Assign members" on:click=move |_| set_picking.update(|p| *p = !*p)>
                        "+"
                    </button>
                </div>
                <DeleteConfirmButton button_class="delete-btn" title="Delete task" on_confirm=delete />
            </footer>
            <Show when=move || picking.get()>
                <ul class="member-picker">
                    {members
                        .iter()
                        .map(|member| {
                            let assigned = assigned_ids.contains(&member.id);
                            let id = member.id.clone();
                            view! {
                                <li>
                                    <label>
                                        <input
                                            type="checkbox"
                                            prop:checked=assigned
                                            on:change=move |_| toggle_member(id.clone(), assigned)
                                        />
                                        {member.name.clone()}
                                    </label>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            </Show>
        </article>
    }
}
