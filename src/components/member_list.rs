//! Member List Component
//!
//! Board members with add, rename and remove.

use leptos::prelude::*;

use crate::components::DeleteConfirmButton;
use crate::context::{run_mutation, use_app, QueryState};
use crate::models::Member;
use crate::mutations;
use crate::services::{MemberUpdate, NewMember};

#[component]
pub fn MemberList(board_id: String, members: ReadSignal<QueryState<Vec<Member>>>) -> impl IntoView {
    let app = use_app();
    let board_id = StoredValue::new(board_id);
    let (adding, set_adding) = signal(false);
    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());

    let add = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let member = NewMember { name: name.get().trim().to_string(), email: email.get().trim().to_string() };
        if member.name.is_empty() || member.email.is_empty() {
            return;
        }
        let (api, cache, board) = (app.api(), app.cache(), board_id.get_value());
        let request = async move { mutations::add_member(&api, &cache, &board, &member).await };
        run_mutation(app.toasts, request, "Member added successfully", "Failed to add member", move |result| {
            if result.is_ok() {
                set_name.try_set(String::new());
                set_email.try_set(String::new());
                set_adding.try_set(false);
            }
        });
    };

    view! {
        <section class="member-list">
            <header>
                <h3>"Members"</h3>
                <button class="link-btn" on:click=move |_| set_adding.update(|a| *a = !*a)>"+ Add"</button>
            </header>
            <Show when=move || adding.get()>
                <form class="member-form" on:submit=add>
                    <input
                        type="text"
                        placeholder="Name"
                        prop:value=move || name.get()
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                    />
                    <input
                        type="email"
                        placeholder="Email"
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                    <button type="submit">"Add member"</button>
                </form>
            </Show>
            <ul>
                {move || {
                    let list = members.with(|q| q.data.clone().unwrap_or_default());
                    list.into_iter()
                        .map(|member| view! { <MemberRow board_id=board_id.get_value() member=member /> })
                        .collect_view()
                }}
            </ul>
        </section>
    }
}

#[component]
fn MemberRow(board_id: String, member: Member) -> impl IntoView {
    let app = use_app();
    let (editing, set_editing) = signal(false);
    let (name, set_name) = signal(member.name.clone());
    let ids = StoredValue::new((board_id, member.id.clone()));

    let rename = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let trimmed = name.get().trim().to_string();
        if trimmed.is_empty() {
            return;
        }
        let (api, cache, (board, id)) = (app.api(), app.cache(), ids.get_value());
        let update = MemberUpdate { name: Some(trimmed), email: None };
        let request = async move { mutations::update_member(&api, &cache, &board, &id, &update).await };
        run_mutation(app.toasts, request, "Member updated", "Failed to update member", move |result| {
            if result.is_ok() {
                set_editing.try_set(false);
            }
        });
    };

    let remove = move |_| {
        let (api, cache, (board, id)) = (app.api(), app.cache(), ids.get_value());
        let request = async move { mutations::remove_member(&api, &cache, &board, &id).await };
        run_mutation(app.toasts, request, "Member removed", "Failed to remove member", |_| {});
    };

    let initials = member.initials();
    let display = member.name.clone();

    view! {
        <li class="member-row">
            <span class="avatar">{initials}</span>
            <Show
                when=move || editing.get()
                fallback=move || {
                    view! {
                        <span class="member-name" on:dblclick=move |_| set_editing.set(true)>{display.clone()}</span>
                    }
                }
            >
                <form class="inline-form" on:submit=rename>
                    <input
                        type="text"
                        prop:value=move || name.get()
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                    />
                </form>
            </Show>
            <span class="member-email">{member.email.clone()}</span>
            <DeleteConfirmButton button_class="delete-btn" title="Remove member" on_confirm=remove />
        </li>
    }
}
