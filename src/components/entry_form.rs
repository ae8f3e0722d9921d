//! Entry Form Component
//!
//! Name + description form used to create or edit boards and lists.

use leptos::prelude::*;

#[component]
pub fn EntryForm(
    #[prop(into)] submit_label: String,
    #[prop(into)] name_placeholder: String,
    /// Receives the trimmed name and description
    #[prop(into)]
    on_submit: Callback<(String, String)>,
    #[prop(into)] on_cancel: Callback<()>,
    #[prop(optional, into)] initial_name: String,
    #[prop(optional, into)] initial_description: String,
) -> impl IntoView {
    let (name, set_name) = signal(initial_name);
    let (description, set_description) = signal(initial_description);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let trimmed = name.get().trim().to_string();
        if trimmed.is_empty() {
            return;
        }
        on_submit.run((trimmed, description.get().trim().to_string()));
        set_name.set(String::new());
        set_description.set(String::new());
    };

    view! {
        <form class="entry-form" on:submit=submit>
            <input
                type="text"
                placeholder=name_placeholder
                prop:value=move || name.get()
                on:input=move |ev| set_name.set(event_target_value(&ev))
            />
            <textarea
                placeholder="Description (optional)"
                prop:value=move || description.get()
                on:input=move |ev| set_description.set(event_target_value(&ev))
            />
            <div class="form-actions">
                <button type="submit" disabled=move || name.get().trim().is_empty()>{submit_label}</button>
                <button type="button" class="cancel-btn" on:click=move |_| on_cancel.run(())>
                    "Cancel"
                </button>
            </div>
        </form>
    }
}
