use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use stories_core::Viewer;

use crate::state::AppState;
use crate::storage;

fn optional_field(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Собирает пользователя из полей формы; id выдаёт провайдер identity.
fn viewer_from_fields(id: &str, name: &str, email: &str) -> Result<Viewer, &'static str> {
    let id = id.trim();
    if id.is_empty() {
        return Err("Укажите user id");
    }

    Ok(Viewer {
        id: id.to_string(),
        full_name: optional_field(name),
        email: optional_field(email),
    })
}

#[component]
pub(crate) fn AuthPanel(state: AppState) -> impl IntoView {
    let user_id = RwSignal::new(String::new());
    let full_name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());

    let on_sign_in = move |ev: SubmitEvent| {
        ev.prevent_default();
        state.clear_error();

        let viewer = match viewer_from_fields(&user_id.get(), &full_name.get(), &email.get()) {
            Ok(viewer) => viewer,
            Err(message) => {
                state.set_error(message);
                return;
            }
        };

        if let Err(err) = storage::save_viewer(&viewer) {
            state.set_error(err);
            return;
        }
        state.viewer.set(Some(viewer));
        user_id.set(String::new());
        full_name.set(String::new());
        email.set(String::new());
    };

    let on_sign_out = move |_| {
        if let Err(err) = storage::clear_viewer() {
            state.set_error(err);
            return;
        }
        state.viewer.set(None);
        state.compose_open.set(false);
        state.clear_error();
    };

    let viewer_text = move || {
        state
            .viewer
            .get()
            .map(|viewer| viewer.display_name())
            .unwrap_or_default()
    };

    view! {
        <Show
            when=move || state.is_authenticated()
            fallback=move || {
                view! {
                    <form class="auth-form" on:submit=on_sign_in>
                        <input
                            placeholder="user id"
                            prop:value=move || user_id.get()
                            on:input=move |ev| user_id.set(event_target_value(&ev))
                        />
                        <input
                            placeholder="full name"
                            prop:value=move || full_name.get()
                            on:input=move |ev| full_name.set(event_target_value(&ev))
                        />
                        <input
                            placeholder="email"
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                        />
                        <button type="submit">"Sign in"</button>
                    </form>
                }
            }
        >
            <div class="auth-status">
                <span>"Signed in as " {viewer_text}</span>
                <button on:click=on_sign_out>"Sign out"</button>
            </div>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewer_from_fields_requires_id() {
        assert_eq!(viewer_from_fields("  ", "Maya", ""), Err("Укажите user id"));
    }

    #[test]
    fn viewer_from_fields_drops_blank_optional_fields() {
        let viewer = viewer_from_fields(" u1 ", "  ", "maya@example.com").expect("viewer");
        assert_eq!(viewer.id, "u1");
        assert!(viewer.full_name.is_none());
        assert_eq!(viewer.display_name(), "maya@example.com");
    }
}
