use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use stories_core::{Category, ComposeForm, Viewer};

use crate::api::{self, ApiError};
use crate::app::{alert, load_posts};
use crate::state::AppState;

fn publish_message(err: &ApiError) -> String {
    match err {
        ApiError::Rejected(message) => format!("Error creating blog post: {message}"),
        ApiError::Invalid(message) => format!("Error creating blog post: {message}"),
        ApiError::Http { status: 401 | 403, .. } => "Please login to create a blog post".to_string(),
        _ => "Error creating blog post. Please try again.".to_string(),
    }
}

async fn publish(viewer: Viewer, form: ComposeForm, image: Option<web_sys::File>) -> Result<(), ApiError> {
    form.check()?;

    let image_url = match image {
        Some(file) => Some(api::upload_image(&file).await?),
        None => None,
    };
    let post = form.into_new_post(&viewer, image_url)?;
    api::create_post(&post).await
}

/// Форма нового поста с необязательной картинкой.
#[component]
pub(crate) fn ComposeModal(state: AppState) -> impl IntoView {
    let title = RwSignal::new(String::new());
    let content = RwSignal::new(String::new());
    let category = RwSignal::new(Category::General);
    let image = RwSignal::new_local(None::<web_sys::File>);
    let preview = RwSignal::new(None::<String>);
    let submitting = RwSignal::new(false);

    let reset = move || {
        title.set(String::new());
        content.set(String::new());
        category.set(Category::General);
        image.set(None);
        if let Some(url) = preview.get_untracked() {
            let _ = web_sys::Url::revoke_object_url(&url);
        }
        preview.set(None);
    };

    let on_close = move |_| {
        reset();
        state.compose_open.set(false);
    };

    let on_file = move |ev: leptos::ev::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        let file = input.files().and_then(|files| files.get(0));

        if let Some(url) = preview.get_untracked() {
            let _ = web_sys::Url::revoke_object_url(&url);
        }
        preview.set(
            file.as_ref()
                .and_then(|file| web_sys::Url::create_object_url_with_blob(file).ok()),
        );
        image.set(file);
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();

        let Some(viewer) = state.viewer.get_untracked() else {
            alert("Please login to create a blog post");
            return;
        };
        let form = ComposeForm::new(title.get_untracked(), content.get_untracked(), category.get_untracked());
        let file = image.get_untracked();

        submitting.set(true);
        spawn_local(async move {
            match publish(viewer, form, file).await {
                Ok(()) => {
                    reset();
                    state.compose_open.set(false);
                    load_posts(state);
                }
                Err(err) => {
                    web_sys::console::error_1(&format!("publish failed: {err}").into());
                    alert(&publish_message(&err));
                }
            }
            submitting.set(false);
        });
    };

    view! {
        <Show when=move || state.compose_open.get()>
            <div class="modal-backdrop">
                <form class="modal compose" on:submit=on_submit>
                    <button type="button" class="close" on:click=on_close>"×"</button>
                    <h2>"Create New Post"</h2>
                    <input
                        placeholder="Title"
                        prop:value=move || title.get()
                        on:input=move |ev| title.set(event_target_value(&ev))
                    />
                    <select
                        prop:value=move || category.get().value()
                        on:change=move |ev| {
                            category.set(event_target_value(&ev).parse().unwrap_or_default())
                        }
                    >
                        {Category::ALL
                            .into_iter()
                            .map(|category| {
                                view! { <option value=category.value()>{category.label()}</option> }
                            })
                            .collect_view()}
                    </select>
                    <textarea
                        placeholder="Write your story..."
                        prop:value=move || content.get()
                        on:input=move |ev| content.set(event_target_value(&ev))
                    ></textarea>
                    <input type="file" accept="image/*" on:change=on_file />
                    {move || preview.get().map(|url| view! { <img class="preview" src=url alt="" /> })}
                    <button type="submit" class="primary" disabled=move || submitting.get()>
                        {move || if submitting.get() { "Publishing..." } else { "Publish" }}
                    </button>
                </form>
            </div>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stories_core::CoreError;

    #[test]
    fn publish_message_includes_server_rejection() {
        let err = ApiError::Rejected("Unknown error".to_string());
        assert_eq!(publish_message(&err), "Error creating blog post: Unknown error");
    }

    #[test]
    fn publish_message_for_validation_and_auth() {
        let err = ApiError::from(CoreError::Validation {
            field: "title",
            message: "must not be empty",
        });
        assert!(publish_message(&err).starts_with("Error creating blog post: "));

        let err = ApiError::Http {
            status: 401,
            message: "nope".to_string(),
        };
        assert_eq!(publish_message(&err), "Please login to create a blog post");
    }

    #[test]
    fn publish_message_falls_back_to_generic_text() {
        let err = ApiError::Network("offline".to_string());
        assert_eq!(publish_message(&err), "Error creating blog post. Please try again.");
    }
}
