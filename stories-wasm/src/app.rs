use leptos::prelude::*;
use leptos::task::spawn_local;
use stories_core::{LikeChange, PostStore};

use crate::api::{self, ApiError};
use crate::components::auth_panel::AuthPanel;
use crate::components::compose_modal::ComposeModal;
use crate::components::controls::Controls;
use crate::components::post_modal::PostModal;
use crate::components::posts_panel::PostsPanel;
use crate::state::AppState;
use crate::storage;

pub(crate) fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// Полная перезагрузка ленты; при ошибке лента остаётся пустой.
pub(crate) fn load_posts(state: AppState) {
    state.loading.set(true);
    state.clear_error();

    spawn_local(async move {
        match api::list_posts().await {
            Ok(posts) => state.store.set(PostStore::from_posts(posts)),
            Err(err) => {
                web_sys::console::error_1(&format!("failed to load posts: {err}").into());
                state.store.update(PostStore::clear);
                state.set_error(err.to_string());
            }
        }
        state.loading.set(false);
    });
}

async fn sync_like(post_id: &str, user_id: &str, change: LikeChange) -> Result<(), ApiError> {
    if change.liked {
        api::add_like(post_id, user_id).await?;
    } else {
        api::remove_like(post_id, user_id).await?;
    }
    api::set_like_count(post_id, change.likes).await
}

fn toggle_like(state: AppState, post_id: String) {
    let Some(viewer) = state.viewer.get_untracked() else {
        alert("Please login to like posts");
        return;
    };

    spawn_local(async move {
        // флаг из блог-API не привязан к пользователю, сверяемся с хранилищем лайков
        let remote = api::has_like(&post_id, &viewer.id).await;
        if let Err(err) = &remote {
            web_sys::console::warn_1(&format!("failed to check like for {post_id}: {err}").into());
        }

        // локально до записи, без отката при ошибке сети
        let change = state.store.try_update(|store| {
            if let Ok(liked) = remote {
                store.set_liked(&post_id, liked)?;
            }
            store.toggle_like(&post_id)
        });
        let change = match change {
            Some(Ok(change)) => change,
            Some(Err(err)) => {
                web_sys::console::warn_1(&format!("like skipped: {err}").into());
                return;
            }
            None => return,
        };

        if let Err(err) = sync_like(&post_id, &viewer.id, change).await {
            web_sys::console::warn_1(&format!("failed to sync like for {post_id}: {err}").into());
        }
    });
}

#[component]
pub fn App() -> impl IntoView {
    let state = AppState::new();

    if let Some(viewer) = storage::load_viewer() {
        state.viewer.set(Some(viewer));
    }

    // первая загрузка и перезагрузка при смене сортировки или категории
    Effect::new(move |_| {
        state.sort.track();
        state.category.track();
        load_posts(state);
    });

    let on_like = Callback::new(move |post_id: String| toggle_like(state, post_id));

    let error_text = move || state.error.get().unwrap_or_default();

    view! {
        <main class="page">
            <section class="container">
                <header class="hero">
                    <h1>"Stories"</h1>
                    <AuthPanel state=state />
                </header>

                <Controls state=state />

                <Show when=move || !state.error.get().unwrap_or_default().is_empty()>
                    <div class="error-banner">
                        <strong>"Ошибка: "</strong>
                        {error_text}
                    </div>
                </Show>

                <PostsPanel state=state on_like=on_like />
                <PostModal state=state />
                <ComposeModal state=state />
            </section>
        </main>
    }
}
