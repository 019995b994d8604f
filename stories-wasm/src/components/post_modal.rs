use leptos::prelude::*;
use stories_core::{PostDetail, PostStore};

use crate::state::AppState;

fn selected_detail(store: &PostStore, selected: Option<&str>) -> Option<PostDetail> {
    selected
        .and_then(|id| store.get(id))
        .map(PostDetail::from)
}

/// Полный текст выбранного поста поверх ленты.
#[component]
pub(crate) fn PostModal(state: AppState) -> impl IntoView {
    let detail = Memo::new(move |_| {
        let selected = state.selected_post.get();
        state
            .store
            .with(|store| selected_detail(store, selected.as_deref()))
    });

    let close = move |_| state.selected_post.set(None);

    move || {
        detail.get().map(|detail| {
            let heart = if detail.liked { "♥" } else { "♡" };
            view! {
                <div class="modal-backdrop" on:click=close>
                    <div class="modal" on:click=|ev| ev.stop_propagation()>
                        <button class="close" on:click=close>"×"</button>
                        <h2>{detail.title}</h2>
                        {detail.image_url.map(|url| view! { <img class="cover" src=url alt="" /> })}
                        <div class="author">
                            <span class="avatar">{detail.author_initial}</span>
                            <span>{detail.author}</span>
                            <small>{detail.date}</small>
                        </div>
                        <p class="content">{detail.content}</p>
                        <footer>
                            <span>{format!("{heart} {}", detail.likes)}</span>
                            <span>{format!("💬 {}", detail.comments)}</span>
                        </footer>
                    </div>
                </div>
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stories_core::{CreatedAt, Post};

    fn sample_post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            title: format!("Post {id}"),
            content: "x".repeat(200),
            author: "maya".to_string(),
            author_id: None,
            category: "Other".to_string(),
            image_url: None,
            created_at: CreatedAt::Unknown,
            likes: 3,
            is_liked: false,
            comments: Vec::new(),
        }
    }

    #[test]
    fn selected_detail_shows_full_content() {
        let store = PostStore::from_posts(vec![sample_post("1")]);
        let detail = selected_detail(&store, Some("1")).expect("detail");
        assert_eq!(detail.content.len(), 200);
        assert_eq!(detail.author_initial, "M");
        assert_eq!(detail.date, "Just now");
    }

    #[test]
    fn selected_detail_is_none_without_selection_or_post() {
        let store = PostStore::from_posts(vec![sample_post("1")]);
        assert!(selected_detail(&store, None).is_none());
        assert!(selected_detail(&store, Some("missing")).is_none());
    }
}
