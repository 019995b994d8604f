use leptos::prelude::*;
use stories_core::{EmptyState, PostCard, PostQuery, PostStore, Viewer};

use crate::state::AppState;

fn visible_cards(store: &PostStore, query: &PostQuery, viewer: Option<&Viewer>) -> Vec<PostCard> {
    store
        .visible(query)
        .into_iter()
        .map(|post| PostCard::new(post, viewer))
        .collect()
}

/// Открывает пост в модальном окне; карточку открывают обложка, заголовок и "Read More".
fn open_post(state: AppState, id: String) {
    state.selected_post.set(Some(id));
}

#[component]
pub(crate) fn PostsPanel(state: AppState, on_like: Callback<String>) -> impl IntoView {
    let cards = Memo::new(move |_| {
        let query = state.query();
        let viewer = state.viewer.get();
        state
            .store
            .with(|store| visible_cards(store, &query, viewer.as_ref()))
    });

    let empty_message = move || EmptyState::for_query(&state.query()).message();

    view! {
        <Show
            when=move || !state.loading.get()
            fallback=|| view! { <div class="spinner">"Loading..."</div> }
        >
            <Show
                when=move || !cards.with(Vec::is_empty)
                fallback=move || view! { <p class="empty">{empty_message}</p> }
            >
                <div class="posts-grid">
                    <For
                        each=move || cards.get()
                        key=|card| (card.id.clone(), card.likes, card.liked)
                        children=move |card| {
                            let open_id = card.id.clone();
                            let like_id = card.id.clone();
                            let heart = if card.liked { "♥" } else { "♡" };
                            let open = move |id: String| open_post(state, id);

                            view! {
                                <article class="post-card">
                                    {card
                                        .image_url
                                        .clone()
                                        .map(|url| {
                                            let open_id = open_id.clone();
                                            view! {
                                                <img
                                                    class="cover"
                                                    src=url
                                                    alt=""
                                                    on:click=move |_| open(open_id.clone())
                                                />
                                            }
                                        })}
                                    <span class="badge">{card.category.clone()}</span>
                                    <h3 class="title" on:click={
                                        let open_id = open_id.clone();
                                        move |_| open(open_id.clone())
                                    }>{card.title.clone()}</h3>
                                    <p>{card.preview.clone()}</p>
                                    <Show when=move || card.read_more>
                                        <button
                                            class="link"
                                            on:click={
                                                let open_id = open_id.clone();
                                                move |_| open(open_id.clone())
                                            }
                                        >
                                            "Read More"
                                        </button>
                                    </Show>
                                    <footer>
                                        <small>{card.date.clone()}</small>
                                        <button
                                            class:liked=card.liked
                                            on:click=move |_| on_like.run(like_id.clone())
                                        >
                                            {format!("{heart} {}", card.likes)}
                                        </button>
                                        <span>{format!("💬 {}", card.comments)}</span>
                                        // действия автора пока без обработчиков
                                        <Show when=move || card.can_manage>
                                            <button disabled=true>"Edit"</button>
                                            <button disabled=true>"Delete"</button>
                                        </Show>
                                    </footer>
                                </article>
                            }
                        }
                    />
                </div>
            </Show>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stories_core::{CategoryFilter, Category, CreatedAt, Post};

    fn sample_post(id: &str, title: &str, category: &str, author_id: &str) -> Post {
        Post {
            id: id.to_string(),
            title: title.to_string(),
            content: "content".to_string(),
            author: "Maya".to_string(),
            author_id: Some(author_id.to_string()),
            category: category.to_string(),
            image_url: None,
            created_at: CreatedAt::Unknown,
            likes: 0,
            is_liked: false,
            comments: Vec::new(),
        }
    }

    #[test]
    fn visible_cards_apply_query() {
        let store = PostStore::from_posts(vec![
            sample_post("1", "Rust tips", "Technology", "u1"),
            sample_post("2", "Morning run", "Lifestyle", "u2"),
        ]);
        let query = PostQuery::new().with_category(CategoryFilter::Only(Category::Technology));

        let cards = visible_cards(&store, &query, None);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id, "1");
        assert!(!cards[0].can_manage);
    }

    #[test]
    fn short_post_without_read_more_still_opens() {
        let owner = Owner::new();
        owner.set();
        let state = AppState::new();
        let store = PostStore::from_posts(vec![sample_post("1", "Rust tips", "Technology", "u1")]);

        let cards = visible_cards(&store, &PostQuery::new(), None);
        assert!(!cards[0].read_more);

        open_post(state, cards[0].id.clone());
        assert_eq!(state.selected_post.get_untracked().as_deref(), Some("1"));
    }

    #[test]
    fn visible_cards_mark_own_posts() {
        let store = PostStore::from_posts(vec![sample_post("1", "Rust tips", "Technology", "u1")]);
        let viewer = Viewer::new("u1");

        let cards = visible_cards(&store, &PostQuery::new(), Some(&viewer));
        assert!(cards[0].can_manage);
    }
}
