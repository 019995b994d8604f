use leptos::prelude::*;
use stories_core::{CategoryFilter, SortOrder};

use crate::state::AppState;

fn parse_filter(raw: &str) -> CategoryFilter {
    raw.parse().unwrap_or_default()
}

fn parse_sort(raw: &str) -> SortOrder {
    raw.parse().unwrap_or_default()
}

/// Поиск, фильтр по категории, сортировка и кнопка нового поста.
#[component]
pub(crate) fn Controls(state: AppState) -> impl IntoView {
    let on_new_post = move |_| {
        if !state.is_authenticated() {
            crate::app::alert("Please login to create a blog post");
            return;
        }
        state.compose_open.set(true);
    };

    view! {
        <div class="controls">
            <input
                class="search"
                type="search"
                placeholder="Search posts..."
                prop:value=move || state.search.get()
                on:input=move |ev| state.search.set(event_target_value(&ev))
            />
            <select
                prop:value=move || state.category.get().value()
                on:change=move |ev| state.category.set(parse_filter(&event_target_value(&ev)))
            >
                {CategoryFilter::options()
                    .into_iter()
                    .map(|filter| {
                        view! { <option value=filter.value()>{filter.label()}</option> }
                    })
                    .collect_view()}
            </select>
            <select
                prop:value=move || state.sort.get().value()
                on:change=move |ev| state.sort.set(parse_sort(&event_target_value(&ev)))
            >
                {[SortOrder::Newest, SortOrder::MostLiked]
                    .into_iter()
                    .map(|sort| view! { <option value=sort.value()>{sort.label()}</option> })
                    .collect_view()}
            </select>
            <button class="primary" on:click=on_new_post>"Create Post"</button>
        </div>
    }
}
