use leptos::prelude::*;
use stories_core::{CategoryFilter, PostQuery, PostStore, SortOrder, Viewer};

#[derive(Debug, Clone, Copy)]
pub(crate) struct AppState {
    pub(crate) viewer: RwSignal<Option<Viewer>>,
    pub(crate) store: RwSignal<PostStore>,
    pub(crate) error: RwSignal<Option<String>>,
    pub(crate) loading: RwSignal<bool>,
    pub(crate) search: RwSignal<String>,
    pub(crate) category: RwSignal<CategoryFilter>,
    pub(crate) sort: RwSignal<SortOrder>,
    pub(crate) selected_post: RwSignal<Option<String>>,
    pub(crate) compose_open: RwSignal<bool>,
}

impl AppState {
    pub(crate) fn new() -> Self {
        Self {
            viewer: RwSignal::new(None),
            store: RwSignal::new(PostStore::new()),
            error: RwSignal::new(None),
            loading: RwSignal::new(true),
            search: RwSignal::new(String::new()),
            category: RwSignal::new(CategoryFilter::All),
            sort: RwSignal::new(SortOrder::Newest),
            selected_post: RwSignal::new(None),
            compose_open: RwSignal::new(false),
        }
    }

    pub(crate) fn set_error(&self, message: impl Into<String>) {
        self.error.set(Some(message.into()));
    }

    pub(crate) fn clear_error(&self) {
        self.error.set(None);
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.viewer.get().is_some()
    }

    pub(crate) fn query(&self) -> PostQuery {
        PostQuery::new()
            .with_search(self.search.get())
            .with_category(self.category.get())
            .with_sort(self.sort.get())
    }
}
