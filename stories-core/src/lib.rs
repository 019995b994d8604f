//! Доменная часть блога без транспорта: модель поста, категории, фильтрация,
//! in-memory хранилище постов с оптимистичными лайками и презентеры для UI.
//!
//! Крейт не делает сетевых вызовов и собирается как под хост, так и под
//! `wasm32`, поэтому его используют и `stories-client`, и `stories-wasm`.
#![warn(missing_docs)]

mod category;
mod compose;
mod error;
mod filter;
mod post;
mod preview;
mod store;
mod view;
pub mod wire;

pub use category::{BackendCategory, Category, CategoryFilter};
pub use compose::{ComposeForm, NewPost, Viewer};
pub use error::{CoreError, CoreResult};
pub use filter::{PostQuery, SortOrder};
pub use post::{CreatedAt, Post};
pub use preview::{PREVIEW_THRESHOLD, needs_read_more, truncate_content};
pub use store::{LikeChange, PostStore};
pub use view::{EmptyState, PostCard, PostDetail};
