//! Презентеры: из поста и состояния фильтров собирают то, что нужно
//! отрисовать в сетке постов, в модальном окне поста и в пустом состоянии.

use crate::compose::Viewer;
use crate::filter::PostQuery;
use crate::post::Post;
use crate::preview::{PREVIEW_THRESHOLD, needs_read_more, truncate_content};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Карточка поста в сетке.
pub struct PostCard {
    /// Идентификатор поста.
    pub id: String,
    /// Заголовок.
    pub title: String,
    /// Подпись категории.
    pub category: String,
    /// Обрезанный текст.
    pub preview: String,
    /// Показывать ли `Read More`.
    pub read_more: bool,
    /// Дата или `Just now`.
    pub date: String,
    /// Количество лайков.
    pub likes: u64,
    /// Лайкнул ли текущий пользователь.
    pub liked: bool,
    /// Количество комментариев.
    pub comments: usize,
    /// Обложка.
    pub image_url: Option<String>,
    /// Текущий пользователь автор: показываются кнопки правки и удаления.
    pub can_manage: bool,
}

impl PostCard {
    /// Карточка для поста с точки зрения `viewer`.
    pub fn new(post: &Post, viewer: Option<&Viewer>) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            category: post.category_label().to_string(),
            preview: truncate_content(&post.content, PREVIEW_THRESHOLD),
            read_more: needs_read_more(&post.content, PREVIEW_THRESHOLD),
            date: post.created_at.label(),
            likes: post.likes,
            liked: post.is_liked,
            comments: post.comment_count(),
            image_url: post.image_url.clone(),
            can_manage: viewer.is_some_and(|viewer| post.is_authored_by(&viewer.id)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Полный пост в модальном окне.
pub struct PostDetail {
    /// Заголовок.
    pub title: String,
    /// Обложка.
    pub image_url: Option<String>,
    /// Имя автора.
    pub author: String,
    /// Буква для аватара.
    pub author_initial: String,
    /// Дата или `Just now`.
    pub date: String,
    /// Полный текст.
    pub content: String,
    /// Количество лайков.
    pub likes: u64,
    /// Лайкнул ли текущий пользователь.
    pub liked: bool,
    /// Количество комментариев.
    pub comments: usize,
}

impl From<&Post> for PostDetail {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            image_url: post.image_url.clone(),
            author: post.author.clone(),
            author_initial: post.author_initial(),
            date: post.created_at.label(),
            content: post.content.clone(),
            likes: post.likes,
            liked: post.is_liked,
            comments: post.comment_count(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Что показать, когда после фильтрации список пуст.
pub enum EmptyState {
    /// Есть поиск, но ничего не нашлось.
    NoMatches,
    /// Постов нет вообще.
    NoPosts,
}

impl EmptyState {
    /// Выбор сообщения по состоянию фильтров.
    pub fn for_query(query: &PostQuery) -> Self {
        if query.has_search() {
            EmptyState::NoMatches
        } else {
            EmptyState::NoPosts
        }
    }

    /// Текст сообщения.
    pub fn message(self) -> &'static str {
        match self {
            EmptyState::NoMatches => "No posts found matching your search.",
            EmptyState::NoPosts => "No blog posts yet.",
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::post::CreatedAt;

    fn sample_post(content: &str) -> Post {
        Post {
            id: "p1".to_string(),
            title: "A".to_string(),
            content: content.to_string(),
            author: "lena".to_string(),
            author_id: Some("u1".to_string()),
            category: "Lifestyle".to_string(),
            image_url: Some("https://img.example/a.png".to_string()),
            created_at: CreatedAt::Unknown,
            likes: 4,
            is_liked: true,
            comments: vec![json!({})],
        }
    }

    #[test]
    fn card_truncates_long_content() {
        let post = sample_post(&"x".repeat(200));
        let card = PostCard::new(&post, None);
        assert_eq!(card.preview.len(), 153);
        assert!(card.read_more);
        assert_eq!(card.date, "Just now");
        assert_eq!(card.comments, 1);
        assert!(!card.can_manage);
    }

    #[test]
    fn card_allows_management_for_author_only() {
        let post = sample_post("short");
        assert!(PostCard::new(&post, Some(&Viewer::new("u1"))).can_manage);
        assert!(!PostCard::new(&post, Some(&Viewer::new("u2"))).can_manage);
    }

    #[test]
    fn detail_keeps_full_content() {
        let content = "y".repeat(300);
        let detail = PostDetail::from(&sample_post(&content));
        assert_eq!(detail.content, content);
        assert_eq!(detail.author_initial, "L");
        assert!(detail.liked);
    }

    #[test]
    fn empty_state_depends_on_search() {
        assert_eq!(EmptyState::for_query(&PostQuery::new()), EmptyState::NoPosts);
        assert_eq!(
            EmptyState::for_query(&PostQuery::new().with_search("zzz")).message(),
            "No posts found matching your search."
        );
    }
}
