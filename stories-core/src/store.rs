use crate::error::{CoreError, CoreResult};
use crate::filter::PostQuery;
use crate::post::Post;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Результат локального переключения лайка.
pub struct LikeChange {
    /// Лайк поставлен (`true`) или снят (`false`).
    pub liked: bool,
    /// Счётчик после изменения.
    pub likes: u64,
}

#[derive(Debug, Clone, Default)]
/// In-memory список постов, полученный из API.
///
/// Хранит посты в порядке ответа сервера; отфильтрованное представление
/// вычисляется заново на каждый запрос и не кешируется.
pub struct PostStore {
    posts: Vec<Post>,
}

impl PostStore {
    /// Пустое хранилище.
    pub fn new() -> Self {
        Self::default()
    }

    /// Хранилище с начальными постами.
    pub fn from_posts(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    /// Заменяет содержимое целиком (после refetch).
    pub fn replace_all(&mut self, posts: Vec<Post>) {
        self.posts = posts;
    }

    /// Очищает хранилище.
    pub fn clear(&mut self) {
        self.posts.clear();
    }

    /// Все посты в порядке ответа сервера.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Количество постов.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Пусто ли хранилище.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Пост по идентификатору.
    pub fn get(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    /// Отфильтрованное и отсортированное представление.
    pub fn visible(&self, query: &PostQuery) -> Vec<&Post> {
        query.apply(&self.posts)
    }

    /// Выставляет флаг лайка текущего пользователя, не трогая счётчик.
    pub fn set_liked(&mut self, id: &str, liked: bool) -> CoreResult<()> {
        let post = self
            .posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or_else(|| CoreError::PostNotFound(id.to_string()))?;
        post.is_liked = liked;
        Ok(())
    }

    /// Локально переключает лайк: флаг инвертируется, счётчик меняется на
    /// единицу и не опускается ниже нуля.
    pub fn toggle_like(&mut self, id: &str) -> CoreResult<LikeChange> {
        let post = self
            .posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or_else(|| CoreError::PostNotFound(id.to_string()))?;

        if post.is_liked {
            post.likes = post.likes.saturating_sub(1);
            post.is_liked = false;
        } else {
            post.likes = post.likes.saturating_add(1);
            post.is_liked = true;
        }

        Ok(LikeChange {
            liked: post.is_liked,
            likes: post.likes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::CreatedAt;

    fn sample_post(id: &str, likes: u64, is_liked: bool) -> Post {
        Post {
            id: id.to_string(),
            title: format!("title {id}"),
            content: "content".to_string(),
            author: "author".to_string(),
            author_id: None,
            category: "Other".to_string(),
            image_url: None,
            created_at: CreatedAt::Unknown,
            likes,
            is_liked,
            comments: Vec::new(),
        }
    }

    #[test]
    fn toggle_like_increments_and_sets_flag() {
        let mut store = PostStore::from_posts(vec![sample_post("a", 2, false)]);
        let change = store.toggle_like("a").expect("post exists");
        assert_eq!(change, LikeChange { liked: true, likes: 3 });
        assert!(store.get("a").expect("post exists").is_liked);
    }

    #[test]
    fn unlike_never_goes_negative() {
        let mut store = PostStore::from_posts(vec![sample_post("a", 0, true)]);
        let change = store.toggle_like("a").expect("post exists");
        assert_eq!(change, LikeChange { liked: false, likes: 0 });
    }

    #[test]
    fn toggling_twice_restores_original_state() {
        for (likes, is_liked) in [(0, false), (5, false), (1, true), (9, true)] {
            let mut store = PostStore::from_posts(vec![sample_post("a", likes, is_liked)]);
            store.toggle_like("a").expect("first toggle");
            store.toggle_like("a").expect("second toggle");
            let post = store.get("a").expect("post exists");
            assert_eq!((post.likes, post.is_liked), (likes, is_liked));
        }
    }

    #[test]
    fn toggle_like_only_touches_target_post() {
        let mut store = PostStore::from_posts(vec![sample_post("a", 1, false), sample_post("b", 4, false)]);
        store.toggle_like("b").expect("post exists");
        assert_eq!(store.get("a").expect("a").likes, 1);
        assert_eq!(store.get("b").expect("b").likes, 5);
    }

    #[test]
    fn toggle_like_reports_missing_post() {
        let mut store = PostStore::new();
        let err = store.toggle_like("missing").expect_err("must fail");
        assert_eq!(err, CoreError::PostNotFound("missing".to_string()));
    }

    #[test]
    fn set_liked_then_toggle_unlikes() {
        let mut store = PostStore::from_posts(vec![sample_post("a", 1, false)]);
        store.set_liked("a", true).expect("post exists");
        assert_eq!(store.get("a").expect("a").likes, 1);

        let change = store.toggle_like("a").expect("post exists");
        assert_eq!(change, LikeChange { liked: false, likes: 0 });
        assert!(store.set_liked("missing", true).is_err());
    }

    #[test]
    fn replace_all_and_clear() {
        let mut store = PostStore::new();
        assert!(store.is_empty());
        store.replace_all(vec![sample_post("a", 0, false), sample_post("b", 0, false)]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.visible(&PostQuery::new().with_search("title b")).len(), 1);
        store.clear();
        assert!(store.is_empty());
    }
}
