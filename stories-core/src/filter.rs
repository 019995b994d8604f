use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::category::CategoryFilter;
use crate::error::CoreError;
use crate::post::Post;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Порядок сортировки списка.
pub enum SortOrder {
    /// Сначала новые; посты без времени создания считаются самыми свежими.
    #[default]
    Newest,
    /// Сначала с наибольшим числом лайков.
    MostLiked,
}

impl SortOrder {
    /// Значение для селектора.
    pub fn value(self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::MostLiked => "mostLiked",
        }
    }

    /// Подпись для селектора.
    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Newest => "Newest First",
            SortOrder::MostLiked => "Most Liked",
        }
    }

    fn compare(self, a: &Post, b: &Post) -> Ordering {
        match self {
            SortOrder::Newest => match (a.created_at.instant(), b.created_at.instant()) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a), Some(b)) => b.cmp(&a),
            },
            SortOrder::MostLiked => b.likes.cmp(&a.likes),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "mostliked" | "most-liked" | "most_liked" => Ok(SortOrder::MostLiked),
            _ => Err(CoreError::Validation {
                field: "sort",
                message: "expected newest or mostLiked",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Состояние фильтров: строка поиска, категория и сортировка.
pub struct PostQuery {
    /// Строка поиска; пустая совпадает со всем.
    pub search: String,
    /// Выбранная категория.
    pub category: CategoryFilter,
    /// Порядок сортировки.
    pub sort: SortOrder,
}

impl PostQuery {
    /// Пустой запрос: всё, сначала новые.
    pub fn new() -> Self {
        Self::default()
    }

    /// Задаёт строку поиска.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Задаёт категорию.
    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    /// Задаёт сортировку.
    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Есть ли непустой поиск.
    pub fn has_search(&self) -> bool {
        !self.search.is_empty()
    }

    /// Сужает ли запрос выборку (поиск или категория).
    pub fn is_active(&self) -> bool {
        self.has_search() || self.category.is_active()
    }

    /// Проходит ли пост фильтр.
    ///
    /// Поиск регистронезависимый, подстрокой по заголовку и тексту.
    pub fn matches(&self, post: &Post) -> bool {
        self.matches_search(post) && self.category.matches(&post.category)
    }

    fn matches_search(&self, post: &Post) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        post.title.to_lowercase().contains(&needle) || post.content.to_lowercase().contains(&needle)
    }

    /// Фильтрует и сортирует посты, не трогая исходный срез.
    pub fn apply<'a>(&self, posts: &'a [Post]) -> Vec<&'a Post> {
        let mut visible: Vec<&Post> = posts.iter().filter(|post| self.matches(post)).collect();
        visible.sort_by(|a, b| self.sort.compare(a, b));
        visible
    }

    /// То же, что [`PostQuery::apply`], но с владением.
    pub fn apply_owned(&self, posts: &[Post]) -> Vec<Post> {
        self.apply(posts).into_iter().cloned().collect()
    }
}
