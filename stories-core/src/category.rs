use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Категория поста в терминах интерфейса.
pub enum Category {
    /// Общее.
    #[default]
    General,
    /// Здоровье.
    Health,
    /// Технологии.
    Technology,
    /// Образ жизни.
    Lifestyle,
    /// Личная история.
    Personal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Категория в терминах API (перечисление на стороне бэкенда).
pub enum BackendCategory {
    /// `Technology`.
    Technology,
    /// `Lifestyle`.
    Lifestyle,
    /// `Other`.
    Other,
}

impl Category {
    /// Все категории в порядке отображения в селекторе.
    pub const ALL: [Category; 5] = [
        Category::General,
        Category::Health,
        Category::Technology,
        Category::Lifestyle,
        Category::Personal,
    ];

    /// Значение, которое передаётся в форме и в query.
    pub fn value(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Health => "health",
            Category::Technology => "technology",
            Category::Lifestyle => "lifestyle",
            Category::Personal => "personal",
        }
    }

    /// Человекочитаемая подпись.
    pub fn label(self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Health => "Health & Wellness",
            Category::Technology => "Technology",
            Category::Lifestyle => "Lifestyle",
            Category::Personal => "Personal Story",
        }
    }

    /// Категория бэкенда, в которую отображается UI-категория.
    pub fn backend(self) -> BackendCategory {
        match self {
            Category::Technology => BackendCategory::Technology,
            Category::Lifestyle => BackendCategory::Lifestyle,
            Category::General | Category::Health | Category::Personal => BackendCategory::Other,
        }
    }

    /// Отображение произвольного значения формы в категорию бэкенда.
    ///
    /// Неизвестные значения уходят в `Other`.
    pub fn backend_for_value(value: &str) -> BackendCategory {
        value
            .parse::<Category>()
            .map(Category::backend)
            .unwrap_or(BackendCategory::Other)
    }
}

impl BackendCategory {
    /// Строковое представление, как его ждёт API.
    pub fn as_str(self) -> &'static str {
        match self {
            BackendCategory::Technology => "Technology",
            BackendCategory::Lifestyle => "Lifestyle",
            BackendCategory::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl fmt::Display for BackendCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.value().eq_ignore_ascii_case(raw))
            .ok_or(CoreError::Validation {
                field: "category",
                message: "unknown category",
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Выбор в фильтре категорий: все или одна конкретная.
pub enum CategoryFilter {
    /// Без фильтра.
    #[default]
    All,
    /// Только посты выбранной категории.
    Only(Category),
}

impl CategoryFilter {
    /// Значение `all`/`general`/... для селектора.
    pub fn value(self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category.value(),
        }
    }

    /// Подпись для селектора.
    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => "All Categories",
            CategoryFilter::Only(category) => category.label(),
        }
    }

    /// Пункты селектора: `all` и затем все категории.
    pub fn options() -> Vec<CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(Category::ALL.into_iter().map(CategoryFilter::Only))
            .collect()
    }

    /// Совпадает ли категория поста (как её вернул API) с выбором.
    ///
    /// Сравнение точное: с категорией бэкенда, в которую отображается выбор,
    /// либо с самим UI-значением.
    pub fn matches(self, post_category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => {
                post_category == category.backend().as_str() || post_category == category.value()
            }
        }
    }

    /// Активен ли фильтр.
    pub fn is_active(self) -> bool {
        !matches!(self, CategoryFilter::All)
    }
}

impl FromStr for CategoryFilter {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        raw.parse::<Category>().map(CategoryFilter::Only)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_mapping_follows_table() {
        assert_eq!(Category::General.backend(), BackendCategory::Other);
        assert_eq!(Category::Health.backend(), BackendCategory::Other);
        assert_eq!(Category::Personal.backend(), BackendCategory::Other);
        assert_eq!(Category::Technology.backend(), BackendCategory::Technology);
        assert_eq!(Category::Lifestyle.backend(), BackendCategory::Lifestyle);
    }

    #[test]
    fn unknown_value_maps_to_other() {
        assert_eq!(Category::backend_for_value("poetry"), BackendCategory::Other);
        assert_eq!(
            Category::backend_for_value("technology"),
            BackendCategory::Technology
        );
    }

    #[test]
    fn backend_category_serializes_as_api_enum() {
        let raw = serde_json::to_string(&BackendCategory::Technology).expect("serialize");
        assert_eq!(raw, "\"Technology\"");
    }

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!("Health".parse::<Category>(), Ok(Category::Health));
        assert!("nope".parse::<Category>().is_err());
    }

    #[test]
    fn category_filter_parses_all() {
        assert_eq!("all".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!(
            "lifestyle".parse::<CategoryFilter>(),
            Ok(CategoryFilter::Only(Category::Lifestyle))
        );
    }

    #[test]
    fn category_filter_matches_backend_name_exactly() {
        let filter = CategoryFilter::Only(Category::Technology);
        assert!(filter.matches("Technology"));
        assert!(filter.matches("technology"));
        assert!(!filter.matches("TECHNOLOGY"));
        assert!(!filter.matches("Other"));

        let general = CategoryFilter::Only(Category::General);
        assert!(general.matches("Other"));
        assert!(CategoryFilter::All.matches("anything"));
    }

    #[test]
    fn options_start_with_all() {
        let options = CategoryFilter::options();
        assert_eq!(options.len(), 6);
        assert_eq!(options[0].label(), "All Categories");
        assert_eq!(options[2].label(), "Health & Wellness");
    }
}
