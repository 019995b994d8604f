use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::category::{BackendCategory, Category};
use crate::error::{CoreError, CoreResult};

const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Авторизованный пользователь, от имени которого ставятся лайки и
/// публикуются посты. Саму аутентификацию выполняет внешний провайдер.
pub struct Viewer {
    /// Идентификатор у провайдера.
    pub id: String,
    /// Полное имя.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Основной email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Viewer {
    /// Создаёт пользователя только с идентификатором.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            full_name: None,
            email: None,
        }
    }

    /// Имя автора для публикации: полное имя, затем email, затем `Anonymous`.
    pub fn display_name(&self) -> String {
        [self.full_name.as_deref(), self.email.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty())
            .unwrap_or(ANONYMOUS)
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
/// Состояние формы создания поста.
pub struct ComposeForm {
    /// Заголовок.
    #[validate(length(min = 1))]
    pub title: String,
    /// Текст.
    #[validate(length(min = 1))]
    pub content: String,
    /// Выбранная категория, по умолчанию `general`.
    pub category: Category,
}

impl ComposeForm {
    /// Новая форма.
    pub fn new(title: impl Into<String>, content: impl Into<String>, category: Category) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category,
        }
    }

    /// Проверяет форму после обрезки пробелов.
    pub fn check(&self) -> CoreResult<()> {
        let normalized = self.normalized();
        if let Err(errors) = normalized.validate() {
            if errors.errors().contains_key("title") {
                return Err(CoreError::Validation {
                    field: "title",
                    message: "must not be empty",
                });
            }
            return Err(CoreError::Validation {
                field: "content",
                message: "must not be empty",
            });
        }
        Ok(())
    }

    /// Собирает тело запроса на создание поста.
    ///
    /// `image_url` это ссылка, которую вернул медиахостинг; без картинки
    /// уходит пустая строка.
    pub fn into_new_post(self, viewer: &Viewer, image_url: Option<String>) -> CoreResult<NewPost> {
        self.check()?;
        let form = self.normalized();

        Ok(NewPost {
            title: form.title,
            content: form.content,
            category: form.category.backend(),
            image: image_url.unwrap_or_default(),
            author: viewer.display_name(),
            author_id: viewer.id.clone(),
        })
    }

    fn normalized(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            category: self.category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Тело `POST /api/blogs`.
pub struct NewPost {
    /// Заголовок.
    pub title: String,
    /// Текст.
    pub content: String,
    /// Категория бэкенда.
    pub category: BackendCategory,
    /// Ссылка на картинку или пустая строка.
    pub image: String,
    /// Имя автора.
    pub author: String,
    /// Идентификатор автора.
    pub author_id: String,
}
