//! JSON-представления внешних API: блог, медиахостинг и хранилище лайков.
//!
//! Разбор постов намеренно терпимый: API отдаёт поля в разных формах, а
//! клиенту нужна одна модель [`Post`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::post::{CreatedAt, Post};

const DEFAULT_CATEGORY: &str = "general";

#[derive(Debug, Clone, Deserialize)]
/// Обёртка ответов `/api/blogs`: `{ success, data?, message? }`.
pub struct Envelope<T> {
    /// Признак успеха.
    #[serde(default)]
    pub success: bool,
    /// Полезная нагрузка.
    pub data: Option<T>,
    /// Сообщение сервера (обычно при ошибке).
    #[serde(default)]
    pub message: Option<String>,
    /// Альтернативное поле для текста ошибки.
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// Текст ошибки сервера, если он есть.
    pub fn server_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}

/// Ответ `GET /api/blogs`.
pub type ListPostsEnvelope = Envelope<Vec<PostRecord>>;

/// Ответ `POST /api/blogs`.
pub type CreatePostEnvelope = Envelope<Value>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Пост в том виде, в каком его отдаёт API.
pub struct PostRecord {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default, rename = "_id")]
    object_id: Option<Value>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    author_id: Option<Value>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    created_at: Value,
    #[serde(default)]
    likes: Option<Value>,
    #[serde(default)]
    is_liked: Option<bool>,
    #[serde(default)]
    comments: Option<Vec<Value>>,
}

impl From<PostRecord> for Post {
    fn from(record: PostRecord) -> Self {
        let id = record
            .id
            .as_ref()
            .and_then(id_from_json)
            .or_else(|| record.object_id.as_ref().and_then(id_from_json))
            .unwrap_or_default();

        let image_url = [record.image_url, record.image]
            .into_iter()
            .flatten()
            .map(|url| url.trim().to_string())
            .find(|url| !url.is_empty());

        let category = record
            .category
            .map(|category| category.trim().to_string())
            .filter(|category| !category.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        Self {
            id,
            title: record.title.unwrap_or_default(),
            content: record.content.unwrap_or_default(),
            author: record.author.unwrap_or_default(),
            author_id: record.author_id.as_ref().and_then(id_from_json),
            category,
            image_url,
            created_at: CreatedAt::from_json(&record.created_at),
            likes: record.likes.as_ref().map_or(0, likes_from_json),
            is_liked: record.is_liked.unwrap_or(false),
            comments: record.comments.unwrap_or_default(),
        }
    }
}

fn id_from_json(value: &Value) -> Option<String> {
    match value {
        Value::String(raw) if !raw.trim().is_empty() => Some(raw.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Object(map) => map.get("$oid").and_then(id_from_json),
        _ => None,
    }
}

fn likes_from_json(value: &Value) -> u64 {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|likes| *likes > 0.0).map(|likes| likes as u64))
            .unwrap_or(0),
        Value::String(raw) => raw.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

#[derive(Debug, Clone, Deserialize)]
/// Ответ медиахостинга после загрузки картинки.
pub struct UploadResponse {
    /// HTTPS-ссылка на загруженный файл.
    #[serde(default)]
    pub secure_url: Option<String>,
    /// Ошибка хостинга.
    #[serde(default)]
    pub error: Option<UploadErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
/// Тело ошибки медиахостинга.
pub struct UploadErrorBody {
    /// Текст ошибки.
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Запись о лайке в хранилище документов.
pub struct LikeRecord {
    /// Идентификатор документа (есть только у прочитанных записей).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Кто поставил лайк.
    pub user_id: String,
    /// Когда поставлен лайк, RFC 3339.
    pub created_at: String,
}

impl LikeRecord {
    /// Новая запись для отправки в хранилище.
    pub fn new(user_id: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            id: None,
            user_id: user_id.into(),
            created_at: created_at.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
/// Тело обновления счётчика лайков.
pub struct LikeCountPatch {
    /// Новое значение счётчика.
    pub likes: u64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn decode(value: Value) -> Post {
        let record: PostRecord = serde_json::from_value(value).expect("record should parse");
        Post::from(record)
    }

    #[test]
    fn decodes_full_record() {
        let post = decode(json!({
            "id": "abc",
            "title": "Hello",
            "content": "World",
            "author": "Maya",
            "authorId": "user_1",
            "category": "Technology",
            "imageUrl": "https://img.example/a.png",
            "createdAt": "2026-02-01T08:00:00Z",
            "likes": 3,
            "isLiked": true,
            "comments": [{"text": "nice"}]
        }));

        assert_eq!(post.id, "abc");
        assert_eq!(post.author_id.as_deref(), Some("user_1"));
        assert_eq!(post.image_url.as_deref(), Some("https://img.example/a.png"));
        assert_eq!(post.created_at.label(), "2/1/2026");
        assert_eq!(post.likes, 3);
        assert!(post.is_liked);
        assert_eq!(post.comment_count(), 1);
    }

    #[test]
    fn decodes_sparse_record_with_defaults() {
        let post = decode(json!({
            "_id": {"$oid": "65f0c0ffee"},
            "title": "Only title",
            "content": "body",
            "image": "",
            "likes": -4,
            "createdAt": null,
            "comments": null
        }));

        assert_eq!(post.id, "65f0c0ffee");
        assert_eq!(post.category, "general");
        assert_eq!(post.image_url, None);
        assert_eq!(post.likes, 0);
        assert!(!post.is_liked);
        assert_eq!(post.created_at, CreatedAt::Unknown);
        assert_eq!(post.comment_count(), 0);
        assert_eq!(post.author_initial(), "A");
    }

    #[test]
    fn prefers_id_over_object_id_and_falls_back_to_image() {
        let post = decode(json!({
            "id": 17,
            "_id": "ignored",
            "title": "t",
            "content": "c",
            "image": "https://img.example/b.png"
        }));
        assert_eq!(post.id, "17");
        assert_eq!(post.image_url.as_deref(), Some("https://img.example/b.png"));
    }

    #[test]
    fn envelope_exposes_server_message() {
        let envelope: CreatePostEnvelope =
            serde_json::from_value(json!({"success": false, "message": "Title is required"}))
                .expect("envelope should parse");
        assert!(!envelope.success);
        assert_eq!(envelope.server_message(), Some("Title is required"));

        let blank: CreatePostEnvelope =
            serde_json::from_value(json!({"success": false, "message": "  "})).expect("parse");
        assert_eq!(blank.server_message(), None);
    }

    #[test]
    fn list_envelope_parses_posts() {
        let envelope: ListPostsEnvelope = serde_json::from_value(json!({
            "success": true,
            "data": [{"id": "1", "title": "a", "content": "b"}]
        }))
        .expect("envelope should parse");
        let posts: Vec<Post> = envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .map(Post::from)
            .collect();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "a");
    }

    #[test]
    fn like_record_uses_camel_case() {
        let record = LikeRecord::new("u1", "2026-01-01T00:00:00Z");
        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(value, json!({"userId": "u1", "createdAt": "2026-01-01T00:00:00Z"}));
    }
}
