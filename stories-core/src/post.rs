use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

const JUST_NOW: &str = "Just now";

#[derive(Debug, Clone, PartialEq)]
/// Пост в том виде, в каком с ним работает клиент.
pub struct Post {
    /// Идентификатор поста (строкой, как пришёл из API).
    pub id: String,
    /// Заголовок.
    pub title: String,
    /// Полный текст.
    pub content: String,
    /// Имя автора.
    pub author: String,
    /// Идентификатор автора у провайдера identity.
    pub author_id: Option<String>,
    /// Категория, как её вернул API (обычно `Technology`/`Lifestyle`/`Other`).
    pub category: String,
    /// Ссылка на обложку.
    pub image_url: Option<String>,
    /// Время создания.
    pub created_at: CreatedAt,
    /// Количество лайков, никогда не отрицательное.
    pub likes: u64,
    /// Лайкнул ли пост текущий пользователь.
    pub is_liked: bool,
    /// Комментарии; клиенту нужно только их количество.
    pub comments: Vec<Value>,
}

impl Post {
    /// Количество комментариев.
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    /// Первая буква автора в верхнем регистре, `A` если автора нет.
    pub fn author_initial(&self) -> String {
        self.author
            .trim()
            .chars()
            .next()
            .map(|ch| ch.to_uppercase().collect())
            .unwrap_or_else(|| "A".to_string())
    }

    /// Подпись категории для карточки.
    pub fn category_label(&self) -> &str {
        let category = self.category.trim();
        if category.is_empty() { "general" } else { category }
    }

    /// Является ли пользователь с `viewer_id` автором поста.
    pub fn is_authored_by(&self, viewer_id: &str) -> bool {
        self.author_id.as_deref() == Some(viewer_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Время создания поста.
///
/// API отдаёт его в разных представлениях; всё, что не удалось привести к
/// моменту времени, считается `Unknown` и показывается как `Just now`.
pub enum CreatedAt {
    /// Момент времени неизвестен.
    #[default]
    Unknown,
    /// Момент времени в UTC.
    At(DateTime<Utc>),
}

impl CreatedAt {
    /// Разбирает значение `createdAt` из JSON.
    ///
    /// Поддерживаются RFC 3339 и `YYYY-MM-DD` строки, миллисекунды unix epoch,
    /// объекты `{seconds, nanoseconds}` / `{_seconds, _nanoseconds}` и
    /// `{"$date": ...}`.
    pub fn from_json(value: &Value) -> Self {
        let instant = match value {
            Value::String(raw) => parse_date_string(raw),
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|millis| millis as i64))
                .and_then(DateTime::from_timestamp_millis),
            Value::Object(map) => {
                if let Some(inner) = map.get("$date") {
                    return Self::from_json(inner);
                }
                if let Some(raw) = map.get("$numberLong").and_then(Value::as_str) {
                    return raw
                        .parse::<i64>()
                        .ok()
                        .and_then(DateTime::from_timestamp_millis)
                        .map_or(CreatedAt::Unknown, CreatedAt::At);
                }
                let seconds = map
                    .get("seconds")
                    .or_else(|| map.get("_seconds"))
                    .and_then(Value::as_i64);
                let nanos = map
                    .get("nanoseconds")
                    .or_else(|| map.get("_nanoseconds"))
                    .and_then(Value::as_u64)
                    .unwrap_or(0);
                seconds.and_then(|secs| DateTime::from_timestamp(secs, nanos.min(999_999_999) as u32))
            }
            _ => None,
        };

        instant.map_or(CreatedAt::Unknown, CreatedAt::At)
    }

    /// Момент времени, если он известен.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            CreatedAt::Unknown => None,
            CreatedAt::At(instant) => Some(*instant),
        }
    }

    /// Короткая дата `M/D/YYYY` или `Just now`.
    pub fn label(&self) -> String {
        match self {
            CreatedAt::Unknown => JUST_NOW.to_string(),
            CreatedAt::At(instant) => instant.format("%-m/%-d/%Y").to_string(),
        }
    }
}

fn parse_date_string(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn sample_post(author: &str) -> Post {
        Post {
            id: "1".to_string(),
            title: "Title".to_string(),
            content: "Content".to_string(),
            author: author.to_string(),
            author_id: Some("user_1".to_string()),
            category: String::new(),
            image_url: None,
            created_at: CreatedAt::Unknown,
            likes: 0,
            is_liked: false,
            comments: vec![json!({"text": "hi"}), json!({"text": "yo"})],
        }
    }

    #[test]
    fn created_at_parses_rfc3339() {
        let parsed = CreatedAt::from_json(&json!("2026-03-05T10:00:00Z"));
        let expected = Utc.with_ymd_and_hms(2026, 3, 5, 10, 0, 0).single().expect("valid ts");
        assert_eq!(parsed, CreatedAt::At(expected));
        assert_eq!(parsed.label(), "3/5/2026");
    }

    #[test]
    fn created_at_parses_date_only_and_millis() {
        let date_only = CreatedAt::from_json(&json!("2025-12-31"));
        assert_eq!(date_only.label(), "12/31/2025");

        let millis = CreatedAt::from_json(&json!(1_700_000_000_000_i64));
        assert_eq!(millis.label(), "11/14/2023");
    }

    #[test]
    fn created_at_parses_document_store_timestamps() {
        let plain = CreatedAt::from_json(&json!({"seconds": 1_700_000_000, "nanoseconds": 5}));
        let underscored = CreatedAt::from_json(&json!({"_seconds": 1_700_000_000, "_nanoseconds": 5}));
        assert_eq!(plain, underscored);
        assert_eq!(plain.label(), "11/14/2023");
    }

    #[test]
    fn created_at_parses_extended_json_date() {
        let parsed = CreatedAt::from_json(&json!({"$date": "2024-01-02T00:00:00.000Z"}));
        assert_eq!(parsed.label(), "1/2/2024");

        let long = CreatedAt::from_json(&json!({"$date": {"$numberLong": "1700000000000"}}));
        assert_eq!(long.label(), "11/14/2023");
    }

    #[test]
    fn created_at_falls_back_to_just_now() {
        assert_eq!(CreatedAt::from_json(&Value::Null).label(), "Just now");
        assert_eq!(CreatedAt::from_json(&json!("not a date")).label(), "Just now");
        assert_eq!(CreatedAt::from_json(&json!({"foo": 1})).label(), "Just now");
        assert_eq!(CreatedAt::from_json(&json!(true)), CreatedAt::Unknown);
    }

    #[test]
    fn author_initial_uppercases_or_defaults() {
        assert_eq!(sample_post("maya").author_initial(), "M");
        assert_eq!(sample_post("").author_initial(), "A");
    }

    #[test]
    fn category_label_defaults_to_general() {
        let mut post = sample_post("maya");
        assert_eq!(post.category_label(), "general");
        post.category = "Technology".to_string();
        assert_eq!(post.category_label(), "Technology");
    }

    #[test]
    fn comment_count_and_authorship() {
        let post = sample_post("maya");
        assert_eq!(post.comment_count(), 2);
        assert!(post.is_authored_by("user_1"));
        assert!(!post.is_authored_by("user_2"));
    }
}
