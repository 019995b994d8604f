use stories_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `stories-client`.
pub enum StoriesClientError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Требуется авторизация.
    #[error("unauthorized")]
    Unauthorized,

    /// Запрошенный ресурс не найден.
    #[error("not found")]
    NotFound,

    /// Некорректный запрос или неожиданный HTTP-статус.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// API ответил `success: false`.
    #[error("rejected by server: {0}")]
    Rejected(String),

    /// Медиахостинг не вернул ссылку на файл.
    #[error("image upload failed: {0}")]
    Upload(String),

    /// Ошибка доменного слоя (валидация, отсутствующий пост, нет входа).
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Результат операций `stories-client`.
pub type StoriesClientResult<T> = Result<T, StoriesClientError>;

impl StoriesClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Self::Unauthorized
            }
            reqwest::StatusCode::NOT_FOUND => Self::NotFound,
            _ => {
                let message = message.unwrap_or_else(|| format!("http status {status}"));
                Self::InvalidRequest(message)
            }
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        Self::Http(err)
    }

    /// Сообщение для пользователя при неудачной публикации.
    pub fn publish_message(&self) -> String {
        match self {
            Self::Rejected(message) => format!("Error creating blog post: {message}"),
            Self::Core(CoreError::NotSignedIn) | Self::Unauthorized => {
                "Please login to create a blog post".to_string()
            }
            Self::Core(err @ CoreError::Validation { .. }) => format!("Error creating blog post: {err}"),
            _ => "Error creating blog post. Please try again.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_maps_to_variants() {
        assert!(matches!(
            StoriesClientError::from_http_status(reqwest::StatusCode::FORBIDDEN, None),
            StoriesClientError::Unauthorized
        ));
        assert!(matches!(
            StoriesClientError::from_http_status(reqwest::StatusCode::NOT_FOUND, None),
            StoriesClientError::NotFound
        ));
        match StoriesClientError::from_http_status(reqwest::StatusCode::BAD_GATEWAY, None) {
            StoriesClientError::InvalidRequest(message) => {
                assert_eq!(message, "http status 502 Bad Gateway")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn publish_message_matches_alert_texts() {
        assert_eq!(
            StoriesClientError::Rejected("Unknown error".to_string()).publish_message(),
            "Error creating blog post: Unknown error"
        );
        assert_eq!(
            StoriesClientError::Core(CoreError::NotSignedIn).publish_message(),
            "Please login to create a blog post"
        );
        assert_eq!(
            StoriesClientError::Upload("no url".to_string()).publish_message(),
            "Error creating blog post. Please try again."
        );
    }
}
