use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Ошибки доменного слоя.
pub enum CoreError {
    /// Поле формы не прошло проверку.
    #[error("validation failed for '{field}': {message}")]
    Validation {
        /// Имя поля.
        field: &'static str,
        /// Описание нарушения.
        message: &'static str,
    },

    /// Пост с таким идентификатором отсутствует в хранилище.
    #[error("post not found: {0}")]
    PostNotFound(String),

    /// Операция требует авторизованного пользователя.
    #[error("sign in required")]
    NotSignedIn,
}

/// Результат операций доменного слоя.
pub type CoreResult<T> = Result<T, CoreError>;
