//! Клиентская библиотека блога: список и создание постов через блог-API,
//! загрузка картинок на медиахостинг и запись лайков в хранилище документов.
//!
//! Все три внешние системы спрятаны за трейтами ([`PostsApi`], [`MediaHost`],
//! [`LikeRecords`]), а [`StoryFeed`] связывает их с локальным
//! [`stories_core::PostStore`].
#![warn(missing_docs)]

mod error;
mod feed;
mod http_client;
mod likes;
mod media;

pub use error::{StoriesClientError, StoriesClientResult};
pub use feed::StoryFeed;
pub use http_client::{ApiClient, PostsApi, Timeouts};
pub use likes::{DocumentStoreLikes, LikeRecords};
pub use media::{ImageFile, MediaConfig, MediaHost, MediaUploader};

/// Лента поверх настоящих HTTP-клиентов.
pub type HttpStoryFeed = StoryFeed<ApiClient, MediaUploader, DocumentStoreLikes>;

#[derive(Debug, Clone)]
/// Адреса внешних систем и таймауты.
pub struct ClientConfig {
    /// Базовый URL блог-API, например `http://127.0.0.1:5000`.
    pub api_base_url: String,
    /// Медиахостинг.
    pub media: MediaConfig,
    /// Базовый URL хранилища лайков.
    pub likes_base_url: String,
    /// Таймауты HTTP.
    pub timeouts: Timeouts,
}

impl HttpStoryFeed {
    /// Создаёт ленту с HTTP-клиентами по конфигурации.
    pub fn connect(config: &ClientConfig) -> StoriesClientResult<Self> {
        let api = ApiClient::new(config.api_base_url.clone(), config.timeouts)?;
        let media = MediaUploader::new(&config.media, config.timeouts)?;
        let likes = DocumentStoreLikes::new(config.likes_base_url.clone(), config.timeouts)?;
        Ok(StoryFeed::new(api, media, likes))
    }
}
