use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::{Client, Method};
use serde::Serialize;
use stories_core::wire::{LikeCountPatch, LikeRecord};
use tracing::debug;

use crate::error::{StoriesClientError, StoriesClientResult};
use crate::http_client::{Timeouts, join_url};

const POSTS_COLLECTION: &str = "blog_posts";
const LIKES_COLLECTION: &str = "likes";

/// Хранилище записей о лайках и счётчика лайков поста.
#[async_trait]
pub trait LikeRecords: Send + Sync {
    /// Есть ли у пользователя запись о лайке поста.
    async fn has_like(&self, post_id: &str, user_id: &str) -> StoriesClientResult<bool>;
    /// Добавляет запись о лайке пользователя.
    async fn add_like(&self, post_id: &str, user_id: &str) -> StoriesClientResult<()>;
    /// Удаляет первую запись о лайке пользователя. `false`, если записи не было.
    async fn remove_like(&self, post_id: &str, user_id: &str) -> StoriesClientResult<bool>;
    /// Записывает новое значение счётчика.
    async fn set_like_count(&self, post_id: &str, likes: u64) -> StoriesClientResult<()>;
}

#[derive(Debug, Clone)]
/// REST-доступ к коллекциям `blog_posts/{id}/likes` в хранилище документов.
pub struct DocumentStoreLikes {
    base_url: String,
    client: Client,
}

impl DocumentStoreLikes {
    /// Создаёт клиент хранилища с базовым URL.
    pub fn new(base_url: impl Into<String>, timeouts: Timeouts) -> StoriesClientResult<Self> {
        Ok(Self {
            base_url: base_url.into(),
            client: timeouts.build_client()?,
        })
    }

    fn post_path(post_id: &str) -> String {
        format!("{POSTS_COLLECTION}/{post_id}")
    }

    fn likes_path(post_id: &str) -> String {
        format!("{POSTS_COLLECTION}/{post_id}/{LIKES_COLLECTION}")
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&(impl Serialize + Sync)>,
    ) -> StoriesClientResult<reqwest::Response> {
        let url = join_url(&self.base_url, path);
        debug!(%method, %url, "like store request");

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(StoriesClientError::from_reqwest)?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = if text.trim().is_empty() { None } else { Some(text) };
            return Err(StoriesClientError::from_http_status(status, message));
        }
        Ok(response)
    }

    async fn find_likes(&self, post_id: &str, user_id: &str) -> StoriesClientResult<Vec<LikeRecord>> {
        let url = join_url(&self.base_url, &Self::likes_path(post_id));
        debug!(%url, user_id, "looking up like records");

        let response = self
            .client
            .get(url)
            .query(&[("userId", user_id)])
            .send()
            .await
            .map_err(StoriesClientError::from_reqwest)?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoriesClientError::from_http_status(status, None));
        }

        response
            .json::<Vec<LikeRecord>>()
            .await
            .map_err(StoriesClientError::from_reqwest)
    }
}

#[async_trait]
impl LikeRecords for DocumentStoreLikes {
    async fn has_like(&self, post_id: &str, user_id: &str) -> StoriesClientResult<bool> {
        let records = self.find_likes(post_id, user_id).await?;
        Ok(records.iter().any(|record| record.user_id == user_id))
    }

    async fn add_like(&self, post_id: &str, user_id: &str) -> StoriesClientResult<()> {
        let record = LikeRecord::new(user_id, Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        self.send(Method::POST, &Self::likes_path(post_id), Some(&record))
            .await?;
        Ok(())
    }

    async fn remove_like(&self, post_id: &str, user_id: &str) -> StoriesClientResult<bool> {
        let records = self.find_likes(post_id, user_id).await?;
        let Some(like_id) = records
            .into_iter()
            .filter(|record| record.user_id == user_id)
            .find_map(|record| record.id)
        else {
            return Ok(false);
        };

        let path = format!("{}/{like_id}", Self::likes_path(post_id));
        self.send(Method::DELETE, &path, None::<&()>).await?;
        Ok(true)
    }

    async fn set_like_count(&self, post_id: &str, likes: u64) -> StoriesClientResult<()> {
        let patch = LikeCountPatch { likes };
        self.send(Method::PATCH, &Self::post_path(post_id), Some(&patch))
            .await?;
        Ok(())
    }
}
