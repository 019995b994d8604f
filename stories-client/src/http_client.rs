use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use stories_core::wire::{CreatePostEnvelope, ListPostsEnvelope};
use stories_core::{NewPost, Post};
use tracing::{debug, warn};

use crate::error::{StoriesClientError, StoriesClientResult};

const BLOGS_PATH: &str = "/api/blogs";

/// Операции блог-API, которыми пользуется [`crate::StoryFeed`].
#[async_trait]
pub trait PostsApi: Send + Sync {
    /// Все посты.
    async fn list_posts(&self) -> StoriesClientResult<Vec<Post>>;
    /// Создаёт пост.
    async fn create_post(&self, post: &NewPost) -> StoriesClientResult<()>;
}

#[derive(Debug, Clone, Copy)]
/// Таймауты HTTP-клиента.
pub struct Timeouts {
    /// Таймаут установления соединения.
    pub connect: Duration,
    /// Таймаут запроса целиком; `None` значит без ограничения.
    pub request: Option<Duration>,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(5),
            request: None,
        }
    }
}

impl Timeouts {
    pub(crate) fn build_client(&self) -> StoriesClientResult<Client> {
        let mut builder = Client::builder().connect_timeout(self.connect);
        if let Some(request) = self.request {
            builder = builder.timeout(request);
        }
        builder.build().map_err(StoriesClientError::Http)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Clone)]
/// HTTP-клиент блог-API (`/api/blogs`).
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Создаёт клиент с базовым URL API.
    pub fn new(base_url: impl Into<String>, timeouts: Timeouts) -> StoriesClientResult<Self> {
        Ok(Self {
            base_url: base_url.into(),
            client: timeouts.build_client()?,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    async fn decode_error(response: reqwest::Response) -> StoriesClientError {
        let status = response.status();

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => body
                .message
                .or(body.error)
                .unwrap_or_else(|| format!("http status {status}")),
            Err(_) => format!("http status {status}"),
        };
        StoriesClientError::from_http_status(status, Some(message))
    }

    /// универсальный helper для запросов с json-ответом
    async fn send_json<TReq, TRes>(
        &self,
        method: Method,
        path: &str,
        body: Option<&TReq>,
    ) -> StoriesClientResult<TRes>
    where
        TReq: Serialize,
        TRes: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!(%method, %url, "blog api request");

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(StoriesClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        response
            .json::<TRes>()
            .await
            .map_err(StoriesClientError::from_reqwest)
    }
}

#[async_trait]
impl PostsApi for ApiClient {
    async fn list_posts(&self) -> StoriesClientResult<Vec<Post>> {
        let envelope: ListPostsEnvelope = self
            .send_json::<(), _>(Method::GET, BLOGS_PATH, None)
            .await?;

        if !envelope.success {
            warn!(
                message = envelope.server_message().unwrap_or_default(),
                "blog api answered success=false on list"
            );
            return Ok(Vec::new());
        }

        Ok(envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .map(Post::from)
            .collect())
    }

    async fn create_post(&self, post: &NewPost) -> StoriesClientResult<()> {
        let url = self.endpoint(BLOGS_PATH);
        debug!(method = %Method::POST, %url, "blog api request");

        let response = self
            .client
            .post(url)
            .json(post)
            .send()
            .await
            .map_err(StoriesClientError::from_reqwest)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoriesClientError::Unauthorized);
        }

        // отказ приходит конвертом `success: false` и с 2xx, и с 4xx/5xx
        let envelope = match response.json::<CreatePostEnvelope>().await {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(StoriesClientError::from_http_status(status, None));
            }
            Err(err) => return Err(StoriesClientError::from_reqwest(err)),
        };

        if !envelope.success {
            let message = envelope
                .server_message()
                .unwrap_or("Unknown error")
                .to_string();
            return Err(StoriesClientError::Rejected(message));
        }
        if !status.is_success() {
            return Err(StoriesClientError::from_http_status(status, None));
        }
        Ok(())
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_normalizes_slashes() {
        assert_eq!(
            join_url("http://127.0.0.1:5000/", "/api/blogs"),
            "http://127.0.0.1:5000/api/blogs"
        );
        assert_eq!(join_url("http://h", "api/blogs"), "http://h/api/blogs");
    }

    #[test]
    fn default_timeouts_leave_requests_unbounded() {
        let timeouts = Timeouts::default();
        assert_eq!(timeouts.connect, Duration::from_secs(5));
        assert!(timeouts.request.is_none());
    }
}
