use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use stories_core::wire::{
    CreatePostEnvelope, LikeCountPatch, LikeRecord, ListPostsEnvelope, UploadResponse,
};
use stories_core::{CoreError, NewPost, Post};

const API_BASE_URL: &str = match option_env!("WASM_API_BASE_URL") {
    Some(value) => value,
    None => "http://127.0.0.1:5000",
};

const LIKES_BASE_URL: &str = match option_env!("WASM_LIKES_BASE_URL") {
    Some(value) => value,
    None => "http://127.0.0.1:8081",
};

const MEDIA_BASE_URL: &str = match option_env!("WASM_MEDIA_BASE_URL") {
    Some(value) => value,
    None => "https://api.cloudinary.com/v1_1",
};

const MEDIA_CLOUD: &str = match option_env!("WASM_MEDIA_CLOUD") {
    Some(value) => value,
    None => "dqsixqhky",
};

const MEDIA_PRESET: &str = match option_env!("WASM_MEDIA_PRESET") {
    Some(value) => value,
    None => "KahaniAI",
};

#[derive(Debug, Clone)]
pub(crate) enum ApiError {
    Network(String),
    Http { status: u16, message: String },
    Decode(String),
    Rejected(String),
    Upload(String),
    Invalid(String),
}

impl core::fmt::Display for ApiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Http { status, message } => write!(f, "http error {status}: {message}"),
            Self::Decode(msg) => write!(f, "decode error: {msg}"),
            Self::Rejected(msg) => write!(f, "rejected: {msg}"),
            Self::Upload(msg) => write!(f, "image upload failed: {msg}"),
            Self::Invalid(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self::Invalid(err.to_string())
    }
}

fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn network(err: gloo_net::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}

async fn parse_error_body(response: Response) -> ApiError {
    let status = response.status();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "request failed".to_string());

    let fallback = match status {
        400 => "Некорректный запрос".to_string(),
        401 => "Требуется авторизация".to_string(),
        403 => "Недостаточно прав для этой операции".to_string(),
        404 => "Ресурс не найден".to_string(),
        500..=599 => "Ошибка сервера".to_string(),
        _ => format!("HTTP ошибка {status}"),
    };

    let message = if text.trim().is_empty() { fallback } else { text };

    ApiError::Http { status, message }
}

async fn expect_ok(response: Response) -> Result<Response, ApiError> {
    if !response.ok() {
        return Err(parse_error_body(response).await);
    }
    Ok(response)
}

pub(crate) async fn list_posts() -> Result<Vec<Post>, ApiError> {
    let response = Request::get(&join(API_BASE_URL, "/api/blogs"))
        .send()
        .await
        .map_err(network)?;
    let envelope: ListPostsEnvelope = parse_json(expect_ok(response).await?).await?;

    if !envelope.success {
        return Ok(Vec::new());
    }
    Ok(envelope
        .data
        .unwrap_or_default()
        .into_iter()
        .map(Post::from)
        .collect())
}

/// Разбор ответа на создание поста; отказ `success: false` приходит с любым статусом.
fn create_outcome(status: u16, body: &str) -> Result<(), ApiError> {
    if matches!(status, 401 | 403) {
        return Err(ApiError::Http {
            status,
            message: "Требуется авторизация".to_string(),
        });
    }

    let ok = (200..300).contains(&status);
    let envelope = match serde_json::from_str::<CreatePostEnvelope>(body) {
        Ok(envelope) => envelope,
        Err(_) if !ok => {
            return Err(ApiError::Http {
                status,
                message: format!("HTTP ошибка {status}"),
            });
        }
        Err(err) => return Err(ApiError::Decode(err.to_string())),
    };

    if !envelope.success {
        let message = envelope.server_message().unwrap_or("Unknown error");
        return Err(ApiError::Rejected(message.to_string()));
    }
    if !ok {
        return Err(ApiError::Http {
            status,
            message: format!("HTTP ошибка {status}"),
        });
    }
    Ok(())
}

pub(crate) async fn create_post(post: &NewPost) -> Result<(), ApiError> {
    let response = Request::post(&join(API_BASE_URL, "/api/blogs"))
        .json(post)
        .map_err(network)?
        .send()
        .await
        .map_err(network)?;

    let status = response.status();
    let body = response.text().await.map_err(network)?;
    create_outcome(status, &body)
}

pub(crate) async fn upload_image(file: &web_sys::File) -> Result<String, ApiError> {
    let js = |_| ApiError::Upload("failed to build upload form".to_string());
    let form = web_sys::FormData::new().map_err(js)?;
    form.append_with_blob("file", file).map_err(js)?;
    form.append_with_str("upload_preset", MEDIA_PRESET).map_err(js)?;

    let url = join(MEDIA_BASE_URL, &format!("{MEDIA_CLOUD}/image/upload"));
    let response = Request::post(&url)
        .body(form)
        .map_err(network)?
        .send()
        .await
        .map_err(network)?;

    let body: UploadResponse = parse_json(response).await?;
    match body.secure_url.filter(|url| !url.trim().is_empty()) {
        Some(url) => Ok(url),
        None => Err(ApiError::Upload(
            body.error
                .and_then(|err| err.message)
                .unwrap_or_else(|| "no secure_url in response".to_string()),
        )),
    }
}

fn likes_url(post_id: &str) -> String {
    join(LIKES_BASE_URL, &format!("blog_posts/{post_id}/likes"))
}

pub(crate) async fn add_like(post_id: &str, user_id: &str) -> Result<(), ApiError> {
    let created_at = String::from(js_sys::Date::new_0().to_iso_string());
    let record = LikeRecord::new(user_id, created_at);

    let response = Request::post(&likes_url(post_id))
        .json(&record)
        .map_err(network)?
        .send()
        .await
        .map_err(network)?;
    expect_ok(response).await?;
    Ok(())
}

async fn find_likes(post_id: &str, user_id: &str) -> Result<Vec<LikeRecord>, ApiError> {
    let response = Request::get(&likes_url(post_id))
        .query([("userId", user_id)])
        .send()
        .await
        .map_err(network)?;
    let records: Vec<LikeRecord> = parse_json(expect_ok(response).await?).await?;
    Ok(records
        .into_iter()
        .filter(|record| record.user_id == user_id)
        .collect())
}

pub(crate) async fn has_like(post_id: &str, user_id: &str) -> Result<bool, ApiError> {
    Ok(!find_likes(post_id, user_id).await?.is_empty())
}

pub(crate) async fn remove_like(post_id: &str, user_id: &str) -> Result<bool, ApiError> {
    let Some(like_id) = find_likes(post_id, user_id)
        .await?
        .into_iter()
        .find_map(|record| record.id)
    else {
        return Ok(false);
    };

    let response = Request::delete(&format!("{}/{like_id}", likes_url(post_id)))
        .send()
        .await
        .map_err(network)?;
    expect_ok(response).await?;
    Ok(true)
}

pub(crate) async fn set_like_count(post_id: &str, likes: u64) -> Result<(), ApiError> {
    let response = Request::patch(&join(LIKES_BASE_URL, &format!("blog_posts/{post_id}")))
        .json(&LikeCountPatch { likes })
        .map_err(network)?
        .send()
        .await
        .map_err(network)?;
    expect_ok(response).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_outcome_keeps_reason_of_bad_request() {
        let err = create_outcome(400, r#"{"success":false,"message":"Title is required"}"#)
            .expect_err("must be rejected");
        assert!(matches!(err, ApiError::Rejected(message) if message == "Title is required"));
    }

    #[test]
    fn create_outcome_maps_auth_and_plain_errors() {
        assert!(matches!(
            create_outcome(401, r#"{"success":false}"#),
            Err(ApiError::Http { status: 401, .. })
        ));
        assert!(matches!(
            create_outcome(502, "<html>bad gateway</html>"),
            Err(ApiError::Http { status: 502, .. })
        ));
    }

    #[test]
    fn create_outcome_accepts_success_and_defaults_reason() {
        assert!(create_outcome(201, r#"{"success":true,"data":{"id":"p1"}}"#).is_ok());
        let err = create_outcome(200, r#"{"success":false}"#).expect_err("must be rejected");
        assert!(matches!(err, ApiError::Rejected(message) if message == "Unknown error"));
    }
}
