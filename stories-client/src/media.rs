use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use stories_core::wire::UploadResponse;
use tracing::{debug, error};

use crate::error::{StoriesClientError, StoriesClientResult};
use crate::http_client::{Timeouts, join_url};

const DEFAULT_FILE_NAME: &str = "upload.bin";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Картинка, выбранная для публикации.
pub struct ImageFile {
    /// Имя файла.
    pub file_name: String,
    /// Содержимое.
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Картинка из памяти.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Читает картинку с диска.
    pub async fn read(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(DEFAULT_FILE_NAME)
            .to_string();
        Ok(Self { file_name, bytes })
    }
}

/// Хостинг картинок: принимает файл, возвращает публичную ссылку.
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Загружает файл и возвращает его HTTPS-ссылку.
    async fn upload(&self, image: ImageFile) -> StoriesClientResult<String>;
}

#[derive(Debug, Clone)]
/// Настройки медиахостинга.
pub struct MediaConfig {
    /// Базовый URL API хостинга, например `https://api.cloudinary.com/v1_1`.
    pub base_url: String,
    /// Имя облака (аккаунта).
    pub cloud_name: String,
    /// Unsigned upload preset.
    pub upload_preset: String,
}

impl MediaConfig {
    /// Адрес загрузки: `{base}/{cloud}/image/upload`.
    pub fn upload_url(&self) -> String {
        join_url(
            &self.base_url,
            &format!("{}/image/upload", self.cloud_name.trim_matches('/')),
        )
    }
}

#[derive(Debug, Clone)]
/// Загрузчик картинок через multipart-форму с upload preset.
pub struct MediaUploader {
    upload_url: String,
    upload_preset: String,
    client: Client,
}

impl MediaUploader {
    /// Создаёт загрузчик.
    pub fn new(config: &MediaConfig, timeouts: Timeouts) -> StoriesClientResult<Self> {
        Ok(Self {
            upload_url: config.upload_url(),
            upload_preset: config.upload_preset.clone(),
            client: timeouts.build_client()?,
        })
    }
}

#[async_trait]
impl MediaHost for MediaUploader {
    async fn upload(&self, image: ImageFile) -> StoriesClientResult<String> {
        debug!(url = %self.upload_url, file = %image.file_name, size = image.bytes.len(), "uploading image");

        let part = Part::bytes(image.bytes).file_name(image.file_name);
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(StoriesClientError::from_reqwest)?;

        let status = response.status();
        let body: UploadResponse = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                error!(%status, "image host returned unreadable body: {err}");
                return Err(StoriesClientError::Upload(format!("http status {status}")));
            }
        };

        match body.secure_url.filter(|url| !url.trim().is_empty()) {
            Some(url) => Ok(url),
            None => {
                let message = body
                    .error
                    .and_then(|err| err.message)
                    .unwrap_or_else(|| format!("no secure_url in response (http status {status})"));
                error!(%status, "image upload failed: {message}");
                Err(StoriesClientError::Upload(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_url_includes_cloud_name() {
        let config = MediaConfig {
            base_url: "https://api.cloudinary.com/v1_1/".to_string(),
            cloud_name: "demo".to_string(),
            upload_preset: "preset".to_string(),
        };
        assert_eq!(
            config.upload_url(),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
    }

    #[tokio::test]
    async fn image_file_reads_name_from_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("cover.png");
        std::fs::write(&path, [1_u8, 2, 3]).expect("write image");

        let image = ImageFile::read(&path).await.expect("image should load");
        assert_eq!(image.file_name, "cover.png");
        assert_eq!(image.bytes, vec![1, 2, 3]);
    }
}
