use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use stories_client::{ClientConfig, MediaConfig, Timeouts};

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_MEDIA_URL: &str = "https://api.cloudinary.com/v1_1";
const DEFAULT_MEDIA_CLOUD: &str = "dqsixqhky";
const DEFAULT_MEDIA_PRESET: &str = "KahaniAI";
const DEFAULT_LIKES_URL: &str = "http://127.0.0.1:8081";

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) api_url: String,
    pub(crate) media_url: String,
    pub(crate) media_cloud: String,
    pub(crate) media_preset: String,
    pub(crate) likes_url: String,
    pub(crate) connect_timeout_secs: u64,
    pub(crate) request_timeout_secs: Option<u64>,
    pub(crate) log_level: String,
}

impl Settings {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let connect_timeout_secs =
            parse_positive_u64("STORIES_CONNECT_TIMEOUT_SECS", lookup("STORIES_CONNECT_TIMEOUT_SECS"))?
                .unwrap_or(5);
        let request_timeout_secs =
            parse_positive_u64("STORIES_REQUEST_TIMEOUT_SECS", lookup("STORIES_REQUEST_TIMEOUT_SECS"))?;
        let log_level = lookup("LOG_LEVEL")
            .or_else(|| lookup("RUST_LOG"))
            .unwrap_or_else(|| "warn".to_string());

        Ok(Self {
            api_url: get("STORIES_API_URL", DEFAULT_API_URL),
            media_url: get("STORIES_MEDIA_URL", DEFAULT_MEDIA_URL),
            media_cloud: get("STORIES_MEDIA_CLOUD", DEFAULT_MEDIA_CLOUD),
            media_preset: get("STORIES_MEDIA_PRESET", DEFAULT_MEDIA_PRESET),
            likes_url: get("STORIES_LIKES_URL", DEFAULT_LIKES_URL),
            connect_timeout_secs,
            request_timeout_secs,
            log_level,
        })
    }

    pub(crate) fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_base_url: self.api_url.clone(),
            media: MediaConfig {
                base_url: self.media_url.clone(),
                cloud_name: self.media_cloud.clone(),
                upload_preset: self.media_preset.clone(),
            },
            likes_base_url: self.likes_url.clone(),
            timeouts: Timeouts {
                connect: Duration::from_secs(self.connect_timeout_secs),
                request: self.request_timeout_secs.map(Duration::from_secs),
            },
        }
    }
}

fn parse_positive_u64(key: &str, raw: Option<String>) -> Result<Option<u64>> {
    let Some(raw) = raw.map(|raw| raw.trim().to_string()).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };

    let value = raw
        .parse::<u64>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;
    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_env_is_empty() {
        let settings = settings(&[]).expect("defaults must load");
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.media_cloud, "dqsixqhky");
        assert_eq!(settings.media_preset, "KahaniAI");
        assert_eq!(settings.connect_timeout_secs, 5);
        assert_eq!(settings.request_timeout_secs, None);
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn env_overrides_defaults() {
        let settings = settings(&[
            ("STORIES_API_URL", "http://blog.local"),
            ("STORIES_REQUEST_TIMEOUT_SECS", "30"),
            ("RUST_LOG", "debug"),
        ])
        .expect("settings must load");
        assert_eq!(settings.api_url, "http://blog.local");
        assert_eq!(settings.request_timeout_secs, Some(30));
        assert_eq!(settings.log_level, "debug");

        let config = settings.client_config();
        assert_eq!(config.timeouts.request, Some(Duration::from_secs(30)));
        assert_eq!(
            config.media.upload_url(),
            "https://api.cloudinary.com/v1_1/dqsixqhky/image/upload"
        );
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = settings(&[("STORIES_CONNECT_TIMEOUT_SECS", "0")]).expect_err("must fail");
        assert!(err.to_string().contains("must be > 0"));
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        assert!(settings(&[("STORIES_REQUEST_TIMEOUT_SECS", "soon")]).is_err());
    }
}
