use std::path::{Path, PathBuf};
use std::time::Duration;

use feedgrab_core::{with_extension, HarvestConfig, ImageExtension, DEFAULT_USER_AGENT};
use feedgrab_logging::{grab_debug, grab_trace};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;

use crate::persist::{PersistError, StagedFile};
use crate::{FailureKind, FetchError};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// Budget for one attempt, body included.
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub user_agent: String,
    /// Attempts per URL, including the first.
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(10),
            redirect_limit: 5,
            max_bytes: 25 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_attempts: 2,
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl FetchSettings {
    pub fn from_config(config: &HarvestConfig) -> Self {
        Self {
            request_timeout: config.request_timeout(),
            user_agent: config.user_agent.clone(),
            max_attempts: config.download_retries,
            retry_delay: config.retry_delay(),
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Downloads `url` to `stem` plus an extension derived from the response,
    /// returning the written path.
    async fn download(&self, url: &str, stem: &Path) -> Result<PathBuf, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    async fn attempt(&self, url: &reqwest::Url, stem: &Path) -> Result<PathBuf, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(too_large(self.settings.max_bytes, content_len));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let target = with_extension(
            stem,
            ImageExtension::from_content_type(content_type.as_deref()),
        );

        let dir = target
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut staged = StagedFile::new_in(dir).map_err(map_persist_error)?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = staged.written() + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(too_large(self.settings.max_bytes, next_len));
            }
            staged.write_chunk(&chunk).map_err(map_persist_error)?;
        }
        grab_trace!("{} bytes staged for {:?}", staged.written(), target);

        staged.commit(&target).map_err(map_persist_error)
    }
}

#[async_trait::async_trait]
impl ImageFetcher for ReqwestFetcher {
    async fn download(&self, url: &str, stem: &Path) -> Result<PathBuf, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let max_attempts = self.settings.max_attempts.max(1);

        let mut attempt = 1;
        loop {
            match self.attempt(&parsed, stem).await {
                Ok(path) => return Ok(path),
                Err(err) if attempt < max_attempts && err.is_retryable() => {
                    grab_debug!(
                        "attempt {}/{} for {} failed: {}; retrying in {:?}",
                        attempt,
                        max_attempts,
                        url,
                        err,
                        self.settings.retry_delay
                    );
                    tokio::time::sleep(self.settings.retry_delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

fn too_large(max_bytes: u64, actual: u64) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

fn map_persist_error(err: PersistError) -> FetchError {
    FetchError::new(FailureKind::Io, err.to_string())
}
