use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_FEED_URL: &str = "https://www.reddit.com/r/memes/";

/// Identity sent both by the browser and by the image fetcher.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("feed url is not valid: {0}")]
    InvalidFeedUrl(String),
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must be a finite, non-negative number of seconds (got {value})")]
    InvalidSeconds { field: &'static str, value: f64 },
}

/// Launch options for the rendering browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserOptions {
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    /// Required when the browser runs as root, e.g. inside containers.
    pub no_sandbox: bool,
    /// Explicit browser binary; auto-detected when absent.
    pub chrome_executable: Option<PathBuf>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            no_sandbox: false,
            chrome_executable: None,
        }
    }
}

/// Everything one harvesting run needs. Passed explicitly through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    pub feed_url: String,
    pub download_dir: PathBuf,
    pub max_images: usize,
    pub scroll_pause_seconds: f64,
    pub max_scroll_rounds: u32,
    pub element_wait_timeout_seconds: f64,
    /// Attempts per image URL, including the first one.
    pub download_retries: u32,
    pub retry_delay_seconds: f64,
    pub request_timeout_seconds: f64,
    pub post_tag: String,
    pub image_selector: String,
    pub file_prefix: String,
    pub user_agent: String,
    pub browser: BrowserOptions,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            download_dir: PathBuf::from("downloaded_images"),
            max_images: 10,
            scroll_pause_seconds: 2.0,
            max_scroll_rounds: 3,
            element_wait_timeout_seconds: 15.0,
            download_retries: 2,
            retry_delay_seconds: 1.0,
            request_timeout_seconds: 10.0,
            post_tag: "shreddit-post".to_string(),
            image_selector: "img.preview-img.media-lightbox-img".to_string(),
            file_prefix: "reddit_meme".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            browser: BrowserOptions::default(),
        }
    }
}

impl HarvestConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.feed_url)
            .map_err(|err| ConfigError::InvalidFeedUrl(format!("{}: {err}", self.feed_url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidFeedUrl(format!(
                "{}: unsupported scheme {}",
                self.feed_url,
                parsed.scheme()
            )));
        }

        if self.max_images == 0 {
            return Err(ConfigError::Zero { field: "max_images" });
        }
        if self.download_retries == 0 {
            return Err(ConfigError::Zero {
                field: "download_retries",
            });
        }

        for (field, value) in [
            ("post_tag", &self.post_tag),
            ("image_selector", &self.image_selector),
            ("file_prefix", &self.file_prefix),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty { field });
            }
        }

        for (field, value) in [
            ("scroll_pause_seconds", self.scroll_pause_seconds),
            ("element_wait_timeout_seconds", self.element_wait_timeout_seconds),
            ("retry_delay_seconds", self.retry_delay_seconds),
            ("request_timeout_seconds", self.request_timeout_seconds),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidSeconds { field, value });
            }
        }
        Ok(())
    }

    pub fn scroll_pause(&self) -> Duration {
        seconds(self.scroll_pause_seconds)
    }

    pub fn element_wait_timeout(&self) -> Duration {
        seconds(self.element_wait_timeout_seconds)
    }

    pub fn retry_delay(&self) -> Duration {
        seconds(self.retry_delay_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        seconds(self.request_timeout_seconds)
    }
}

// Invalid values are rejected by `validate`; clamp here so accessors never panic.
fn seconds(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_secs_f64(value)
    } else {
        Duration::ZERO
    }
}
