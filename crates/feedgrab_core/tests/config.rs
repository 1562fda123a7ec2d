use std::sync::Once;
use std::time::Duration;

use feedgrab_core::{ConfigError, HarvestConfig, DEFAULT_FEED_URL};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(feedgrab_logging::initialize_for_tests);
}

#[test]
fn defaults_describe_a_small_headless_run() {
    init_logging();
    let config = HarvestConfig::default();

    assert_eq!(config.feed_url, DEFAULT_FEED_URL);
    assert_eq!(config.max_images, 10);
    assert_eq!(config.download_retries, 2);
    assert_eq!(config.max_scroll_rounds, 3);
    assert_eq!(config.scroll_pause(), Duration::from_secs(2));
    assert_eq!(config.element_wait_timeout(), Duration::from_secs(15));
    assert_eq!(config.retry_delay(), Duration::from_secs(1));
    assert_eq!(config.request_timeout(), Duration::from_secs(10));
    assert_eq!(config.file_prefix, "reddit_meme");
    assert!(config.browser.headless);
    assert_eq!(
        (config.browser.window_width, config.browser.window_height),
        (1920, 1080)
    );
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn rejects_non_web_feed_url() {
    init_logging();
    let config = HarvestConfig {
        feed_url: "ftp://example.com/feed".to_string(),
        ..HarvestConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidFeedUrl(_))
    ));

    let config = HarvestConfig {
        feed_url: "not a url".to_string(),
        ..HarvestConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidFeedUrl(_))
    ));
}

#[test]
fn rejects_zero_counts() {
    init_logging();
    let config = HarvestConfig {
        max_images: 0,
        ..HarvestConfig::default()
    };
    assert_eq!(
        config.validate(),
        Err(ConfigError::Zero { field: "max_images" })
    );

    let config = HarvestConfig {
        download_retries: 0,
        ..HarvestConfig::default()
    };
    assert_eq!(
        config.validate(),
        Err(ConfigError::Zero {
            field: "download_retries"
        })
    );
}

#[test]
fn rejects_blank_selector_and_bad_durations() {
    init_logging();
    let config = HarvestConfig {
        image_selector: "  ".to_string(),
        ..HarvestConfig::default()
    };
    assert_eq!(
        config.validate(),
        Err(ConfigError::Empty {
            field: "image_selector"
        })
    );

    let config = HarvestConfig {
        scroll_pause_seconds: -1.0,
        ..HarvestConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidSeconds {
            field: "scroll_pause_seconds",
            ..
        })
    ));
    assert_eq!(config.scroll_pause(), Duration::ZERO);
}

#[test]
fn fractional_seconds_are_kept() {
    init_logging();
    let config = HarvestConfig {
        scroll_pause_seconds: 0.25,
        ..HarvestConfig::default()
    };
    assert_eq!(config.scroll_pause(), Duration::from_millis(250));
}
