//! Feedgrab core: configuration and the pure decisions of the pipeline.
mod config;
mod media;
mod naming;
mod resolve;
mod summary;

pub use config::{BrowserOptions, ConfigError, HarvestConfig, DEFAULT_FEED_URL, DEFAULT_USER_AGENT};
pub use media::ImageExtension;
pub use naming::{output_stem, with_extension};
pub use resolve::{has_web_scheme, resolve_source, ResolveError, FALLBACK_ATTRIBUTE, PRIMARY_ATTRIBUTE};
pub use summary::RunSummary;
