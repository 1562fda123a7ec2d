use std::path::PathBuf;

use clap::Parser;
use feedgrab_core::HarvestConfig;
use log::LevelFilter;

use crate::logging::LogDestination;

/// Download the image posts of a dynamically rendered feed page.
#[derive(Debug, Parser)]
#[command(name = "feedgrab", version)]
pub struct Cli {
    /// RON file with configuration overrides.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Feed page to render.
    #[arg(long)]
    pub url: Option<String>,

    /// Directory the images are written to.
    #[arg(long = "out", value_name = "DIR")]
    pub download_dir: Option<PathBuf>,

    /// Maximum number of posts to examine.
    #[arg(long = "max", value_name = "N")]
    pub max_images: Option<usize>,

    /// Show the browser window instead of running headless.
    #[arg(long)]
    pub headful: bool,

    /// Launch the browser without its sandbox (needed when running as root).
    #[arg(long)]
    pub no_sandbox: bool,

    /// Also write progress to ./feedgrab.log.
    #[arg(long)]
    pub log_file: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Layers command-line flags over `config`.
    pub fn apply(&self, mut config: HarvestConfig) -> HarvestConfig {
        if let Some(url) = &self.url {
            config.feed_url = url.clone();
        }
        if let Some(dir) = &self.download_dir {
            config.download_dir = dir.clone();
        }
        if let Some(max) = self.max_images {
            config.max_images = max;
        }
        if self.headful {
            config.browser.headless = false;
        }
        if self.no_sandbox {
            config.browser.no_sandbox = true;
        }
        config
    }

    pub fn log_destination(&self) -> LogDestination {
        if self.log_file {
            LogDestination::Both
        } else {
            LogDestination::Terminal
        }
    }

    pub fn level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
