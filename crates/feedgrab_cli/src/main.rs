mod cli;
mod config_file;
mod logging;

use anyhow::Context;
use clap::Parser;
use feedgrab_engine::{
    ensure_output_dir, run_harvest, ChromiumSession, FetchSettings, LogProgressSink,
    ReqwestFetcher,
};
use feedgrab_logging::{grab_error, grab_info};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log_destination(), cli.level());

    let config = cli.apply(config_file::load(cli.config.as_deref())?);
    config.validate().context("invalid configuration")?;

    ensure_output_dir(&config.download_dir)
        .with_context(|| format!("cannot use output directory {:?}", config.download_dir))?;
    let fetcher = ReqwestFetcher::new(FetchSettings::from_config(&config))
        .context("failed to build HTTP client")?;

    grab_info!("Harvesting up to {} images from {}", config.max_images, config.feed_url);
    let session = match ChromiumSession::launch(&config.browser, &config.user_agent).await {
        Ok(session) => session,
        Err(err) => {
            grab_error!("Could not start the browser: {}", err);
            return Ok(());
        }
    };

    let summary = run_harvest(&config, session, &fetcher, &LogProgressSink).await;
    grab_info!("Finished: {}", summary);
    Ok(())
}
