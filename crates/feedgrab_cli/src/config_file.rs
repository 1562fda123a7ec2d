use std::fs;
use std::path::Path;

use anyhow::Context;
use feedgrab_core::HarvestConfig;
use feedgrab_logging::grab_info;

/// Loads a RON configuration file; fields it leaves out keep their defaults.
/// Without a path the built-in defaults are used.
pub fn load(path: Option<&Path>) -> anyhow::Result<HarvestConfig> {
    let Some(path) = path else {
        return Ok(HarvestConfig::default());
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let config: HarvestConfig = ron::from_str(&content)
        .with_context(|| format!("failed to parse config file {:?}", path))?;

    grab_info!("Loaded configuration from {:?}", path);
    Ok(config)
}
