//! Crop settings from an optional JSON file plus command line overrides.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use batchcrop_core::CropConfig;

use crate::ConfigArgs;

/// Read a JSON config file. Fields it leaves out keep their defaults.
pub fn load_config_file(path: &Path) -> Result<CropConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(config)
}

/// Resolve the effective config: defaults, then the file, then flags.
pub fn resolve(args: &ConfigArgs) -> Result<CropConfig> {
    let mut config = match &args.config {
        Some(path) => load_config_file(path)?,
        None => CropConfig::default(),
    };

    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(quality) = args.quality {
        config.quality = quality;
    }

    config.sanitize();
    log::debug!("effective config: {:?}", config);
    Ok(config)
}
