//! Shared command utilities
//!
//! This module contains:
//! - `resolve_data_dir` - Pick the override-store directory
//! - `load_config` - Load extractor tuning
//! - `open_extractor` - Build the extractor over the JSON stores

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tally_core::{config, ExtractorConfig, ReceiptExtractor};
use tracing::debug;

/// Explicit `--data-dir`, else the platform data dir
pub fn resolve_data_dir(data_dir: Option<&Path>) -> Result<PathBuf> {
    match data_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => config::default_data_dir()
            .ok_or_else(|| anyhow!("Could not determine a data directory; pass --data-dir")),
    }
}

/// Explicit `--config`, else `<data-dir>/config/extractor.toml`, else defaults
pub fn load_config(config_path: Option<&Path>, data_dir: &Path) -> Result<ExtractorConfig> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| data_dir.join("config").join("extractor.toml"));

    if config_path.is_some() && !path.exists() {
        return Err(anyhow!("Config file not found: {}", path.display()));
    }

    debug!("Loading extractor config from {}", path.display());
    ExtractorConfig::load_from(&path).context("Failed to load extractor config")
}

/// Open the extractor with overrides stored under the data dir
pub fn open_extractor(
    data_dir: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<ReceiptExtractor> {
    let data_dir = resolve_data_dir(data_dir)?;
    let config = load_config(config_path, &data_dir)?;
    Ok(ReceiptExtractor::open(&data_dir, config))
}
