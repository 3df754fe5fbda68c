//! Extractor tuning configuration
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/tally/config/extractor.toml)
//!    or an explicit path
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override file keep their default values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/extractor.toml");

/// Merchant lexicon tuning
#[derive(Debug, Clone, PartialEq)]
pub struct LexiconConfig {
    /// Minimum similarity for a fuzzy correction to be accepted
    pub autocorrect_threshold: f64,
    /// Shorter/longer key length ratio below which a seed is not a candidate
    pub min_length_ratio: f64,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            autocorrect_threshold: 0.82,
            min_length_ratio: 0.5,
        }
    }
}

/// Categorizer tuning
#[derive(Debug, Clone, PartialEq)]
pub struct CategorizerConfig {
    /// Top scores below this fall back to `other`
    pub min_confident_score: i32,
}

impl Default for CategorizerConfig {
    fn default() -> Self {
        Self {
            min_confident_score: 4,
        }
    }
}

/// Amount extractor tuning
#[derive(Debug, Clone, PartialEq)]
pub struct AmountConfig {
    /// Lines after the last total line searched for money tokens
    pub total_window_lines: usize,
}

impl Default for AmountConfig {
    fn default() -> Self {
        Self {
            total_window_lines: 6,
        }
    }
}

/// Merchant-line extractor tuning
#[derive(Debug, Clone, PartialEq)]
pub struct MerchantLineConfig {
    /// Only the first N lines are candidates
    pub max_scan_lines: usize,
}

impl Default for MerchantLineConfig {
    fn default() -> Self {
        Self { max_scan_lines: 25 }
    }
}

/// Full extractor configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractorConfig {
    pub lexicon: LexiconConfig,
    pub categorizer: CategorizerConfig,
    pub amount: AmountConfig,
    pub merchant: MerchantLineConfig,
}

impl ExtractorConfig {
    /// Load from the default override location, falling back to embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit override path (embedded defaults if it doesn't exist)
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse a TOML document on top of the built-in defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }
}

/// Tally's data directory (~/.local/share/tally on Linux)
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally"))
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    default_data_dir().map(|d| d.join("config").join("extractor.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<ExtractorConfig> {
    let path = override_path
        .map(Path::to_path_buf)
        .or_else(default_config_path);

    let content = match path {
        Some(path) if path.exists() => fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?,
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    lexicon: Option<RawLexicon>,
    categorizer: Option<RawCategorizer>,
    amount: Option<RawAmount>,
    merchant: Option<RawMerchant>,
}

#[derive(Debug, Deserialize)]
struct RawLexicon {
    autocorrect_threshold: Option<f64>,
    min_length_ratio: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawCategorizer {
    min_confident_score: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct RawAmount {
    total_window_lines: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawMerchant {
    max_scan_lines: Option<usize>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<ExtractorConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = ExtractorConfig::default();

    if let Some(lexicon) = raw.lexicon {
        if let Some(threshold) = lexicon.autocorrect_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(Error::Config(format!(
                    "lexicon.autocorrect_threshold must be within 0..=1, got {}",
                    threshold
                )));
            }
            config.lexicon.autocorrect_threshold = threshold;
        }
        if let Some(ratio) = lexicon.min_length_ratio {
            config.lexicon.min_length_ratio = ratio;
        }
    }

    if let Some(categorizer) = raw.categorizer {
        if let Some(score) = categorizer.min_confident_score {
            config.categorizer.min_confident_score = score;
        }
    }

    if let Some(amount) = raw.amount {
        if let Some(window) = amount.total_window_lines {
            config.amount.total_window_lines = window;
        }
    }

    if let Some(merchant) = raw.merchant {
        if let Some(max) = merchant.max_scan_lines {
            config.merchant.max_scan_lines = max;
        }
    }

    Ok(config)
}
