//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Turn receipt text into expense records
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Receipt field extraction and expense categorization", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding the override stores
    ///
    /// Defaults to the platform data directory (~/.local/share/tally on Linux).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Extractor config file (defaults to <data-dir>/config/extractor.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract merchant, total, date and category from OCR text
    Extract {
        /// Text file with one OCR line per line ("-" for stdin)
        #[arg(short, long)]
        file: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage merchant-name corrections
    Merchants {
        #[command(subcommand)]
        action: Option<MerchantsAction>,
    },

    /// Manage merchant category overrides (lists category tags with no action)
    Categories {
        #[command(subcommand)]
        action: Option<CategoriesAction>,
    },

    /// Print the normalized lookup key for a merchant string
    Normalize {
        /// Merchant text as printed on the receipt
        text: String,
    },
}

#[derive(Subcommand)]
pub enum MerchantsAction {
    /// List remembered corrections
    List,

    /// Remember that RAW should display as DISPLAY
    Remember {
        /// Merchant text as printed on the receipt
        raw: String,

        /// Canonical display name
        display: String,
    },

    /// Forget a remembered correction
    Forget {
        /// Merchant text as printed on the receipt
        raw: String,
    },

    /// Show how a merchant string would be corrected
    Lookup {
        /// Merchant text as printed on the receipt
        raw: String,
    },
}

#[derive(Subcommand)]
pub enum CategoriesAction {
    /// List remembered category overrides
    List,

    /// Always file MERCHANT under CATEGORY
    Remember {
        /// Merchant name
        merchant: String,

        /// Category tag (e.g. groceries, dining, fuel)
        category: String,
    },

    /// Forget a category override
    Forget {
        /// Merchant name
        merchant: String,
    },

    /// Show per-category scores for a merchant and optional receipt text
    Explain {
        /// Merchant name
        merchant: String,

        /// Receipt text file to score alongside the merchant
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
