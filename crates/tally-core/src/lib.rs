//! Tally Core Library
//!
//! Receipt understanding for the Tally expense tracker:
//! - Merchant-name normalization and string similarity
//! - Merchant lexicon with OCR autocorrection and user overrides
//! - Rule-based expense categorization
//! - Amount, date and merchant-line extractors over OCR text
//! - Extraction pipeline tying the above together
//! - Persisted override stores and tuning config

pub mod categorize;
pub mod config;
pub mod error;
pub mod extract;
pub mod lexicon;
pub mod models;
pub mod normalize;
pub mod overrides;
pub mod pipeline;
pub mod seeds;
pub mod similarity;

/// Test utilities including in-memory extractor builders
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use categorize::{Categorizer, CategoryScores};
pub use config::{ExtractorConfig, LexiconConfig};
pub use error::{Error, Result};
pub use lexicon::{Correction, CorrectionSource, MerchantLexicon};
pub use models::{CategorySuggestion, ExpenseCategory, ExtractionResult};
pub use normalize::normalize;
pub use overrides::{JsonFileStore, MemoryStore, OverrideStore};
pub use pipeline::ReceiptExtractor;
