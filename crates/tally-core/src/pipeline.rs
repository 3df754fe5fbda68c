//! End-to-end receipt extraction
//!
//! OCR lines in, [`ExtractionResult`] out. The extractor owns the merchant
//! lexicon and the categorizer; both are safe to share across threads.

use std::path::Path;

use tracing::{debug, info};

use crate::categorize::Categorizer;
use crate::config::ExtractorConfig;
use crate::error::{Error, Result};
use crate::extract::{extract_amount, extract_date, extract_merchant_line};
use crate::lexicon::MerchantLexicon;
use crate::models::ExtractionResult;
use crate::overrides::{JsonFileStore, OverrideStore};

pub struct ReceiptExtractor {
    lexicon: MerchantLexicon,
    categorizer: Categorizer,
    config: ExtractorConfig,
}

impl ReceiptExtractor {
    /// Extractor with default tuning over the given override stores
    pub fn new(
        merchant_store: impl OverrideStore + 'static,
        category_store: impl OverrideStore + 'static,
    ) -> Self {
        Self::with_config(merchant_store, category_store, ExtractorConfig::default())
    }

    pub fn with_config(
        merchant_store: impl OverrideStore + 'static,
        category_store: impl OverrideStore + 'static,
        config: ExtractorConfig,
    ) -> Self {
        Self {
            lexicon: MerchantLexicon::with_config(merchant_store, &config.lexicon),
            categorizer: Categorizer::with_config(category_store, &config.categorizer),
            config,
        }
    }

    /// Extractor backed by the JSON override files in `data_dir`
    pub fn open(data_dir: &Path, config: ExtractorConfig) -> Self {
        debug!("Opening override stores in {}", data_dir.display());
        Self::with_config(
            JsonFileStore::merchant_overrides(data_dir),
            JsonFileStore::category_overrides(data_dir),
            config,
        )
    }

    /// Extract fields from OCR lines
    ///
    /// Lines are trimmed and blank lines dropped. Fails with
    /// [`Error::EmptyInput`] when nothing is left.
    pub fn extract<S: AsRef<str>>(&self, lines: &[S]) -> Result<ExtractionResult> {
        let lines: Vec<&str> = lines
            .iter()
            .map(|l| l.as_ref().trim())
            .filter(|l| !l.is_empty())
            .collect();
        if lines.is_empty() {
            return Err(Error::EmptyInput);
        }

        let raw_text = lines.join("\n");
        let amount = extract_amount(&lines, self.config.amount.total_window_lines);
        let date = extract_date(&raw_text);
        let merchant_raw = extract_merchant_line(&lines, self.config.merchant.max_scan_lines);

        let corrected = merchant_raw
            .as_deref()
            .and_then(|raw| self.lexicon.autocorrect_display_name(raw))
            .map(|c| c.display_name);
        let merchant = corrected.or(merchant_raw);

        let suggestion = self
            .categorizer
            .suggest_category(merchant.as_deref(), &raw_text);

        info!(
            "Extracted receipt: merchant={:?} amount={:?} date={:?} category={} ({})",
            merchant, amount, date, suggestion.category, suggestion.confidence
        );

        Ok(ExtractionResult {
            merchant,
            amount,
            date,
            category: suggestion.category,
            category_confidence: suggestion.confidence,
            raw_text,
        })
    }

    /// Extract from a block of text, one OCR line per text line
    pub fn from_text(&self, text: &str) -> Result<ExtractionResult> {
        let lines: Vec<&str> = text.lines().collect();
        self.extract(&lines)
    }

    pub fn lexicon(&self) -> &MerchantLexicon {
        &self.lexicon
    }

    pub fn categorizer(&self) -> &Categorizer {
        &self.categorizer
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseCategory;
    use crate::overrides::MemoryStore;

    fn extractor() -> ReceiptExtractor {
        ReceiptExtractor::new(MemoryStore::new(), MemoryStore::new())
    }

    #[test]
    fn test_empty_input() {
        let ex = extractor();
        assert!(matches!(ex.extract::<&str>(&[]), Err(Error::EmptyInput)));
        assert!(matches!(ex.extract(&["", "   "]), Err(Error::EmptyInput)));
        assert!(matches!(ex.from_text("\n\n"), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_lines_trimmed_and_joined() {
        let ex = extractor();
        let result = ex.extract(&["  Corner Store ", "", "TOTAL 3.00  "]).unwrap();
        assert_eq!(result.raw_text, "Corner Store\nTOTAL 3.00");
        assert_eq!(result.amount.as_deref(), Some("3.00"));
    }

    #[test]
    fn test_uncorrected_merchant_kept() {
        let ex = extractor();
        let result = ex.from_text("Mom & Pop Hardware\nTOTAL 12.00").unwrap();
        assert_eq!(result.merchant.as_deref(), Some("Mom & Pop Hardware"));
    }

    #[test]
    fn test_corrected_merchant_feeds_categorizer() {
        let ex = extractor();
        let result = ex
            .from_text("SHELL\nPump 3 Regular\n40.12 L\nTOTAL 52.10")
            .unwrap();
        assert_eq!(result.merchant.as_deref(), Some("Shell"));
        assert_eq!(result.category, ExpenseCategory::Fuel);
    }

    #[test]
    fn test_partial_result() {
        let ex = extractor();
        let result = ex.from_text("hello world").unwrap();
        assert_eq!(result.merchant.as_deref(), Some("hello world"));
        assert_eq!(result.amount, None);
        assert_eq!(result.date, None);
        assert_eq!(result.category, ExpenseCategory::Other);
    }
}
