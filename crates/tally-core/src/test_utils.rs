//! Test utilities for tally-core
//!
//! Builders for extractors backed by in-memory override stores, plus sample
//! receipts shared by unit and integration tests.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::ExtractorConfig;
use crate::error::Result;
use crate::overrides::{MemoryStore, OverrideStore};
use crate::pipeline::ReceiptExtractor;

/// Extractor plus handles to its override stores
pub struct TestExtractor {
    pub extractor: ReceiptExtractor,
    pub merchant_store: Arc<MemoryStore>,
    pub category_store: Arc<MemoryStore>,
}

impl TestExtractor {
    /// Default config, empty stores
    pub fn new() -> Self {
        Self::with_config(ExtractorConfig::default())
    }

    pub fn with_config(config: ExtractorConfig) -> Self {
        let merchant_store = Arc::new(MemoryStore::new());
        let category_store = Arc::new(MemoryStore::new());
        let extractor = ReceiptExtractor::with_config(
            Arc::clone(&merchant_store),
            Arc::clone(&category_store),
            config,
        );
        Self {
            extractor,
            merchant_store,
            category_store,
        }
    }

    /// A fresh extractor over the same stores, as after an app restart
    pub fn reopen(&self) -> ReceiptExtractor {
        ReceiptExtractor::with_config(
            Arc::clone(&self.merchant_store),
            Arc::clone(&self.category_store),
            self.extractor.config().clone(),
        )
    }
}

impl Default for TestExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Store whose `save` parks until the test releases it
///
/// `save` signals on the `started` channel, then waits up to five seconds for
/// a release and fails with a timeout if none arrives.
pub struct GatedStore {
    started: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
}

impl GatedStore {
    /// The store, the "save started" receiver, and the release sender
    pub fn create() -> (Self, Receiver<()>, Sender<()>) {
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let store = Self {
            started: Mutex::new(started_tx),
            release: Mutex::new(release_rx),
        };
        (store, started_rx, release_tx)
    }
}

impl OverrideStore for GatedStore {
    fn load(&self) -> HashMap<String, String> {
        HashMap::new()
    }

    fn save(&self, _entries: &HashMap<String, String>) -> Result<()> {
        let _ = self
            .started
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .send(());
        self.release
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .recv_timeout(Duration::from_secs(5))
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::TimedOut, "save never released"))?;
        Ok(())
    }
}

/// Split a receipt literal into lines
pub fn lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Coffee shop receipt with an OCR'd store number and a street address
pub const COFFEE_RECEIPT: &[&str] = &[
    "STARBUCKS STORE 4521",
    "123 MAIN ST",
    "LATTE 4.50",
    "TAX 0.40",
    "TOTAL 4.90",
];

/// Grocery receipt with weighed produce and a card tender after the total
pub const GROCERY_RECEIPT: &str = "\
Loblaws
2280 Dundas St W
Toronto ON M6R 1X3
(416) 555-0142
03/14/2024 18:22
BANANAS 1.2 kg 1.78
APPLES 0.8 kg 3.12
MILK 2L 5.49
SUBTOTAL 10.39
HST 0.00
TOTAL 10.39
VISA 10.39
THANK YOU";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseCategory;

    #[test]
    fn test_reopen_shares_stores() {
        let t = TestExtractor::new();
        t.extractor
            .lexicon()
            .remember("Corner Spot", "The Corner Spot")
            .unwrap();
        let reopened = t.reopen();
        assert_eq!(reopened.lexicon().overrides().len(), 1);
    }

    #[test]
    fn test_sample_receipts_extract() {
        let t = TestExtractor::new();
        let coffee = t.extractor.extract(COFFEE_RECEIPT).unwrap();
        assert_eq!(coffee.category, ExpenseCategory::Coffee);

        let grocery = t.extractor.extract(&lines(GROCERY_RECEIPT)).unwrap();
        assert_eq!(grocery.merchant.as_deref(), Some("Loblaws"));
        assert_eq!(grocery.amount.as_deref(), Some("10.39"));
        assert_eq!(grocery.category, ExpenseCategory::Groceries);
    }
}
