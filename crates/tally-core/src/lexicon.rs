//! Merchant lexicon: canonical brand names and OCR autocorrection
//!
//! Lookup priority for a raw merchant string:
//! 1. User override (from [`MerchantLexicon::remember`]) → confidence 10
//! 2. Exact normalized seed key → confidence 10
//! 3. Fuzzy seed match at or above the autocorrect threshold → `round(score * 10)`
//!
//! Seed lookups are built once at construction and never change. Overrides are
//! guarded by a read-write lock and written through to the [`OverrideStore`].

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::config::LexiconConfig;
use crate::error::Result;
use crate::models::ExpenseCategory;
use crate::normalize::normalize;
use crate::overrides::OverrideStore;
use crate::seeds::{SeedGroup, MERCHANT_SEEDS};
use crate::similarity::similarity;

/// Scores this close below the threshold still count as meeting it
const THRESHOLD_EPSILON: f64 = 1e-9;

/// How a correction was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionSource {
    /// User-remembered correction
    Override,
    /// Normalized input equals a seed's normalized key
    Exact,
    /// Similarity against a seed cleared the threshold
    Fuzzy,
}

/// A canonical display name for a raw merchant string
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub display_name: String,
    /// 0-10
    pub confidence: u8,
    pub source: CorrectionSource,
}

/// One normalized seed entry
#[derive(Debug, Clone)]
struct SeedEntry {
    key: String,
    display_name: &'static str,
    category: ExpenseCategory,
}

/// Canonical merchant names with fuzzy autocorrection and user overrides
pub struct MerchantLexicon {
    /// Seeds in declaration order; the first seed for a key wins
    entries: Vec<SeedEntry>,
    /// Normalized key -> index into `entries`
    by_key: HashMap<String, usize>,
    by_category: HashMap<ExpenseCategory, BTreeSet<String>>,
    overrides: RwLock<HashMap<String, String>>,
    /// Held across store writes so saves land in order. Lookups only take
    /// `overrides`, which is released before the store is touched.
    save_lock: Mutex<()>,
    store: Box<dyn OverrideStore>,
    config: LexiconConfig,
}

impl MerchantLexicon {
    /// Lexicon over the built-in seed table with default tuning
    pub fn new(store: impl OverrideStore + 'static) -> Self {
        Self::with_config(store, &LexiconConfig::default())
    }

    /// Lexicon over the built-in seed table
    pub fn with_config(store: impl OverrideStore + 'static, config: &LexiconConfig) -> Self {
        Self::with_seeds(MERCHANT_SEEDS, store, config)
    }

    /// Lexicon over a custom seed table
    pub fn with_seeds(
        seeds: &'static [SeedGroup],
        store: impl OverrideStore + 'static,
        config: &LexiconConfig,
    ) -> Self {
        let mut entries = Vec::new();
        let mut by_key = HashMap::new();
        let mut by_category: HashMap<ExpenseCategory, BTreeSet<String>> = HashMap::new();

        for group in seeds {
            for &display_name in group.names {
                let key = normalize(display_name);
                if key.is_empty() || by_key.contains_key(&key) {
                    if !key.is_empty() {
                        debug!(
                            "Seed '{}' collides with an earlier seed for key '{}'",
                            display_name, key
                        );
                    }
                    continue;
                }
                by_key.insert(key.clone(), entries.len());
                by_category
                    .entry(group.category)
                    .or_default()
                    .insert(key.clone());
                entries.push(SeedEntry {
                    key,
                    display_name,
                    category: group.category,
                });
            }
        }

        let overrides = store.load();
        debug!(
            "Merchant lexicon ready: {} seeds, {} overrides",
            entries.len(),
            overrides.len()
        );

        Self {
            entries,
            by_key,
            by_category,
            overrides: RwLock::new(overrides),
            save_lock: Mutex::new(()),
            store: Box::new(store),
            config: config.clone(),
        }
    }

    /// Map a raw (possibly misspelled) merchant string to its canonical display name
    pub fn autocorrect_display_name(&self, raw: &str) -> Option<Correction> {
        let key = normalize(raw);
        if key.is_empty() {
            return None;
        }

        if let Some(name) = self.read_overrides().get(&key) {
            debug!("Merchant override matched for '{}': {}", key, name);
            return Some(Correction {
                display_name: name.clone(),
                confidence: 10,
                source: CorrectionSource::Override,
            });
        }

        if let Some(&index) = self.by_key.get(&key) {
            let entry = &self.entries[index];
            debug!("Exact seed matched for '{}': {}", key, entry.display_name);
            return Some(Correction {
                display_name: entry.display_name.to_string(),
                confidence: 10,
                source: CorrectionSource::Exact,
            });
        }

        let (best, score) = self.best_fuzzy_candidate(&key)?;
        if meets_threshold(score, self.config.autocorrect_threshold) {
            debug!(
                "Fuzzy seed matched for '{}': {} (score {:.3})",
                key, best.display_name, score
            );
            Some(Correction {
                display_name: best.display_name.to_string(),
                confidence: (score * 10.0).round().clamp(0.0, 10.0) as u8,
                source: CorrectionSource::Fuzzy,
            })
        } else {
            debug!(
                "Best fuzzy candidate for '{}' was {} (score {:.3}), below threshold",
                key, best.display_name, score
            );
            None
        }
    }

    /// Highest-similarity seed among those sharing a token with `key` and of
    /// comparable length. Earlier seeds win ties.
    fn best_fuzzy_candidate(&self, key: &str) -> Option<(&SeedEntry, f64)> {
        let tokens: HashSet<&str> = key.split_whitespace().collect();
        let key_len = key.chars().count();

        let mut best: Option<(&SeedEntry, f64)> = None;
        for entry in &self.entries {
            let shares_token = entry.key.split_whitespace().any(|t| tokens.contains(t));
            if !shares_token {
                continue;
            }
            if length_ratio(key_len, entry.key.chars().count()) < self.config.min_length_ratio {
                continue;
            }

            let score = similarity(key, &entry.key);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((entry, score));
            }
        }

        best
    }

    /// Remember a user correction. Empty input or display name is a no-op.
    ///
    /// The correction wins over seed data for this normalized key from now on.
    pub fn remember(&self, raw: &str, display_name: &str) -> Result<()> {
        let key = normalize(raw);
        let display_name = display_name.trim();
        if key.is_empty() || display_name.is_empty() {
            return Ok(());
        }

        let _saving = self.lock_saves();
        let snapshot = {
            let mut overrides = self.write_overrides();
            overrides.insert(key.clone(), display_name.to_string());
            overrides.clone()
        };
        debug!("Remembered merchant override '{}' -> {}", key, display_name);
        self.store.save(&snapshot)
    }

    /// Drop a user correction. Returns whether one existed.
    pub fn forget(&self, raw: &str) -> Result<bool> {
        let key = normalize(raw);
        let _saving = self.lock_saves();
        let snapshot = {
            let mut overrides = self.write_overrides();
            if overrides.remove(&key).is_none() {
                return Ok(false);
            }
            overrides.clone()
        };
        self.store.save(&snapshot)?;
        Ok(true)
    }

    /// Current overrides sorted by key
    pub fn overrides(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = self
            .read_overrides()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort();
        entries
    }

    /// Category whose seed list holds this exact name (after normalization)
    pub fn seed_category(&self, name: &str) -> Option<ExpenseCategory> {
        self.by_key
            .get(&normalize(name))
            .map(|&index| self.entries[index].category)
    }

    /// Normalized seed keys for one category
    pub fn seed_keys(&self, category: ExpenseCategory) -> impl Iterator<Item = &str> {
        self.by_category
            .get(&category)
            .into_iter()
            .flat_map(|keys| keys.iter().map(String::as_str))
    }

    /// Number of distinct seed keys
    pub fn seed_count(&self) -> usize {
        self.entries.len()
    }

    fn read_overrides(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.overrides
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_overrides(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.overrides
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_saves(&self) -> MutexGuard<'_, ()> {
        self.save_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Shorter length over longer length (1.0 for two empty strings)
fn length_ratio(a: usize, b: usize) -> f64 {
    let (short, long) = if a <= b { (a, b) } else { (b, a) };
    if long == 0 {
        return 1.0;
    }
    short as f64 / long as f64
}

/// `score >= threshold`, tolerant of floating-point noise
fn meets_threshold(score: f64, threshold: f64) -> bool {
    score + THRESHOLD_EPSILON >= threshold
}
