//! Rule-based expense categorization
//!
//! Classification priority:
//! 1. User override for the normalized merchant key → confidence 10
//! 2. Additive scoring across every category:
//!    - merchant key vs. seed names (exact +10, fuzzy +7) and cue tokens (+4)
//!    - free-text keywords (+2 per hit, capped at +8)
//!    - receipt format cues (tip lines, fuel units, billing vocabulary, ...)
//!    - small tie-breakers
//! 3. A top score below the confidence floor falls back to `other`
//!
//! Scores are kept in a fixed array in [`ExpenseCategory`] declaration order,
//! so ties always resolve to the earlier category.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use regex::Regex;
use tracing::{debug, warn};

use crate::config::CategorizerConfig;
use crate::error::Result;
use crate::models::{CategorySuggestion, ExpenseCategory};
use crate::normalize::normalize;
use crate::overrides::OverrideStore;
use crate::seeds::{CATEGORY_RULES, MERCHANT_SEEDS, TRAVEL_BRAND_TOKENS};
use crate::similarity::fuzzy_match;

const EXACT_NAME_SCORE: i32 = 10;
const FUZZY_NAME_SCORE: i32 = 7;
const CUE_SCORE: i32 = 4;
const KEYWORD_SCORE: i32 = 2;
const KEYWORD_CAP: i32 = 8;
const FORMAT_CUE_SCORE: i32 = 4;
const WEIGHED_ITEMS_SCORE: i32 = 3;
const TRAVEL_BRAND_SCORE: i32 = 5;

static TIP_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:tips?|gratuity)\b").expect("valid regex"));

static FUEL_UNITS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:litres?|liters?|gallons?|octane|diesel|unleaded|pump|kwh)\b")
        .expect("valid regex")
});

static BILLING_TERMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"billing period|account number|\bstatement\b|\b(?:kwh|gb|min|data)\b")
        .expect("valid regex")
});

static TRAVEL_TERMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:boarding|gate|flight|reservation|check-in|baggage)\b").expect("valid regex")
});

static WEIGHED_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d\s*(?:kg|lbs?)\b|/\s*(?:kg|lb)\b|\bsku\b").expect("valid regex")
});

static COFFEE_DRINKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:latte|espresso|cappuccino|americano|macchiato|mocha|cold brew|frappuccino|flat white|cortado)\b",
    )
    .expect("valid regex")
});

static RIDE_TERMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:ride|trip|fare|parking|transit|taxi|driver|pickup)\b").expect("valid regex")
});

/// Accumulated score per category, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryScores {
    scores: [i32; ExpenseCategory::COUNT],
}

impl CategoryScores {
    fn new() -> Self {
        Self {
            scores: [0; ExpenseCategory::COUNT],
        }
    }

    fn add(&mut self, category: ExpenseCategory, delta: i32) {
        self.scores[category.index()] += delta;
    }

    pub fn get(&self, category: ExpenseCategory) -> i32 {
        self.scores[category.index()]
    }

    /// Highest-scoring category; the earlier category wins a tie
    pub fn best(&self) -> (ExpenseCategory, i32) {
        let mut best = (ExpenseCategory::all()[0], self.scores[0]);
        for &category in &ExpenseCategory::all()[1..] {
            let score = self.get(category);
            if score > best.1 {
                best = (category, score);
            }
        }
        best
    }

    /// Categories with a non-zero score, highest first
    pub fn ranked(&self) -> Vec<(ExpenseCategory, i32)> {
        let mut ranked: Vec<_> = ExpenseCategory::all()
            .iter()
            .map(|&c| (c, self.get(c)))
            .filter(|&(_, s)| s != 0)
            .collect();
        // Stable sort keeps declaration order among equal scores
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Merchant + receipt text classifier with persisted user overrides
pub struct Categorizer {
    /// Normalized seed names per category index
    exact_names: Vec<Vec<String>>,
    overrides: RwLock<HashMap<String, ExpenseCategory>>,
    /// Held across store writes so saves land in order
    save_lock: Mutex<()>,
    store: Box<dyn OverrideStore>,
    config: CategorizerConfig,
}

impl Categorizer {
    pub fn new(store: impl OverrideStore + 'static) -> Self {
        Self::with_config(store, &CategorizerConfig::default())
    }

    pub fn with_config(store: impl OverrideStore + 'static, config: &CategorizerConfig) -> Self {
        let mut exact_names = vec![Vec::new(); ExpenseCategory::COUNT];
        for group in MERCHANT_SEEDS {
            let names: &mut Vec<String> = &mut exact_names[group.category.index()];
            for name in group.names {
                let key = normalize(name);
                if !key.is_empty() && !names.contains(&key) {
                    names.push(key);
                }
            }
        }

        let overrides = parse_overrides(store.load());
        debug!("Categorizer ready with {} overrides", overrides.len());

        Self {
            exact_names,
            overrides: RwLock::new(overrides),
            save_lock: Mutex::new(()),
            store: Box::new(store),
            config: config.clone(),
        }
    }

    /// Suggest a category for a receipt
    pub fn suggest_category(&self, merchant: Option<&str>, raw_text: &str) -> CategorySuggestion {
        let key = normalize(merchant.unwrap_or(""));

        if !key.is_empty() {
            if let Some(&category) = self.read_overrides().get(&key) {
                debug!("Category override for '{}': {}", key, category);
                return CategorySuggestion::new(category, 10);
            }
        }

        let scores = self.score_key(&key, raw_text);
        let (best, score) = scores.best();

        if score < self.config.min_confident_score {
            let ceiling = (self.config.min_confident_score - 1).clamp(0, 10);
            debug!(
                "Top category {} scored {} (< {}), falling back to other",
                best, score, self.config.min_confident_score
            );
            return CategorySuggestion::new(ExpenseCategory::Other, score.clamp(0, ceiling) as u8);
        }

        debug!("Categorized '{}' as {} (score {})", key, best, score);
        CategorySuggestion::new(best, score.min(10) as u8)
    }

    /// Per-category scores before thresholding. Overrides are not consulted.
    pub fn score_breakdown(&self, merchant: Option<&str>, raw_text: &str) -> CategoryScores {
        self.score_key(&normalize(merchant.unwrap_or("")), raw_text)
    }

    fn score_key(&self, key: &str, raw_text: &str) -> CategoryScores {
        let mut scores = CategoryScores::new();
        let text = raw_text.to_lowercase();

        if !key.is_empty() {
            self.score_merchant(key, &mut scores);
        }
        score_keywords(&text, &mut scores);
        score_format_cues(&text, &mut scores);
        score_tie_breakers(key, &text, &mut scores);

        scores
    }

    fn score_merchant(&self, key: &str, scores: &mut CategoryScores) {
        for rules in CATEGORY_RULES {
            let category = rules.category;
            let names = &self.exact_names[category.index()];

            if names.iter().any(|name| name == key) {
                scores.add(category, EXACT_NAME_SCORE);
            }
            if names
                .iter()
                .any(|name| name != key && fuzzy_match(name, key))
            {
                scores.add(category, FUZZY_NAME_SCORE);
            }
            if rules.merchant_cues.iter().any(|cue| key.contains(cue)) {
                scores.add(category, CUE_SCORE);
            }
        }
    }

    /// Remember that a merchant belongs to a category. Empty merchant is a no-op.
    pub fn remember(&self, merchant: &str, category: ExpenseCategory) -> Result<()> {
        let key = normalize(merchant);
        if key.is_empty() {
            return Ok(());
        }

        let _saving = self.lock_saves();
        let snapshot = {
            let mut overrides = self.write_overrides();
            overrides.insert(key.clone(), category);
            serialize_overrides(&overrides)
        };
        debug!("Remembered category override '{}' -> {}", key, category);
        self.store.save(&snapshot)
    }

    /// Drop a category override. Returns whether one existed.
    pub fn forget(&self, merchant: &str) -> Result<bool> {
        let key = normalize(merchant);
        let _saving = self.lock_saves();
        let snapshot = {
            let mut overrides = self.write_overrides();
            if overrides.remove(&key).is_none() {
                return Ok(false);
            }
            serialize_overrides(&overrides)
        };
        self.store.save(&snapshot)?;
        Ok(true)
    }

    /// Current overrides sorted by merchant key
    pub fn overrides(&self) -> Vec<(String, ExpenseCategory)> {
        let mut entries: Vec<_> = self
            .read_overrides()
            .iter()
            .map(|(k, &v)| (k.clone(), v))
            .collect();
        entries.sort();
        entries
    }

    fn read_overrides(&self) -> RwLockReadGuard<'_, HashMap<String, ExpenseCategory>> {
        self.overrides
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_overrides(&self) -> RwLockWriteGuard<'_, HashMap<String, ExpenseCategory>> {
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

fn score_keywords(text: &str, scores: &mut CategoryScores) {
    for rules in CATEGORY_RULES {
        let hits = rules
            .keywords
            .iter()
            .filter(|keyword| text.contains(*keyword))
            .count() as i32;
        if hits > 0 {
            scores.add(rules.category, (hits * KEYWORD_SCORE).min(KEYWORD_CAP));
        }
    }
}

fn score_format_cues(text: &str, scores: &mut CategoryScores) {
    if TIP_LINE.is_match(text) {
        scores.add(ExpenseCategory::Dining, FORMAT_CUE_SCORE);
    }
    if FUEL_UNITS.is_match(text) {
        scores.add(ExpenseCategory::Fuel, FORMAT_CUE_SCORE);
    }
    if BILLING_TERMS.is_match(text) {
        scores.add(ExpenseCategory::Utilities, FORMAT_CUE_SCORE);
    }
    if TRAVEL_TERMS.is_match(text) {
        scores.add(ExpenseCategory::Travel, FORMAT_CUE_SCORE);
    }

    let weighed_lines = text.lines().filter(|l| WEIGHED_ITEM.is_match(l)).count();
    if weighed_lines >= 2 {
        scores.add(ExpenseCategory::Groceries, WEIGHED_ITEMS_SCORE);
    }
}

fn score_tie_breakers(key: &str, text: &str, scores: &mut CategoryScores) {
    if COFFEE_DRINKS.is_match(text) {
        scores.add(ExpenseCategory::Coffee, 2);
    } else if FUEL_UNITS.is_match(text) {
        scores.add(ExpenseCategory::Fuel, 1);
    } else if RIDE_TERMS.is_match(text) {
        scores.add(ExpenseCategory::Transport, 1);
    }

    if !key.is_empty() && contains_travel_brand(key) {
        scores.add(ExpenseCategory::Travel, TRAVEL_BRAND_SCORE);
    }
}

/// Brand tokens must match on whole words ("avis" is not in "davis")
fn contains_travel_brand(key: &str) -> bool {
    let padded = format!(" {} ", key);
    TRAVEL_BRAND_TOKENS
        .iter()
        .any(|brand| padded.contains(&format!(" {} ", brand)))
}

fn parse_overrides(raw: HashMap<String, String>) -> HashMap<String, ExpenseCategory> {
    raw.into_iter()
        .filter_map(|(key, tag)| match tag.parse::<ExpenseCategory>() {
            Ok(category) => Some((key, category)),
            Err(e) => {
                warn!("Dropping category override for '{}': {}", key, e);
                None
            }
        })
        .collect()
}

fn serialize_overrides(overrides: &HashMap<String, ExpenseCategory>) -> HashMap<String, String> {
    overrides
        .iter()
        .map(|(k, v)| (k.clone(), v.as_str().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overrides::MemoryStore;
    use crate::test_utils::GatedStore;
    use std::sync::Arc;

    fn categorizer() -> Categorizer {
        Categorizer::new(MemoryStore::new())
    }

    #[test]
    fn test_exact_merchant_and_keyword() {
        let c = categorizer();
        let text = "STARBUCKS STORE 4521\nLATTE 4.50\nTOTAL 4.90";
        let s = c.suggest_category(Some("Starbucks"), text);
        assert_eq!(s.category, ExpenseCategory::Coffee);
        assert_eq!(s.confidence, 10);

        let scores = c.score_breakdown(Some("Starbucks"), text);
        // exact + one keyword + coffee-drink tie-breaker
        assert_eq!(scores.get(ExpenseCategory::Coffee), 10 + 2 + 2);
    }

    #[test]
    fn test_score_three_falls_back_to_other() {
        let c = categorizer();
        let s = c.suggest_category(None, "WIDGET 2 lb\nGADGET 3 lb");
        assert_eq!(s.category, ExpenseCategory::Other);
        assert_eq!(s.confidence, 3);
    }

    #[test]
    fn test_score_four_is_confident() {
        let c = categorizer();
        let s = c.suggest_category(None, "Tip 2.00");
        assert_eq!(s.category, ExpenseCategory::Dining);
        assert_eq!(s.confidence, 4);
    }

    #[test]
    fn test_nothing_matches_is_other_zero() {
        let c = categorizer();
        let s = c.suggest_category(None, "");
        assert_eq!(s, CategorySuggestion::new(ExpenseCategory::Other, 0));
    }

    #[test]
    fn test_fuzzy_merchant_hit() {
        let c = categorizer();
        // "costco wholesale" contains the seed "costco"
        let scores = c.score_breakdown(Some("Costco Wholesale"), "");
        assert_eq!(scores.get(ExpenseCategory::Groceries), FUZZY_NAME_SCORE);
        // The exact member itself never also counts as fuzzy
        let scores = c.score_breakdown(Some("Costco"), "");
        assert_eq!(scores.get(ExpenseCategory::Groceries), EXACT_NAME_SCORE);
    }

    #[test]
    fn test_cue_tokens() {
        let c = categorizer();
        let scores = c.score_breakdown(Some("Luigi's Pizza Kitchen"), "");
        assert_eq!(scores.get(ExpenseCategory::Dining), CUE_SCORE);
    }

    #[test]
    fn test_keyword_cap() {
        let c = categorizer();
        let text = "produce bakery deli dairy organic milk eggs";
        let scores = c.score_breakdown(None, text);
        assert_eq!(scores.get(ExpenseCategory::Groceries), KEYWORD_CAP);
    }

    #[test]
    fn test_fuel_units() {
        let c = categorizer();
        let scores = c.score_breakdown(None, "REGULAR 40.12 LITRES");
        // keyword "litre" + unit cue + tie-breaker
        assert_eq!(scores.get(ExpenseCategory::Fuel), 2 + 4 + 1);
    }

    #[test]
    fn test_travel_brand_bonus() {
        let c = categorizer();
        let scores = c.score_breakdown(Some("Air Canada"), "");
        assert_eq!(
            scores.get(ExpenseCategory::Travel),
            EXACT_NAME_SCORE + TRAVEL_BRAND_SCORE
        );
        assert!(!contains_travel_brand("davis auto body"));
        assert!(contains_travel_brand("hertz yyz"));
    }

    #[test]
    fn test_ties_resolve_in_declaration_order() {
        let mut scores = CategoryScores::new();
        scores.add(ExpenseCategory::Fuel, 5);
        scores.add(ExpenseCategory::Coffee, 5);
        assert_eq!(scores.best(), (ExpenseCategory::Coffee, 5));
        assert_eq!(
            scores.ranked(),
            vec![(ExpenseCategory::Coffee, 5), (ExpenseCategory::Fuel, 5)]
        );
    }

    #[test]
    fn test_override_short_circuits() {
        let c = categorizer();
        c.remember("Starbucks #12", ExpenseCategory::Personal).unwrap();
        let s = c.suggest_category(Some("STARBUCKS"), "LATTE 4.50");
        assert_eq!(s, CategorySuggestion::new(ExpenseCategory::Personal, 10));

        assert!(c.forget("starbucks").unwrap());
        assert!(!c.forget("starbucks").unwrap());
        assert_eq!(
            c.suggest_category(Some("STARBUCKS"), "LATTE 4.50").category,
            ExpenseCategory::Coffee
        );
    }

    #[test]
    fn test_suggestions_proceed_while_override_is_saving() {
        let (store, started, release) = GatedStore::create();
        let c = Categorizer::new(store);

        std::thread::scope(|s| {
            let writer = s.spawn(|| c.remember("Joe's Garage", ExpenseCategory::Transport));
            started.recv().unwrap();

            let suggestion = c.suggest_category(Some("JOE'S GARAGE"), "");
            assert_eq!(suggestion, CategorySuggestion::new(ExpenseCategory::Transport, 10));

            release.send(()).unwrap();
            writer.join().unwrap().unwrap();
        });
    }

    #[test]
    fn test_remember_empty_is_noop() {
        let store = Arc::new(MemoryStore::new());
        let c = Categorizer::new(Arc::clone(&store));
        c.remember("  #  ", ExpenseCategory::Dining).unwrap();
        assert!(c.overrides().is_empty());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_overrides_persist_as_tags() {
        let store = Arc::new(MemoryStore::new());
        let c = Categorizer::new(Arc::clone(&store));
        c.remember("Joe's Garage", ExpenseCategory::Transport).unwrap();
        assert_eq!(
            store.snapshot().get("joe s garage").map(String::as_str),
            Some("transport")
        );

        let reopened = Categorizer::new(Arc::clone(&store));
        assert_eq!(
            reopened.overrides(),
            vec![("joe s garage".to_string(), ExpenseCategory::Transport)]
        );
    }

    #[test]
    fn test_unknown_tags_dropped_on_load() {
        let store = MemoryStore::with_entries([("a", "dining"), ("b", "spaceships")]);
        let c = Categorizer::new(store);
        assert_eq!(c.overrides(), vec![("a".to_string(), ExpenseCategory::Dining)]);
    }

    #[test]
    fn test_configured_confidence_floor() {
        let config = CategorizerConfig {
            min_confident_score: 6,
        };
        let c = Categorizer::with_config(MemoryStore::new(), &config);
        let s = c.suggest_category(None, "Tip 2.00");
        assert_eq!(s, CategorySuggestion::new(ExpenseCategory::Other, 4));
    }
}
