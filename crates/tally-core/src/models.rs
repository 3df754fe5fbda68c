//! Domain models for Tally

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Expense categories a receipt can be filed under
///
/// Declaration order is significant: it is the iteration order of
/// [`ExpenseCategory::all`] and decides ties between equal category scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Groceries,
    Coffee,
    Dining,
    Transport,
    Fuel,
    Shopping,
    Utilities,
    Housing,
    Entertainment,
    Travel,
    Personal,
    Income,
    Other,
}

impl ExpenseCategory {
    /// Number of categories
    pub const COUNT: usize = 13;

    /// All categories in declaration order
    pub fn all() -> &'static [ExpenseCategory] {
        &[
            Self::Groceries,
            Self::Coffee,
            Self::Dining,
            Self::Transport,
            Self::Fuel,
            Self::Shopping,
            Self::Utilities,
            Self::Housing,
            Self::Entertainment,
            Self::Travel,
            Self::Personal,
            Self::Income,
            Self::Other,
        ]
    }

    /// Position in declaration order
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groceries => "groceries",
            Self::Coffee => "coffee",
            Self::Dining => "dining",
            Self::Transport => "transport",
            Self::Fuel => "fuel",
            Self::Shopping => "shopping",
            Self::Utilities => "utilities",
            Self::Housing => "housing",
            Self::Entertainment => "entertainment",
            Self::Travel => "travel",
            Self::Personal => "personal",
            Self::Income => "income",
            Self::Other => "other",
        }
    }

    /// Human-readable label
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Groceries => "Groceries",
            Self::Coffee => "Coffee",
            Self::Dining => "Dining",
            Self::Transport => "Transport",
            Self::Fuel => "Fuel",
            Self::Shopping => "Shopping",
            Self::Utilities => "Utilities",
            Self::Housing => "Housing",
            Self::Entertainment => "Entertainment",
            Self::Travel => "Travel",
            Self::Personal => "Personal",
            Self::Income => "Income",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for ExpenseCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == tag)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A category guess with a 0-10 confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySuggestion {
    pub category: ExpenseCategory,
    /// 10 = exact seed or user override, below 4 = too weak to trust
    pub confidence: u8,
}

impl CategorySuggestion {
    pub fn new(category: ExpenseCategory, confidence: u8) -> Self {
        Self {
            category,
            confidence: confidence.min(10),
        }
    }
}

/// Structured fields pulled out of one receipt's OCR text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Merchant name, autocorrected to its canonical spelling when known
    pub merchant: Option<String>,
    /// Total as a decimal string with two fraction digits (e.g. "4.90")
    pub amount: Option<String>,
    pub date: Option<NaiveDate>,
    pub category: ExpenseCategory,
    pub category_confidence: u8,
    /// OCR lines joined with newlines, in receipt order
    pub raw_text: String,
}
