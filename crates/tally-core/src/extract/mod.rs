//! Field extractors over raw OCR text
//!
//! Each extractor is a pure function; a missing field is `None`, never an error.

mod amount;
mod date;
mod merchant;

pub use amount::{extract_amount, TOTAL_KEYWORDS};
pub use date::extract_date;
pub use merchant::extract_merchant_line;
