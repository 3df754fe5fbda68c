//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (data dir, config, open_extractor)
//! - `extract` - Receipt extraction
//! - `merchants` - Merchant-name correction commands
//! - `categories` - Category override commands
//! - `normalize` - Normalization key inspection

pub mod categories;
pub mod core;
pub mod extract;
pub mod merchants;
pub mod normalize;

// Re-export command functions for main.rs
pub use categories::*;
pub use self::core::*;
pub use extract::*;
pub use merchants::*;
pub use normalize::*;

/// Truncate a string to a maximum length in chars, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
