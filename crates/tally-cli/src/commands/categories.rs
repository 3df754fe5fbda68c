//! Category override commands

use std::path::Path;

use anyhow::Result;
use tally_core::{normalize, Error, ExpenseCategory, ReceiptExtractor};

use super::{read_lines, truncate};

/// Print every category tag
pub fn cmd_categories_tags() -> Result<()> {
    println!();
    println!("🏷️  Categories");
    println!("   ─────────────────────────────────────────────────────────────");
    for category in ExpenseCategory::all() {
        println!("   • {:<14} {}", category.as_str(), category.display_name());
    }
    Ok(())
}

pub fn cmd_categories_list(extractor: &ReceiptExtractor) -> Result<()> {
    let overrides = extractor.categorizer().overrides();

    if overrides.is_empty() {
        println!("No category overrides remembered.");
        println!("Use 'tally categories remember <MERCHANT> <CATEGORY>' to add one.");
        return Ok(());
    }

    println!();
    println!("📂 Category overrides ({})", overrides.len());
    println!("   ─────────────────────────────────────────────────────────────");
    for (key, category) in &overrides {
        println!("   {:<32} → {}", truncate(key, 32), category);
    }

    Ok(())
}

/// Parse a category tag, listing valid tags on failure
pub fn parse_category(tag: &str) -> Result<ExpenseCategory> {
    tag.parse::<ExpenseCategory>().map_err(|e| {
        let valid: Vec<&str> = ExpenseCategory::all().iter().map(|c| c.as_str()).collect();
        Error::InvalidData(format!("{} (expected one of: {})", e, valid.join(", "))).into()
    })
}

pub fn cmd_categories_remember(
    extractor: &ReceiptExtractor,
    merchant: &str,
    category: &str,
) -> Result<()> {
    let category = parse_category(category)?;
    let key = normalize(merchant);
    if key.is_empty() {
        println!("⚠️  Nothing to remember: merchant name is empty after normalization");
        return Ok(());
    }

    extractor.categorizer().remember(merchant, category)?;
    println!("✅ '{}' will be filed under {}", key, category.display_name());
    Ok(())
}

pub fn cmd_categories_forget(extractor: &ReceiptExtractor, merchant: &str) -> Result<()> {
    if extractor.categorizer().forget(merchant)? {
        println!("✅ Forgot category override for '{}'", normalize(merchant));
    } else {
        println!("No category override for '{}'", normalize(merchant));
    }
    Ok(())
}

/// Show the score breakdown behind a category suggestion
pub fn cmd_categories_explain(
    extractor: &ReceiptExtractor,
    merchant: &str,
    file: Option<&Path>,
) -> Result<()> {
    let text = match file {
        Some(path) => read_lines(path)?.join("\n"),
        None => String::new(),
    };

    let categorizer = extractor.categorizer();
    let suggestion = categorizer.suggest_category(Some(merchant), &text);
    let scores = categorizer.score_breakdown(Some(merchant), &text);

    println!();
    println!(
        "📊 {} → {} (confidence {}/10)",
        merchant,
        suggestion.category.display_name(),
        suggestion.confidence
    );
    println!("   ─────────────────────────────────────────────────────────────");

    let ranked = scores.ranked();
    if ranked.is_empty() {
        println!("   No category scored");
    }
    for (category, score) in ranked {
        println!("   {:<14} {:>3}", category.as_str(), score);
    }

    Ok(())
}
