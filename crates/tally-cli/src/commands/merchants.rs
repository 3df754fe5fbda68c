//! Merchant-name correction commands

use anyhow::Result;
use tally_core::{normalize, CorrectionSource, ReceiptExtractor};

use super::truncate;

pub fn cmd_merchants_list(extractor: &ReceiptExtractor) -> Result<()> {
    let overrides = extractor.lexicon().overrides();

    if overrides.is_empty() {
        println!("No merchant corrections remembered.");
        println!("Use 'tally merchants remember <RAW> <DISPLAY>' to add one.");
        return Ok(());
    }

    println!();
    println!("🏪 Merchant corrections ({})", overrides.len());
    println!("   ─────────────────────────────────────────────────────────────");
    for (key, display) in &overrides {
        println!("   {:<32} → {}", truncate(key, 32), display);
    }

    Ok(())
}

pub fn cmd_merchants_remember(extractor: &ReceiptExtractor, raw: &str, display: &str) -> Result<()> {
    let key = normalize(raw);
    if key.is_empty() || display.trim().is_empty() {
        println!("⚠️  Nothing to remember: both the merchant text and display name must be non-empty");
        return Ok(());
    }

    extractor.lexicon().remember(raw, display)?;
    println!("✅ '{}' will display as '{}'", key, display.trim());
    Ok(())
}

pub fn cmd_merchants_forget(extractor: &ReceiptExtractor, raw: &str) -> Result<()> {
    if extractor.lexicon().forget(raw)? {
        println!("✅ Forgot correction for '{}'", normalize(raw));
    } else {
        println!("No correction remembered for '{}'", normalize(raw));
    }
    Ok(())
}

pub fn cmd_merchants_lookup(extractor: &ReceiptExtractor, raw: &str) -> Result<()> {
    let key = normalize(raw);
    println!("Key: {}", if key.is_empty() { "(empty)" } else { key.as_str() });

    match extractor.lexicon().autocorrect_display_name(raw) {
        Some(hit) => {
            let source = match hit.source {
                CorrectionSource::Override => "remembered",
                CorrectionSource::Exact => "exact",
                CorrectionSource::Fuzzy => "fuzzy",
            };
            println!(
                "→ {} ({} match, confidence {}/10)",
                hit.display_name, source, hit.confidence
            );
            if let Some(category) = extractor.lexicon().seed_category(&hit.display_name) {
                println!("  Known {} merchant", category.display_name().to_lowercase());
            }
        }
        None => println!("→ no correction"),
    }

    Ok(())
}
