//! Receipt extraction command

use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use tally_core::{Error, ExtractionResult, ReceiptExtractor};

/// Read OCR lines from a file, or stdin for "-"
pub fn read_lines(file: &Path) -> Result<Vec<String>> {
    let content = if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        if !file.exists() {
            return Err(anyhow!("File not found: {}", file.display()));
        }
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?
    };

    Ok(content.lines().map(str::to_string).collect())
}

/// SHA-256 of the receipt text, hex encoded
pub fn fingerprint(raw_text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// "Fri, Jan 05 2024 (2024-01-05)" or "Unknown"
fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => format!("{} ({})", d.format("%a, %b %d %Y"), d.format("%Y-%m-%d")),
        None => "Unknown".to_string(),
    }
}

/// Human-readable summary of one extraction
pub fn format_result(result: &ExtractionResult) -> String {
    let merchant = result.merchant.as_deref().unwrap_or("Unknown");
    let amount = result
        .amount
        .as_deref()
        .map(|a| format!("${}", a))
        .unwrap_or_else(|| "N/A".to_string());
    let date = format_date(result.date);

    let mut out = String::new();
    out.push_str(&format!("  Merchant:    {}\n", merchant));
    out.push_str(&format!("  Total:       {}\n", amount));
    out.push_str(&format!("  Date:        {}\n", date));
    out.push_str(&format!(
        "  Category:    {} (confidence {}/10)\n",
        result.category.display_name(),
        result.category_confidence
    ));
    out.push_str(&format!("  Fingerprint: {}\n", &fingerprint(&result.raw_text)[..16]));
    out
}

pub fn cmd_extract(extractor: &ReceiptExtractor, file: &Path, json: bool) -> Result<()> {
    let lines = read_lines(file)?;

    let result = match extractor.extract(&lines) {
        Ok(result) => result,
        Err(Error::EmptyInput) => {
            return Err(anyhow!("No text lines found in {}", file.display()));
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        let mut value = serde_json::to_value(&result)?;
        value["fingerprint"] = serde_json::Value::String(fingerprint(&result.raw_text));
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!();
    println!("🧾 Receipt");
    println!("{}", "─".repeat(50));
    print!("{}", format_result(&result));
    if result.category_confidence < 4 {
        println!();
        println!("💡 Tip: tally categories remember \"<merchant>\" <category>");
    }

    Ok(())
}
