//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::path::Path;

use tally_core::{ExpenseCategory, ExtractorConfig, ReceiptExtractor};

use crate::commands::{self, truncate};

fn setup_extractor(dir: &Path) -> ReceiptExtractor {
    ReceiptExtractor::open(dir, ExtractorConfig::default())
}

fn write_receipt(dir: &Path, text: &str) -> std::path::PathBuf {
    let path = dir.join("receipt.txt");
    std::fs::write(&path, text).unwrap();
    path
}

// ========== Extract Command Tests ==========

#[test]
fn test_cmd_extract_text_and_json() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = setup_extractor(dir.path());
    let file = write_receipt(
        dir.path(),
        "STARBUCKS STORE 4521\n123 MAIN ST\nLATTE 4.50\nTAX 0.40\nTOTAL 4.90\n",
    );

    assert!(commands::cmd_extract(&extractor, &file, false).is_ok());
    assert!(commands::cmd_extract(&extractor, &file, true).is_ok());
}

#[test]
fn test_cmd_extract_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = setup_extractor(dir.path());
    let result = commands::cmd_extract(&extractor, &dir.path().join("nope.txt"), false);
    assert!(result.is_err());
}

#[test]
fn test_cmd_extract_blank_file() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = setup_extractor(dir.path());
    let file = write_receipt(dir.path(), "\n   \n\n");

    let err = commands::cmd_extract(&extractor, &file, false).unwrap_err();
    assert!(err.to_string().contains("No text lines"));
}

#[test]
fn test_read_lines() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_receipt(dir.path(), "A\r\nB\n\nC");
    assert_eq!(commands::read_lines(&file).unwrap(), vec!["A", "B", "", "C"]);
}

#[test]
fn test_fingerprint_is_stable_sha256() {
    assert_eq!(
        commands::fingerprint(""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
    assert_eq!(commands::fingerprint("abc"), commands::fingerprint("abc"));
    assert_ne!(commands::fingerprint("abc"), commands::fingerprint("abd"));
}

#[test]
fn test_format_result() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = setup_extractor(dir.path());
    let result = extractor
        .extract(&["STARBUCKS STORE 4521", "LATTE 4.50", "TOTAL 4.90"])
        .unwrap();

    let out = commands::format_result(&result);
    assert!(out.contains("Merchant:    Starbucks"));
    assert!(out.contains("Total:       $4.90"));
    assert!(out.contains("Date:        Unknown"));
    assert!(out.contains("Coffee"));
}

// ========== Merchants Command Tests ==========

#[test]
fn test_cmd_merchants_remember_and_forget() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = setup_extractor(dir.path());

    commands::cmd_merchants_remember(&extractor, "GRN LEAF #12", "Green Leaf").unwrap();
    assert_eq!(
        extractor.lexicon().overrides(),
        vec![("grn leaf".to_string(), "Green Leaf".to_string())]
    );
    assert!(commands::cmd_merchants_list(&extractor).is_ok());
    assert!(commands::cmd_merchants_lookup(&extractor, "grn leaf").is_ok());

    // Persisted for the next invocation
    let reopened = setup_extractor(dir.path());
    assert_eq!(reopened.lexicon().overrides().len(), 1);

    commands::cmd_merchants_forget(&reopened, "GRN LEAF").unwrap();
    assert!(reopened.lexicon().overrides().is_empty());
    assert!(commands::cmd_merchants_forget(&reopened, "GRN LEAF").is_ok());
}

#[test]
fn test_cmd_merchants_remember_empty_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = setup_extractor(dir.path());
    commands::cmd_merchants_remember(&extractor, "###", "Something").unwrap();
    assert!(extractor.lexicon().overrides().is_empty());
    assert!(commands::cmd_merchants_list(&extractor).is_ok());
}

// ========== Categories Command Tests ==========

#[test]
fn test_cmd_categories_remember() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = setup_extractor(dir.path());

    commands::cmd_categories_remember(&extractor, "Joe's Garage", "Transport").unwrap();
    assert_eq!(
        extractor.categorizer().overrides(),
        vec![("joe s garage".to_string(), ExpenseCategory::Transport)]
    );
    assert!(commands::cmd_categories_list(&extractor).is_ok());

    commands::cmd_categories_forget(&extractor, "joe's garage").unwrap();
    assert!(extractor.categorizer().overrides().is_empty());
}

#[test]
fn test_cmd_categories_remember_unknown_tag() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = setup_extractor(dir.path());

    let err = commands::cmd_categories_remember(&extractor, "Joe's Garage", "spaceships")
        .unwrap_err();
    assert!(err.to_string().contains("expected one of"));
    assert!(extractor.categorizer().overrides().is_empty());
}

#[test]
fn test_cmd_categories_tags_and_explain() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = setup_extractor(dir.path());
    let file = write_receipt(dir.path(), "REGULAR 40.12 LITRES\nTOTAL 62.50");

    assert!(commands::cmd_categories_tags().is_ok());
    assert!(commands::cmd_categories_explain(&extractor, "Esso", Some(&file)).is_ok());
    assert!(commands::cmd_categories_explain(&extractor, "", None).is_ok());
}

#[test]
fn test_parse_category() {
    assert_eq!(
        commands::parse_category(" Dining ").unwrap(),
        ExpenseCategory::Dining
    );
    assert!(commands::parse_category("").is_err());
}

// ========== Core Utility Tests ==========

#[test]
fn test_load_config_defaults_and_override() {
    let dir = tempfile::tempdir().unwrap();
    let config = commands::load_config(None, dir.path()).unwrap();
    assert_eq!(config, ExtractorConfig::default());

    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[merchant]\nmax_scan_lines = 5\n").unwrap();
    let config = commands::load_config(Some(&path), dir.path()).unwrap();
    assert_eq!(config.merchant.max_scan_lines, 5);

    assert!(commands::load_config(Some(&dir.path().join("missing.toml")), dir.path()).is_err());
}

#[test]
fn test_open_extractor_with_explicit_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let extractor = commands::open_extractor(Some(dir.path()), None).unwrap();
    extractor
        .lexicon()
        .remember("corner spot", "The Corner Spot")
        .unwrap();
    assert!(dir.path().join("merchant_overrides.json").exists());
}

#[test]
fn test_cmd_normalize() {
    assert!(commands::cmd_normalize("STARBUCKS STORE 4521").is_ok());
    assert!(commands::cmd_normalize("###").is_ok());
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a much longer merchant key", 10), "a much ...");
    assert_eq!(truncate("café crème brûlée", 8), "café ...");
}
