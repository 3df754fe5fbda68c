//! Normalization key inspection

use anyhow::Result;
use tally_core::normalize;

pub fn cmd_normalize(text: &str) -> Result<()> {
    let key = normalize(text);
    if key.is_empty() {
        println!("(empty)");
    } else {
        println!("{}", key);
    }
    Ok(())
}
