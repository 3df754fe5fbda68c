//! Tally CLI - Receipt field extraction and categorization
//!
//! Usage:
//!   tally extract --file receipt.txt     Extract merchant/total/date/category
//!   tally merchants remember RAW NAME    Teach a merchant-name correction
//!   tally categories remember NAME TAG   Pin a merchant to a category
//!   tally normalize "STARBUCKS #12"      Show the lookup key for a name

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let data_dir = cli.data_dir.as_deref();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Normalize { text } => commands::cmd_normalize(&text),
        Commands::Extract { file, json } => {
            let extractor = commands::open_extractor(data_dir, config)?;
            commands::cmd_extract(&extractor, &file, json)
        }
        Commands::Merchants { action } => {
            let extractor = commands::open_extractor(data_dir, config)?;
            match action {
                None | Some(MerchantsAction::List) => commands::cmd_merchants_list(&extractor),
                Some(MerchantsAction::Remember { raw, display }) => {
                    commands::cmd_merchants_remember(&extractor, &raw, &display)
                }
                Some(MerchantsAction::Forget { raw }) => {
                    commands::cmd_merchants_forget(&extractor, &raw)
                }
                Some(MerchantsAction::Lookup { raw }) => {
                    commands::cmd_merchants_lookup(&extractor, &raw)
                }
            }
        }
        Commands::Categories { action } => match action {
            None => commands::cmd_categories_tags(),
            Some(action) => {
                let extractor = commands::open_extractor(data_dir, config)?;
                match action {
                    CategoriesAction::List => commands::cmd_categories_list(&extractor),
                    CategoriesAction::Remember { merchant, category } => {
                        commands::cmd_categories_remember(&extractor, &merchant, &category)
                    }
                    CategoriesAction::Forget { merchant } => {
                        commands::cmd_categories_forget(&extractor, &merchant)
                    }
                    CategoriesAction::Explain { merchant, file } => {
                        commands::cmd_categories_explain(&extractor, &merchant, file.as_deref())
                    }
                }
            }
        },
    }
}
