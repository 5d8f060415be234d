//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input type, so
//! dispatch is resolved at compile time.

use chrono::Local;
use harbor_config::{Config, StoreBackend};
use harbor_core::{
    ExtractedKeywords, Keyword, KeywordDesk, KeywordStore, PatternTable, SyncMode,
};
use harbor_store::{DatabaseKeywordStore, RestKeywordStore};
use std::sync::Arc;
use tracing::{info, warn};

mod add;
mod analyze;
mod delete;
mod extract;
mod info;
mod init;
mod list;
mod version;

pub use add::{AddInput, AddStrategy};
pub use analyze::{AnalyzeInput, AnalyzeStrategy};
pub use delete::DeleteStrategy;
pub use extract::{ExtractInput, ExtractStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use list::ListStrategy;
pub use version::VersionStrategy;

/// Desk over whichever backend the config selects.
pub type Desk = KeywordDesk<Box<dyn KeywordStore>>;

/// Core trait defining the contract for all command strategies.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Open the configured keyword store.
async fn open_store(config: &Config) -> anyhow::Result<Box<dyn KeywordStore>> {
    config.store.validate()?;

    match config.store.backend {
        StoreBackend::Rest => {
            info!("Using REST keyword store at {}", config.store.url);
            let store = RestKeywordStore::new(
                &config.store.url,
                config.store.api_key.clone(),
                config.store.timeout(),
            )?
            .with_table(config.store.table.clone());
            Ok(Box::new(store))
        }
        StoreBackend::Database => {
            info!("Using database keyword store");
            let store = DatabaseKeywordStore::connect(&config.store.database_url).await?;
            Ok(Box::new(store))
        }
    }
}

/// Load config, open the store and build a desk with the default pattern table.
async fn open_desk() -> anyhow::Result<Desk> {
    let config = Config::load()?;
    let store = open_store(&config).await?;
    let table = PatternTable::with_defaults()?;
    Ok(KeywordDesk::new(
        store,
        Arc::new(table),
        config.extraction,
    ))
}

/// Load the current listing when mutations patch it locally.
///
/// Under re-list sync the mutation itself lists afterwards.
async fn prime_local_listing(desk: &mut Desk) {
    if desk.config().sync_mode != SyncMode::Local {
        return;
    }
    if let Err(e) = desk.refresh().await {
        warn!("Continuing without an initial keyword listing: {e}");
    }
}

fn print_keywords(keywords: &[Keyword]) {
    if keywords.is_empty() {
        println!("No keywords stored.");
        return;
    }

    println!("ID     TERM                     CATEGORY       ADDED ON");
    for keyword in keywords {
        println!(
            "{:<6} {:<24} {:<14} {}",
            keyword.id,
            keyword.term,
            keyword.category,
            keyword
                .created_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
        );
    }
}

fn print_found(found: &ExtractedKeywords) {
    if found.is_empty() {
        println!("No keywords found.");
        return;
    }

    println!("Found keywords:");
    for (category, terms) in found.iter() {
        println!("  {}: {}", category.label(), terms.join(", "));
    }
}
