use harbor_config::{Config, StoreBackend};
use harbor_core::{KeywordStore, PatternTable};
use tracing::info;

/// Strategy for displaying configuration information.
///
/// Prints the store settings (secrets masked), the extraction settings and
/// whether the configured store answers a listing request.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        println!("=== harbor Configuration ===\n");

        println!("Store:");
        match config.store.backend {
            StoreBackend::Rest => {
                println!("  Backend: rest");
                println!("  URL: {}", display_or_unset(&config.store.url));
                println!("  API Key: {}", mask_key(&config.store.api_key));
                println!("  Table: {}", config.store.table);
                println!("  Timeout: {}s", config.store.timeout_secs);
            }
            StoreBackend::Database => {
                println!("  Backend: database");
                println!("  URL: {}", mask_database_url(&config.store.database_url));
            }
        }

        info!("Testing store connection");
        match super::open_store(&config).await {
            Ok(store) => match store.list().await {
                Ok(keywords) => {
                    println!("  Status: Connected ({} keywords)", keywords.len());
                }
                Err(e) => {
                    println!("  Status: Connection failed");
                    println!("  Error: {e}");
                }
            },
            Err(e) => {
                println!("  Status: Not configured");
                println!("  Error: {e}");
            }
        }
        println!();

        println!("Extraction:");
        println!("  Match Mode: {:?}", config.extraction.match_mode);
        println!(
            "  Duplicate Policy: {:?}",
            config.extraction.duplicate_policy
        );
        println!("  Sync Mode: {:?}", config.extraction.sync_mode);
        let table = PatternTable::with_defaults()?;
        println!("  Rules: {}", table.rule_count());
        for category in table.categories() {
            println!(
                "    {}: {}",
                category.label(),
                table.rules(category).len()
            );
        }

        Ok(())
    }
}

fn display_or_unset(value: &str) -> &str {
    if value.trim().is_empty() {
        "(not set)"
    } else {
        value
    }
}

fn mask_key(key: &str) -> String {
    if key.is_empty() {
        return "(not set)".to_string();
    }

    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "***".to_string()
    }
}

fn mask_database_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };

    let Some((credentials, after_at)) = rest.split_once('@') else {
        return url.to_string();
    };

    let Some((username, _password)) = credentials.split_once(':') else {
        return url.to_string();
    };

    format!("{scheme}://{username}:***@{after_at}")
}
