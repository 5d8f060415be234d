use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

// Desk behaviour lives in harbor_core; the config only carries it.
use harbor_core::DeskConfig;

const API_KEY_PLACEHOLDER: &str = "your-anon-key-here";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub extraction: DeskConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Hosted REST data service.
    #[default]
    Rest,
    /// Direct SQL connection (Postgres or SQLite).
    Database,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "StoreConfig::default_table")]
    pub table: String,
    #[serde(default = "StoreConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "StoreConfig::default_database_url")]
    pub database_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: String::new(),
            api_key: String::new(),
            table: Self::default_table(),
            timeout_secs: Self::default_timeout_secs(),
            database_url: Self::default_database_url(),
        }
    }
}

impl StoreConfig {
    fn default_table() -> String {
        "keywords".to_string()
    }

    const fn default_timeout_secs() -> u64 {
        10
    }

    fn default_database_url() -> String {
        dirs::home_dir().map_or_else(
            || "sqlite://keywords.db?mode=rwc".to_string(),
            |home| {
                format!(
                    "sqlite://{}?mode=rwc",
                    home.join("harbor").join("keywords.db").display()
                )
            },
        )
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check that the selected backend has what it needs to connect.
    pub fn validate(&self) -> anyhow::Result<()> {
        match self.backend {
            StoreBackend::Rest => {
                if self.url.trim().is_empty() {
                    anyhow::bail!("store.url is not set (or set HARBOR_STORE_URL)");
                }
                if self.api_key.trim().is_empty() || self.api_key == API_KEY_PLACEHOLDER {
                    anyhow::bail!("store.api_key is not set (or set HARBOR_STORE_KEY)");
                }
            }
            StoreBackend::Database => {
                if self.database_url.trim().is_empty() {
                    anyhow::bail!("store.database_url is not set (or set HARBOR_DATABASE_URL)");
                }
            }
        }
        Ok(())
    }
}

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("harbor"))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load `~/harbor/config.json` and apply environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'harbor init' to create config.",
                config_path.display()
            );
        }

        let mut config = Self::load_from(&config_path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Override store settings from `HARBOR_STORE_URL`, `HARBOR_STORE_KEY`
    /// and `HARBOR_DATABASE_URL`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty("HARBOR_STORE_URL") {
            info!("Using store URL from HARBOR_STORE_URL");
            self.store.url = url;
        }
        if let Some(key) = non_empty("HARBOR_STORE_KEY") {
            info!("Using store key from HARBOR_STORE_KEY");
            self.store.api_key = key;
        }
        if let Some(url) = non_empty("HARBOR_DATABASE_URL") {
            info!("Using database URL from HARBOR_DATABASE_URL");
            self.store.database_url = url;
        }
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");
        Self::write_template(&config_path)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Edit the config file and set store.url and store.api_key");
        println!("   2. Make sure the keywords table exists on the hosted service");
        println!("   3. Run 'harbor list' to check the connection");
        println!();
        println!("🔧 Configuration options:");
        println!("   - store.backend: rest (hosted service) or database (direct SQL)");
        println!("   - extraction.match_mode: first (one term per rule) or all");
        println!("   - extraction.duplicate_policy: allow or skip_existing");
        println!("   - extraction.sync_mode: relist or local");
        println!();
        Ok(())
    }

    /// Write the default template, refusing to overwrite an existing file.
    pub fn write_template(config_path: &Path) -> anyhow::Result<()> {
        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        let config_template = r#"{
  "store": {
    "backend": "rest",
    "url": "https://your-project.supabase.co",
    "api_key": "your-anon-key-here",
    "table": "keywords",
    "timeout_secs": 10
  },
  "extraction": {
    "match_mode": "first",
    "duplicate_policy": "allow",
    "sync_mode": "relist"
  }
}"#;

        std::fs::write(config_path, config_template)?;
        Ok(())
    }
}
