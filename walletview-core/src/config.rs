//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "store": { "url": null, "apiKey": null, "publicBaseUrl": "http://localhost:54321", "timeoutSecs": 30 },
//!   "icons": { "bucket": "wallet-icons", "lookupRetries": 0 }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::services::{IconResolverConfig, DEFAULT_ICON_BUCKET};

pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:54321";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_STORE_URL: &str = "WALLETVIEW_STORE_URL";
const ENV_API_KEY: &str = "WALLETVIEW_API_KEY";
const ENV_ICON_RETRIES: &str = "WALLETVIEW_ICON_RETRIES";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    store: StoreSettings,
    #[serde(default)]
    icons: IconSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreSettings {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default = "default_public_base_url")]
    public_base_url: String,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            public_base_url: default_public_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            other: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IconSettings {
    #[serde(default = "default_bucket")]
    bucket: String,
    #[serde(default)]
    lookup_retries: u32,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl Default for IconSettings {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            lookup_retries: 0,
            other: HashMap::new(),
        }
    }
}

fn default_public_base_url() -> String {
    DEFAULT_PUBLIC_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_bucket() -> String {
    DEFAULT_ICON_BUCKET.to_string()
}

/// WalletView configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    /// Hosted store endpoint; `None` means the local DuckDB store
    pub store_url: Option<String>,
    pub api_key: Option<String>,
    /// Base for public object URLs when running against the local store
    pub public_base_url: String,
    pub timeout_secs: u64,
    pub icon_bucket: String,
    pub icon_lookup_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_raw(&SettingsFile::default())
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// A missing or malformed settings file yields defaults. Environment
    /// variables override the file.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(data_dir)?;
        let mut config = Self::from_raw(&raw);
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Save config to the data directory
    /// Preserves keys this crate doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let mut settings = read_settings(data_dir)?;

        settings.store.url = self.store_url.clone();
        settings.store.api_key = self.api_key.clone();
        settings.store.public_base_url = self.public_base_url.clone();
        settings.store.timeout_secs = self.timeout_secs;
        settings.icons.bucket = self.icon_bucket.clone();
        settings.icons.lookup_retries = self.icon_lookup_retries;

        std::fs::create_dir_all(data_dir)?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join("settings.json"), content)?;
        Ok(())
    }

    /// Whether reads go to the hosted store
    pub fn uses_remote_store(&self) -> bool {
        self.store_url.is_some()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn icon_resolver_config(&self) -> IconResolverConfig {
        IconResolverConfig {
            bucket: self.icon_bucket.clone(),
            lookup_retries: self.icon_lookup_retries,
        }
    }

    fn from_raw(raw: &SettingsFile) -> Self {
        Self {
            store_url: non_blank(raw.store.url.clone()),
            api_key: non_blank(raw.store.api_key.clone()),
            public_base_url: raw.store.public_base_url.clone(),
            timeout_secs: raw.store.timeout_secs,
            icon_bucket: raw.icons.bucket.clone(),
            icon_lookup_retries: raw.icons.lookup_retries,
        }
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = non_blank(lookup(ENV_STORE_URL)) {
            self.store_url = Some(url);
        }
        if let Some(key) = non_blank(lookup(ENV_API_KEY)) {
            self.api_key = Some(key);
        }
        if let Some(retries) = lookup(ENV_ICON_RETRIES).and_then(|v| v.trim().parse().ok()) {
            self.icon_lookup_retries = retries;
        }
    }
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join("settings.json");
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let raw = read_settings(dir.path()).unwrap();
        let config = Config::from_raw(&raw);

        assert!(!config.uses_remote_store());
        assert_eq!(config.public_base_url, DEFAULT_PUBLIC_BASE_URL);
        assert_eq!(config.icon_bucket, "wallet-icons");
        assert_eq!(config.icon_lookup_retries, 0);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();

        let config = Config::from_raw(&read_settings(dir.path()).unwrap());
        assert_eq!(config.icon_bucket, DEFAULT_ICON_BUCKET);
    }

    #[test]
    fn test_reads_camel_case_sections() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"store": {"url": "https://store.example.com", "apiKey": "k", "timeoutSecs": 5},
                "icons": {"bucket": "icons", "lookupRetries": 2}}"#,
        )
        .unwrap();

        let config = Config::from_raw(&read_settings(dir.path()).unwrap());
        assert_eq!(config.store_url.as_deref(), Some("https://store.example.com"));
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.icon_resolver_config().bucket, "icons");
        assert_eq!(config.icon_resolver_config().lookup_retries, 2);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            ENV_STORE_URL => Some("https://env.example.com".to_string()),
            ENV_API_KEY => Some("   ".to_string()),
            ENV_ICON_RETRIES => Some("3".to_string()),
            _ => None,
        });

        assert_eq!(config.store_url.as_deref(), Some("https://env.example.com"));
        assert_eq!(config.api_key, None);
        assert_eq!(config.icon_lookup_retries, 3);
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"theme": "dark", "icons": {"bucket": "old", "cacheSize": 10}}"#,
        )
        .unwrap();

        let mut config = Config::from_raw(&read_settings(dir.path()).unwrap());
        config.icon_bucket = "new".to_string();
        config.save(dir.path()).unwrap();

        let saved: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("settings.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(saved["theme"], "dark");
        assert_eq!(saved["icons"]["bucket"], "new");
        assert_eq!(saved["icons"]["cacheSize"], 10);
    }
}
