use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "config.json";
const BASE_URL_ENV: &str = "LEAD_API_BASE_URL";

/// Process-wide settings for the lead pipeline. Loaded once at startup and
/// shared behind an `Arc`; nothing mutates it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Prefix for every proxy endpoint. Empty means same-origin.
    pub api_base_url: String,
    /// Origin that same-origin paths resolve against.
    pub page_origin: String,
    pub success_reset_delay_ms: u64,
    pub decline_reset_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            page_origin: "http://localhost:3002".to_string(),
            success_reset_delay_ms: 1500,
            decline_reset_delay_ms: 3000,
        }
    }
}

impl AppConfig {
    /// Directory used when no explicit one is given on the command line.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("casa-bonita-leads"))
    }

    pub fn load(config_dir: &Path) -> Self {
        let config_path = config_dir.join(CONFIG_FILE);
        let mut config = if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                    log::warn!("Ignoring malformed {}: {}", config_path.display(), e);
                    Self::default()
                }),
                Err(e) => {
                    log::warn!("Could not read {}: {}", config_path.display(), e);
                    Self::default()
                }
            }
        } else {
            let c = Self::default();
            c.save(config_dir);
            c
        };

        config.apply_base_url_override(std::env::var(BASE_URL_ENV).ok());
        config
    }

    /// Env override for the base URL. Empty values are ignored.
    fn apply_base_url_override(&mut self, value: Option<String>) {
        if let Some(base) = value {
            if !base.is_empty() {
                self.api_base_url = base;
            }
        }
    }

    pub fn save(&self, config_dir: &Path) {
        if std::fs::create_dir_all(config_dir).is_err() {
            return;
        }
        let config_path = config_dir.join(CONFIG_FILE);
        if let Ok(content) = serde_json::to_string_pretty(self) {
            std::fs::write(config_path, content).ok();
        }
    }

    /// Absolute URL for `path` (which must start with `/`).
    pub fn endpoint(&self, path: &str) -> String {
        let base = if self.api_base_url.is_empty() {
            &self.page_origin
        } else {
            &self.api_base_url
        };
        format!("{}{}", base.trim_end_matches('/'), path)
    }

    /// True when the resolved endpoints point at a development host.
    pub fn targets_localhost(&self) -> bool {
        reqwest::Url::parse(&self.endpoint("/"))
            .ok()
            .and_then(|u| u.host_str().map(|h| h == "localhost" || h == "127.0.0.1"))
            .unwrap_or(false)
    }

    pub fn success_reset_delay(&self) -> Duration {
        Duration::from_millis(self.success_reset_delay_ms)
    }

    pub fn decline_reset_delay(&self) -> Duration {
        Duration::from_millis(self.decline_reset_delay_ms)
    }
}
