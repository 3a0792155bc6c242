use std::{fs, path::Path, time::Duration};

use serde::Deserialize;

use crate::core::error::ScoutError;

#[derive(Debug, Clone, Deserialize)]
pub struct ThrottleConfig {
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl ThrottleConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub base_url: String,
    #[serde(default = "default_routes")]
    pub routes: Vec<String>,
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,
    #[serde(default = "default_locale")]
    pub default_locale: String,
    #[serde(default = "default_dictionaries_dir")]
    pub dictionaries_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreditAccount {
    pub user_id: String,
    pub total: u64,
    pub remaining: u64,
    pub plan: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_throttle")]
    pub throttle: ThrottleConfig,
    pub search: SearchConfig,
    pub site: SiteConfig,
    #[serde(default)]
    pub credits: Vec<CreditAccount>,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ScoutError> {
        if self.site.locales.is_empty() {
            return Err(ScoutError::Config("site.locales must not be empty".into()));
        }
        if !self.site.locales.contains(&self.site.default_locale) {
            return Err(ScoutError::Config(format!(
                "default locale {} is not in site.locales",
                self.site.default_locale
            )));
        }
        for account in &self.credits {
            if account.remaining > account.total {
                return Err(ScoutError::Config(format!(
                    "credits for {} exceed their total",
                    account.user_id
                )));
            }
        }
        Ok(())
    }
}

pub fn load_config(path: Option<&str>) -> Result<AppConfig, ScoutError> {
    let default_path = Path::new("config/localscout.toml");
    let path = path.map(Path::new).unwrap_or(default_path);

    if !path.exists() {
        tracing::debug!("no config at {}, using defaults", path.display());
        return Ok(default_config());
    }

    let content = fs::read_to_string(path).map_err(|e| ScoutError::Config(e.to_string()))?;
    let cfg: AppConfig =
        toml::from_str(&content).map_err(|e| ScoutError::Config(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn default_config() -> AppConfig {
    AppConfig {
        throttle: default_throttle(),
        search: SearchConfig {
            base_url: "http://127.0.0.1:8787/api/search".to_string(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            default_limit: default_limit(),
        },
        site: SiteConfig {
            base_url: "https://localscout.example".to_string(),
            routes: default_routes(),
            locales: default_locales(),
            default_locale: default_locale(),
            dictionaries_dir: default_dictionaries_dir(),
        },
        credits: Vec::new(),
    }
}

fn default_throttle() -> ThrottleConfig {
    ThrottleConfig {
        delay_ms: default_delay_ms(),
    }
}

fn default_delay_ms() -> u64 {
    2_000
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_user_agent() -> String {
    "local-scout/0.1".to_string()
}

fn default_limit() -> usize {
    20
}

fn default_routes() -> Vec<String> {
    ["", "/pricing", "/features", "/about", "/contact", "/login", "/signup"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_locales() -> Vec<String> {
    vec!["en".to_string(), "es".to_string(), "fr".to_string()]
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_dictionaries_dir() -> String {
    "dictionaries".to_string()
}
