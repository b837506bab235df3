use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default parse endpoint the front end posts `{"query": ...}` to.
pub const DEFAULT_PARSE_ENDPOINT: &str = "https://parsequery-gpylux3xbq-uc.a.run.app";

/// Marketplace search pages the compiler targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceTarget {
    /// Vehicle category search page.
    pub vehicle_url: String,
    /// General marketplace search page (location-scoped).
    pub general_url: String,
}

impl Default for MarketplaceTarget {
    fn default() -> Self {
        Self {
            vehicle_url: "https://www.facebook.com/marketplace/category/vehicles".to_string(),
            general_url: "https://www.facebook.com/marketplace/106378336067638/search/".to_string(),
        }
    }
}

/// Timeouts for outbound HTTP calls (optional section in config.toml).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientTimeouts {
    pub connect_timeout_secs: u64,
    /// Whole-request timeout, including reading the body.
    pub timeout_secs: u64,
}

impl Default for ClientTimeouts {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 30,
        }
    }
}

/// Relay service settings (optional `[relay]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Socket address the relay listens on.
    pub listen: String,
    /// OpenAI-compatible chat completions endpoint.
    pub api_url: String,
    pub model: String,
    pub temperature: f64,
    /// Name of the environment variable holding the upstream API key.
    pub api_key_env: String,
    #[serde(default)]
    pub timeouts: ClientTimeouts,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8787".to_string(),
            api_url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "llama3-8b-8192".to_string(),
            temperature: 0.2,
            api_key_env: "GROQ_API_KEY".to_string(),
            timeouts: ClientTimeouts::default(),
        }
    }
}

/// Global configuration loaded from `~/.config/sortora/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortoraConfig {
    /// Endpoint that turns free text into a parsed-intent record.
    pub parse_endpoint: String,
    #[serde(default)]
    pub marketplace: MarketplaceTarget,
    #[serde(default)]
    pub client: ClientTimeouts,
    /// Optional relay settings; if missing, built-in defaults are used.
    #[serde(default)]
    pub relay: Option<RelayConfig>,
}

impl Default for SortoraConfig {
    fn default() -> Self {
        Self {
            parse_endpoint: DEFAULT_PARSE_ENDPOINT.to_string(),
            marketplace: MarketplaceTarget::default(),
            client: ClientTimeouts::default(),
            relay: None,
        }
    }
}

impl SortoraConfig {
    /// Relay settings, falling back to defaults when the section is absent.
    pub fn relay_or_default(&self) -> RelayConfig {
        self.relay.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sortora")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SortoraConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] but with an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<SortoraConfig> {
    if !path.exists() {
        let default_cfg = SortoraConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: SortoraConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
