//! Configuration, layered from defaults, an optional TOML file and
//! `NBASHOTS_` environment variables (nested keys split on `__`, so
//! `NBASHOTS_SERVER__PORT=9000` sets `server.port`).

use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::nba::params::Season;

pub const CONFIG_FILE_NAME: &str = "nbashotchart.toml";
const ENV_PREFIX: &str = "NBASHOTS_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub directory: DirectoryConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Open the dashboard in the default browser once listening.
    pub open_browser: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Wait before retry n is `n * retry_backoff_secs`.
    pub retry_backoff_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub dir: PathBuf,
    pub max_age_hours: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub database_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub seasons: Vec<String>,
    pub default_player: String,
    pub default_team: String,
    pub default_season: String,
    /// Number of shots generated when the API is unreachable.
    pub synthetic_shots: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8050,
            open_browser: false,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            max_retries: 5,
            retry_backoff_secs: 5,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("cache"),
            max_age_hours: 24,
        }
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("nbashotchart.db"),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            seasons: vec!["2024-25".to_string(), "2023-24".to_string()],
            default_player: "Luka Dončić".to_string(),
            default_team: "Dallas Mavericks".to_string(),
            default_season: "2024-25".to_string(),
            synthetic_shots: 150,
        }
    }
}

impl Config {
    /// Load from defaults, then `path` (or `nbashotchart.toml` in the working
    /// directory, if present), then the environment.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_file = path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.max_retries == 0 {
            bail!("api.max_retries must be at least 1");
        }
        if self.dashboard.synthetic_shots == 0 {
            bail!("dashboard.synthetic_shots must be greater than 0");
        }
        if self.dashboard.seasons.is_empty() {
            bail!("dashboard.seasons must list at least one season");
        }
        for season in self.dashboard.seasons.iter().chain(std::iter::once(&self.dashboard.default_season)) {
            season.parse::<Season>()?;
        }
        Ok(())
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_secs(self.api.retry_backoff_secs)
    }

    pub fn cache_max_age(&self) -> Duration {
        Duration::from_secs(self.cache.max_age_hours.saturating_mul(3600))
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
