use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const COUNTRIES_URL_ENV: &str = "COUNTRIES_API_URL";
pub const RATES_URL_ENV: &str = "EXCHANGE_RATE_API_URL";

const DEFAULT_COUNTRIES_URL: &str =
    "https://restcountries.com/v2/all?fields=name,capital,region,population,flag,currencies";
const DEFAULT_RATES_URL: &str = "https://open.er-api.com/v6/latest/USD";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FeedConfig {
    pub url: String,
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProvidersConfig {
    pub countries: FeedConfig,
    pub rates: FeedConfig,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            countries: FeedConfig {
                url: DEFAULT_COUNTRIES_URL.to_string(),
            },
            rates: FeedConfig {
                url: DEFAULT_RATES_URL.to_string(),
            },
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    pub data_path: Option<String>,
}

impl AppConfig {
    /// Loads the default config file, or defaults when there is none.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        let config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            debug!("No config at {}, using defaults", config_path.display());
            Self::default()
        };
        Ok(config.with_env_overrides())
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "countrystat")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("in", "codito", "countrystat")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Directory of the fjall keyspace.
    pub fn store_path(&self) -> Result<PathBuf> {
        Ok(self.default_data_path()?.join("db"))
    }

    /// Directory holding the rendered summary image.
    pub fn cache_path(&self) -> Result<PathBuf> {
        Ok(self.default_data_path()?.join("cache"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Applies feed URL overrides from the environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(COUNTRIES_URL_ENV).ok(),
            std::env::var(RATES_URL_ENV).ok(),
        )
    }

    fn with_overrides(mut self, countries_url: Option<String>, rates_url: Option<String>) -> Self {
        if let Some(url) = countries_url.filter(|u| !u.trim().is_empty()) {
            debug!("Countries feed URL overridden by {}", COUNTRIES_URL_ENV);
            self.providers.countries.url = url;
        }
        if let Some(url) = rates_url.filter(|u| !u.trim().is_empty()) {
            debug!("Rates feed URL overridden by {}", RATES_URL_ENV);
            self.providers.rates.url = url;
        }
        self
    }
}
