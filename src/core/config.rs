use crate::core::budget::BudgetDefaults;
use crate::core::currency::CurrencyCode;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_FLOATRATES_URL: &str = "https://www.floatrates.com";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FloatRatesProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub floatrates: Option<FloatRatesProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            floatrates: Some(FloatRatesProviderConfig {
                base_url: DEFAULT_FLOATRATES_URL.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct BudgetConfig {
    pub base_currency: String,
    pub foreign_currency: String,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        BudgetConfig {
            base_currency: "USD".to_string(),
            foreign_currency: "EUR".to_string(),
        }
    }
}

impl From<&BudgetConfig> for BudgetDefaults {
    fn from(config: &BudgetConfig) -> Self {
        let fallback = BudgetDefaults::default();
        let pick = |code: &str, fallback: CurrencyCode| {
            let code = CurrencyCode::new(code);
            if code.is_empty() { fallback } else { code }
        };
        BudgetDefaults {
            base_currency: pick(&config.base_currency, fallback.base_currency),
            foreign_currency: pick(&config.foreign_currency, fallback.foreign_currency),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub budget: BudgetConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    pub data_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fincalc", "fincalc")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "fincalc", "fincalc")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn floatrates_url(&self) -> &str {
        self.providers
            .floatrates
            .as_ref()
            .map_or(DEFAULT_FLOATRATES_URL, |p| p.base_url.as_str())
    }
}
