//! Configuration file support for Metas.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/metas/config.toml`.

use crate::Result;
use chrono::Locale;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default strftime pattern for history day headings
pub const DEFAULT_DAY_LABEL_FORMAT: &str = "%A, %-d de %B de %Y";

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// History display configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_day_label_locale")]
    pub day_label_locale: String,

    #[serde(default = "default_day_label_format")]
    pub day_label_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            day_label_locale: default_day_label_locale(),
            day_label_format: default_day_label_format(),
        }
    }
}

impl DisplayConfig {
    /// Resolve the configured locale for day labels.
    ///
    /// Unknown locale names fall back to POSIX with a warning rather than
    /// failing the whole command.
    pub fn locale(&self) -> Locale {
        Locale::try_from(self.day_label_locale.as_str()).unwrap_or_else(|_| {
            tracing::warn!(
                "Unknown locale {:?} in config, falling back to POSIX",
                self.day_label_locale
            );
            Locale::POSIX
        })
    }
}

/// Custom exercise definition
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CustomExercise {
    pub id: String,
    pub name: String,
    pub group_id: String,
    pub description: Option<String>,
}

/// Catalog extension configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub custom: Vec<CustomExercise>,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME")
            .expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("metas")
}

fn default_day_label_locale() -> String {
    "pt_BR".into()
}

fn default_day_label_format() -> String {
    DEFAULT_DAY_LABEL_FORMAT.into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME")
                .expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("metas").join("config.toml")
    }

    /// Validate the configuration, returning a list of problems
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if Locale::try_from(self.display.day_label_locale.as_str()).is_err() {
            problems.push(format!(
                "unknown day_label_locale {:?} (day labels will use POSIX)",
                self.display.day_label_locale
            ));
        }

        if !crate::history::is_valid_day_label_format(&self.display.day_label_format) {
            problems.push(format!(
                "invalid day_label_format {:?} (day labels will use the default pattern)",
                self.display.day_label_format
            ));
        }

        for custom in &self.catalog.custom {
            if custom.id.trim().is_empty() {
                problems.push(format!(
                    "custom exercise {:?} has an empty id",
                    custom.name
                ));
            }
        }

        problems
    }
}
