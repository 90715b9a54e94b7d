use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Root configuration file structure
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FwlensConfig {
    /// How often providers are polled, in milliseconds
    #[serde(default = "default_refresh_ms")]
    pub refresh_interval_ms: u64,

    /// How many log entries a provider fetches per kind per cycle
    #[serde(default = "default_log_page_size")]
    pub log_page_size: usize,

    /// Appliance hostname or address (informational for providers)
    #[serde(default)]
    pub host: Option<String>,

    /// UI theme: "dark" or "light"
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_refresh_ms() -> u64 {
    5000
}
fn default_log_page_size() -> usize {
    100
}
fn default_theme() -> String {
    "dark".into()
}

impl Default for FwlensConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_ms(),
            log_page_size: default_log_page_size(),
            host: None,
            theme: default_theme(),
        }
    }
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    InvalidValue { field: &'static str, reason: String },
    NotFound { searched: Vec<PathBuf> },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Yaml(e) => write!(f, "YAML parse error: {}", e),
            Self::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
            Self::NotFound { searched } => {
                write!(f, "no config file found, searched: {:?}", searched)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::Yaml(e)
    }
}

impl FwlensConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: FwlensConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a string (useful for testing)
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: FwlensConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Search for config file in standard locations
    pub fn discover(start_dir: &Path) -> Result<(PathBuf, Self), ConfigError> {
        let names = ["fwlens.yaml", "fwlens.yml", ".fwlens.yaml", ".fwlens.yml"];
        let mut searched = Vec::new();

        // Check environment variable first
        if let Ok(env_path) = std::env::var("FWLENS_CONFIG") {
            let path = PathBuf::from(&env_path);
            if path.exists() {
                return Ok((path.clone(), Self::load(&path)?));
            }
            searched.push(path);
        }

        // Search current directory and parents
        let mut dir = Some(start_dir);
        while let Some(current) = dir {
            for name in &names {
                let path = current.join(name);
                if path.exists() {
                    return Ok((path.clone(), Self::load(&path)?));
                }
                searched.push(path);
            }
            dir = current.parent();
        }

        Err(ConfigError::NotFound { searched })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval_ms < 250 {
            return Err(ConfigError::InvalidValue {
                field: "refresh_interval_ms",
                reason: format!("{} is below the 250ms floor", self.refresh_interval_ms),
            });
        }
        if self.log_page_size < 10 || self.log_page_size > 5000 {
            return Err(ConfigError::InvalidValue {
                field: "log_page_size",
                reason: format!("{} outside 10..=5000", self.log_page_size),
            });
        }
        if self.theme != "dark" && self.theme != "light" {
            return Err(ConfigError::InvalidValue {
                field: "theme",
                reason: format!("'{}' is not one of: dark, light", self.theme),
            });
        }
        Ok(())
    }
}
