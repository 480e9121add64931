use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::{io, Result};

/// Environment variable that overrides config file resolution.
pub const CONFIG_ENV: &str = "OPSDECK_CONFIG";

const CONFIG_DIR: &str = ".opsdeck";
const CONFIG_FILE: &str = "config.yaml";

// ─── ConfigWarning ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ─── Config ───────────────────────────────────────────────────────────────

/// Connection settings for the dashboard API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    120
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            api_token: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl Config {
    /// Resolution order: `OPSDECK_CONFIG`, then `./.opsdeck/config.yaml`,
    /// then `~/.opsdeck/config.yaml`. Missing everywhere is an error that
    /// names the fix.
    pub fn resolve_path() -> Option<PathBuf> {
        if let Ok(p) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(p));
        }
        let local = Path::new(CONFIG_DIR).join(CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
        let global = home::home_dir()?.join(CONFIG_DIR).join(CONFIG_FILE);
        if global.exists() {
            return Some(global);
        }
        None
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ApiError::Config(format!(
                "config not found at {}: run 'opsdeck config init'",
                path.display()
            )));
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(path, data.as_bytes())
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("baseUrl '{}' is not an http(s) URL", self.base_url),
            });
        }

        if self.base_url.starts_with("http://")
            && !self.base_url.starts_with("http://localhost")
            && !self.base_url.starts_with("http://127.0.0.1")
        {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "baseUrl uses plain http against a non-local host".to_string(),
            });
        }

        if self.api_token.as_deref().is_some_and(|t| t.trim().is_empty()) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "apiToken is set but empty".to_string(),
            });
        }

        if self.timeout_seconds == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "timeoutSeconds must be greater than zero".to_string(),
            });
        }

        warnings
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
