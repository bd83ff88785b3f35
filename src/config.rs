//! Configuration loader and validator for the FrontRunner seller client.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Top-level layout of `config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub api: Api,
    pub app: App,
}

/// Backend API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Api {
    pub base_url: String,
    #[serde(default)]
    pub accept_invalid_certs: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Local state kept between runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct App {
    pub data_dir: String,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Create `app.data_dir` so the session cookie can be written there.
    pub fn ensure_dirs(&self) -> Result<(), std::io::Error> {
        if self.app.data_dir.trim().is_empty() {
            return Ok(());
        }
        fs::create_dir_all(&self.app.data_dir)
    }

    /// Parsed backend base URL. `load` has already checked that it parses.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(self.api.base_url.trim())
            .map_err(|_| ConfigError::Invalid("api.base_url must be an absolute URL"))
    }

    /// File holding the session cookie between runs.
    pub fn session_file(&self) -> PathBuf {
        Path::new(&self.app.data_dir).join("session")
    }
}

/// Read, parse and validate `path`, falling back to `./config.yaml`.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.api.base_url.trim().is_empty() {
        return Err(ConfigError::Invalid("api.base_url must be non-empty"));
    }
    cfg.base_url()?;
    if cfg.api.timeout_secs == 0 {
        return Err(ConfigError::Invalid("api.timeout_secs must be > 0"));
    }
    if cfg.app.data_dir.trim().is_empty() {
        return Err(ConfigError::Invalid("app.data_dir must be non-empty"));
    }
    Ok(())
}

/// Returns the example YAML content.
pub fn example() -> &'static str {
    r#"api:
  base_url: "https://localhost:8080/"
  accept_invalid_certs: true
  timeout_secs: 30

app:
  data_dir: "./data"
"#
}
