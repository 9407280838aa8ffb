//! Configuration system for wren.
//!
//! Sources, lowest precedence first: built-in defaults, an optional file
//! (TOML, JSON, or YAML) named by `WREN_CONFIG`, then environment variables.
//! The API key is only ever read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{WrenError, WrenResult};

/// Default hosted API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.mem0.ai";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default log file name, placed in the home directory.
pub const DEFAULT_LOG_FILE_NAME: &str = ".wren-mcp.log";

/// Environment variable naming an optional config file.
pub const CONFIG_PATH_VAR: &str = "WREN_CONFIG";

/// Connection settings for the hosted memory API.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API key, from `MEM0_API_KEY`.
    #[serde(skip)]
    pub api_key: Option<SecretString>,
    /// Base URL of the API, without the `/v1` suffix.
    pub base_url: String,
    /// Organization ID sent as `Mem0-Org-Id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    /// Project ID sent as `Mem0-Project-Id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            org_id: None,
            project_id: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Create a configuration with the given API key and defaults otherwise.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::new(api_key.into())),
            ..Default::default()
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the organization and project IDs.
    pub fn with_scope(mut self, org_id: Option<String>, project_id: Option<String>) -> Self {
        self.org_id = org_id;
        self.project_id = project_id;
        self
    }

    /// The API key, or an error if it is not configured.
    pub fn api_key(&self) -> WrenResult<&str> {
        self.api_key
            .as_ref()
            .map(|k| k.expose_secret().as_str())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| WrenError::missing_credentials("MEM0_API_KEY not set"))
    }

    /// The parsed base URL.
    pub fn base_url(&self) -> WrenResult<Url> {
        Url::parse(&self.base_url).map_err(|e| {
            WrenError::Configuration(format!("Invalid base URL '{}': {}", self.base_url, e))
        })
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Process-level server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// File that receives a copy of the log output. `None` disables it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Default log directive when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_file: dirs::home_dir().map(|h| h.join(DEFAULT_LOG_FILE_NAME)),
            log_level: "info".to_string(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WrenConfig {
    pub api: ApiConfig,
    pub server: ServerConfig,
    /// Environment values that were set but could not be used.
    #[serde(skip)]
    ignored_vars: Vec<String>,
}

impl WrenConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> WrenResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| WrenError::Configuration(e.to_string()))
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| WrenError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| WrenError::Configuration(e.to_string())),
            _ => Err(WrenError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Load configuration from the process environment.
    ///
    /// Reads the file named by `WREN_CONFIG` first when set, then applies
    /// environment overrides and validates the result.
    pub fn from_env() -> WrenResult<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Same as [`WrenConfig::from_env`] with an injectable variable lookup.
    pub fn from_vars<F>(var: F) -> WrenResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match var(CONFIG_PATH_VAR).filter(|p| !p.is_empty()) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_vars(&var);
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides on top of the current values.
    ///
    /// Unusable values are skipped and recorded in
    /// [`WrenConfig::ignored_vars`], since logging may not be set up yet.
    pub fn apply_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = var("MEM0_API_KEY") {
            self.api.api_key = Some(SecretString::new(key));
        }
        if let Some(url) = var("MEM0_BASE_URL") {
            self.api.base_url = url;
        }
        if let Some(org) = var("MEM0_ORG_ID") {
            self.api.org_id = Some(org).filter(|o| !o.is_empty());
        }
        if let Some(project) = var("MEM0_PROJECT_ID") {
            self.api.project_id = Some(project).filter(|p| !p.is_empty());
        }
        if let Some(raw) = var("WREN_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(e) => self
                    .ignored_vars
                    .push(format!("Ignoring invalid WREN_TIMEOUT_SECS '{}': {}", raw, e)),
            }
        }
        if let Some(path) = var("WREN_LOG_FILE") {
            self.server.log_file = Some(path).filter(|p| !p.is_empty()).map(PathBuf::from);
        }
        if let Some(level) = var("WREN_LOG_LEVEL").filter(|l| !l.is_empty()) {
            self.server.log_level = level;
        }
    }

    /// Environment values skipped by [`WrenConfig::apply_vars`].
    pub fn ignored_vars(&self) -> &[String] {
        &self.ignored_vars
    }

    /// Check that the configuration can be used to reach the backend.
    pub fn validate(&self) -> WrenResult<()> {
        self.api.api_key()?;
        self.api.base_url()?;
        if self.api.timeout_secs == 0 {
            return Err(WrenError::Configuration(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
