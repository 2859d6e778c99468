//! metadex.toml configuration parser.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::types::{DEFAULT_PAGE_SIZE, DatasourceId};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadexConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub datasources: Vec<DatasourceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// Remote metadata service endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_list_path")]
    pub list_path: String,
    #[serde(default = "default_sync_path")]
    pub sync_path: String,
    /// Per-request timeout, e.g. "5s", "500ms", "1m".
    #[serde(default = "default_timeout")]
    pub timeout: String,
    /// Bearer token sent with every request.
    pub token: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            list_path: default_list_path(),
            sync_path: default_sync_path(),
            timeout: default_timeout(),
            token: None,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> ConfigResult<Duration> {
        parse_duration(&self.timeout)
            .ok_or_else(|| ConfigError::Invalid(format!("bad timeout {:?}", self.timeout)))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub fullscreen: bool,
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    /// Link target for metric names; `{expr}` is replaced by the
    /// URL-encoded metric name.
    pub query_url: Option<String>,
    /// Datasource selected at startup.
    pub default_datasource: Option<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            fullscreen: false,
            default_page_size: default_page_size(),
            query_url: None,
            default_datasource: None,
        }
    }
}

/// A datasource the console can browse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasourceConfig {
    pub id: String,
    pub name: String,
    #[serde(default = "default_driver")]
    pub driver: String,
    pub endpoint: Option<String>,
    pub description: Option<String>,
}

impl DatasourceConfig {
    pub fn datasource_id(&self) -> Option<DatasourceId> {
        DatasourceId::parse(&self.id)
    }
}

fn default_port() -> u16 {
    8480
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_list_path() -> String {
    "/api/team/datasource/metric/metadata/list".to_string()
}

fn default_sync_path() -> String {
    "/api/team/datasource/metric/metadata/sync".to_string()
}

fn default_timeout() -> String {
    "5s".to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_driver() -> String {
    "prometheus".to_string()
}

impl MetadexConfig {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        let config: MetadexConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        self.source.timeout()?;
        if self.ui.default_page_size == 0 {
            return Err(ConfigError::Invalid("ui.default_page_size must be positive".into()));
        }
        if let Some(bad) = self.datasources.iter().find(|d| d.datasource_id().is_none()) {
            return Err(ConfigError::Invalid(format!(
                "datasource {:?} has an empty id",
                bad.name
            )));
        }
        Ok(())
    }

    pub fn find_datasource(&self, id: &DatasourceId) -> Option<&DatasourceConfig> {
        self.datasources.iter().find(|d| d.id == id.as_str())
    }
}

/// Parse a duration string like "5s", "500ms", "1m".
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(secs) = s.strip_suffix('s') {
        if let Some(ms) = secs.strip_suffix('m') {
            ms.parse::<u64>().ok().map(Duration::from_millis)
        } else {
            secs.parse::<u64>().ok().map(Duration::from_secs)
        }
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}
