//! Client configuration.
//!
//! Resolution order, lowest to highest priority: built-in defaults, the
//! optional JSON config file, `JOTTER_*` environment variables, then
//! whatever the front end overrides explicitly.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::preferences::default_preferences_path;
use crate::util::{normalize_base_url, normalize_text_option};

const CONFIG_FILE_NAME: &str = "config.json";

/// Collection URL used when nothing is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/notes";

pub const ENV_API_URL: &str = "JOTTER_API_URL";
pub const ENV_PAGE_SIZE: &str = "JOTTER_PAGE_SIZE";
pub const ENV_PREFERENCES_PATH: &str = "JOTTER_PREFERENCES_PATH";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Notes collection URL, e.g. `https://host/notes`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: NonZeroUsize,
    /// Where preferences are persisted; the platform config dir when unset
    #[serde(default)]
    pub preferences_path: Option<PathBuf>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

const fn default_page_size() -> NonZeroUsize {
    DEFAULT_PAGE_SIZE
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            page_size: default_page_size(),
            preferences_path: None,
        }
    }
}

/// Default location of the config file.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("jotter").join(CONFIG_FILE_NAME))
}

impl ClientConfig {
    /// Load from a JSON file. A missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let config = serde_json::from_str::<Self>(&raw).map_err(|error| {
            Error::Config(format!(
                "Failed to parse config at {}: {error}",
                path.display()
            ))
        })?;
        config.validated()
    }

    /// Defaults, then the config file at `path` (or the default location),
    /// then environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path.map(Path::to_path_buf).or_else(default_config_path) {
            Some(path) => Self::load_from_path(&path)?,
            None => Self::default(),
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    /// Apply `JOTTER_*` overrides read through `lookup`.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = normalize_text_option(lookup(ENV_API_URL)) {
            self.api_base_url = url;
        }
        if let Some(size) = normalize_text_option(lookup(ENV_PAGE_SIZE)) {
            self.page_size = parse_page_size(&size)?;
        }
        if let Some(path) = normalize_text_option(lookup(ENV_PREFERENCES_PATH)) {
            self.preferences_path = Some(PathBuf::from(path));
        }
        self.validated()
    }

    /// Where preferences live for this configuration.
    pub fn resolved_preferences_path(&self) -> Option<PathBuf> {
        self.preferences_path
            .clone()
            .or_else(default_preferences_path)
    }

    fn validated(mut self) -> Result<Self> {
        self.api_base_url = normalize_base_url(&self.api_base_url).map_err(Error::Config)?;
        Ok(self)
    }
}

/// Parse a positive page size.
pub fn parse_page_size(value: &str) -> Result<NonZeroUsize> {
    value
        .trim()
        .parse::<NonZeroUsize>()
        .map_err(|_| Error::Config(format!("page size must be a positive integer, got '{value}'")))
}
