//! Runtime configuration read from the environment.
//!
//! - `NOTION_TOKEN` - Integration token (required)
//! - `NOTION_PAGE_ID` - Default page for page-scoped commands (optional)
//! - `NOTION_API_URL` - Base URL (default: `https://api.notion.com/v1`)
//! - `NOTION_VERSION` - `Notion-Version` header (default: `2022-06-28`)
//! - `NOTION_TIMEOUT_SECS` - Per-request timeout (default: 30)

use std::time::Duration;

use thiserror::Error;

use crate::models::{BlockId, InvalidBlockId};

pub const DEFAULT_API_URL: &str = "https://api.notion.com/v1";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("{name} is not a valid number: {value}")]
    InvalidNumber { name: &'static str, value: String },

    #[error(transparent)]
    InvalidId(#[from] InvalidBlockId),
}

/// Connection settings for the Notion API.
#[derive(Debug, Clone)]
pub struct NotionConfig {
    pub token: String,
    pub base_url: String,
    pub version: String,
    pub timeout: Duration,
    pub default_page: Option<BlockId>,
}

impl NotionConfig {
    /// Build configuration with defaults for everything but the token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_API_URL.to_string(),
            version: DEFAULT_NOTION_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_page: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Read configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup("NOTION_TOKEN")
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::Missing("NOTION_TOKEN"))?;

        let mut config = Self::new(token);

        if let Some(url) = lookup("NOTION_API_URL") {
            config = config.with_base_url(url);
        }
        if let Some(version) = lookup("NOTION_VERSION") {
            config.version = version;
        }
        if let Some(secs) = lookup("NOTION_TIMEOUT_SECS") {
            let secs = secs.parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                name: "NOTION_TIMEOUT_SECS",
                value: secs.clone(),
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(page) = lookup("NOTION_PAGE_ID").filter(|p| !p.is_empty()) {
            config.default_page = Some(BlockId::parse(&page)?);
        }

        Ok(config)
    }
}
