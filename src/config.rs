use crate::retry::RetryPolicy;
use crate::{CrawlError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:60.0) Gecko/20100101 Firefox/60.0";
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 25;
pub const DEFAULT_CHUNK_SIZE: usize = 128;
pub const DEFAULT_IMAGE_PROVIDERS: &[&str] = &["imgur.com", "servimg.com"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Attempts per page fetch or asset download, including the first one.
    pub retry_attempts: u32,
    pub retry_delay_secs: u64,
    /// Bounds connecting and waiting for response headers, not body streaming.
    pub timeout_secs: u64,
    /// Bytes written per chunk while streaming an asset to disk.
    pub chunk_size: usize,
    pub user_agent: String,
    /// Domain substrings; an image URL qualifies if it contains any of them after the scheme.
    pub image_providers: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay_secs: DEFAULT_RETRY_DELAY_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            image_providers: DEFAULT_IMAGE_PROVIDERS
                .iter()
                .map(|v| v.to_string())
                .collect(),
        }
    }
}

impl CrawlConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_attempts,
            Duration::from_secs(self.retry_delay_secs),
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.retry_attempts == 0 {
            return Err(CrawlError::InvalidConfig(
                "retry_attempts must be at least 1".to_string(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(CrawlError::InvalidConfig(
                "chunk_size must be at least 1".to_string(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(CrawlError::InvalidConfig(
                "user_agent is empty".to_string(),
            ));
        }
        if !self
            .image_providers
            .iter()
            .any(|provider| !provider.trim().is_empty())
        {
            return Err(CrawlError::InvalidConfig(
                "provide at least one image provider domain".to_string(),
            ));
        }
        Ok(())
    }

    pub fn add_providers(&mut self, providers: impl IntoIterator<Item = String>) {
        for raw in providers {
            let trimmed = raw.trim().to_ascii_lowercase();
            if trimmed.is_empty() {
                continue;
            }
            if !self.image_providers.iter().any(|existing| existing == &trimmed) {
                self.image_providers.push(trimmed);
            }
        }
    }
}

pub fn load_crawl_config(path: Option<&Path>) -> Result<CrawlConfig> {
    let Some(path) = path else {
        return Ok(CrawlConfig::default());
    };
    let bytes = std::fs::read(path)?;
    let parsed: CrawlConfig = serde_json::from_slice(&bytes).map_err(|e| {
        CrawlError::InvalidConfig(format!(
            "failed to parse crawl config at {}: {e}",
            path.to_string_lossy()
        ))
    })?;
    parsed.validate()?;
    Ok(parsed)
}
