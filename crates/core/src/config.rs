//! Run configuration.
//!
//! A run compares one target page against 4 to 10 competitor pages. Every
//! URL must use the `http` or `https` scheme, and each page fetch is bounded
//! by a per-page timeout between 15 and 60 seconds.
//!
//! # Example
//!
//! ```rust
//! use blockmap_core::{ExtractMode, RunConfig};
//!
//! let config = RunConfig::builder("https://mysite.example")
//!     .competitors([
//!         "https://a.example",
//!         "https://b.example",
//!         "https://c.example",
//!         "https://d.example",
//!     ])
//!     .mode(ExtractMode::ContentOnly)
//!     .timeout(20)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.competitor_urls.len(), 4);
//! ```

use std::time::Duration;

use url::Url;

use crate::extract::{ExtractConfig, ExtractMode};
use crate::{BlockmapError, Result};

pub const MIN_COMPETITORS: usize = 4;
pub const MAX_COMPETITORS: usize = 10;
pub const MIN_TIMEOUT_SECS: u64 = 15;
pub const MAX_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A validated analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// The page under analysis.
    pub target_url: String,
    /// Competitor pages, in the order given, without duplicates.
    pub competitor_urls: Vec<String>,
    /// Which parts of each page are searched for headings.
    pub mode: ExtractMode,
    /// Per-page fetch timeout in seconds.
    pub timeout: u64,
}

impl RunConfig {
    /// Creates a builder for the given target URL.
    pub fn builder(target_url: impl Into<String>) -> RunConfigBuilder {
        RunConfigBuilder::new(target_url)
    }

    /// Checks schemes, competitor count and timeout bounds.
    pub fn validate(&self) -> Result<()> {
        validate_url(&self.target_url)?;
        for url in &self.competitor_urls {
            validate_url(url)?;
        }

        let count = self.competitor_urls.len();
        if count < MIN_COMPETITORS {
            return Err(BlockmapError::ConfigError(format!(
                "At least {MIN_COMPETITORS} competitors are required, got {count}"
            )));
        }
        if count > MAX_COMPETITORS {
            return Err(BlockmapError::ConfigError(format!(
                "At most {MAX_COMPETITORS} competitors are allowed, got {count}"
            )));
        }
        if self.competitor_urls.contains(&self.target_url) {
            return Err(BlockmapError::ConfigError(format!(
                "Target {} is also listed as a competitor",
                self.target_url
            )));
        }

        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&self.timeout) {
            return Err(BlockmapError::ConfigError(format!(
                "Timeout must be between {MIN_TIMEOUT_SECS} and {MAX_TIMEOUT_SECS} seconds, got {}",
                self.timeout
            )));
        }

        Ok(())
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn extract_config(&self) -> ExtractConfig {
        ExtractConfig::with_mode(self.mode)
    }

    /// Every URL in processing order: competitors first, then the target.
    pub fn all_urls(&self) -> impl Iterator<Item = &str> {
        self.competitor_urls
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.target_url.as_str()))
    }
}

/// Builder for RunConfig.
#[derive(Debug, Clone)]
pub struct RunConfigBuilder {
    target_url: String,
    competitor_urls: Vec<String>,
    mode: ExtractMode,
    timeout: u64,
}

impl RunConfigBuilder {
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into().trim().to_string(),
            competitor_urls: Vec::new(),
            mode: ExtractMode::default(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Adds one competitor URL.
    pub fn competitor(mut self, url: impl Into<String>) -> Self {
        self.competitor_urls.push(url.into().trim().to_string());
        self
    }

    /// Adds several competitor URLs.
    pub fn competitors<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.competitor_urls
            .extend(urls.into_iter().map(|url| url.into().trim().to_string()));
        self
    }

    pub fn mode(mut self, mode: ExtractMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the per-page timeout in seconds.
    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout = secs;
        self
    }

    /// Drops duplicate competitors and validates the result.
    pub fn build(self) -> Result<RunConfig> {
        let mut competitor_urls: Vec<String> = Vec::with_capacity(self.competitor_urls.len());
        for url in self.competitor_urls {
            if !url.is_empty() && !competitor_urls.contains(&url) {
                competitor_urls.push(url);
            }
        }

        let config = RunConfig { target_url: self.target_url, competitor_urls, mode: self.mode, timeout: self.timeout };
        config.validate()?;
        Ok(config)
    }
}

/// Requires an `http://` or `https://` URL with a host.
pub fn validate_url(url: &str) -> Result<()> {
    let lowered = url.to_ascii_lowercase();
    if !(lowered.starts_with("http://") || lowered.starts_with("https://")) {
        return Err(BlockmapError::InvalidUrl(format!(
            "{url} (must start with http:// or https://)"
        )));
    }

    let parsed = Url::parse(url).map_err(|e| BlockmapError::InvalidUrl(format!("{url} ({e})")))?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(BlockmapError::InvalidUrl(format!("{url} (missing host)")));
    }

    Ok(())
}

/// Splits multi-line input into URLs, one per line.
///
/// Blank lines and lines starting with `#` are ignored.
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
