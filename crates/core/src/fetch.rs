//! Page content providers.
//!
//! A [`PageSource`] turns a URL into raw markup. Three providers ship with
//! the crate:
//!
//! - [`RenderingSource`] asks a JavaScript-rendering scraping API for the
//!   page source, so client-side rendered sites yield their real sections.
//! - [`HttpSource`] performs a plain HTTP GET.
//! - [`FileSource`] reads previously saved pages from a directory, one
//!   `<host>.html` file per page.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{Client, StatusCode};
use url::Url;

use crate::{BlockmapError, Result};

/// Extra time granted to the rendering service on top of the page timeout.
const RENDER_GRACE: Duration = Duration::from_secs(10);

/// Maximum number of characters of an error body kept in messages.
const ERROR_BODY_CHARS: usize = 200;

pub const DEFAULT_RENDER_ENDPOINT: &str = "https://app.scrapingbee.com/api/v1/";

/// Something that can produce the markup of a page.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// Fetches `url`, giving up after roughly `timeout`.
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String>;
}

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: "Mozilla/5.0 (compatible; blockmap/0.1)".to_string() }
    }
}

/// Fetches HTML content from a URL.
///
/// Follows redirects, respects the configured timeout and sends a
/// browser-like `Accept` header.
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = Url::parse(url).map_err(|e| BlockmapError::InvalidUrl(e.to_string()))?;

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(BlockmapError::HttpError)?;

    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header("Accept-Language", "ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7")
        .send()
        .await
        .map_err(|e| map_transport_error(e, config.timeout))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BlockmapError::HttpStatus { status: status.as_u16(), body: excerpt(&body) });
    }

    Ok(response.text().await?)
}

/// Plain HTTP GET provider.
#[derive(Debug, Clone, Default)]
pub struct HttpSource {
    pub user_agent: Option<String>,
}

impl PageSource for HttpSource {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String> {
        let mut config = FetchConfig { timeout: timeout.as_secs(), ..Default::default() };
        if let Some(ua) = &self.user_agent {
            config.user_agent = ua.clone();
        }
        fetch_url(url, &config).await
    }
}

/// Settings for the JavaScript-rendering scraping API.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// API endpoint receiving the query.
    pub endpoint: String,
    /// Account key sent as `api_key`.
    pub api_key: String,
    /// Milliseconds to wait after scripts ran.
    pub wait_ms: u64,
    /// CSS selector the service waits for.
    pub wait_for: String,
    pub scroll_to_bottom: bool,
    pub block_ads: bool,
    pub premium_proxy: bool,
}

impl RenderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_RENDER_ENDPOINT.to_string(),
            api_key: api_key.into(),
            wait_ms: 2000,
            wait_for: "body".to_string(),
            scroll_to_bottom: true,
            block_ads: true,
            premium_proxy: false,
        }
    }

    fn query<'a>(&'a self, url: &'a str) -> Vec<(&'static str, String)> {
        vec![
            ("api_key", self.api_key.clone()),
            ("url", url.to_string()),
            ("render_js", "true".to_string()),
            ("wait", self.wait_ms.to_string()),
            ("wait_for", self.wait_for.clone()),
            ("scroll_to_bottom", self.scroll_to_bottom.to_string()),
            ("premium_proxy", self.premium_proxy.to_string()),
            ("block_ads", self.block_ads.to_string()),
            ("block_resources", "false".to_string()),
            ("return_page_source", "true".to_string()),
        ]
    }
}

/// Provider backed by a JavaScript-rendering scraping API.
#[derive(Debug, Clone)]
pub struct RenderingSource {
    config: RenderConfig,
    client: Client,
}

impl RenderingSource {
    pub fn new(config: RenderConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(BlockmapError::ConfigError("Rendering service API key is empty".to_string()));
        }
        Url::parse(&config.endpoint).map_err(|e| BlockmapError::InvalidUrl(format!("{} ({e})", config.endpoint)))?;

        let client = Client::builder().build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }
}

impl PageSource for RenderingSource {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String> {
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&self.config.query(url))
            .timeout(timeout + RENDER_GRACE)
            .send()
            .await
            .map_err(|e| map_transport_error(e, timeout.as_secs()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.text().await?);
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_render_status(status, &body))
    }
}

/// Maps a non-success status of the rendering service to an error.
fn map_render_status(status: StatusCode, body: &str) -> BlockmapError {
    match status.as_u16() {
        401 => BlockmapError::Unauthorized,
        422 => BlockmapError::UpstreamBlocked { status: 422 },
        500 => BlockmapError::UpstreamServerError { status: 500 },
        code => BlockmapError::HttpStatus { status: code, body: excerpt(body) },
    }
}

fn map_transport_error(err: reqwest::Error, timeout: u64) -> BlockmapError {
    if err.is_timeout() { BlockmapError::Timeout { timeout } } else { BlockmapError::HttpError(err) }
}

fn excerpt(body: &str) -> String {
    body.chars().take(ERROR_BODY_CHARS).collect()
}

/// Provider reading saved pages from a directory.
///
/// `https://www.acme.example/pricing` is looked up as
/// `<dir>/www.acme.example.html`.
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `url`.
    pub fn path_for(&self, url: &str) -> Result<PathBuf> {
        let parsed = Url::parse(url).map_err(|e| BlockmapError::InvalidUrl(format!("{url} ({e})")))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| BlockmapError::InvalidUrl(format!("{url} (missing host)")))?;
        Ok(self.dir.join(format!("{host}.html")))
    }
}

impl PageSource for FileSource {
    async fn fetch(&self, url: &str, _timeout: Duration) -> Result<String> {
        let path = self.path_for(url)?;
        fetch_file(&path)
    }
}

/// Reads HTML content from a local file.
pub fn fetch_file(path: &Path) -> Result<String> {
    if !path.exists() {
        Err(BlockmapError::FileNotFound(path.to_path_buf()))
    } else {
        fs::read_to_string(path).map_err(BlockmapError::from)
    }
}
