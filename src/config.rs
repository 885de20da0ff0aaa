use crate::error::Result;
use crate::parsers::matcher::CaseMode;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Options that change how a payload is scanned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Strip line breaks and whitespace runs from the payload before parsing
    #[serde(default = "default_normalize_whitespace")]
    pub normalize_whitespace: bool,

    /// Match page-level tag names (title, img, a, ...) in any capitalisation.
    /// Table-internal tags are always case-insensitive.
    #[serde(default)]
    pub case_insensitive_tags: bool,
}

impl ParseOptions {
    /// Case policy for page-level tags
    pub fn case_mode(&self) -> CaseMode {
        if self.case_insensitive_tags {
            CaseMode::Insensitive
        } else {
            CaseMode::Sensitive
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            normalize_whitespace: default_normalize_whitespace(),
            case_insensitive_tags: false,
        }
    }
}

/// Configuration for retrieving pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User agent sent with HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum number of redirects to follow
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Render pages through a WebDriver session instead of plain HTTP
    #[serde(default)]
    pub use_webdriver: bool,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            max_redirects: default_max_redirects(),
            timeout_secs: default_timeout_secs(),
            use_webdriver: false,
            webdriver_url: default_webdriver_url(),
        }
    }
}

/// Configuration for downloading discovered media
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Maximum number of concurrent downloads
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Download each distinct URL only once
    #[serde(default = "default_remove_duplicates")]
    pub remove_duplicates: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            remove_duplicates: default_remove_duplicates(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarvestConfig {
    #[serde(default)]
    pub parse: ParseOptions,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub download: DownloadConfig,
}

impl HarvestConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Override the WebDriver URL with the `WEBDRIVER_URL` environment variable
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                ::log::debug!("Using WebDriver URL from environment: {}", webdriver_url);
                self.fetch.webdriver_url = webdriver_url;
            }
        }
        self
    }
}

/// Default value for normalize_whitespace
fn default_normalize_whitespace() -> bool {
    true
}

/// Default user agent
fn default_user_agent() -> String {
    concat!("page-harvest/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Default redirect limit
fn default_max_redirects() -> usize {
    5
}

/// Default request timeout
fn default_timeout_secs() -> u64 {
    30
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

/// Default value for max_concurrency
fn default_max_concurrency() -> usize {
    4
}

/// Default value for remove_duplicates
fn default_remove_duplicates() -> bool {
    true
}
