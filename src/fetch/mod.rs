pub mod download;
pub mod http;
pub mod webdriver;

pub use download::{DownloadFailure, DownloadReport, download_all};
pub use http::fetch_page;
pub use webdriver::fetch_rendered;

use crate::config::FetchConfig;
use crate::error::Result;

/// Retrieve `url` over plain HTTP, or through WebDriver when `use_webdriver` is set
pub async fn fetch_with_config(url: &str, config: &FetchConfig) -> Result<String> {
    if config.use_webdriver {
        fetch_rendered(url, config).await
    } else {
        fetch_page(url, config).await
    }
}
