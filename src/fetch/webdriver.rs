//! Rendered retrieval through a WebDriver server, for pages that build their
//! markup with JavaScript.

use crate::config::FetchConfig;
use crate::error::{HarvestError, Result};
use fantoccini::{Client, ClientBuilder};
use tokio::time::{Duration, timeout};

/// Upper bound for navigating to a page and reading its source
const RENDER_TIMEOUT_SECS: u64 = 45;

/// Common alternatives tried when the configured server does not answer
const FALLBACK_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444",
];

/// Connect to the WebDriver at `webdriver_url`, falling back to well-known ports
pub async fn connect(webdriver_url: &str) -> Result<Client> {
    match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!(
                "Failed to connect to WebDriver at {}: {}",
                webdriver_url,
                e
            );
        }
    }

    for url in FALLBACK_URLS.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(HarvestError::WebDriverUnavailable(candidates(webdriver_url).join(", ")))
}

/// The configured URL followed by every distinct fallback
fn candidates(webdriver_url: &str) -> Vec<&str> {
    std::iter::once(webdriver_url)
        .chain(FALLBACK_URLS.iter().copied().filter(|u| *u != webdriver_url))
        .collect()
}

/// Load `url` in a browser session and return the rendered page source
pub async fn fetch_rendered(url: &str, config: &FetchConfig) -> Result<String> {
    let client = connect(&config.webdriver_url).await?;
    let started = std::time::Instant::now();

    let rendered = timeout(
        Duration::from_secs(RENDER_TIMEOUT_SECS),
        render(&client, url),
    )
    .await;

    if let Err(e) = client.close().await {
        ::log::warn!("Failed to close WebDriver session: {}", e);
    }

    let source = match rendered {
        Ok(source) => source?,
        Err(_) => {
            ::log::error!("Timeout rendering: {}", url);
            return Err(HarvestError::Timeout {
                url: url.to_string(),
                secs: RENDER_TIMEOUT_SECS,
            });
        }
    };

    ::log::debug!(
        "Rendered {} in {:.2} seconds",
        url,
        started.elapsed().as_secs_f64()
    );
    Ok(source)
}

async fn render(client: &Client, url: &str) -> Result<String> {
    client
        .goto(url)
        .await
        .map_err(|e| navigation_error(e, "accessing", url))?;

    client
        .source()
        .await
        .map_err(|e| navigation_error(e, "getting source for", url))
}

fn navigation_error(error: fantoccini::error::CmdError, context: &str, url: &str) -> HarvestError {
    if error.to_string().contains("Unable to find session") {
        ::log::warn!("Lost session while {} {}", context, url);
    } else {
        ::log::error!("Failed {} {}: {}", context, url, error);
    }
    HarvestError::WebDriverCommand(error)
}
