//! Plain HTTP retrieval.

use crate::config::FetchConfig;
use crate::error::{HarvestError, Result};
use std::time::Duration;

/// Build a client that follows at most `max_redirects` redirects
pub fn build_client(config: &FetchConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Reject non-success responses
pub fn check_response(resp: reqwest::Response) -> Result<reqwest::Response> {
    if !resp.status().is_success() {
        return Err(HarvestError::Status {
            status: resp.status().as_u16(),
            url: resp.url().to_string(),
        });
    }
    Ok(resp)
}

/// GET `url` and return the response body as text
pub async fn fetch_page(url: &str, config: &FetchConfig) -> Result<String> {
    let client = build_client(config)?;
    fetch_with_client(&client, url).await
}

pub(crate) async fn fetch_with_client(client: &reqwest::Client, url: &str) -> Result<String> {
    ::log::info!("Fetching {}", url);
    let resp = check_response(client.get(url).send().await?)?;
    let body = resp.text().await?;
    ::log::debug!("Fetched {} bytes from {}", body.len(), url);
    Ok(body)
}
