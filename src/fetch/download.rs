//! Batch download of media URLs into a directory.
//!
//! Each URL is resolved, fetched and written independently. A failing item is
//! recorded in the [`DownloadReport`] and the batch carries on; only faults
//! that prevent the batch from starting at all are returned as errors.

use crate::config::HarvestConfig;
use crate::error::Result;
use crate::fetch::http::{build_client, check_response};
use crate::utils::sanitize_filename;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use url::Url;

/// Outcome of a download batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DownloadReport {
    /// Number of URLs in the batch
    pub total_files: usize,
    /// Number of files written
    pub total_downloaded: usize,
    /// Names of the written files, in input order
    pub file_names: Vec<String>,
    pub errors: Vec<DownloadFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadFailure {
    pub url: String,
    pub reason: String,
}

/// Resolve `raw` against `base` when it is relative
pub fn resolve_url(raw: &str, base: Option<&Url>) -> std::result::Result<Url, String> {
    match Url::parse(raw) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => match base {
            Some(base) => base.join(raw).map_err(|e| e.to_string()),
            None => Err(format!("relative URL without a base: {}", raw)),
        },
        Err(e) => Err(e.to_string()),
    }
}

/// File name for a downloaded URL: its last non-empty path segment
pub fn file_name_for(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
        .unwrap_or("");

    if segment.is_empty() {
        sanitize_filename(url.as_str())
    } else {
        sanitize_filename(segment)
    }
}

/// Download every URL in `urls` into `dir`.
///
/// Relative URLs are resolved against `base`. Fails only if `dir` cannot be
/// created or the HTTP client cannot be built.
pub async fn download_all(
    urls: &[String],
    dir: &Path,
    base: Option<&Url>,
    config: &HarvestConfig,
) -> Result<DownloadReport> {
    tokio::fs::create_dir_all(dir).await?;
    let client = build_client(&config.fetch)?;
    let semaphore = Arc::new(Semaphore::new(config.download.max_concurrency.max(1)));

    ::log::info!("Downloading {} files into {}", urls.len(), dir.display());

    let mut handles = Vec::with_capacity(urls.len());
    for raw in urls {
        let resolved = resolve_url(raw, base);
        let client = client.clone();
        let semaphore = Arc::clone(&semaphore);
        let dir = dir.to_path_buf();

        let handle = tokio::spawn(async move {
            match resolved {
                Ok(url) => download_limited(&client, &semaphore, &url, &dir).await,
                Err(reason) => Err(reason),
            }
        });
        handles.push((raw.clone(), handle));
    }

    let mut report = DownloadReport {
        total_files: urls.len(),
        ..DownloadReport::default()
    };

    for (url, handle) in handles {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => Err(format!("download task failed: {}", e)),
        };

        match outcome {
            Ok(file_name) => {
                report.total_downloaded += 1;
                report.file_names.push(file_name);
            }
            Err(reason) => {
                ::log::warn!("Failed to download {}: {}", url, reason);
                report.errors.push(DownloadFailure { url, reason });
            }
        }
    }

    ::log::info!(
        "Downloaded {} of {} files ({} failed)",
        report.total_downloaded,
        report.total_files,
        report.errors.len()
    );
    Ok(report)
}

async fn download_limited(
    client: &reqwest::Client,
    semaphore: &Semaphore,
    url: &Url,
    dir: &Path,
) -> std::result::Result<String, String> {
    let _permit = semaphore.acquire().await.map_err(|e| e.to_string())?;
    download_one(client, url, dir).await
}

async fn download_one(
    client: &reqwest::Client,
    url: &Url,
    dir: &Path,
) -> std::result::Result<String, String> {
    let resp = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| e.to_string())?;
    let resp = check_response(resp).map_err(|e| e.to_string())?;
    let bytes = resp.bytes().await.map_err(|e| e.to_string())?;

    let file_name = file_name_for(url);
    let path: PathBuf = dir.join(&file_name);
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| format!("writing {}: {}", path.display(), e))?;

    ::log::debug!("Saved {} ({} bytes)", path.display(), bytes.len());
    Ok(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://shop.example/catalog/index.html").unwrap();

        let url = resolve_url("/img/a.png", Some(&base)).unwrap();
        assert_eq!(url.as_str(), "https://shop.example/img/a.png");

        let url = resolve_url("b.png", Some(&base)).unwrap();
        assert_eq!(url.as_str(), "https://shop.example/catalog/b.png");

        let url = resolve_url("https://cdn.example/c.png", None).unwrap();
        assert_eq!(url.host_str(), Some("cdn.example"));

        assert!(resolve_url("/img/a.png", None).is_err());
    }

    #[test]
    fn test_file_name_for() {
        let url = Url::parse("https://cdn.example/img/bulbasaur.png?v=2").unwrap();
        assert_eq!(file_name_for(&url), "bulbasaur.png");

        let url = Url::parse("https://cdn.example/img/").unwrap();
        assert_eq!(file_name_for(&url), "img");

        let url = Url::parse("https://cdn.example/").unwrap();
        assert_eq!(file_name_for(&url), "cdn.example_");
    }

    #[tokio::test]
    async fn test_per_item_failures_are_collected() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("images");
        let urls = vec!["/a.png".to_string(), "/b.png".to_string()];

        let report = download_all(&urls, &target, None, &HarvestConfig::default())
            .await
            .unwrap();

        assert!(target.is_dir());
        assert_eq!(report.total_files, 2);
        assert_eq!(report.total_downloaded, 0);
        assert!(report.file_names.is_empty());
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[0].url, "/a.png");
        assert_eq!(report.errors[1].url, "/b.png");
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let dir = tempfile::tempdir().unwrap();
        let report = download_all(&[], dir.path(), None, &HarvestConfig::default())
            .await
            .unwrap();
        assert_eq!(report, DownloadReport::default());
    }

    #[tokio::test]
    async fn test_unusable_directory_fails_the_batch() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let urls = vec!["/a.png".to_string()];

        let result = download_all(&urls, file.path(), None, &HarvestConfig::default()).await;
        assert!(matches!(result, Err(crate::error::HarvestError::Io(_))));
    }
}
