//! Page assembler.
//!
//! A [`Parser`] runs every extractor over one payload at construction and
//! keeps the populated [`ParsedPage`]. Head-only kinds (meta, link, style)
//! come from the first `<head>`, body kinds (images, videos, iframes,
//! anchors, tables, headings) from the first `<body>`, and scripts from the
//! whole payload.

use crate::config::{HarvestConfig, ParseOptions};
use crate::error::{HarvestError, Result};
use crate::fetch::{self, DownloadReport};
use crate::parsers::matcher::CaseMode;
use crate::parsers::names::TagName;
use crate::parsers::table::project_tables;
use crate::parsers::tags::{Extraction, Extractor, Skipped, find_elements};
use crate::parsers::text::normalize_payload;
use crate::results::{Element, Links, Media, ParsedPage, TableObjects};
use std::path::Path;
use url::Url;

/// One parsed HTML payload
#[derive(Debug, Clone)]
pub struct Parser {
    payload: String,
    page: ParsedPage,
    skipped: Vec<Skipped>,
    case: CaseMode,
}

impl Parser {
    /// Parse `payload` with default options
    pub fn new(payload: &str) -> Self {
        Self::with_options(payload, None, &ParseOptions::default())
    }

    /// Parse `payload`, reporting `title` instead of the page's own `<title>`
    pub fn with_title(payload: &str, title: &str) -> Self {
        Self::with_options(payload, Some(title), &ParseOptions::default())
    }

    /// Parse `payload` with explicit options.
    ///
    /// An empty `title` override falls back to the parsed `<title>`.
    pub fn with_options(payload: &str, title: Option<&str>, options: &ParseOptions) -> Self {
        let payload = if options.normalize_whitespace {
            normalize_payload(payload)
        } else {
            payload.to_string()
        };

        let case = options.case_mode();
        let extractor = Extractor::new(case);
        let mut skipped = Vec::new();

        let head = extractor.head(&payload);
        let body = extractor.body(&payload);

        let title = match title {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => extractor.title(&payload),
        };

        let page = ParsedPage {
            title,
            footer: extractor.footer(&payload),
            meta: collect(extractor.meta(&head), &mut skipped),
            media: Media {
                images: collect(extractor.images(&body), &mut skipped),
                videos: collect(extractor.videos(&body), &mut skipped),
                iframes: collect(extractor.iframes(&body), &mut skipped),
            },
            links: Links {
                links: collect(extractor.links(&head), &mut skipped),
                anchors: collect(extractor.anchors(&body), &mut skipped),
            },
            styles: collect(extractor.styles(&head), &mut skipped),
            scripts: collect(extractor.scripts(&payload), &mut skipped),
            tables: collect(extractor.tables(&body), &mut skipped),
            headings: collect(extractor.headings(&body), &mut skipped),
            head,
            body,
        };

        ::log::debug!(
            "Parsed page \"{}\": {} images, {} anchors, {} tables, {} skipped",
            page.title,
            page.media.images.len(),
            page.links.anchors.len(),
            page.tables.len(),
            skipped.len()
        );

        Self {
            payload,
            page,
            skipped,
            case,
        }
    }

    /// Fetch `url` and parse the response
    pub async fn from_url(url: &str, config: &HarvestConfig) -> Result<Self> {
        let payload = fetch::fetch_with_config(url, &config.fetch).await?;
        Ok(Self::with_options(&payload, None, &config.parse))
    }

    /// The payload as it was scanned, after any normalization
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn page(&self) -> &ParsedPage {
        &self.page
    }

    pub fn into_page(self) -> ParsedPage {
        self.page
    }

    /// Tags that could not be extracted, in the order they were met
    pub fn skipped(&self) -> &[Skipped] {
        &self.skipped
    }

    /// See [`ParsedPage::extract_urls`]
    pub fn extract_urls(&self, remove_duplicates: bool) -> Vec<String> {
        self.page.extract_urls(remove_duplicates)
    }

    /// Project the page's tables to records.
    ///
    /// A valid `index` selects one table; otherwise every table is projected.
    pub fn extract_tables_to_object(&self, index: Option<usize>) -> TableObjects {
        project_tables(&self.page.tables, index)
    }

    /// Every `tag` element in the scanned payload, with all quoted attributes
    pub fn find_elements(&self, tag: TagName) -> Vec<Element> {
        find_elements(&self.payload, tag, self.case)
    }

    /// Download the page's images into `dir`, resolving relative sources
    /// against `base`
    pub async fn extract_images(
        &self,
        dir: &Path,
        base: Option<&Url>,
        config: &HarvestConfig,
    ) -> Result<DownloadReport> {
        let urls = self.page.image_urls(config.download.remove_duplicates);
        fetch::download_all(&urls, dir, base, config).await
    }
}

/// Parse `base` as an absolute URL
pub fn parse_base_url(base: &str) -> Result<Url> {
    Url::parse(base).map_err(|source| HarvestError::InvalidUrl {
        url: base.to_string(),
        source,
    })
}

fn collect<T>(extraction: Extraction<T>, skipped: &mut Vec<Skipped>) -> Vec<T> {
    skipped.extend(extraction.skipped);
    extraction.items
}
