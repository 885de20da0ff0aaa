use clap::Parser;
use page_harvest::TagName;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "page-harvest")]
#[command(about = "Extract tags, tables and links from HTML pages")]
#[command(version)]
pub struct Args {
    /// Page to parse: an http(s) URL, a file path, or `-` for stdin
    pub source: String,

    /// Report this title instead of the page's own <title>
    #[arg(long)]
    pub title: Option<String>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Render URL sources through WebDriver instead of plain HTTP
    #[arg(long)]
    pub webdriver: bool,

    /// Match page-level tag names in any capitalisation
    #[arg(short = 'i', long)]
    pub case_insensitive: bool,

    /// Keep the payload's line breaks and whitespace runs
    #[arg(long)]
    pub raw_whitespace: bool,

    /// Print the URLs referenced by the page
    #[arg(short, long)]
    pub urls: bool,

    /// Keep repeated URLs (with --urls or --download)
    #[arg(long)]
    pub keep_duplicates: bool,

    /// Print the page's tables as records keyed by header text
    #[arg(short, long)]
    pub tables: bool,

    /// Only project the table at this position (with --tables)
    #[arg(long)]
    pub table_index: Option<usize>,

    /// Print the body sentences containing this word
    #[arg(short, long, value_name = "WORD")]
    pub find: Option<String>,

    /// Print every element with this tag name and all of its attributes
    #[arg(short, long, value_name = "TAG")]
    pub kind: Option<TagName>,

    /// Download the page's images into this directory
    #[arg(short, long, value_name = "DIR")]
    pub download: Option<PathBuf>,

    /// Base URL for resolving relative image sources (defaults to the source URL)
    #[arg(long)]
    pub base: Option<String>,
}

impl Args {
    /// Whether any narrower output than the whole page was requested
    pub fn has_queries(&self) -> bool {
        self.urls
            || self.tables
            || self.find.is_some()
            || self.kind.is_some()
            || self.download.is_some()
    }
}

/// Where the payload comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    File(PathBuf),
    Stdin,
}

/// Classify the `source` argument
pub fn convert_source(source: &str) -> Source {
    if source == "-" {
        Source::Stdin
    } else if source.starts_with("http://") || source.starts_with("https://") {
        Source::Url(source.to_string())
    } else {
        Source::File(PathBuf::from(source))
    }
}
