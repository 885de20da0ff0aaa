//! Pattern-based extraction of well-known tags from HTML payloads.
//!
//! [`Parser`] scans a payload once and exposes the title, head, body and
//! footer sections together with typed records for meta, image, video,
//! iframe, link, style, script, anchor, heading and table tags. Tables are
//! decomposed into header and data rows and can be projected to records keyed
//! by header text. Fetching pages and downloading images live in [`fetch`].

pub mod config;
pub mod error;
pub mod fetch;
pub mod page;
pub mod parsers;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{HarvestConfig, ParseOptions};
pub use error::{ExtractError, HarvestError, Result};
pub use page::Parser;
pub use parsers::find_sentences_with_word;
pub use parsers::names::TagName;
pub use results::{ParsedPage, Record, TableObjects};
