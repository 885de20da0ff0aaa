//! One extractor per tag kind.
//!
//! Every extractor runs a [`TagPattern`] over a section of the page, splits
//! each match's attribute text and copies the attributes that kind defines
//! into its record. Other attributes are dropped. A match whose attribute text
//! is malformed is skipped and reported in [`Extraction::skipped`]; the rest
//! of the batch is unaffected.

use crate::error::ExtractError;
use crate::parsers::attributes::{Attributes, split_attributes, split_attributes_checked};
use crate::parsers::matcher::{CaseMode, PatternSet, TagMatch, TagPattern};
use crate::parsers::names::TagName;
use crate::parsers::table::decompose_table;
use crate::parsers::text::innermost_text;
use crate::results::{
    AnchorTag, Element, Heading, IframeTag, ImageTag, LinkTag, MetaTag, ScriptTag, StyleTag,
    Table, VideoTag,
};

/// A tag instance that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub tag: TagName,
    /// The full matched markup
    pub raw: String,
    pub reason: ExtractError,
}

/// Best-effort result of extracting one tag kind from a section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction<T> {
    pub items: Vec<T>,
    pub skipped: Vec<Skipped>,
}

impl<T> Default for Extraction<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> Extraction<T> {
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// A record built from one match of its tag
pub trait TagRecord: Sized {
    fn from_match(m: &TagMatch<'_>, attributes: &Attributes<'_>) -> Self;
}

/// Empty bodies are reported as absent
fn body_of(m: &TagMatch<'_>) -> Option<String> {
    m.body.filter(|b| !b.is_empty()).map(str::to_string)
}

impl TagRecord for MetaTag {
    fn from_match(_: &TagMatch<'_>, a: &Attributes<'_>) -> Self {
        MetaTag {
            charset: a.owned("charset"),
            content: a.owned("content"),
            name: a.owned("name"),
        }
    }
}

impl TagRecord for ImageTag {
    fn from_match(_: &TagMatch<'_>, a: &Attributes<'_>) -> Self {
        ImageTag {
            src: a.owned("src"),
            alt: a.owned("alt"),
            height: a.owned("height"),
            width: a.owned("width"),
        }
    }
}

impl TagRecord for VideoTag {
    fn from_match(_: &TagMatch<'_>, a: &Attributes<'_>) -> Self {
        VideoTag {
            autoplay: a.owned("autoplay"),
            controls: a.owned("controls"),
            loop_: a.owned("loop"),
            poster: a.owned("poster"),
            src: a.owned("src"),
            height: a.owned("height"),
            width: a.owned("width"),
        }
    }
}

impl TagRecord for IframeTag {
    fn from_match(_: &TagMatch<'_>, a: &Attributes<'_>) -> Self {
        IframeTag {
            src: a.owned("src"),
            name: a.owned("name"),
            allow: a.owned("allow"),
            allowfullscreen: a.owned("allowfullscreen"),
            height: a.owned("height"),
            width: a.owned("width"),
            title: a.owned("title"),
        }
    }
}

impl TagRecord for LinkTag {
    fn from_match(_: &TagMatch<'_>, a: &Attributes<'_>) -> Self {
        LinkTag {
            href: a.owned("href"),
            crossorigin: a.owned("crossorigin"),
            rel: a.owned("rel"),
            type_: a.owned("type"),
        }
    }
}

impl TagRecord for StyleTag {
    fn from_match(m: &TagMatch<'_>, a: &Attributes<'_>) -> Self {
        StyleTag {
            type_: a.owned("type"),
            body: body_of(m),
        }
    }
}

impl TagRecord for ScriptTag {
    fn from_match(m: &TagMatch<'_>, a: &Attributes<'_>) -> Self {
        ScriptTag {
            type_: a.owned("type"),
            async_: a.owned("async"),
            crossorigin: a.owned("crossorigin"),
            defer: a.owned("defer"),
            integrity: a.owned("integrity"),
            src: a.owned("src"),
            body: body_of(m),
        }
    }
}

impl TagRecord for AnchorTag {
    fn from_match(m: &TagMatch<'_>, a: &Attributes<'_>) -> Self {
        AnchorTag {
            href: a.owned("href"),
            download: a.owned("download"),
            target: a.owned("target"),
            type_: a.owned("type"),
            body: body_of(m),
        }
    }
}

impl TagRecord for Table {
    fn from_match(m: &TagMatch<'_>, a: &Attributes<'_>) -> Self {
        let decomposed = decompose_table(m.body.unwrap_or(""));
        Table {
            id: a.owned("id"),
            class: a.owned("class"),
            title: a.owned("title"),
            body: body_of(m),
            headers: decomposed.headers,
            rows: decomposed.rows,
            raw_html: m.raw.to_string(),
        }
    }
}

/// Run `pattern` over `section` and build a record for every match
pub fn extract<T: TagRecord>(section: &str, pattern: &TagPattern) -> Extraction<T> {
    let mut extraction = Extraction::default();

    for m in pattern.find_all_inclusive(section) {
        match split_attributes_checked(m.attributes) {
            Ok(attributes) => extraction.items.push(T::from_match(&m, &attributes)),
            Err(reason) => {
                ::log::warn!("Skipping <{}>: {}", pattern.tag(), reason);
                extraction.skipped.push(Skipped {
                    tag: pattern.tag(),
                    raw: m.raw.to_string(),
                    reason,
                });
            }
        }
    }

    ::log::debug!(
        "Extracted {} <{}> tags ({} skipped)",
        extraction.items.len(),
        pattern.tag(),
        extraction.skipped.len()
    );
    extraction
}

/// Extractors bound to one case policy
#[derive(Debug, Clone, Copy)]
pub struct Extractor {
    patterns: &'static PatternSet,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(CaseMode::default())
    }
}

impl Extractor {
    pub fn new(case: CaseMode) -> Self {
        Self {
            patterns: PatternSet::get(case),
        }
    }

    fn section(pattern: &TagPattern, payload: &str) -> String {
        pattern
            .find_inclusive(payload)
            .and_then(|m| m.body)
            .unwrap_or("")
            .to_string()
    }

    pub fn title(&self, payload: &str) -> String {
        Self::section(&self.patterns.title, payload)
    }

    pub fn head(&self, payload: &str) -> String {
        Self::section(&self.patterns.head, payload)
    }

    pub fn body(&self, payload: &str) -> String {
        Self::section(&self.patterns.body, payload)
    }

    pub fn footer(&self, payload: &str) -> String {
        Self::section(&self.patterns.footer, payload)
    }

    pub fn meta(&self, section: &str) -> Extraction<MetaTag> {
        extract(section, &self.patterns.meta)
    }

    pub fn images(&self, section: &str) -> Extraction<ImageTag> {
        extract(section, &self.patterns.img)
    }

    pub fn videos(&self, section: &str) -> Extraction<VideoTag> {
        extract(section, &self.patterns.video)
    }

    pub fn iframes(&self, section: &str) -> Extraction<IframeTag> {
        extract(section, &self.patterns.iframe)
    }

    pub fn links(&self, section: &str) -> Extraction<LinkTag> {
        extract(section, &self.patterns.link)
    }

    pub fn styles(&self, section: &str) -> Extraction<StyleTag> {
        extract(section, &self.patterns.style)
    }

    pub fn scripts(&self, section: &str) -> Extraction<ScriptTag> {
        extract(section, &self.patterns.script)
    }

    pub fn anchors(&self, section: &str) -> Extraction<AnchorTag> {
        extract(section, &self.patterns.anchor)
    }

    pub fn tables(&self, section: &str) -> Extraction<Table> {
        extract(section, &self.patterns.table)
    }

    /// `<h1>` to `<h6>`, merged back into document order
    pub fn headings(&self, section: &str) -> Extraction<Heading> {
        let mut found: Vec<(usize, Heading)> = Vec::new();
        let mut skipped = Vec::new();

        for (level, pattern) in (1u8..).zip(self.patterns.headings.iter()) {
            for m in pattern.find_all_inclusive(section) {
                match split_attributes_checked(m.attributes) {
                    Ok(a) => found.push((
                        m.start,
                        Heading {
                            level,
                            id: a.owned("id"),
                            class: a.owned("class"),
                            body: body_of(&m),
                            text: innermost_text(m.body.unwrap_or("")),
                        },
                    )),
                    Err(reason) => {
                        ::log::warn!("Skipping <{}>: {}", pattern.tag(), reason);
                        skipped.push(Skipped {
                            tag: pattern.tag(),
                            raw: m.raw.to_string(),
                            reason,
                        });
                    }
                }
            }
        }

        found.sort_by_key(|(start, _)| *start);
        Extraction {
            items: found.into_iter().map(|(_, heading)| heading).collect(),
            skipped,
        }
    }
}

/// Every element named `tag` in `payload`, with all of its quoted attributes
pub fn find_elements(payload: &str, tag: TagName, case: CaseMode) -> Vec<Element> {
    let pattern = match TagPattern::new(tag, case) {
        Ok(pattern) => pattern,
        Err(e) => {
            ::log::error!("Could not build pattern for <{}>: {}", tag, e);
            return Vec::new();
        }
    };

    pattern
        .find_all_inclusive(payload)
        .map(|m| Element {
            tag,
            attributes: split_attributes(m.attributes)
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: m.body.map(str::to_string),
            raw_html: m.raw.to_string(),
        })
        .collect()
}

pub fn parse_title(payload: &str) -> String {
    Extractor::default().title(payload)
}

pub fn parse_head(payload: &str) -> String {
    Extractor::default().head(payload)
}

pub fn parse_body(payload: &str) -> String {
    Extractor::default().body(payload)
}

pub fn parse_footer(payload: &str) -> String {
    Extractor::default().footer(payload)
}

pub fn parse_meta(section: &str) -> Extraction<MetaTag> {
    Extractor::default().meta(section)
}

pub fn parse_images(section: &str) -> Extraction<ImageTag> {
    Extractor::default().images(section)
}

pub fn parse_videos(section: &str) -> Extraction<VideoTag> {
    Extractor::default().videos(section)
}

pub fn parse_iframes(section: &str) -> Extraction<IframeTag> {
    Extractor::default().iframes(section)
}

pub fn parse_links(section: &str) -> Extraction<LinkTag> {
    Extractor::default().links(section)
}

pub fn parse_styles(section: &str) -> Extraction<StyleTag> {
    Extractor::default().styles(section)
}

pub fn parse_scripts(section: &str) -> Extraction<ScriptTag> {
    Extractor::default().scripts(section)
}

pub fn parse_anchors(section: &str) -> Extraction<AnchorTag> {
    Extractor::default().anchors(section)
}

pub fn parse_tables(section: &str) -> Extraction<Table> {
    Extractor::default().tables(section)
}

pub fn parse_headings(section: &str) -> Extraction<Heading> {
    Extractor::default().headings(section)
}
