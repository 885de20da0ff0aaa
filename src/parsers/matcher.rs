//! Scan-based tag matching.
//!
//! A [`TagPattern`] finds `<tag ...>body</tag>` (or `<tag ...>` for void
//! elements) in a text payload. Patterns are compiled once and never carry
//! scan state: every call to [`TagPattern::find_all_inclusive`] returns a fresh
//! iterator that owns its own cursor, so one pattern can be shared freely
//! between calls and threads.
//!
//! A tag name ends at whitespace, `/`, `>` or an attribute fused directly onto
//! it. Whitespace normalization turns `<img\n    src="a">` into
//! `<imgsrc="a">`, so `src="` still counts as the start of the attributes
//! unless the fused letters spell a longer known tag (`<articleclass="x">` is
//! not an `<a>`).
//!
//! Matching is deliberately not depth-aware. The body of a match ends at the
//! first closing tag with the same name, so a `<table>` nested inside a
//! `<table>` cuts the outer match short.

#![allow(clippy::expect_used)]

use crate::parsers::names::TagName;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// How tag names are compared against the markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    /// `<img` matches, `<IMG` does not
    #[default]
    Sensitive,
    /// Any capitalisation of the tag name matches
    Insensitive,
}

/// One match of a tag pattern, borrowing from the scanned text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagMatch<'a> {
    /// Byte offset of the `<` that opens the match
    pub start: usize,
    /// Byte offset just past the end of the match
    pub end: usize,
    /// Raw attribute text between the tag name and the closing `>`, trimmed,
    /// without the trailing `/` of a self-closing tag
    pub attributes: &'a str,
    /// Everything between the opening and closing tag; `None` for void elements
    pub body: Option<&'a str>,
    /// The full matched text
    pub raw: &'a str,
}

/// A compiled, stateless matcher for one tag name
#[derive(Debug, Clone)]
pub struct TagPattern {
    tag: TagName,
    case: CaseMode,
    regex: Regex,
}

impl TagPattern {
    /// Compile a pattern for `tag`; void elements match without a closing tag
    pub fn new(tag: TagName, case: CaseMode) -> Result<Self, regex::Error> {
        let flags = match case {
            CaseMode::Sensitive => "(?s)",
            CaseMode::Insensitive => "(?is)",
        };
        let name = regex::escape(tag.as_str());
        let source = if tag.is_void() {
            format!(r#"{flags}<{name}(?P<attributes>(?:[\s/]|[a-zA-Z]+=")[^>]*)?>"#)
        } else {
            format!(
                r#"{flags}<{name}(?P<attributes>(?:\s|[a-zA-Z]+=")[^>]*)?>(?P<body>.*?)</{name}\s*>"#
            )
        };

        Ok(Self {
            tag,
            case,
            regex: Regex::new(&source)?,
        })
    }

    /// The tag this pattern matches
    pub fn tag(&self) -> TagName {
        self.tag
    }

    /// The case policy this pattern was compiled with
    pub fn case(&self) -> CaseMode {
        self.case
    }

    /// First match in `payload`, if any
    pub fn find_inclusive<'p>(&self, payload: &'p str) -> Option<TagMatch<'p>> {
        self.find_all_inclusive(payload).next()
    }

    /// Lazily yields every non-overlapping match in document order
    pub fn find_all_inclusive<'p, 'r>(&'r self, payload: &'p str) -> TagMatches<'p, 'r> {
        TagMatches {
            pattern: self,
            haystack: payload,
            cursor: 0,
        }
    }
}

/// Iterator over the matches of a [`TagPattern`]; owns its scan position
#[derive(Debug)]
pub struct TagMatches<'p, 'r> {
    pattern: &'r TagPattern,
    haystack: &'p str,
    cursor: usize,
}

impl<'p> Iterator for TagMatches<'p, '_> {
    type Item = TagMatch<'p>;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.pattern.tag.as_str();
        loop {
            if self.cursor > self.haystack.len() {
                return None;
            }
            let caps = self.pattern.regex.captures_at(self.haystack, self.cursor)?;
            let whole = caps.get(0)?;
            if caps
                .name("attributes")
                .is_some_and(|m| fused_into_longer_name(name, m.as_str()))
            {
                self.cursor = next_cursor(self.haystack, whole.start(), whole.start());
                continue;
            }
            self.cursor = next_cursor(self.haystack, whole.start(), whole.end());
            return Some(tag_match(&caps, whole.start(), whole.end(), whole.as_str()));
        }
    }
}

/// Whether attribute text fused onto `name` really spells a longer tag name,
/// as `rticleclass="x"` does after `<a`
pub(crate) fn fused_into_longer_name(name: &str, attributes: &str) -> bool {
    let letters = attributes
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(attributes.len());
    if letters == 0 {
        return false;
    }
    let word = format!("{name}{}", &attributes[..letters]).to_ascii_lowercase();
    TagName::ALL
        .iter()
        .map(TagName::as_str)
        .any(|other| other.len() > name.len() && word.starts_with(other))
}

fn tag_match<'p>(caps: &Captures<'p>, start: usize, end: usize, raw: &'p str) -> TagMatch<'p> {
    let attributes = caps
        .name("attributes")
        .map(|m| m.as_str().trim().trim_end_matches('/').trim_end())
        .unwrap_or("");
    TagMatch {
        start,
        end,
        attributes,
        body: caps.name("body").map(|m| m.as_str()),
        raw,
    }
}

/// Where the next scan starts after a match spanning `start..end`.
///
/// A zero-width match is stepped over by one character so the scan always
/// makes progress.
pub(crate) fn next_cursor(haystack: &str, start: usize, end: usize) -> usize {
    if end > start {
        return end;
    }
    match haystack[end..].chars().next() {
        Some(c) => end + c.len_utf8(),
        None => end + 1,
    }
}

/// Precompiled patterns for every tag the page extractors use
#[derive(Debug)]
pub struct PatternSet {
    pub title: TagPattern,
    pub head: TagPattern,
    pub body: TagPattern,
    pub footer: TagPattern,
    pub meta: TagPattern,
    pub img: TagPattern,
    pub video: TagPattern,
    pub iframe: TagPattern,
    pub link: TagPattern,
    pub style: TagPattern,
    pub script: TagPattern,
    pub anchor: TagPattern,
    pub table: TagPattern,
    pub headings: [TagPattern; 6],
}

impl PatternSet {
    fn compile(case: CaseMode) -> Result<Self, regex::Error> {
        let pattern = |tag| TagPattern::new(tag, case);
        Ok(Self {
            title: pattern(TagName::Title)?,
            head: pattern(TagName::Head)?,
            body: pattern(TagName::Body)?,
            footer: pattern(TagName::Footer)?,
            meta: pattern(TagName::Meta)?,
            img: pattern(TagName::Img)?,
            video: pattern(TagName::Video)?,
            iframe: pattern(TagName::Iframe)?,
            link: pattern(TagName::Link)?,
            style: pattern(TagName::Style)?,
            script: pattern(TagName::Script)?,
            anchor: pattern(TagName::A)?,
            table: pattern(TagName::Table)?,
            headings: [
                pattern(TagName::H1)?,
                pattern(TagName::H2)?,
                pattern(TagName::H3)?,
                pattern(TagName::H4)?,
                pattern(TagName::H5)?,
                pattern(TagName::H6)?,
            ],
        })
    }

    /// The shared pattern set for a case policy
    pub fn get(case: CaseMode) -> &'static PatternSet {
        match case {
            CaseMode::Sensitive => &SENSITIVE,
            CaseMode::Insensitive => &INSENSITIVE,
        }
    }
}

static SENSITIVE: LazyLock<PatternSet> = LazyLock::new(|| {
    PatternSet::compile(CaseMode::Sensitive).expect("case-sensitive tag patterns")
});

static INSENSITIVE: LazyLock<PatternSet> = LazyLock::new(|| {
    PatternSet::compile(CaseMode::Insensitive).expect("case-insensitive tag patterns")
});
