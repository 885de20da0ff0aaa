use crate::parsers::names::TagName;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};

/// Everything extracted from one HTML payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedPage {
    /// Text of the first `<title>`, or the explicit override
    pub title: String,

    /// Raw inner HTML of the first `<head>`
    pub head: String,

    /// Raw inner HTML of the first `<body>`
    pub body: String,

    /// Raw inner HTML of the first `<footer>`
    pub footer: String,

    /// `<meta>` tags found in the head
    pub meta: Vec<MetaTag>,

    /// Images, videos and iframes found in the body
    pub media: Media,

    /// `<link>` tags from the head and anchors from the body
    pub links: Links,

    /// `<style>` blocks found in the head
    pub styles: Vec<StyleTag>,

    /// `<script>` tags found anywhere in the payload
    pub scripts: Vec<ScriptTag>,

    /// Tables found in the body
    pub tables: Vec<Table>,

    /// `<h1>` to `<h6>` headings found in the body, in document order
    #[serde(default)]
    pub headings: Vec<Heading>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub images: Vec<ImageTag>,
    pub videos: Vec<VideoTag>,
    #[serde(default)]
    pub iframes: Vec<IframeTag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Links {
    pub links: Vec<LinkTag>,
    pub anchors: Vec<AnchorTag>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaTag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageTag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoTag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controls: Option<String>,
    #[serde(rename = "loop", skip_serializing_if = "Option::is_none")]
    pub loop_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IframeTag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowfullscreen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crossorigin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleTag {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptTag {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(rename = "async", skip_serializing_if = "Option::is_none")]
    pub async_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crossorigin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integrity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorTag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// 1 for `<h1>` through 6 for `<h6>`
    pub level: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Body with tags stripped and whitespace collapsed
    pub text: String,
}

/// A `<table>` decomposed into header rows and data rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Raw inner HTML of the table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Rows of the `<thead>` section; empty when there is none
    pub headers: Vec<TableRow>,

    /// Data rows from `<tbody>`, or from bare `<tr>` elements
    pub rows: Vec<TableRow>,

    /// The complete `<table>...</table>` markup
    pub raw_html: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    /// Inner HTML of the cell, trimmed
    pub content: String,

    /// The whole `<td>`/`<th>` element, or the raw row content for a
    /// synthetic header cell
    pub original_html: String,

    /// Content with tags stripped and whitespace collapsed
    pub text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_span: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_span: Option<u32>,
}

/// Any element found by tag name, with all of its quoted attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: TagName,
    pub attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub raw_html: String,
}

/// A borrowed view of any extracted tag, discriminated by its kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HtmlTag<'a> {
    Meta(&'a MetaTag),
    #[serde(rename = "img")]
    Image(&'a ImageTag),
    Video(&'a VideoTag),
    Iframe(&'a IframeTag),
    Link(&'a LinkTag),
    Style(&'a StyleTag),
    Script(&'a ScriptTag),
    #[serde(rename = "a")]
    Anchor(&'a AnchorTag),
    Table(&'a Table),
    Heading(&'a Heading),
}

impl HtmlTag<'_> {
    /// Element name of the underlying tag
    pub fn tag_name(&self) -> TagName {
        match self {
            HtmlTag::Meta(_) => TagName::Meta,
            HtmlTag::Image(_) => TagName::Img,
            HtmlTag::Video(_) => TagName::Video,
            HtmlTag::Iframe(_) => TagName::Iframe,
            HtmlTag::Link(_) => TagName::Link,
            HtmlTag::Style(_) => TagName::Style,
            HtmlTag::Script(_) => TagName::Script,
            HtmlTag::Anchor(_) => TagName::A,
            HtmlTag::Table(_) => TagName::Table,
            HtmlTag::Heading(h) => TagName::heading(h.level).unwrap_or(TagName::H1),
        }
    }

    /// The URL this tag points at, if it has one
    pub fn url(&self) -> Option<&str> {
        match self {
            HtmlTag::Image(t) => t.src.as_deref(),
            HtmlTag::Video(t) => t.src.as_deref(),
            HtmlTag::Iframe(t) => t.src.as_deref(),
            HtmlTag::Link(t) => t.href.as_deref(),
            HtmlTag::Script(t) => t.src.as_deref(),
            HtmlTag::Anchor(t) => t.href.as_deref(),
            HtmlTag::Meta(_) | HtmlTag::Style(_) | HtmlTag::Table(_) | HtmlTag::Heading(_) => None,
        }
    }
}

impl ParsedPage {
    /// Every extracted tag, grouped by kind
    pub fn tags(&self) -> Vec<HtmlTag<'_>> {
        let mut tags = Vec::new();
        tags.extend(self.meta.iter().map(HtmlTag::Meta));
        tags.extend(self.media.images.iter().map(HtmlTag::Image));
        tags.extend(self.media.videos.iter().map(HtmlTag::Video));
        tags.extend(self.media.iframes.iter().map(HtmlTag::Iframe));
        tags.extend(self.links.links.iter().map(HtmlTag::Link));
        tags.extend(self.links.anchors.iter().map(HtmlTag::Anchor));
        tags.extend(self.styles.iter().map(HtmlTag::Style));
        tags.extend(self.scripts.iter().map(HtmlTag::Script));
        tags.extend(self.tables.iter().map(HtmlTag::Table));
        tags.extend(self.headings.iter().map(HtmlTag::Heading));
        tags
    }

    /// `src`/`href` values of images, videos, links, anchors and scripts.
    ///
    /// With `remove_duplicates`, only the first occurrence of each URL is kept.
    pub fn extract_urls(&self, remove_duplicates: bool) -> Vec<String> {
        let all = self
            .media
            .images
            .iter()
            .map(|t| t.src.as_deref())
            .chain(self.media.videos.iter().map(|t| t.src.as_deref()))
            .chain(self.links.links.iter().map(|t| t.href.as_deref()))
            .chain(self.links.anchors.iter().map(|t| t.href.as_deref()))
            .chain(self.scripts.iter().map(|t| t.src.as_deref()))
            .flatten();

        if !remove_duplicates {
            return all.map(str::to_string).collect();
        }

        let mut seen = HashSet::new();
        all.filter(|url| seen.insert(*url))
            .map(str::to_string)
            .collect()
    }

    /// Image sources, optionally de-duplicated in first-seen order
    pub fn image_urls(&self, remove_duplicates: bool) -> Vec<String> {
        let mut seen = HashSet::new();
        self.media
            .images
            .iter()
            .filter_map(|img| img.src.as_deref())
            .filter(|src| !remove_duplicates || seen.insert(*src))
            .map(str::to_string)
            .collect()
    }
}

/// One projected table row: header text to cell text, in header order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Set `key`; an existing key keeps its position and takes the new value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(field) => field.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Projection of a page's tables to records
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TableObjects {
    /// One table (or none): its rows as records
    Single(Vec<Record>),
    /// Several tables: one record list per table
    Multiple(Vec<Vec<Record>>),
}

impl TableObjects {
    /// Number of records across all tables
    pub fn record_count(&self) -> usize {
        match self {
            TableObjects::Single(records) => records.len(),
            TableObjects::Multiple(tables) => tables.iter().map(Vec::len).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(src: Option<&str>) -> ImageTag {
        ImageTag {
            src: src.map(str::to_string),
            ..ImageTag::default()
        }
    }

    fn anchor(href: &str) -> AnchorTag {
        AnchorTag {
            href: Some(href.to_string()),
            ..AnchorTag::default()
        }
    }

    #[test]
    fn test_extract_urls_order_and_dedup() {
        let mut page = ParsedPage::default();
        page.media.images = vec![image(Some("/a.png")), image(None), image(Some("/b.png"))];
        page.links.anchors = vec![anchor("/a.png"), anchor("/shop")];
        page.scripts = vec![ScriptTag {
            src: Some("/app.js".to_string()),
            ..ScriptTag::default()
        }];

        assert_eq!(
            page.extract_urls(true),
            vec!["/a.png", "/b.png", "/shop", "/app.js"]
        );
        assert_eq!(
            page.extract_urls(false),
            vec!["/a.png", "/b.png", "/a.png", "/shop", "/app.js"]
        );
    }

    #[test]
    fn test_image_urls() {
        let mut page = ParsedPage::default();
        page.media.images = vec![image(Some("/a.png")), image(Some("/a.png")), image(None)];
        assert_eq!(page.image_urls(true), vec!["/a.png"]);
        assert_eq!(page.image_urls(false), vec!["/a.png", "/a.png"]);
    }

    #[test]
    fn test_record_keeps_insertion_order() {
        let mut record = Record::default();
        record.insert("Name", "Bulbasaur");
        record.insert("Price", "63.00");
        record.insert("Name", "Ivysaur");

        assert_eq!(record.len(), 2);
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["Name", "Price"]);
        assert_eq!(record.get("Name"), Some("Ivysaur"));
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"Name":"Ivysaur","Price":"63.00"}"#
        );
    }

    #[test]
    fn test_absent_attributes_are_not_serialized() {
        let json = serde_json::to_value(image(None)).unwrap();
        assert_eq!(json, serde_json::json!({}));

        let json = serde_json::to_value(image(Some(""))).unwrap();
        assert_eq!(json, serde_json::json!({ "src": "" }));
    }

    #[test]
    fn test_html_tag_kind_discriminator() {
        let img = image(Some("/a.png"));
        let json = serde_json::to_value(HtmlTag::Image(&img)).unwrap();
        assert_eq!(json["kind"], "img");
        assert_eq!(json["src"], "/a.png");
        assert_eq!(HtmlTag::Image(&img).tag_name(), TagName::Img);
        assert_eq!(HtmlTag::Image(&img).url(), Some("/a.png"));
    }

    #[test]
    fn test_parsed_page_round_trips_through_json() {
        let mut page = ParsedPage {
            title: "Shop".to_string(),
            ..ParsedPage::default()
        };
        page.links.anchors.push(anchor("/cart"));
        let json = serde_json::to_string(&page).unwrap();
        let back: ParsedPage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, page);
    }
}
