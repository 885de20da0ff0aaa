use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! tag_names {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Every HTML element name the extractors know about
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum TagName {
            $(
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl TagName {
            /// All tag names, in alphabetical order
            pub const ALL: &'static [TagName] = &[$(TagName::$variant),+];

            /// The lower-case element name as written in markup
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(TagName::$variant => $name,)+
                }
            }
        }
    };
}

tag_names! {
    A => "a",
    Abbr => "abbr",
    Address => "address",
    Area => "area",
    Article => "article",
    Aside => "aside",
    Audio => "audio",
    B => "b",
    Base => "base",
    Bdi => "bdi",
    Bdo => "bdo",
    Blockquote => "blockquote",
    Body => "body",
    Br => "br",
    Button => "button",
    Canvas => "canvas",
    Caption => "caption",
    Cite => "cite",
    Code => "code",
    Col => "col",
    Colgroup => "colgroup",
    Data => "data",
    Datalist => "datalist",
    Dd => "dd",
    Del => "del",
    Details => "details",
    Dfn => "dfn",
    Dialog => "dialog",
    Div => "div",
    Dl => "dl",
    Dt => "dt",
    Em => "em",
    Embed => "embed",
    Fieldset => "fieldset",
    Figcaption => "figcaption",
    Figure => "figure",
    Footer => "footer",
    Form => "form",
    H1 => "h1",
    H2 => "h2",
    H3 => "h3",
    H4 => "h4",
    H5 => "h5",
    H6 => "h6",
    Head => "head",
    Header => "header",
    Hgroup => "hgroup",
    Hr => "hr",
    Html => "html",
    I => "i",
    Iframe => "iframe",
    Img => "img",
    Input => "input",
    Ins => "ins",
    Kbd => "kbd",
    Label => "label",
    Legend => "legend",
    Li => "li",
    Link => "link",
    Main => "main",
    Map => "map",
    Mark => "mark",
    Math => "math",
    Menu => "menu",
    Menuitem => "menuitem",
    Meta => "meta",
    Meter => "meter",
    Nav => "nav",
    Noscript => "noscript",
    Object => "object",
    Ol => "ol",
    Optgroup => "optgroup",
    Option => "option",
    Output => "output",
    P => "p",
    Param => "param",
    Picture => "picture",
    Pre => "pre",
    Progress => "progress",
    Q => "q",
    Rb => "rb",
    Rp => "rp",
    Rt => "rt",
    Rtc => "rtc",
    Ruby => "ruby",
    S => "s",
    Samp => "samp",
    Script => "script",
    Section => "section",
    Select => "select",
    Slot => "slot",
    Small => "small",
    Source => "source",
    Span => "span",
    Strong => "strong",
    Style => "style",
    Sub => "sub",
    Summary => "summary",
    Sup => "sup",
    Svg => "svg",
    Table => "table",
    Tbody => "tbody",
    Td => "td",
    Template => "template",
    Textarea => "textarea",
    Tfoot => "tfoot",
    Th => "th",
    Thead => "thead",
    Time => "time",
    Title => "title",
    Tr => "tr",
    Track => "track",
    U => "u",
    Ul => "ul",
    Var => "var",
    Video => "video",
    Wbr => "wbr",
}

impl TagName {
    /// Void elements have no closing tag and therefore no body
    pub fn is_void(&self) -> bool {
        matches!(
            self,
            TagName::Area
                | TagName::Base
                | TagName::Br
                | TagName::Col
                | TagName::Embed
                | TagName::Hr
                | TagName::Img
                | TagName::Input
                | TagName::Link
                | TagName::Meta
                | TagName::Param
                | TagName::Source
                | TagName::Track
                | TagName::Wbr
        )
    }

    /// The heading tag for a level in 1..=6
    pub fn heading(level: u8) -> Option<TagName> {
        match level {
            1 => Some(TagName::H1),
            2 => Some(TagName::H2),
            3 => Some(TagName::H3),
            4 => Some(TagName::H4),
            5 => Some(TagName::H5),
            6 => Some(TagName::H6),
            _ => None,
        }
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known element name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown HTML tag name `{0}`")]
pub struct UnknownTagName(pub String);

impl FromStr for TagName {
    type Err = UnknownTagName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TagName::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownTagName(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_every_name() {
        for tag in TagName::ALL {
            let parsed: TagName = tag.as_str().parse().unwrap();
            assert_eq!(parsed, *tag);
        }
    }

    #[test]
    fn test_from_str_ignores_case() {
        assert_eq!("IMG".parse::<TagName>().unwrap(), TagName::Img);
        assert_eq!(" Table ".parse::<TagName>().unwrap(), TagName::Table);
        assert!("blink".parse::<TagName>().is_err());
    }

    #[test]
    fn test_void_elements() {
        assert!(TagName::Img.is_void());
        assert!(TagName::Meta.is_void());
        assert!(TagName::Link.is_void());
        assert!(!TagName::Script.is_void());
        assert!(!TagName::Table.is_void());
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(TagName::heading(1), Some(TagName::H1));
        assert_eq!(TagName::heading(6), Some(TagName::H6));
        assert_eq!(TagName::heading(0), None);
        assert_eq!(TagName::heading(7), None);
    }

    #[test]
    fn test_serializes_as_markup_name() {
        let json = serde_json::to_string(&TagName::Iframe).unwrap();
        assert_eq!(json, "\"iframe\"");
    }
}
