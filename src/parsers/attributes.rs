//! Splits raw attribute text into `key="value"` pairs.
//!
//! Only double-quoted values are recognised. A value ends at the next `"`, so
//! escaped quotes inside values are not supported, and keys are runs of ASCII
//! letters (for `data-src="x"` the key is `src`).

#![allow(clippy::expect_used)]

use crate::error::ExtractError;
use crate::parsers::matcher::next_cursor;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<key>[a-zA-Z]+)="(?P<value>[^"]*)""#).expect("attribute regex")
});

/// Attribute key/value pairs borrowed from a tag's attribute text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes<'a> {
    values: HashMap<&'a str, &'a str>,
}

impl<'a> Attributes<'a> {
    /// Value of `key` as written in the markup; `Some("")` for `key=""`
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.values.get(key).copied()
    }

    /// Owned copy of the value of `key`
    pub fn owned(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }
}

/// Split attribute text into pairs; the last occurrence of a key wins
pub fn split_attributes(text: &str) -> Attributes<'_> {
    let mut values = HashMap::new();
    let mut cursor = 0;

    while cursor <= text.len() {
        let Some(caps) = ATTRIBUTE.captures_at(text, cursor) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };
        cursor = next_cursor(text, whole.start(), whole.end());

        if let (Some(key), Some(value)) = (caps.name("key"), caps.name("value")) {
            values.insert(key.as_str(), value.as_str());
        }
    }

    Attributes { values }
}

/// Like [`split_attributes`], but rejects text that ends inside a
/// double-quoted value. A `"` within a single-quoted value does not count.
pub fn split_attributes_checked(text: &str) -> Result<Attributes<'_>, ExtractError> {
    if !quotes_balanced(text) {
        return Err(ExtractError::UnbalancedQuotes(text.to_string()));
    }
    Ok(split_attributes(text))
}

fn quotes_balanced(text: &str) -> bool {
    let (mut in_double, mut in_single) = (false, false);
    for c in text.chars() {
        match c {
            '"' if !in_single => in_double = !in_double,
            '\'' if !in_double => in_single = !in_single,
            _ => {}
        }
    }
    !in_double
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_simple_pairs() {
        let attrs = split_attributes(r#"src="/a.png" alt="A cat" width="40""#);
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs.get("src"), Some("/a.png"));
        assert_eq!(attrs.get("alt"), Some("A cat"));
        assert_eq!(attrs.get("width"), Some("40"));
        assert_eq!(attrs.get("height"), None);
    }

    #[test]
    fn test_empty_value_is_present() {
        let attrs = split_attributes(r#"src="" alt="x""#);
        assert_eq!(attrs.get("src"), Some(""));
        assert_eq!(attrs.get("alt"), Some("x"));
    }

    #[test]
    fn test_last_duplicate_wins() {
        let attrs = split_attributes(r#"class="a" class="b""#);
        assert_eq!(attrs.get("class"), Some("b"));
    }

    #[test]
    fn test_unquoted_and_boolean_attributes_are_ignored() {
        let attrs = split_attributes(r#"controls width=40 src="v.mp4""#);
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("src"), Some("v.mp4"));
    }

    #[test]
    fn test_hyphenated_keys_keep_trailing_letters() {
        let attrs = split_attributes(r#"data-src="/lazy.png" src="/real.png""#);
        assert_eq!(attrs.get("src"), Some("/real.png"));

        let attrs = split_attributes(r#"src="/real.png" data-src="/lazy.png""#);
        assert_eq!(attrs.get("src"), Some("/lazy.png"));
    }

    #[test]
    fn test_values_may_contain_other_characters() {
        let attrs = split_attributes(r#"content="width=device-width, initial-scale=1" name="viewport""#);
        assert_eq!(attrs.get("content"), Some("width=device-width, initial-scale=1"));
        assert_eq!(attrs.get("name"), Some("viewport"));
    }

    #[test]
    fn test_empty_and_garbage_input() {
        assert!(split_attributes("").is_empty());
        assert!(split_attributes("   ").is_empty());
        assert!(split_attributes("=\"\"\"\"==").is_empty());
    }

    #[test]
    fn test_checked_rejects_unbalanced_quotes() {
        let err = split_attributes_checked(r#"src="a.png alt="x""#).unwrap_err();
        assert!(matches!(err, ExtractError::UnbalancedQuotes(_)));
        assert!(split_attributes_checked(r#"src="a.png""#).is_ok());
        assert!(split_attributes_checked("").is_ok());
    }

    #[test]
    fn test_double_quote_inside_single_quoted_value() {
        let attrs = split_attributes_checked(r#"alt='12" pizza' src="/p.png""#).unwrap();
        assert_eq!(attrs.get("src"), Some("/p.png"));
        assert_eq!(attrs.get("alt"), None);

        // An apostrophe inside a double-quoted value is just text
        let attrs = split_attributes_checked(r#"alt="Ash's cap" src="/c.png""#).unwrap();
        assert_eq!(attrs.get("alt"), Some("Ash's cap"));

        assert!(split_attributes_checked(r#"alt='ok' src="/broken.png"#).is_err());
    }
}
