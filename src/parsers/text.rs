#![allow(clippy::expect_used)]

use regex::Regex;
use std::sync::LazyLock;

static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\r|\n").expect("line break regex"));

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("whitespace run regex"));

static TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[^>]+(?:>|\z)").expect("tag regex"));

/// A sentence runs up to the first `.`, `?` or `!` that is followed by
/// whitespace or the end of the text.
static SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\S.*?[.?!](?:\s|\z)").expect("sentence regex"));

/// Prepares a raw payload for scanning.
///
/// Line breaks are removed and any run of two or more whitespace characters
/// is dropped entirely (not collapsed), so indentation between tags vanishes.
pub fn normalize_payload(payload: &str) -> String {
    let single_line = LINE_BREAKS.replace_all(payload, "");
    WHITESPACE_RUNS.replace_all(&single_line, "").into_owned()
}

/// Removes every tag, leaving the text between them untouched
pub fn strip_tags(html: &str) -> String {
    TAGS.replace_all(html, "").into_owned()
}

/// Collapses all whitespace runs to single spaces and trims the ends
pub fn normalize_whitespace_in_segment(segment: &str) -> String {
    segment.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visible text of an HTML fragment: tags stripped, whitespace collapsed
pub fn innermost_text(html: &str) -> String {
    normalize_whitespace_in_segment(&strip_tags(html))
}

/// Text of a whole document section, with every tag treated as a word break
/// so adjacent blocks do not run together
pub fn visible_text(html: &str) -> String {
    normalize_whitespace_in_segment(&TAGS.replace_all(html, " "))
}

/// Splits text into terminated sentences, trimmed, in document order.
///
/// Trailing text without a terminator is not returned.
pub fn sentences(text: &str) -> impl Iterator<Item = &str> {
    SENTENCE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

/// Every sentence of `text` containing `word`, compared case-insensitively
pub fn find_sentences_with_word(text: &str, word: &str) -> Vec<String> {
    let needle = word.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let found: Vec<String> = sentences(text)
        .filter(|sentence| sentence.to_lowercase().contains(&needle))
        .map(str::to_string)
        .collect();

    ::log::debug!("Found {} sentences containing {:?}", found.len(), word);
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAGRAPH: &str = "As she did so, a most extraordinary thing happened. Some random sentence with flung in it. The bed-clothes gathered themselves together, leapt up suddenly into a sort of peak, and then jumped headlong over the bottom rail. It was exactly as if a hand had clutched them in the centre and flung them aside. Immediately after, .........";

    #[test]
    fn test_find_sentences_with_word() {
        let found = find_sentences_with_word(PARAGRAPH, "flung");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0], "Some random sentence with flung in it.");
        assert_eq!(
            found[1],
            "It was exactly as if a hand had clutched them in the centre and flung them aside."
        );
    }

    #[test]
    fn test_find_sentences_is_case_insensitive() {
        let found = find_sentences_with_word(PARAGRAPH, "FLUNG");
        assert_eq!(found.len(), 2);

        let found = find_sentences_with_word("Hello World! Goodbye world? Nothing here.", "world");
        assert_eq!(found, vec!["Hello World!", "Goodbye world?"]);
    }

    #[test]
    fn test_find_sentences_matches_substrings() {
        let found = find_sentences_with_word("Unflung items stay. Others move.", "flung");
        assert_eq!(found, vec!["Unflung items stay."]);
    }

    #[test]
    fn test_find_sentences_edge_cases() {
        assert!(find_sentences_with_word("", "word").is_empty());
        assert!(find_sentences_with_word("Some text.", "").is_empty());
        // No terminator, no sentence
        assert!(find_sentences_with_word("word without an end", "word").is_empty());
    }

    #[test]
    fn test_sentence_boundaries_need_following_whitespace() {
        let all: Vec<_> = sentences("Version 1.2 is out. Wait... really?! Yes.").collect();
        assert_eq!(all, vec!["Version 1.2 is out.", "Wait...", "really?!", "Yes."]);
    }

    #[test]
    fn test_normalize_payload() {
        let html = "<html>\n  <head>\r\n    <title>A  B</title>\n  </head>\n</html>";
        assert_eq!(
            normalize_payload(html),
            "<html><head><title>AB</title></head></html>"
        );

        // Single spaces survive
        assert_eq!(normalize_payload("<p>a b</p>"), "<p>a b</p>");
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<b>bold</b> and <i>italic</i>"), "bold and italic");
        assert_eq!(strip_tags("text <br/> more"), "text  more");
        // An unterminated tag runs to the end of the input
        assert_eq!(strip_tags("keep <span class=\"x\""), "keep ");
    }

    #[test]
    fn test_innermost_text() {
        assert_eq!(
            innermost_text("  <a href=\"/x\">Price</a>\n <small>(USD)</small> "),
            "Price (USD)"
        );
        assert_eq!(innermost_text("<img src=\"a.png\">"), "");
    }

    #[test]
    fn test_visible_text_separates_blocks() {
        let html = "<h1>Shop</h1><p>First line.</p><p>Second <b>bold</b> line.</p>";
        assert_eq!(visible_text(html), "Shop First line. Second bold line.");
        assert_eq!(innermost_text(html), "ShopFirst line.Second bold line.");
    }

    #[test]
    fn test_normalize_whitespace_in_segment() {
        assert_eq!(normalize_whitespace_in_segment("Hello   world!"), "Hello world!");
        assert_eq!(normalize_whitespace_in_segment("  Trim  me  "), "Trim me");
        assert_eq!(normalize_whitespace_in_segment("Tabs\tand\tspaces"), "Tabs and spaces");
        assert_eq!(normalize_whitespace_in_segment(""), "");
        assert_eq!(normalize_whitespace_in_segment("   "), "");
    }
}
