//! Table decomposition and projection.
//!
//! Rows are located in priority order:
//!
//! 1. `<tr>` elements inside the first `<thead>` become header rows. A header
//!    row without any `<th>`/`<td>` but with text becomes one synthetic cell.
//! 2. `<tr>` elements inside the first `<tbody>` become data rows.
//! 3. If neither step produced a row, every `<tr>` in the table body becomes a
//!    data row.
//!
//! Table-internal tag names always match case-insensitively.

#![allow(clippy::expect_used)]

use crate::parsers::matcher::{CaseMode, TagPattern, fused_into_longer_name, next_cursor};
use crate::parsers::names::TagName;
use crate::parsers::text::{innermost_text, strip_tags};
use crate::results::{Record, Table, TableCell, TableObjects, TableRow};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static THEAD: LazyLock<TagPattern> = LazyLock::new(|| {
    TagPattern::new(TagName::Thead, CaseMode::Insensitive).expect("thead pattern")
});

static TBODY: LazyLock<TagPattern> = LazyLock::new(|| {
    TagPattern::new(TagName::Tbody, CaseMode::Insensitive).expect("tbody pattern")
});

static ROW: LazyLock<TagPattern> =
    LazyLock::new(|| TagPattern::new(TagName::Tr, CaseMode::Insensitive).expect("tr pattern"));

static CELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<(?P<name>th|td)(?P<attributes>(?:\s|[a-zA-Z]+=")[^>]*)?>(?P<content>.*?)</(?:th|td)\s*>"#,
    )
    .expect("cell regex")
});

static COLSPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)colspan=["']?(\d+)"#).expect("colspan regex"));

static ROWSPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)rowspan=["']?(\d+)"#).expect("rowspan regex"));

/// Header and data rows of one table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decomposed {
    pub headers: Vec<TableRow>,
    pub rows: Vec<TableRow>,
}

/// Split a table's inner HTML into header rows and data rows
pub fn decompose_table(table_body: &str) -> Decomposed {
    let mut decomposed = Decomposed::default();

    if let Some(thead) = section(&THEAD, table_body) {
        decomposed.headers = collect_rows(thead, true);
    }

    if let Some(tbody) = section(&TBODY, table_body) {
        decomposed.rows = collect_rows(tbody, false);
    }

    if decomposed.headers.is_empty() && decomposed.rows.is_empty() {
        decomposed.rows = collect_rows(table_body, false);
    }

    ::log::trace!(
        "Decomposed table into {} header rows and {} rows",
        decomposed.headers.len(),
        decomposed.rows.len()
    );
    decomposed
}

/// Non-empty body of the first match of `pattern`
fn section<'a>(pattern: &TagPattern, html: &'a str) -> Option<&'a str> {
    pattern
        .find_inclusive(html)
        .and_then(|m| m.body)
        .filter(|body| !body.is_empty())
}

fn collect_rows(html: &str, synthesize: bool) -> Vec<TableRow> {
    ROW.find_all_inclusive(html)
        .filter_map(|m| m.body)
        .filter(|content| !content.is_empty())
        .filter_map(|content| {
            let mut cells = extract_cells(content);
            if cells.is_empty() && synthesize && !content.trim().is_empty() {
                cells.push(TableCell {
                    content: strip_tags(content).trim().to_string(),
                    original_html: content.to_string(),
                    text: innermost_text(content),
                    col_span: None,
                    row_span: None,
                });
            }
            (!cells.is_empty()).then_some(TableRow { cells })
        })
        .collect()
}

/// Every `<th>`/`<td>` pair in a row, in document order
pub fn extract_cells(row: &str) -> Vec<TableCell> {
    let mut cells = Vec::new();
    let mut cursor = 0;
    while cursor <= row.len() {
        let Some(caps) = CELL.captures_at(row, cursor) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };
        let name = caps.name("name").map_or("", |m| m.as_str());
        if caps
            .name("attributes")
            .is_some_and(|m| fused_into_longer_name(name, m.as_str()))
        {
            cursor = next_cursor(row, whole.start(), whole.start());
            continue;
        }
        cells.push(cell(&caps));
        cursor = next_cursor(row, whole.start(), whole.end());
    }
    cells
}

fn cell(caps: &Captures<'_>) -> TableCell {
    let content = caps.name("content").map_or("", |m| m.as_str()).trim();
    let attributes = caps.name("attributes").map_or("", |m| m.as_str());
    TableCell {
        content: content.to_string(),
        original_html: caps.get(0).map_or("", |m| m.as_str()).to_string(),
        text: innermost_text(content),
        col_span: span(&COLSPAN, attributes),
        row_span: span(&ROWSPAN, attributes),
    }
}

/// Positive integer value of a span attribute
fn span(pattern: &Regex, attributes: &str) -> Option<u32> {
    pattern
        .captures(attributes)?
        .get(1)?
        .as_str()
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
}

/// Header cell texts of all header rows, flattened in order
pub fn header_keys(table: &Table) -> Vec<&str> {
    table
        .headers
        .iter()
        .flat_map(|row| row.cells.iter())
        .map(|cell| cell.text.as_str())
        .collect()
}

/// Turn each data row into a record keyed by header text.
///
/// Cells past the last header are dropped; headers past the last cell are
/// left out of that row's record.
pub fn project_table(table: &Table) -> Vec<Record> {
    let keys = header_keys(table);
    table
        .rows
        .iter()
        .map(|row| {
            let mut record = Record::default();
            for (key, cell) in keys.iter().zip(&row.cells) {
                record.insert(*key, cell.text.as_str());
            }
            record
        })
        .collect()
}

/// Project one table by index, or every table.
///
/// A valid `index` yields that table alone. Otherwise no tables yield an
/// empty list, one table yields its records and several tables yield one
/// record list each.
pub fn project_tables(tables: &[Table], index: Option<usize>) -> TableObjects {
    if let Some(table) = index.and_then(|i| tables.get(i)) {
        return TableObjects::Single(project_table(table));
    }

    match tables {
        [] => TableObjects::Single(Vec::new()),
        [table] => TableObjects::Single(project_table(table)),
        _ => TableObjects::Multiple(tables.iter().map(project_table).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(rows: &[TableRow]) -> Vec<Vec<&str>> {
        rows.iter()
            .map(|r| r.cells.iter().map(|c| c.text.as_str()).collect())
            .collect()
    }

    fn table(body: &str) -> Table {
        let d = decompose_table(body);
        Table {
            headers: d.headers,
            rows: d.rows,
            ..Table::default()
        }
    }

    #[test]
    fn test_thead_and_tbody() {
        let body = "<thead><tr><th>Name</th><th>Price</th></tr></thead>\
                    <tbody><tr><td>Pikachu</td><td>$10</td></tr>\
                    <tr><td>Eevee</td><td>$12</td></tr></tbody>";
        let d = decompose_table(body);
        assert_eq!(texts(&d.headers), vec![vec!["Name", "Price"]]);
        assert_eq!(
            texts(&d.rows),
            vec![vec!["Pikachu", "$10"], vec!["Eevee", "$12"]]
        );
    }

    #[test]
    fn test_bare_rows_fallback() {
        let body = "<tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr>";
        let d = decompose_table(body);
        assert!(d.headers.is_empty());
        assert_eq!(texts(&d.rows), vec![vec!["A", "B"], vec!["1", "2"]]);
    }

    #[test]
    fn test_thead_without_tbody_keeps_rows_outside_sections_out() {
        let body = "<thead><tr><th>A</th></tr></thead><tr><td>1</td></tr>";
        let d = decompose_table(body);
        assert_eq!(texts(&d.headers), vec![vec!["A"]]);
        assert!(d.rows.is_empty());
    }

    #[test]
    fn test_empty_sections_fall_back_to_bare_rows() {
        let body = "<thead></thead><tbody></tbody><tr><td>1</td></tr>";
        let d = decompose_table(body);
        assert!(d.headers.is_empty());
        assert_eq!(texts(&d.rows), vec![vec!["1"]]);
    }

    #[test]
    fn test_header_row_without_cells_becomes_synthetic_cell() {
        let body = "<thead><tr><b>Quarterly</b> results</tr></thead>";
        let d = decompose_table(body);
        assert_eq!(d.headers.len(), 1);
        let cell = &d.headers[0].cells[0];
        assert_eq!(cell.content, "Quarterly results");
        assert_eq!(cell.original_html, "<b>Quarterly</b> results");
        assert_eq!(cell.text, "Quarterly results");
        assert_eq!(cell.col_span, None);
    }

    #[test]
    fn test_body_rows_without_cells_are_dropped() {
        let body = "<tbody><tr>just text</tr><tr><td>x</td></tr><tr></tr></tbody>";
        let d = decompose_table(body);
        assert_eq!(texts(&d.rows), vec![vec!["x"]]);
    }

    #[test]
    fn test_cell_fields() {
        let cells = extract_cells(
            r#"<td colspan="2" ROWSPAN=3> <a href="/p">Big   <b>Box</b></a> </td><TH colspan="x">h</TH>"#,
        );
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].content, r#"<a href="/p">Big   <b>Box</b></a>"#);
        assert_eq!(cells[0].text, "Big Box");
        assert_eq!(
            cells[0].original_html,
            r#"<td colspan="2" ROWSPAN=3> <a href="/p">Big   <b>Box</b></a> </td>"#
        );
        assert_eq!(cells[0].col_span, Some(2));
        assert_eq!(cells[0].row_span, Some(3));
        assert_eq!(cells[1].text, "h");
        assert_eq!(cells[1].col_span, None);
    }

    #[test]
    fn test_cell_attributes_fused_onto_the_name() {
        let d = decompose_table(r#"<tr><tdcolspan="2">x</td><tdrowspan="3"class="n">y</td></tr>"#);
        assert_eq!(texts(&d.rows), vec![vec!["x", "y"]]);
        assert_eq!(d.rows[0].cells[0].col_span, Some(2));
        assert_eq!(d.rows[0].cells[1].row_span, Some(3));

        // `<theadclass=...>` is a section, not a header cell
        let cells = extract_cells(r#"<theadclass="h"><th>A</th>"#);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].text, "A");
    }

    #[test]
    fn test_span_must_be_positive_and_on_opening_tag() {
        let cells = extract_cells(r#"<td colspan="0"><span colspan="4">x</span></td>"#);
        assert_eq!(cells[0].col_span, None);
    }

    #[test]
    fn test_table_internal_tags_ignore_case() {
        let body = "<THEAD><TR><TH>A</TH></TR></THEAD><TBODY><TR><TD>1</TD></TR></TBODY>";
        let d = decompose_table(body);
        assert_eq!(texts(&d.headers), vec![vec!["A"]]);
        assert_eq!(texts(&d.rows), vec![vec!["1"]]);
    }

    #[test]
    fn test_tr_does_not_match_track() {
        let body = "<track src=\"a.vtt\"><tr><td>1</td></tr>";
        let d = decompose_table(body);
        assert_eq!(texts(&d.rows), vec![vec!["1"]]);
    }

    #[test]
    fn test_project_table_matching_columns() {
        let t = table(
            "<thead><tr><th>Name</th><th>Type</th><th>Price</th></tr></thead>\
             <tbody><tr><td>Bulbasaur</td><td>Grass</td><td>63</td></tr></tbody>",
        );
        let records = project_table(&t);
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].keys().collect::<Vec<_>>(),
            vec!["Name", "Type", "Price"]
        );
        assert_eq!(records[0].get("Type"), Some("Grass"));
    }

    #[test]
    fn test_project_table_mismatched_columns() {
        let t = table(
            "<thead><tr><th>Name</th><th>Type</th><th>Price</th></tr></thead>\
             <tbody><tr><td>Charmander</td><td>Fire</td></tr>\
             <tr><td>Squirtle</td><td>Water</td><td>48</td><td>extra</td></tr></tbody>",
        );
        let records = project_table(&t);
        assert_eq!(records[0].keys().collect::<Vec<_>>(), vec!["Name", "Type"]);
        assert_eq!(records[0].get("Price"), None);
        assert_eq!(records[1].len(), 3);
        assert_eq!(records[1].get("Price"), Some("48"));
    }

    #[test]
    fn test_project_table_flattens_header_rows() {
        let t = table(
            "<thead><tr><th>A</th></tr><tr><th>B</th></tr></thead>\
             <tbody><tr><td>1</td><td>2</td></tr></tbody>",
        );
        let records = project_table(&t);
        assert_eq!(records[0].get("A"), Some("1"));
        assert_eq!(records[0].get("B"), Some("2"));
    }

    #[test]
    fn test_project_table_without_headers_gives_empty_records() {
        let t = table("<tr><td>1</td></tr><tr><td>2</td></tr>");
        let records = project_table(&t);
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(Record::is_empty));
    }

    #[test]
    fn test_project_tables_shapes() {
        let one = table("<thead><tr><th>K</th></tr></thead><tbody><tr><td>v</td></tr></tbody>");
        let two = table("<thead><tr><th>X</th></tr></thead><tbody><tr><td>y</td></tr></tbody>");

        assert_eq!(project_tables(&[], None), TableObjects::Single(Vec::new()));

        match project_tables(std::slice::from_ref(&one), None) {
            TableObjects::Single(records) => assert_eq!(records[0].get("K"), Some("v")),
            other => panic!("expected a single projection, got {other:?}"),
        }

        let both = [one, two];
        match project_tables(&both, None) {
            TableObjects::Multiple(tables) => {
                assert_eq!(tables.len(), 2);
                assert_eq!(tables[1][0].get("X"), Some("y"));
            }
            other => panic!("expected multiple projections, got {other:?}"),
        }

        match project_tables(&both, Some(1)) {
            TableObjects::Single(records) => assert_eq!(records[0].get("X"), Some("y")),
            other => panic!("expected a single projection, got {other:?}"),
        }

        // Out of range falls back to every table
        assert!(matches!(
            project_tables(&both, Some(9)),
            TableObjects::Multiple(_)
        ));
    }
}
