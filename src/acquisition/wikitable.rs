//! Locate and parse the target wikitable from raw HTML.
//!
//! The source page carries several `wikitable` elements; the one we want
//! is identified by its text content. Cells keep their reading order and
//! body rows may use `th` cells (Wikipedia marks the title cell as a row
//! header), so both `th` and `td` count as cells.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Text identifying the target table among the page's wikitables.
pub const TABLE_MARKER: &str = "Highest-grossing films";

/// A table reduced to text: one header row plus body rows of cells.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Column names from the header row, footnote markers stripped.
    pub headers: Vec<String>,
    /// Body rows, one `Vec<String>` per row in document order.
    pub rows: Vec<Vec<String>>,
}

/// Find the first `table.wikitable` whose text contains `marker` and
/// parse it. Returns `None` when no table matches.
pub fn find_target_table(html: &str, marker: &str) -> Option<RawTable> {
    let document = Html::parse_document(html);
    let table_sel = Selector::parse("table.wikitable").unwrap();

    let table = document
        .select(&table_sel)
        .find(|t| t.text().collect::<String>().contains(marker))?;

    Some(parse_table(table))
}

/// Convert a table element into headers + body rows.
///
/// The first `tr` supplies the headers; every following `tr` becomes a
/// body row. Bracketed footnote markers (`[a]`, `[# 2]`, ...) are
/// stripped from all cell text and whitespace is collapsed.
fn parse_table(table: ElementRef<'_>) -> RawTable {
    let tr_sel = Selector::parse("tr").unwrap();
    let cell_sel = Selector::parse("th, td").unwrap();
    let footnote = Regex::new(r"\[.*?\]").unwrap();

    let mut trs = table.select(&tr_sel);

    let headers = trs
        .next()
        .map(|tr| {
            tr.select(&cell_sel)
                .map(|cell| cell_text(cell, &footnote))
                .collect()
        })
        .unwrap_or_default();

    let rows = trs
        .map(|tr| {
            tr.select(&cell_sel)
                .map(|cell| cell_text(cell, &footnote))
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect();

    RawTable { headers, rows }
}

fn cell_text(cell: ElementRef<'_>, footnote: &Regex) -> String {
    let text: String = cell.text().collect();
    let text = footnote.replace_all(&text, "");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_marked_table_among_several() {
        let html = r#"
        <html><body>
        <table class="wikitable"><tr><th>Other</th></tr><tr><td>1</td></tr></table>
        <table class="wikitable">
          <caption>Highest-grossing films</caption>
          <tr><th>Rank</th><th>Title</th></tr>
          <tr><td>1</td><th>Avatar</th></tr>
        </table>
        </body></html>
        "#;

        let table = find_target_table(html, TABLE_MARKER).unwrap();
        assert_eq!(table.headers, vec!["Rank", "Title"]);
        assert_eq!(table.rows, vec![vec!["1".to_string(), "Avatar".to_string()]]);
    }

    #[test]
    fn test_no_marker_returns_none() {
        let html = r#"
        <html><body>
        <table class="wikitable"><tr><th>Budget</th></tr></table>
        <table><tr><th>Highest-grossing films</th></tr></table>
        </body></html>
        "#;

        // Second table matches the marker but is not a wikitable.
        assert!(find_target_table(html, TABLE_MARKER).is_none());
    }

    #[test]
    fn test_footnote_markers_stripped() {
        let html = r#"
        <table class="wikitable">
          <caption>Highest-grossing films</caption>
          <tr><th>Worldwide gross[# 1]</th><th>Year[a]</th></tr>
          <tr><td>$2,923,706,026[# 2]</td><td>2009</td></tr>
        </table>
        "#;

        let table = find_target_table(html, TABLE_MARKER).unwrap();
        assert_eq!(table.headers, vec!["Worldwide gross", "Year"]);
        assert_eq!(table.rows[0][0], "$2,923,706,026");
    }

    #[test]
    fn test_nested_markup_text_is_collapsed() {
        let html = r#"
        <table class="wikitable">
          <caption>Highest-grossing films</caption>
          <tr><th>Title</th></tr>
          <tr><th scope="row"><i><a href="/wiki/Titanic">Titanic</a></i></th></tr>
          <tr><td>  Spider-Man:
              No Way Home </td></tr>
        </table>
        "#;

        let table = find_target_table(html, TABLE_MARKER).unwrap();
        assert_eq!(table.rows[0][0], "Titanic");
        assert_eq!(table.rows[1][0], "Spider-Man: No Way Home");
    }
}
