//! Film records: cleaning the raw wikitable into typed rows.
//!
//! A row survives cleaning only when both the worldwide gross and the
//! year parse as numbers; rank and peak are coerced but stay optional.
//! The record set lives only for the duration of one request.

use crate::acquisition::http_client::HttpClient;
use crate::acquisition::wikitable::{self, RawTable, TABLE_MARKER};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// Hardcoded source page for the highest-grossing films table.
pub const SOURCE_URL: &str = "https://en.wikipedia.org/wiki/List_of_highest-grossing_films";

/// Request timeout for the source fetch.
pub const FETCH_TIMEOUT_MS: u64 = 10_000;

/// Uniform "no data" failure for the fetch → parse → clean pipeline.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("source returned HTTP {0}")]
    Status(u16),
    #[error("highest-grossing films table not found on source page")]
    TableNotFound,
    #[error("required column missing from table: {0}")]
    MissingColumn(&'static str),
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// One cleaned row of the highest-grossing films table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilmRecord {
    pub title: String,
    pub year: i32,
    pub rank: Option<u32>,
    pub peak: Option<u32>,
    pub worldwide_gross: f64,
}

/// Fetch the source page, locate the target table, and clean it.
pub async fn fetch_dataset(
    client: &HttpClient,
    url: &str,
) -> Result<Vec<FilmRecord>, ScrapeError> {
    info!("fetching source page {url}");
    let resp = client.get(url, FETCH_TIMEOUT_MS).await?;
    if !(200..300).contains(&resp.status) {
        return Err(ScrapeError::Status(resp.status));
    }

    let table =
        wikitable::find_target_table(&resp.body, TABLE_MARKER).ok_or(ScrapeError::TableNotFound)?;
    debug!("target table located with {} body rows", table.rows.len());

    let films = clean(&table)?;
    info!("dataset cleaned to {} records", films.len());
    Ok(films)
}

/// Convert a raw table into film records.
///
/// Columns are resolved by header name. Title, worldwide gross, and year
/// are required columns; rank and peak may be absent entirely, in which
/// case every record carries `None` for them.
pub fn clean(table: &RawTable) -> Result<Vec<FilmRecord>, ScrapeError> {
    let required = |name: &'static str| {
        column_index(table, name).ok_or(ScrapeError::MissingColumn(name))
    };
    let title_col = required("Title")?;
    let gross_col = required("Worldwide gross")?;
    let year_col = required("Year")?;
    let rank_col = column_index(table, "Rank");
    let peak_col = column_index(table, "Peak");

    let mut films = Vec::new();
    for row in &table.rows {
        let gross = row.get(gross_col).and_then(|c| parse_currency(c));
        let year = row.get(year_col).and_then(|c| c.trim().parse::<i32>().ok());

        // Rows missing gross or year are discarded.
        let (Some(worldwide_gross), Some(year)) = (gross, year) else {
            continue;
        };

        films.push(FilmRecord {
            title: row.get(title_col).cloned().unwrap_or_default(),
            year,
            rank: parse_optional_u32(row, rank_col),
            peak: parse_optional_u32(row, peak_col),
            worldwide_gross,
        });
    }
    Ok(films)
}

fn column_index(table: &RawTable, name: &str) -> Option<usize> {
    table
        .headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
}

/// Normalize a currency cell to a plain number: every character that is
/// not an ASCII digit or `.` is stripped before parsing.
fn parse_currency(cell: &str) -> Option<f64> {
    let digits: String = cell
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok()
}

fn parse_optional_u32(row: &[String], col: Option<usize>) -> Option<u32> {
    col.and_then(|i| row.get(i))
        .and_then(|c| c.trim().parse::<u32>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_clean_coerces_currency_and_numbers() {
        let table = raw(
            &["Rank", "Peak", "Title", "Worldwide gross", "Year"],
            &[&["1", "1", "Avatar", "$2,923,706,026", "2009"]],
        );
        let films = clean(&table).unwrap();
        assert_eq!(films.len(), 1);
        assert_eq!(films[0].title, "Avatar");
        assert_eq!(films[0].worldwide_gross, 2_923_706_026.0);
        assert_eq!(films[0].year, 2009);
        assert_eq!(films[0].rank, Some(1));
        assert_eq!(films[0].peak, Some(1));
    }

    #[test]
    fn test_clean_drops_rows_missing_gross_or_year() {
        let table = raw(
            &["Rank", "Peak", "Title", "Worldwide gross", "Year"],
            &[
                &["1", "1", "Avatar", "$2,923,706,026", "2009"],
                &["2", "1", "Unreleased", "TBA", "2030"],
                &["3", "1", "Undated", "$1,000,000,000", "TBA"],
            ],
        );
        let films = clean(&table).unwrap();
        assert_eq!(films.len(), 1);
        assert_eq!(films[0].title, "Avatar");
    }

    #[test]
    fn test_clean_keeps_rows_with_unparsable_rank_or_peak() {
        let table = raw(
            &["Rank", "Peak", "Title", "Worldwide gross", "Year"],
            &[&["—", "n/a", "Frozen II", "$1,450,026,933", "2019"]],
        );
        let films = clean(&table).unwrap();
        assert_eq!(films.len(), 1);
        assert_eq!(films[0].rank, None);
        assert_eq!(films[0].peak, None);
    }

    #[test]
    fn test_clean_headers_resolved_case_insensitively() {
        let table = raw(
            &["rank", "peak", "title", "worldwide gross", "year"],
            &[&["4", "1", "Titanic", "$2,264,750,694", "1997"]],
        );
        let films = clean(&table).unwrap();
        assert_eq!(films[0].title, "Titanic");
    }

    #[test]
    fn test_clean_missing_required_column() {
        let table = raw(&["Rank", "Title", "Year"], &[&["1", "Avatar", "2009"]]);
        let err = clean(&table).unwrap_err();
        assert!(matches!(err, ScrapeError::MissingColumn("Worldwide gross")));
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("$2,923,706,026"), Some(2_923_706_026.0));
        assert_eq!(parse_currency("US$1,518,812,988"), Some(1_518_812_988.0));
        assert_eq!(parse_currency("TBA"), None);
        assert_eq!(parse_currency(""), None);
        // Multiple decimal points cannot parse.
        assert_eq!(parse_currency("1.2.3"), None);
    }

    #[test]
    fn test_short_rows_are_dropped_not_fatal() {
        let table = raw(
            &["Rank", "Peak", "Title", "Worldwide gross", "Year"],
            &[&["1", "1", "Avatar"]],
        );
        let films = clean(&table).unwrap();
        assert!(films.is_empty());
    }
}
