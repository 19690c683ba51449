//! The four fixed questions over the cleaned film dataset.
//!
//! Every question degrades to a sentinel value rather than failing; an
//! unexpected internal failure collapses the whole result to the error
//! tuple. Callers never see a panic or an error from this module.

use crate::chart;
use crate::dataset::FilmRecord;
use serde::Serialize;
use tracing::{debug, error};

/// Sentinel for question 2 when no film qualifies.
pub const NO_QUALIFYING_FILM: &str = "No films found over $1.5B";

/// Sentinel for question 3 when fewer than two rank/peak pairs exist.
pub const INSUFFICIENT_DATA: &str = "Insufficient data for correlation";

/// Per-question sentinel used when the analysis itself fails.
pub const ERROR_SENTINEL: &str = "Error";

const TWO_BILLION: f64 = 2_000_000_000.0;
const ONE_POINT_FIVE_BILLION: f64 = 1_500_000_000.0;

/// The ordered 4-element analysis result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answers {
    /// Q1: count of films grossing $2B+ released before 2000, as text.
    pub blockbusters_before_2000: String,
    /// Q2: title of the earliest film grossing $1.5B+, or a sentinel.
    pub earliest_blockbuster: String,
    /// Q3: Pearson correlation of rank vs. peak to 3 decimals, or a sentinel.
    pub rank_peak_correlation: String,
    /// Q4: scatter + regression rendering as a data URI, or empty.
    pub visualization: String,
}

impl Answers {
    /// The all-sentinel tuple returned when analysis fails.
    pub fn error() -> Self {
        Self {
            blockbusters_before_2000: ERROR_SENTINEL.to_string(),
            earliest_blockbuster: ERROR_SENTINEL.to_string(),
            rank_peak_correlation: ERROR_SENTINEL.to_string(),
            visualization: String::new(),
        }
    }

    /// The answers in question order, as emitted by the CLI.
    pub fn into_array(self) -> [String; 4] {
        [
            self.blockbusters_before_2000,
            self.earliest_blockbuster,
            self.rank_peak_correlation,
            self.visualization,
        ]
    }
}

/// Answer all four questions. Total: internal failures are logged and
/// converted to the error tuple instead of propagating.
pub fn analyze(films: &[FilmRecord]) -> Answers {
    match try_analyze(films) {
        Ok(answers) => answers,
        Err(e) => {
            error!("analysis failed: {e:#}");
            Answers::error()
        }
    }
}

fn try_analyze(films: &[FilmRecord]) -> anyhow::Result<Answers> {
    let q1 = films
        .iter()
        .filter(|f| f.worldwide_gross >= TWO_BILLION && f.year < 2000)
        .count();
    debug!("{q1} films grossed $2B+ before 2000");

    let q2 = earliest_title_over(films, ONE_POINT_FIVE_BILLION)
        .map(str::to_string)
        .unwrap_or_else(|| NO_QUALIFYING_FILM.to_string());

    let pairs = rank_peak_pairs(films);
    let q3 = match pearson(&pairs) {
        Some(r) => round3(r).to_string(),
        None => INSUFFICIENT_DATA.to_string(),
    };

    let q4 = if pairs.len() > 1 {
        chart::scatter_data_uri(&pairs)?
    } else {
        debug!("insufficient data for visualization");
        String::new()
    };

    Ok(Answers {
        blockbusters_before_2000: q1.to_string(),
        earliest_blockbuster: q2,
        rank_peak_correlation: q3,
        visualization: q4,
    })
}

/// Title of the earliest-year film grossing at least `threshold`.
/// Ties are broken by original row order.
fn earliest_title_over(films: &[FilmRecord], threshold: f64) -> Option<&str> {
    films
        .iter()
        .filter(|f| f.worldwide_gross >= threshold)
        .min_by_key(|f| f.year)
        .map(|f| f.title.as_str())
}

/// Rank/peak pairs over records that carry both fields.
fn rank_peak_pairs(films: &[FilmRecord]) -> Vec<(f64, f64)> {
    films
        .iter()
        .filter_map(|f| match (f.rank, f.peak) {
            (Some(r), Some(p)) => Some((r as f64, p as f64)),
            _ => None,
        })
        .collect()
}

/// Pearson correlation coefficient. `None` for fewer than 2 pairs or
/// when either column has zero variance (the coefficient is undefined).
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return None;
    }
    Some(cov / denom)
}

fn round3(r: f64) -> f64 {
    (r * 1000.0).round() / 1000.0
}
