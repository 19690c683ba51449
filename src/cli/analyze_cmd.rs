//! One-shot pipeline run: fetch, clean, analyze, emit the answer array.
//!
//! Mirrors the server's `/api/` behavior but writes the ordered
//! 4-element JSON array to stdout or a file. A fetch failure still
//! emits the error tuple rather than aborting.

use crate::acquisition::http_client::HttpClient;
use crate::analysis::{self, Answers};
use crate::dataset;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::warn;

pub async fn run(output: Option<&Path>) -> Result<()> {
    let client = HttpClient::new(dataset::FETCH_TIMEOUT_MS);
    let answers = match dataset::fetch_dataset(&client, dataset::SOURCE_URL).await {
        Ok(films) => analysis::analyze(&films),
        Err(e) => {
            warn!("failed to fetch source data: {e}");
            Answers::error()
        }
    };
    write_answers(answers, output)
}

/// Serialize the answers in question order and write them out.
pub fn write_answers(answers: Answers, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string(&answers.into_array())?;
    match output {
        Some(path) => std::fs::write(path, &json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_answers_to_file() {
        let answers = Answers {
            blockbusters_before_2000: "1".to_string(),
            earliest_blockbuster: "Titanic".to_string(),
            rank_peak_correlation: "0.5".to_string(),
            visualization: String::new(),
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        write_answers(answers, Some(&path)).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, vec!["1", "Titanic", "0.5", ""]);
    }

    #[test]
    fn test_error_tuple_serializes_in_order() {
        let json = serde_json::to_string(&Answers::error().into_array()).unwrap();
        assert_eq!(json, r#"["Error","Error","Error",""]"#);
    }
}
